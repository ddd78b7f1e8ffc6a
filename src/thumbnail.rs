//! Small raster images drawn with half-block cells
//!
//! Flag and condition-icon PNGs are decoded with `image`, shrunk to fit a
//! pixel box, and kept in state as raw RGBA. [`ThumbnailView`] paints two
//! pixel rows per terminal cell using `▀` with the upper pixel as foreground
//! and the lower pixel as background.

use image::imageops::FilterType;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::ImageKind;

const UPPER_HALF: &str = "▀";

/// Pixels with alpha below this are drawn as the terminal background.
const ALPHA_CUTOFF: u8 = 128;

#[derive(thiserror::Error, Debug)]
pub enum ThumbnailError {
    #[error("image request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA
    pub pixels: Vec<[u8; 4]>,
}

impl Thumbnail {
    /// Decode an encoded image and scale it down to fit `max_width` x `max_height`
    /// pixels, keeping the aspect ratio.
    pub fn decode(bytes: &[u8], max_width: u32, max_height: u32) -> Result<Self, ThumbnailError> {
        let image = image::load_from_memory(bytes)?;
        let scaled = image
            .resize(max_width.max(1), max_height.max(1), FilterType::Triangle)
            .to_rgba8();
        let (width, height) = scaled.dimensions();
        let pixels = scaled.pixels().map(|p| p.0).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Pixel box used for each image slot.
    pub fn max_size(kind: ImageKind) -> (u32, u32) {
        match kind {
            ImageKind::Flag => (12, 6),
            ImageKind::Icon => (10, 10),
        }
    }

    /// Terminal cells needed to draw the thumbnail.
    pub fn cell_size(&self) -> (u16, u16) {
        let cols = self.width.min(u16::MAX as u32) as u16;
        let rows = self.height.div_ceil(2).min(u16::MAX as u32) as u16;
        (cols, rows)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        match self.pixel(x, y) {
            Some([r, g, b, a]) if a >= ALPHA_CUTOFF => Color::Rgb(r, g, b),
            _ => Color::Reset,
        }
    }
}

/// Draws a [`Thumbnail`] at the top-left of its area, clipped to fit.
pub struct ThumbnailView<'a> {
    thumbnail: &'a Thumbnail,
}

impl<'a> ThumbnailView<'a> {
    pub fn new(thumbnail: &'a Thumbnail) -> Self {
        Self { thumbnail }
    }
}

impl Widget for ThumbnailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = self.thumbnail.cell_size();
        for row in 0..rows.min(area.height) {
            for col in 0..cols.min(area.width) {
                let x = u32::from(col);
                let top = self.thumbnail.color_at(x, u32::from(row) * 2);
                let bottom = self.thumbnail.color_at(x, u32::from(row) * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_scales_into_box() {
        let bytes = png(144, 108, [255, 153, 51, 255]);
        let thumb = Thumbnail::decode(&bytes, 12, 8).unwrap();

        assert!(thumb.width <= 12);
        assert!(thumb.height <= 8);
        assert_eq!(thumb.pixels.len(), (thumb.width * thumb.height) as usize);
        assert_eq!(thumb.pixels[0], [255, 153, 51, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = Thumbnail::decode(b"not an image", 10, 10);
        assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    }

    #[test]
    fn test_cell_size_rounds_up_rows() {
        let thumb = Thumbnail {
            width: 3,
            height: 5,
            pixels: vec![[0, 0, 0, 255]; 15],
        };
        assert_eq!(thumb.cell_size(), (3, 3));
    }

    #[test]
    fn test_view_paints_half_blocks() {
        let thumb = Thumbnail {
            width: 1,
            height: 2,
            pixels: vec![[255, 0, 0, 255], [0, 0, 255, 0]],
        };
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        ThumbnailView::new(&thumb).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        // transparent lower pixel
        assert_eq!(cell.bg, Color::Reset);
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }
}
