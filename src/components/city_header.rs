use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::WeatherReport;
use crate::thumbnail::{Thumbnail, ThumbnailView};

pub struct CityHeader;

pub struct CityHeaderProps<'a> {
    pub report: &'a WeatherReport,
    pub flag: Option<&'a Thumbnail>,
}

/// Rows reserved for the flag + caption line under the big city name.
pub const CAPTION_ROWS: u16 = 3;

type Rgb = (u8, u8, u8);

/// Gradient end points for a temperature, grey when unknown.
pub fn temperature_palette(celsius: Option<f64>) -> (Rgb, Rgb) {
    match celsius {
        Some(t) if t < 0.0 => ((150, 200, 255), (200, 230, 255)), // ice
        Some(t) if t < 15.0 => ((100, 180, 255), (150, 220, 200)), // cool
        Some(t) if t < 25.0 => ((100, 200, 150), (255, 220, 100)), // mild
        Some(t) if t < 35.0 => ((255, 180, 80), (255, 120, 80)), // warm
        Some(_) => ((255, 100, 80), (255, 60, 60)), // hot
        None => ((180, 180, 180), (220, 220, 220)),
    }
}

pub fn temperature_fill(celsius: Option<f64>) -> Fill {
    let ((r1, g1, b1), (r2, g2, b2)) = temperature_palette(celsius);
    Fill::Linear(LinearGradient::horizontal(
        ArtColor::rgb(r1, g1, b1),
        ArtColor::rgb(r2, g2, b2),
    ))
}

impl Component<Action> for CityHeader {
    type Props<'a> = CityHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),               // FIGlet city name
            Constraint::Length(CAPTION_ROWS), // flag + "City, CC"
        ])
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(temperature_fill(props.report.temperature));
        frame.render_widget(ArtBox::new(&renderer, &props.report.city), chunks[0]);

        render_caption(frame, chunks[1], props.report, props.flag);
    }
}

/// Flag thumbnail followed by the place label, centered as one group.
fn render_caption(frame: &mut Frame, area: Rect, report: &WeatherReport, flag: Option<&Thumbnail>) {
    let label = report.place_label();
    let label_width = label.chars().count() as u16;
    let (flag_cols, flag_rows) = flag.map_or((0, 0), Thumbnail::cell_size);
    let gap = if flag.is_some() { 1 } else { 0 };
    let group_width = (flag_cols + gap + label_width).min(area.width);
    let x = area.x + area.width.saturating_sub(group_width) / 2;

    if let Some(flag) = flag {
        let flag_area = Rect::new(
            x,
            area.y,
            flag_cols.min(area.width),
            flag_rows.min(area.height),
        );
        frame.render_widget(ThumbnailView::new(flag), flag_area);
    }

    let label_x = x + flag_cols + gap;
    let label_area = Rect::new(
        label_x.min(area.right()),
        area.y + area.height / 2,
        area.right().saturating_sub(label_x),
        1.min(area.height),
    );
    let caption = Line::from(Span::styled(label, Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(caption), label_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_bands() {
        assert_eq!(temperature_palette(Some(-5.0)).0, (150, 200, 255));
        assert_eq!(temperature_palette(Some(25.0)).0, (255, 180, 80));
        assert_eq!(temperature_palette(None).0, (180, 180, 180));
    }
}
