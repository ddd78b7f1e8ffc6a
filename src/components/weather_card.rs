use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::city_header::{CAPTION_ROWS, temperature_palette};
use super::{CityHeader, CityHeaderProps, Component};
use crate::action::Action;
use crate::state::WeatherReport;
use crate::thumbnail::{Thumbnail, ThumbnailView};

/// Results panel: every field of a weather report
pub struct WeatherCard;

pub struct WeatherCardProps<'a> {
    pub report: &'a WeatherReport,
    pub flag: Option<&'a Thumbnail>,
    pub icon: Option<&'a Thumbnail>,
}

/// Terminal rows taken by a full-size condition icon.
const ICON_ROWS: u16 = 5;
/// FIGlet name height cap (terminus font)
const HEADER_CAP: u16 = 6;
const TILE_ROWS: u16 = 3;

impl Component<Action> for WeatherCard {
    type Props<'a> = WeatherCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Max(HEADER_CAP + CAPTION_ROWS), // name + flag caption
            Constraint::Length(1),                      // description
            Constraint::Length(ICON_ROWS),              // icon
            Constraint::Length(1),                      // temperature
            Constraint::Length(1),                      // spacer
            Constraint::Length(TILE_ROWS),              // stat tiles
        ])
        .flex(Flex::Center)
        .split(area);

        let mut header = CityHeader;
        header.render(
            frame,
            chunks[0],
            CityHeaderProps {
                report: props.report,
                flag: props.flag,
            },
        );

        let desc = Line::from(Span::styled(
            props.report.description_text().to_string(),
            Style::default().fg(Color::Gray),
        ))
        .centered();
        frame.render_widget(Paragraph::new(desc), chunks[1]);

        render_icon(frame, chunks[2], props.report, props.icon);

        let ((r, g, b), _) = temperature_palette(props.report.temperature);
        let temp = Line::from(Span::styled(
            props.report.temperature_text(),
            Style::default().fg(Color::Rgb(r, g, b)).bold(),
        ))
        .centered();
        frame.render_widget(Paragraph::new(temp), chunks[3]);

        render_tiles(frame, chunks[5], props.report);
    }
}

/// Downloaded icon when available, otherwise an emoji for the icon code.
fn render_icon(frame: &mut Frame, area: Rect, report: &WeatherReport, icon: Option<&Thumbnail>) {
    match icon {
        Some(icon) => {
            let (cols, rows) = icon.cell_size();
            let icon_area = Rect::new(
                area.x + area.width.saturating_sub(cols) / 2,
                area.y + area.height.saturating_sub(rows) / 2,
                cols.min(area.width),
                rows.min(area.height),
            );
            frame.render_widget(ThumbnailView::new(icon), icon_area);
        }
        None => {
            let [middle] = Layout::vertical([Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(area);
            let emoji = Line::from(condition_emoji(report.icon.as_deref())).centered();
            frame.render_widget(Paragraph::new(emoji), middle);
        }
    }
}

fn render_tiles(frame: &mut Frame, area: Rect, report: &WeatherReport) {
    let tiles = [
        ("Windspeed", report.wind_speed_text()),
        ("Humidity", report.humidity_text()),
        ("Cloudiness", report.cloudiness_text()),
    ];
    let columns = Layout::horizontal([Constraint::Length(16); 3])
        .flex(Flex::Center)
        .spacing(1)
        .split(area);

    for ((title, value), column) in tiles.into_iter().zip(columns.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(60, 60, 70)))
            .title(Line::from(title.to_uppercase()).centered());
        let value = Line::from(Span::styled(value, Style::default().fg(Color::White).bold()))
            .centered();
        frame.render_widget(Paragraph::new(value).block(block), *column);
    }
}

/// Emoji for an OpenWeatherMap icon code such as `01d` or `10n`.
pub fn condition_emoji(icon: Option<&str>) -> &'static str {
    let Some(icon) = icon else {
        return "\u{2753}"; // ❓
    };
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "\u{1f319}", // 🌙
        Some("01") => "\u{2600}\u{fe0f}", // ☀️
        Some("02") => "\u{26c5}", // ⛅
        Some("03") | Some("04") => "\u{2601}\u{fe0f}", // ☁️
        Some("09") => "\u{1f327}\u{fe0f}", // 🌧️
        Some("10") => "\u{1f326}\u{fe0f}", // 🌦️
        Some("11") => "\u{26c8}\u{fe0f}", // ⛈️
        Some("13") => "\u{2744}\u{fe0f}", // ❄️
        Some("50") => "\u{1f32b}\u{fe0f}", // 🌫️
        _ => "\u{2753}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_emoji() {
        assert_eq!(condition_emoji(Some("01d")), "\u{2600}\u{fe0f}");
        assert_eq!(condition_emoji(Some("01n")), "\u{1f319}");
        assert_eq!(condition_emoji(Some("04n")), "\u{2601}\u{fe0f}");
        assert_eq!(condition_emoji(Some("zz")), "\u{2753}");
        assert_eq!(condition_emoji(None), "\u{2753}");
    }
}
