use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

pub const LOCATION_ICON: &str = "\u{1f4cd}";

/// Prompt shown when no coordinates are stored for this session
pub struct GrantAccess;

pub struct GrantAccessProps {
    pub locating: bool,
}

impl Component<Action> for GrantAccess {
    type Props<'a> = GrantAccessProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // icon
            Constraint::Length(1), // blank
            Constraint::Length(1), // title
            Constraint::Length(1), // explanation
            Constraint::Length(1), // blank
            Constraint::Length(1), // action
        ])
        .flex(Flex::Center)
        .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(LOCATION_ICON).centered()),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    "Grant Location Access",
                    Style::default().fg(Color::White).bold(),
                ))
                .centered(),
            ),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    "Allow access to get weather information",
                    Style::default().fg(Color::Gray),
                ))
                .centered(),
            ),
            chunks[3],
        );

        let action = if props.locating {
            Line::from(Span::styled(
                "Locating...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("g", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to grant access", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(action.centered()), chunks[5]);
    }
}
