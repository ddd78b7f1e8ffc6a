use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
};

use super::Component;
use crate::action::Action;
use crate::state::Tab;

pub struct TabBar;

pub struct TabBarProps {
    pub active: Tab,
}

impl Component<Action> for TabBar {
    type Props<'a> = TabBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let titles = Tab::ALL
            .iter()
            .map(|tab| Line::from(format!(" {} ", tab.title())))
            .collect::<Vec<_>>();

        let tabs = Tabs::new(titles)
            .select(props.active.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(50, 50, 60))
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│")
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::Rgb(60, 60, 70))),
            );
        frame.render_widget(tabs, area);
    }
}
