use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    Component, GrantAccess, GrantAccessProps, TabBar, TabBarProps, WeatherCard, WeatherCardProps,
};
use crate::action::Action;
use crate::state::{AppState, ImageKind, Panel, Tab};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Screen regions for a given state. The search form slot is filled by the
/// search component, which owns its own input state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayLayout {
    pub tabs: Rect,
    pub form: Option<Rect>,
    pub body: Rect,
    pub status: Rect,
}

pub fn display_layout(area: Rect, state: &AppState) -> DisplayLayout {
    let [tabs, main, status] = Layout::vertical([
        Constraint::Length(2), // Tabs + rule
        Constraint::Min(1),    // Panel
        Constraint::Length(1), // Help bar
    ])
    .areas(area);

    if state.search_form_visible() {
        let [form, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(main);
        DisplayLayout {
            tabs,
            form: Some(form),
            body,
            status,
        }
    } else {
        DisplayLayout {
            tabs,
            form: None,
            body: main,
            status,
        }
    }
}

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root view: tab bar, the active panel, and key hints
pub struct WeatherDisplay {
    status_bar: StatusBar,
}

impl Default for WeatherDisplay {
    fn default() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl WeatherDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let state = props.state;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab => Some(Action::TabSwitch(state.tab.other())),
                KeyCode::Char('1') => Some(Action::TabSwitch(Tab::MyLocation)),
                KeyCode::Char('2') | KeyCode::Char('/') => Some(Action::TabSwitch(Tab::Search)),
                KeyCode::Char('g') | KeyCode::Enter
                    if state.panel == Panel::AwaitingPermission =>
                {
                    Some(Action::LocationRequest)
                }
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let state = props.state;
        let layout = display_layout(area, state);

        let mut tab_bar = TabBar;
        tab_bar.render(frame, layout.tabs, TabBarProps { active: state.tab });

        render_panel(frame, layout.body, state);

        let hints = status_hints(state);
        let props = StatusBarProps {
            left: StatusBarSection::hints(&[]),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::hints(&[]),
            style: status_bar_style(),
            is_focused: false,
        };
        <StatusBar as Component<Action>>::render(&mut self.status_bar, frame, layout.status, props);
    }
}

fn status_bar_style() -> StatusBarStyle {
    StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        text: Style::default().fg(Color::Gray),
        hint_key: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(Color::DarkGray),
        separator: Style::default().fg(Color::DarkGray),
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    let mut hints = vec![StatusBarHint::new("tab", "switch")];
    if state.search_form_visible() {
        hints.push(StatusBarHint::new("enter", "search"));
        hints.push(StatusBarHint::new("esc", "back"));
        return hints;
    }
    if state.panel == Panel::AwaitingPermission {
        hints.push(StatusBarHint::new("g", "grant access"));
    }
    hints.push(StatusBarHint::new("q", "quit"));
    hints
}

/// Single render path for every panel
fn render_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.panel {
        Panel::AwaitingPermission => {
            let mut grant = GrantAccess;
            grant.render(
                frame,
                area,
                GrantAccessProps {
                    locating: state.locating,
                },
            );
        }
        Panel::SearchEntry => render_message(
            frame,
            area,
            "Type a city and press Enter",
            Style::default().fg(Color::DarkGray),
        ),
        Panel::Loading => {
            let text = format!("{} Loading...", state.spinner_frame());
            render_message(frame, area, &text, Style::default().fg(Color::Gray));
        }
        Panel::Results => match &state.report {
            Some(report) => {
                let mut card = WeatherCard;
                card.render(
                    frame,
                    area,
                    WeatherCardProps {
                        report,
                        flag: state.thumbnail(ImageKind::Flag),
                        icon: state.thumbnail(ImageKind::Icon),
                    },
                );
            }
            None => render_error(frame, area),
        },
        Panel::Error => render_error(frame, area),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let [middle] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(message.to_string(), style)).centered()),
        middle,
    );
}

fn render_error(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // icon
        Constraint::Length(1), // blank
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(ERROR_ICON).centered()),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(
                "Weather data unavailable",
                Style::default().fg(Color::Red).bold(),
            ))
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("tab", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to try the other tab", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[4],
    );
}
