use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::state::Tab;

const PLACEHOLDER: &str = "Search for a city...";

/// City search field. Enter submits; Tab and Esc leave for the other tab.
pub struct SearchForm {
    input: TextInput,
    was_visible: bool,
}

pub struct SearchFormProps<'a> {
    pub query: &'a str,
    pub tab: Tab,
    pub is_focused: bool,
    // Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            was_visible: false,
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the cursor when the form reappears.
    pub fn set_visible(&mut self, is_visible: bool) {
        if is_visible && !self.was_visible {
            self.input = TextInput::new();
        }
        self.was_visible = is_visible;
    }
}

impl Component<Action> for SearchForm {
    type Props<'a> = SearchFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => return vec![Action::TabSwitch(props.tab.other())],
            KeyCode::Esc => return vec![Action::TabSwitch(Tab::MyLocation)],
            KeyCode::Enter => return vec![(props.on_query_submit)(props.query.to_string())],
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(Color::Rgb(50, 50, 60)),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::Rgb(60, 60, 70)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search for City ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(Color::Rgb(50, 50, 60)),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, inner, input_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn props(query: &str, is_focused: bool) -> SearchFormProps<'_> {
        SearchFormProps {
            query,
            tab: Tab::Search,
            is_focused,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchSubmit,
        }
    }

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_submits_query() {
        let mut form = SearchForm::new();
        let actions: Vec<_> = form
            .handle_event(&press(KeyCode::Enter), props("Pune", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchSubmit("Pune".into()));
    }

    #[test]
    fn test_tab_switches_away() {
        let mut form = SearchForm::new();
        let actions: Vec<_> = form
            .handle_event(&press(KeyCode::Tab), props("", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::TabSwitch(Tab::MyLocation));
    }

    #[test]
    fn test_typing_changes_query() {
        let mut form = SearchForm::new();
        let actions: Vec<_> = form
            .handle_event(&EventKind::Key(key("p")), props("", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchQueryChange("p".into()));
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut form = SearchForm::new();
        let actions: Vec<_> = form
            .handle_event(&press(KeyCode::Enter), props("Pune", false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
