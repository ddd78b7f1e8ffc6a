use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, centered_rect,
};

use super::Component;
use crate::action::Action;

/// Blocking message box; any confirm key dismisses it
pub struct AlertDialog {
    modal: Modal,
}

pub struct AlertDialogProps<'a> {
    pub message: &'a str,
    pub is_focused: bool,
}

impl Default for AlertDialog {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl AlertDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for AlertDialog {
    type Props<'a> = AlertDialogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::AlertDismiss),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 6 {
            return;
        }
        let modal_area = centered_rect(50, 7, area);
        let message = props.message;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2), // message
                Constraint::Length(1), // blank
                Constraint::Length(1), // hint
            ])
            .flex(Flex::Center)
            .split(content_area);

            frame.render_widget(
                Paragraph::new(
                    Line::from(Span::styled(message, Style::default().fg(Color::White).bold()))
                        .centered(),
                )
                .wrap(Wrap { trim: true }),
                chunks[0],
            );
            frame.render_widget(
                Paragraph::new(
                    Line::from(vec![
                        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                        Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
                        Span::styled(" to dismiss", Style::default().fg(Color::DarkGray)),
                    ])
                    .centered(),
                ),
                chunks[2],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::AlertDismiss,
                render_content: &mut render_content,
            },
        );
    }
}
