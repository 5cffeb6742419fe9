//! Verification gate for sensitive actions

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, dialog_block, key_hints};
use crate::model::PendingAction;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

const CODE_SLOTS: usize = 6;

#[derive(Default)]
pub struct MfaDialog;

impl MfaDialog {
    pub fn draw_with_gate(
        &self,
        frame: &mut Frame,
        area: Rect,
        action: &PendingAction,
        code: &str,
        error: Option<&str>,
    ) {
        let popup = centered_popup(area, 50, 11);
        frame.render_widget(Clear, popup);

        let entered = code.chars().count().min(CODE_SLOTS);
        let slots: String = (0..CODE_SLOTS)
            .map(|i| if i < entered { "● " } else { "_ " })
            .collect();

        let status = match error {
            Some(error) => Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };

        let lines = vec![
            Line::from(Span::styled(
                action.describe(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Enter your 6-digit verification code",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                slots.trim_end().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            status,
            Line::from(""),
            key_hints(&[("Enter", "Verify"), ("Esc", "Cancel")]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(dialog_block("Security Check", Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

impl Component for MfaDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseDialog),
            KeyCode::Enter => Some(Action::SubmitDialog),
            KeyCode::Backspace => Some(Action::DialogBackspace),
            KeyCode::Char(c) => Some(Action::DialogInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_code_is_masked() {
        let action = PendingAction::ExportCsv(Vec::new());
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                MfaDialog.draw_with_gate(frame, frame.area(), &action, "1234", Some("Invalid MFA code"))
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Export 0 quotes to CSV"));
        assert!(text.contains("● ● ● ● _ _"));
        assert!(!text.contains("1234"));
        assert!(text.contains("Invalid MFA code"));
    }
}
