//! Allocate-to-PO dialog

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, dialog_block, key_hints};
use crate::model::Quote;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct AllocateDialog;

impl AllocateDialog {
    pub fn draw_with_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        quote: &Quote,
        po_number: &str,
        busy: bool,
        error: Option<&str>,
    ) {
        let popup = centered_popup(area, 60, 11);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Quote: ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!(
                    "{} · {} → {}",
                    quote.carrier_name(),
                    quote.origin,
                    quote.destination
                )),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("PO Number: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{}█", po_number),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(""),
        ];

        if busy {
            lines.push(Line::from(Span::styled(
                "Allocating...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(""));
        lines.push(key_hints(&[("Enter", "Confirm Allocation"), ("Esc", "Cancel")]));

        let paragraph =
            Paragraph::new(lines).block(dialog_block("Allocate Quote to PO", Color::Green));
        frame.render_widget(paragraph, popup);
    }
}

impl Component for AllocateDialog {
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

    #[test]
    fn test_typing_goes_to_field() {
        let mut dialog = AllocateDialog;
        let action = dialog.handle_key_event(KeyEvent::from(KeyCode::Char('q'))).unwrap();
        assert_eq!(action, Some(Action::DialogInput('q')));
        let action = dialog.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SubmitDialog));
    }
}
