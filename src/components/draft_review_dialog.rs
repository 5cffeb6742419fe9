//! Review of a backend-drafted outbound message
//!
//! Used for both exception notifications and rate challenges. Nothing is
//! sent until the user approves.

use crate::action::Action;
use crate::component::Component;
use crate::components::{dialog_block, key_hints, proportional_popup};
use crate::model::OutboundDraft;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct DraftReviewDialog {
    pub scroll_offset: usize,
}

impl DraftReviewDialog {
    pub fn draw_with_draft(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        draft: &OutboundDraft,
        recipient: &str,
        busy: bool,
    ) {
        let popup = proportional_popup(area, 70, 70);
        frame.render_widget(Clear, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(popup);

        let title = if draft.action.is_empty() {
            "AI Draft"
        } else {
            draft.action.as_str()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("To: ", Style::default().fg(Color::DarkGray)),
                Span::raw(recipient.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Subject: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    draft.draft_subject.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        lines.extend(draft.draft_body.lines().map(|l| Line::from(l.to_string())));

        let paragraph = Paragraph::new(lines)
            .block(dialog_block(title, Color::Magenta))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);

        let hints = if busy {
            key_hints(&[("…", "Sending")])
        } else {
            key_hints(&[
                ("Enter", "Approve & Send"),
                ("d", "Discard"),
                ("j/k", "Scroll"),
            ])
        };
        frame.render_widget(Paragraph::new(hints), chunks[1]);
    }
}

impl Component for DraftReviewDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => Some(Action::SubmitDialog),
            KeyCode::Char('d') | KeyCode::Esc => {
                self.scroll_offset = 0;
                Some(Action::DiscardDraft)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
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
    fn test_challenge_draft_render() {
        let draft = OutboundDraft {
            action: "Negotiation Challenge".to_string(),
            draft_subject: "Rate review for Shanghai - Rotterdam".to_string(),
            draft_body: "Hello,\nYour BAF is above index.".to_string(),
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut dialog = DraftReviewDialog::default();
        terminal
            .draw(|frame| {
                dialog.draw_with_draft(frame, frame.area(), &draft, "warehouse@logistics-demo.com", false)
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Negotiation Challenge"));
        assert!(text.contains("To: warehouse@logistics-demo.com"));
        assert!(text.contains("Your BAF is above index."));
        assert!(text.contains("Approve & Send"));
    }
}
