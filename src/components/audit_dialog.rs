//! Audit findings dialog
//!
//! Lists what the backend agents found for a quote and lets the user either
//! sign off on the audit or challenge the rate with the non-OK findings.

use crate::action::Action;
use crate::component::Component;
use crate::components::cells::insight_style;
use crate::components::{dialog_block, key_hints, proportional_popup};
use crate::model::Quote;
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
pub struct AuditDialog {
    pub scroll_offset: usize,
}

impl AuditDialog {
    pub fn draw_with_quote(&mut self, frame: &mut Frame, area: Rect, quote: &Quote, busy: bool) {
        let popup = proportional_popup(area, 70, 70);
        frame.render_widget(Clear, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(popup);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    quote.carrier_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} → {}", quote.origin, quote.destination),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(""),
        ];

        let insights = quote.insights();
        if insights.is_empty() {
            lines.push(Line::from(Span::styled(
                "No findings reported",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for insight in insights {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", insight.status.label()),
                    insight_style(&insight.status),
                ),
                Span::styled(
                    insight.agent.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(format!("    {}", insight.finding)));
        }

        let paragraph = Paragraph::new(lines)
            .block(dialog_block("Agent Audit", Color::Blue))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);

        let footer = if quote.is_audited {
            Span::styled(
                format!(
                    "✔ Verified by {}",
                    quote.audited_by.as_deref().unwrap_or("Unknown")
                ),
                Style::default().fg(Color::Green),
            )
        } else {
            Span::styled(
                "Requires Human Verification",
                Style::default().fg(Color::Yellow),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);

        let hints = if busy {
            key_hints(&[("…", "Working")])
        } else {
            key_hints(&[
                ("A", "Approve Audit"),
                ("C", "Challenge Rate"),
                ("Esc", "Close"),
            ])
        };
        frame.render_widget(Paragraph::new(hints), chunks[2]);
    }
}

impl Component for AuditDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.scroll_offset = 0;
                Some(Action::CloseDialog)
            }
            KeyCode::Char('A') => Some(Action::ApproveAudit),
            KeyCode::Char('C') => Some(Action::ChallengeRate),
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
    use crate::model::quote::fixtures::{insight, quote};
    use crate::model::InsightStatus;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(quote: &Quote) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut dialog = AuditDialog::default();
        terminal
            .draw(|frame| dialog.draw_with_quote(frame, frame.area(), quote, false))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_findings_and_pending_verification() {
        let mut q = quote("1");
        q.agent_insights = Some(vec![
            insight("Rate Auditor", InsightStatus::Warning),
            insight("Compliance", InsightStatus::Ok),
        ]);
        let text = render(&q);
        assert!(text.contains("[WARNING] Rate Auditor"));
        assert!(text.contains("[OK] Compliance"));
        assert!(text.contains("Requires Human Verification"));
    }

    #[test]
    fn test_verified_footer() {
        let mut q = quote("1");
        q.agent_insights = Some(Vec::new());
        q.is_audited = true;
        q.audited_by = Some("PilotUser_01".to_string());
        let text = render(&q);
        assert!(text.contains("No findings reported"));
        assert!(text.contains("Verified by PilotUser_01"));
    }

    #[test]
    fn test_approve_and_challenge_keys() {
        let mut dialog = AuditDialog::default();
        let approve = dialog.handle_key_event(KeyEvent::from(KeyCode::Char('A'))).unwrap();
        let challenge = dialog.handle_key_event(KeyEvent::from(KeyCode::Char('C'))).unwrap();
        assert_eq!(approve, Some(Action::ApproveAudit));
        assert_eq!(challenge, Some(Action::ChallengeRate));
    }
}
