//! Booking email dialog
//!
//! Shows the generated booking email for a quote. The draft is requested as
//! soon as the dialog opens.

use crate::action::Action;
use crate::component::Component;
use crate::components::{dialog_block, key_hints, proportional_popup};
use crate::model::{EmailState, Quote};
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
pub struct EmailDialog {
    pub scroll_offset: usize,
}

impl EmailDialog {
    pub fn draw_with_state(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        quote: &Quote,
        state: &EmailState,
        downloading: bool,
    ) {
        let popup = proportional_popup(area, 70, 70);
        frame.render_widget(Clear, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(popup);

        let mut lines = vec![Line::from(vec![
            Span::styled("Carrier: ", Style::default().fg(Color::DarkGray)),
            Span::raw(quote.carrier_name().to_string()),
            Span::styled("   Route: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} → {}", quote.origin, quote.destination)),
        ])];
        lines.push(Line::from(""));

        let mut hints = Vec::new();
        match state {
            EmailState::Drafting(_) => {
                lines.push(Line::from(Span::styled(
                    "Drafting booking email...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            EmailState::Failed(message) => {
                lines.push(Line::from(Span::styled(
                    format!("Failed to generate email: {}", message),
                    Style::default().fg(Color::Red),
                )));
                hints.push(("r", "Retry"));
            }
            EmailState::Ready(draft) => {
                lines.push(Line::from(vec![
                    Span::styled("Subject: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        draft.subject.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(""));
                lines.extend(draft.body.lines().map(|l| Line::from(l.to_string())));
                hints.push(if downloading {
                    ("d", "Downloading...")
                } else {
                    ("d", "Download booking PDF")
                });
            }
        }
        hints.push(("j/k", "Scroll"));
        hints.push(("Esc", "Close"));

        let paragraph = Paragraph::new(lines)
            .block(dialog_block("Booking Email", Color::Cyan))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, chunks[0]);
        frame.render_widget(Paragraph::new(key_hints(&hints)), chunks[1]);
    }
}

impl Component for EmailDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.scroll_offset = 0;
                Some(Action::CloseDialog)
            }
            KeyCode::Char('r') => Some(Action::RetryEmail),
            KeyCode::Char('d') => Some(Action::DownloadBookingPdf),
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
        // Drawing goes through draw_with_state
        Ok(())
    }
}
