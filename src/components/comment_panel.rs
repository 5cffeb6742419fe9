//! Team discussion side panel
//!
//! Keys are mapped against the panel state so that typing while composing
//! goes into the note instead of triggering shortcuts.

use crate::action::Action;
use crate::components::cells::truncate;
use crate::components::key_hints;
use crate::model::{CommentPanel, ThreadState};
use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct CommentPanelView;

impl CommentPanelView {
    pub fn handle_key_with_panel(
        &mut self,
        key: KeyEvent,
        panel: &CommentPanel,
    ) -> Result<Option<Action>> {
        if panel.composing {
            let action = match key.code {
                KeyCode::Esc => Some(Action::CancelCompose),
                KeyCode::Enter => Some(Action::PostComment),
                KeyCode::Backspace => Some(Action::CommentBackspace),
                KeyCode::Char(c) => Some(Action::CommentInput(c)),
                _ => None,
            };
            return Ok(action);
        }

        let action = match key.code {
            KeyCode::Char('i') | KeyCode::Enter => Some(Action::ComposeComment),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollCommentsDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollCommentsUp),
            KeyCode::Tab => Some(Action::FocusTable),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseComments),
            _ => None,
        };
        Ok(action)
    }

    pub fn draw_with_panel(
        &self,
        frame: &mut Frame,
        area: Rect,
        panel: &CommentPanel,
        focused: bool,
        now: DateTime<Utc>,
    ) {
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let title_width = area.width.saturating_sub(14) as usize;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" Notes · {} ", truncate(&panel.filename, title_width)))
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        let mut lines = Vec::new();
        match &panel.thread {
            ThreadState::Loading(_) => lines.push(Line::from(Span::styled(
                "Syncing Thread...",
                Style::default().fg(Color::Yellow),
            ))),
            ThreadState::Failed(message) => lines.push(Line::from(Span::styled(
                format!("Could not load notes: {}", message),
                Style::default().fg(Color::Red),
            ))),
            ThreadState::Ready if panel.comments.is_empty() => lines.push(Line::from(Span::styled(
                "No internal notes yet",
                Style::default().fg(Color::DarkGray),
            ))),
            ThreadState::Ready => {
                for comment in panel.comments.iter().skip(panel.scroll_offset) {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("[{}] ", comment.initial()),
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            comment.user_id.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" · {}", comment.age_text(now)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]));
                    lines.push(Line::from(comment.content.clone()));
                    lines.push(Line::from(""));
                }
            }
        }
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            chunks[0],
        );

        let input = if panel.posting.is_some() {
            Line::from(Span::styled("Posting...", Style::default().fg(Color::Yellow)))
        } else if panel.composing {
            Line::from(Span::styled(
                format!("{}█", panel.draft),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            key_hints(&[("i", "Write a note")])
        };
        let input_block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(input).block(input_block), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_text;
    use crate::model::{Comment, QuoteId};
    use chrono::TimeZone;
    use ratatui::{backend::TestBackend, Terminal};

    fn panel() -> CommentPanel {
        CommentPanel::new(QuoteId::from("1"), "quote_1.pdf".to_string(), 1)
    }

    fn render(panel: &CommentPanel) -> String {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                CommentPanelView.draw_with_panel(frame, frame.area(), panel, true, now)
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_loading_then_empty() {
        let mut p = panel();
        assert!(render(&p).contains("Syncing Thread..."));
        p.thread = ThreadState::Ready;
        assert!(render(&p).contains("No internal notes yet"));
    }

    #[test]
    fn test_comment_shows_author_and_age() {
        let mut p = panel();
        p.thread = ThreadState::Ready;
        p.comments.push(Comment {
            id: 7,
            user_id: "PilotUser_01".to_string(),
            content: "BAF looks high".to_string(),
            timestamp: "2026-10-16T11:55:00".to_string(),
        });
        let text = render(&p);
        assert!(text.contains("[P] PilotUser_01 · 5 minutes ago"));
        assert!(text.contains("BAF looks high"));
    }

    #[test]
    fn test_composing_captures_shortcuts() {
        let mut view = CommentPanelView;
        let mut p = panel();
        let idle = view
            .handle_key_with_panel(KeyEvent::from(KeyCode::Char('q')), &p)
            .unwrap();
        assert_eq!(idle, Some(Action::CloseComments));

        p.composing = true;
        let typed = view
            .handle_key_with_panel(KeyEvent::from(KeyCode::Char('q')), &p)
            .unwrap();
        assert_eq!(typed, Some(Action::CommentInput('q')));
        let sent = view
            .handle_key_with_panel(KeyEvent::from(KeyCode::Enter), &p)
            .unwrap();
        assert_eq!(sent, Some(Action::PostComment));
    }
}
