//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use crate::components::{dialog_block, proportional_popup};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseOverlay),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = proportional_popup(area, 70, 85);

        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(dialog_block("Keyboard Shortcuts", Color::Cyan))
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Grid");
    add_shortcut(&mut lines, "j / ↓", "Next quote");
    add_shortcut(&mut lines, "k / ↑", "Previous quote");
    add_shortcut(&mut lines, "g / G", "First / last quote");
    add_shortcut(&mut lines, "n", "Toggle normalized USD view");
    add_shortcut(&mut lines, "s", "Sort by price");
    add_shortcut(&mut lines, "R", "Refresh quotes");

    add_section(&mut lines, "Quote Actions");
    add_shortcut(&mut lines, "e", "Draft booking email");
    add_shortcut(&mut lines, "a", "Allocate to PO");
    add_shortcut(&mut lines, "x", "Report shipment exception");
    add_shortcut(&mut lines, "v", "Review agent audit");
    add_shortcut(&mut lines, "l", "Simulate landed cost");
    add_shortcut(&mut lines, "p", "Preview original document");
    add_shortcut(&mut lines, "y", "Sync with ERP");
    add_shortcut(&mut lines, "E", "Export rate sheet (verified)");

    add_section(&mut lines, "Notes");
    add_shortcut(&mut lines, "c", "Open team notes");
    add_shortcut(&mut lines, "Tab", "Switch focus grid / notes");
    add_shortcut(&mut lines, "i", "Write a note");
    add_shortcut(&mut lines, "Enter", "Post note");

    add_section(&mut lines, "Dialogs");
    add_shortcut(&mut lines, "Enter", "Confirm");
    add_shortcut(&mut lines, "Esc", "Close / cancel");
    add_shortcut(&mut lines, "A / C", "Approve audit / challenge rate");
    add_shortcut(&mut lines, "Ctrl+S", "Save landed cost estimate");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_row_action() {
        let text: String = build_help_content()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for label in ["Draft booking email", "Allocate to PO", "Sync with ERP", "Open team notes"] {
            assert!(text.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_scroll_and_close() {
        let mut help = HelpDialog::default();
        help.handle_key_event(KeyEvent::from(KeyCode::Char('j'))).unwrap();
        assert_eq!(help.scroll_offset, 1);
        let action = help.handle_key_event(KeyEvent::from(KeyCode::Char('?'))).unwrap();
        assert_eq!(action, Some(Action::CloseOverlay));
    }
}
