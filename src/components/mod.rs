//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod alert_dialog;
pub mod allocate_dialog;
pub mod audit_dialog;
pub mod cells;
pub mod comment_panel;
pub mod dashboard;
pub mod draft_review_dialog;
pub mod email_dialog;
pub mod exception_dialog;
pub mod help_dialog;
pub mod layout;
pub mod mfa_dialog;
pub mod preview_dialog;
pub mod quit_dialog;
pub mod quote_table;
pub mod simulate_dialog;

pub use alert_dialog::AlertDialog;
pub use allocate_dialog::AllocateDialog;
pub use audit_dialog::AuditDialog;
pub use comment_panel::CommentPanelView;
pub use dashboard::{draw_dashboard, DashboardContext};
pub use draft_review_dialog::DraftReviewDialog;
pub use email_dialog::EmailDialog;
pub use exception_dialog::ExceptionDialog;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup, proportional_popup};
pub use mfa_dialog::MfaDialog;
pub use preview_dialog::PreviewDialog;
pub use quit_dialog::QuitDialog;
pub use quote_table::QuoteTable;
pub use simulate_dialog::SimulateDialog;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Bordered popup block with a bold colored title
pub fn dialog_block(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Help line of `key label` pairs
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  ", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Flatten a rendered buffer into text lines for assertions
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
