//! Shipment exception dialog
//!
//! Picks one of the fixed exception reasons for an allocated quote.

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, dialog_block, key_hints};
use crate::model::{ExceptionReason, Quote};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct ExceptionDialog;

impl ExceptionDialog {
    pub fn draw_with_reason(
        &self,
        frame: &mut Frame,
        area: Rect,
        quote: &Quote,
        selected: ExceptionReason,
        busy: bool,
    ) {
        let popup = centered_popup(area, 64, 13);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Trigger an AI agent response for a delay or issue with PO {}.",
                    quote.po_number.as_deref().unwrap_or_default()
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];

        for reason in ExceptionReason::all() {
            let is_selected = reason == selected;
            let marker = if is_selected { "● " } else { "○ " };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(reason.label(), style),
            ]));
        }

        lines.push(Line::from(""));
        if busy {
            lines.push(Line::from(Span::styled(
                "Drafting notification...",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(key_hints(&[
            ("j/k", "Choose reason"),
            ("Enter", "Generate draft"),
            ("Esc", "Cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(dialog_block("Report Shipment Exception", Color::Red))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}

impl Component for ExceptionDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseDialog),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextReason),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevReason),
            KeyCode::Enter => Some(Action::SubmitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        Ok(())
    }
}
