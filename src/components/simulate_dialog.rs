//! Landed cost simulation dialog

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, dialog_block, key_hints};
use crate::model::{LandedCostEstimate, Quote};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct SimulateDialog;

/// What the simulation dialog is showing
pub struct SimulateView<'a> {
    pub quote: &'a Quote,
    pub hs_code: &'a str,
    pub result: Option<&'a LandedCostEstimate>,
    pub busy: bool,
    pub error: Option<&'a str>,
}

impl SimulateDialog {
    pub fn draw_with_view(&self, frame: &mut Frame, area: Rect, view: &SimulateView) {
        let popup = centered_popup(area, 64, 16);
        frame.render_widget(Clear, popup);

        let label = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Quote: ", label),
                Span::raw(format!(
                    "{} · {:.2} {}",
                    view.quote.carrier_name(),
                    view.quote.total_price,
                    view.quote.currency
                )),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("HS Code: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{}█", view.hs_code),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(""),
        ];

        if view.busy {
            lines.push(Line::from(Span::styled(
                "Calculating...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(error) = view.error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else if let Some(result) = view.result {
            if !result.hs_description.is_empty() {
                lines.push(Line::from(Span::styled(
                    result.hs_description.clone(),
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines.push(Line::from(vec![
                Span::styled("Estimated Duties:  ", label),
                Span::raw(format!("${:.2}", result.estimated_duties)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Estimated Taxes:   ", label),
                Span::raw(format!("${:.2}", result.estimated_taxes)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Total Landed Cost: ", label),
                Span::styled(
                    format!("${:.2}", result.total_landed_cost),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        lines.push(Line::from(""));
        let mut hints = vec![("Enter", "Calculate")];
        if view.result.is_some() && !view.busy {
            hints.push(("Ctrl+S", "Save estimate"));
        }
        hints.push(("Esc", "Close"));
        lines.push(key_hints(&hints));

        let paragraph = Paragraph::new(lines)
            .block(dialog_block("Landed Cost Simulator", Color::Cyan))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}

impl Component for SimulateDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SaveEstimate)
            }
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
