//! Document preview
//!
//! Split view: the original document on the left (downloaded and handed to
//! the system viewer, since a terminal cannot render a PDF) and the extracted
//! row on the right for side-by-side checking.

use crate::action::Action;
use crate::component::Component;
use crate::components::cells::{self, insight_style};
use crate::components::{dialog_block, key_hints, proportional_popup};
use crate::model::{DocumentState, Quote, Surcharge};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

/// Number of agent findings shown under the extracted data
const PREVIEW_INSIGHTS: usize = 2;

#[derive(Default)]
pub struct PreviewDialog;

impl PreviewDialog {
    pub fn draw_with_document(
        &self,
        frame: &mut Frame,
        area: Rect,
        quote: &Quote,
        document: &DocumentState,
        normalize: bool,
    ) {
        let popup = proportional_popup(area, 90, 80);
        frame.render_widget(Clear, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(popup);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let document_lines = match document {
            DocumentState::Loading(_) => vec![Line::from(Span::styled(
                "Fetching original document...",
                Style::default().fg(Color::Yellow),
            ))],
            DocumentState::Saved { path, bytes } => vec![
                Line::from(Span::styled(
                    quote.filename.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Saved to ", Style::default().fg(Color::DarkGray)),
                    Span::raw(path.display().to_string()),
                ]),
                Line::from(Span::styled(
                    format!("{} bytes", bytes),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press o to open in the system viewer",
                    Style::default().fg(Color::Cyan),
                )),
            ],
            DocumentState::Failed(message) => vec![Line::from(Span::styled(
                format!("Could not load document: {}", message),
                Style::default().fg(Color::Red),
            ))],
        };
        let left = Paragraph::new(document_lines)
            .block(dialog_block("Original Document", Color::Cyan))
            .wrap(Wrap { trim: false });
        frame.render_widget(left, panes[0]);

        let right = Paragraph::new(extracted_text(quote, normalize))
            .block(dialog_block("Extracted Data", Color::Green))
            .wrap(Wrap { trim: false });
        frame.render_widget(right, panes[1]);

        let mut hints = Vec::new();
        if matches!(document, DocumentState::Saved { .. }) {
            hints.push(("o", "Open document"));
        }
        hints.push(("Esc", "Close"));
        frame.render_widget(Paragraph::new(key_hints(&hints)), rows[1]);
    }
}

fn extracted_text(quote: &Quote, normalize: bool) -> Text<'static> {
    let mut text = Text::default();
    let mut section = |title: &str, body: Text<'static>| {
        text.lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
        text.lines.extend(body.lines);
        text.lines.push(Line::from(""));
    };

    section("Carrier", cells::carrier(quote));
    section("Route", cells::route(quote));
    section("Price", cells::price(quote, normalize));
    section("Transit", cells::transit(quote));
    section("Surcharges", cells::surcharges(quote));
    if !quote.surcharges.is_empty() {
        section(
            "Surcharges & Mapping",
            Text::from(quote.surcharges.iter().map(surcharge_line).collect::<Vec<_>>()),
        );
    }
    section("Status", cells::status(quote));

    for insight in quote.insights().iter().take(PREVIEW_INSIGHTS) {
        text.lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", insight.status.label()),
                insight_style(&insight.status),
            ),
            Span::raw(format!("{}: {}", insight.agent, insight.finding)),
        ]));
    }
    text
}

/// `raw → normalized  $amount`, flagged when the mapping is uncertain
fn surcharge_line(surcharge: &Surcharge) -> Line<'static> {
    let mapped = if surcharge.is_unmapped() {
        Span::styled("UNMAPPED", Style::default().fg(Color::Red))
    } else {
        Span::raw(surcharge.normalized_name.clone().unwrap_or_default())
    };
    let mut spans = vec![
        Span::styled(
            surcharge.raw_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" → ", Style::default().fg(Color::DarkGray)),
        mapped,
        Span::raw(format!("  ${:.2}", surcharge.amount)),
    ];
    if surcharge.is_low_confidence() {
        spans.push(Span::styled(" ⚠", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

impl Component for PreviewDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseDialog),
            KeyCode::Char('o') => Some(Action::OpenDocument),
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
    use crate::model::quote::fixtures::{insight, quote, surcharge};
    use crate::model::InsightStatus;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn render(quote: &Quote, document: &DocumentState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|frame| {
                PreviewDialog.draw_with_document(frame, frame.area(), quote, document, false)
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_loading_state() {
        let text = render(&quote("1"), &DocumentState::Loading(3));
        assert!(text.contains("Fetching original document..."));
        assert!(text.contains("Maersk"));
        assert!(!text.contains("Open document"));
    }

    #[test]
    fn test_saved_document_and_first_insights() {
        let mut q = quote("1");
        q.agent_insights = Some(vec![
            insight("Rate Auditor", InsightStatus::Warning),
            insight("Compliance", InsightStatus::Ok),
            insight("Carbon", InsightStatus::Ok),
        ]);
        let text = render(
            &q,
            &DocumentState::Saved {
                path: PathBuf::from("/tmp/quote_1.pdf"),
                bytes: 2048,
            },
        );
        assert!(text.contains("/tmp/quote_1.pdf"));
        assert!(text.contains("Open document"));
        assert!(text.contains("Rate Auditor"));
        assert!(text.contains("Compliance"));
        assert!(!text.contains("Carbon:"));
    }

    #[test]
    fn test_surcharge_mapping_lines() {
        let mut q = quote("1");
        q.surcharges = vec![
            surcharge("BAF", None, None),
            surcharge("Terminal Handling", Some("THC"), Some(0.55)),
        ];
        let text = render(&q, &DocumentState::Loading(3));
        assert!(text.contains("BAF → UNMAPPED  $50.00"));
        assert!(text.contains("Terminal Handling → THC  $50.00 ⚠"));
    }

    #[test]
    fn test_confident_mapping_has_no_marker() {
        let line = surcharge_line(&surcharge("CAF", Some("Currency Adjustment"), Some(0.95)));
        let rendered: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rendered, "CAF → Currency Adjustment  $50.00");
    }
}
