//! Main screen: summary header, quote grid, notes panel and key bar

use crate::components::{calculate_main_layout, CommentPanelView, QuoteTable};
use crate::model::{CommentPanel, Quote};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the dashboard
pub struct DashboardContext<'a> {
    pub quotes: &'a [Quote],
    pub loading: bool,
    pub org_id: &'a str,
    pub comments: Option<&'a CommentPanel>,
    pub comments_focused: bool,
    pub status_message: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// Sum of the spend figure across all loaded quotes
pub fn total_spend(quotes: &[Quote]) -> f64 {
    quotes.iter().map(Quote::spend).sum()
}

pub fn draw_dashboard(
    frame: &mut Frame,
    area: Rect,
    table: &mut QuoteTable,
    comment_view: &CommentPanelView,
    ctx: &DashboardContext,
) {
    let layout = calculate_main_layout(
        area,
        ctx.status_message.is_some(),
        ctx.comments.is_some(),
    );

    render_header(frame, layout.header, ctx);
    table.draw_with_quotes(
        frame,
        layout.table,
        ctx.quotes,
        ctx.loading,
        !ctx.comments_focused,
    );

    if let (Some(panel), Some(comments_area)) = (ctx.comments, layout.comments) {
        comment_view.draw_with_panel(frame, comments_area, panel, ctx.comments_focused, ctx.now);
    }

    if let (Some(status), Some(status_area)) = (ctx.status_message, layout.status) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {} ", status),
                Style::default().fg(Color::Yellow),
            ))),
            status_area,
        );
    }

    render_help_bar(frame, layout.help, ctx);
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &DashboardContext) {
    let mut spans = vec![
        Span::styled(
            " Quote Desk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", ctx.org_id),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} quotes", ctx.quotes.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  Total spend ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("${:.2}", total_spend(ctx.quotes)),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if ctx.loading {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, ctx: &DashboardContext) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(help_spans(ctx))).block(block), area);
}

/// Key hints for the focused surface; export is dimmed with nothing to export
fn help_spans(ctx: &DashboardContext) -> Vec<Span<'static>> {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::DarkGray);
    let can_export = !ctx.quotes.is_empty();

    let pairs: &[(&str, &str, bool)] = if ctx.comments_focused {
        &[
            (" i ", "note ", true),
            (" j/k ", "scroll ", true),
            (" Tab ", "grid ", true),
            (" Esc ", "close ", true),
        ]
    } else {
        &[
            (" j/k ", "move ", true),
            (" n ", "normalize ", true),
            (" s ", "sort ", true),
            (" e/a/x/v/l/p ", "actions ", true),
            (" E ", "export ", can_export),
            (" y ", "ERP ", true),
            (" c ", "notes ", true),
            (" ? ", "help ", true),
            (" q ", "quit ", true),
        ]
    };

    pairs
        .iter()
        .flat_map(|(k, label, available)| {
            let key_style = if *available { key } else { text };
            [
                Span::styled(k.to_string(), key_style),
                Span::styled(label.to_string(), text),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_text;
    use crate::model::quote::fixtures::quote;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_total_spend_prefers_normalized() {
        let mut cny = quote("1");
        cny.currency = "CNY".to_string();
        cny.total_price = 7000.0;
        cny.normalized_total_price_usd = Some(980.0);
        let mut raw = quote("2");
        raw.normalized_total_price_usd = None;
        raw.total_price = 500.0;
        assert_eq!(total_spend(&[cny, raw]), 1480.0);
    }

    #[test]
    fn test_header_summary() {
        let quotes = vec![quote("1"), quote("2")];
        let ctx = DashboardContext {
            quotes: &quotes,
            loading: false,
            org_id: "org_demo_123",
            comments: None,
            comments_focused: false,
            status_message: Some("Estimate saved"),
            now: Utc::now(),
        };
        let mut table = QuoteTable::new();
        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal
            .draw(|frame| {
                draw_dashboard(frame, frame.area(), &mut table, &CommentPanelView, &ctx)
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("2 quotes"));
        assert!(text.contains("$2000.00"));
        assert!(text.contains("Estimate saved"));
        assert!(text.contains("org_demo_123"));
    }

    #[test]
    fn test_export_hint_dimmed_without_quotes() {
        let export_style = |quotes: &[Quote]| {
            let ctx = DashboardContext {
                quotes,
                loading: false,
                org_id: "org_demo_123",
                comments: None,
                comments_focused: false,
                status_message: None,
                now: Utc::now(),
            };
            help_spans(&ctx)
                .into_iter()
                .find(|span| span.content == " E ")
                .map(|span| span.style)
        };

        assert_eq!(export_style(&[]), Some(Style::default().fg(Color::DarkGray)));
        assert_eq!(
            export_style(&[quote("1")]),
            Some(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        );
    }
}
