//! Styled cell content for a quote
//!
//! Shared by the grid and the preview pane so both show the same thing.

use crate::model::{CarbonClass, InsightStatus, Quote};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `width` columns, ending in an ellipsis when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn carrier(quote: &Quote) -> Text<'static> {
    let mut first = vec![Span::styled(
        quote.carrier_name().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if quote.is_audited {
        first.push(Span::styled(" ✔ VERIFIED", Style::default().fg(Color::Green)));
    }

    let mut lines = vec![Line::from(first)];
    if !quote.risk_flags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", truncate(&quote.risk_flags.join(", "), 40)),
            Style::default().fg(Color::Red),
        )));
    }
    Text::from(lines)
}

pub fn route(quote: &Quote) -> Text<'static> {
    Text::from(vec![
        Line::from(quote.origin.clone()),
        Line::from(Span::styled(
            format!("→ {}", quote.destination),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

pub fn price(quote: &Quote, normalize: bool) -> Text<'static> {
    let cell = quote.price_cell(normalize);

    let mut first = vec![Span::styled(
        cell.main_text(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if cell.volatile {
        first.push(Span::styled(
            " VOLATILE",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(badge) = &cell.market {
        let color = if badge.below_market {
            Color::Green
        } else {
            Color::Red
        };
        first.push(Span::styled(format!(" {}", badge.text()), Style::default().fg(color)));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(landed) = cell.landed_text() {
        lines.push(Line::from(Span::styled(landed, Style::default().fg(Color::Cyan))));
    }
    Text::from(lines)
}

pub fn transit(quote: &Quote) -> Text<'static> {
    Text::from(quote.transit_text())
}

pub fn surcharges(quote: &Quote) -> Text<'static> {
    let mut lines = vec![Line::from(quote.surcharge_text())];

    let mut second = Vec::new();
    if let Some(review) = quote.review_text() {
        second.push(Span::styled(
            review,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if quote.has_uncertain_mapping() {
        if !second.is_empty() {
            second.push(Span::raw(" "));
        }
        second.push(Span::styled("AI UNCERTAIN", Style::default().fg(Color::Yellow)));
    }
    if !second.is_empty() {
        lines.push(Line::from(second));
    }
    Text::from(lines)
}

pub fn carbon(quote: &Quote) -> Text<'static> {
    let mut lines = vec![Line::from(quote.carbon_text())];
    if let Some(class) = quote.carbon_class() {
        let color = match class {
            CarbonClass::HighImpact => Color::Red,
            CarbonClass::LowCarbon => Color::Green,
        };
        lines.push(Line::from(Span::styled(class.label(), Style::default().fg(color))));
    }
    Text::from(lines)
}

pub fn status(quote: &Quote) -> Text<'static> {
    let label = quote.status_label().to_string();
    let color = if label == "ALLOCATED" {
        Color::Green
    } else {
        Color::Gray
    };
    let mut lines = vec![Line::from(Span::styled(label, Style::default().fg(color)))];
    if let Some(po) = quote.po_number.as_deref().filter(|po| !po.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("PO: {}", po),
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

/// Row action keys, dimmed when the action is unavailable for this quote
pub fn actions(quote: &Quote) -> Text<'static> {
    let glyphs = [
        ('e', true),
        ('a', !quote.is_allocated()),
        ('x', quote.is_allocated()),
        ('v', quote.has_insights()),
        ('l', true),
        ('p', quote.has_document()),
        ('y', quote.is_audited),
        ('c', true),
    ];

    let mut spans: Vec<Span<'static>> = Vec::new();
    for (key, available) in glyphs {
        let style = if available {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(key.to_string(), style));
        spans.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(spans)];
    if quote.comment_count > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} notes", quote.comment_count),
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

/// Badge color for an audit finding
pub fn insight_style(status: &InsightStatus) -> Style {
    let color = match status {
        InsightStatus::Ok => Color::Green,
        InsightStatus::Warning => Color::Yellow,
        InsightStatus::Error(_) => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::fixtures::{quote, surcharge};

    fn plain(text: &Text) -> String {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("Rotterdam", 20), "Rotterdam");
        assert_eq!(truncate("Rotterdam", 5), "Rott…");
        assert_eq!(truncate("上海港口", 5), "上海…");
    }

    #[test]
    fn test_surcharge_cell_lines() {
        let mut q = quote("1");
        q.surcharges = vec![surcharge("BAF", None, None)];
        assert_eq!(plain(&surcharges(&q)), "1 items\n1 NEEDS REVIEW");

        q.surcharges = vec![surcharge("THC", Some("Terminal Handling"), Some(0.4))];
        assert_eq!(plain(&surcharges(&q)), "1 items\n1 NEEDS REVIEW AI UNCERTAIN");
    }

    #[test]
    fn test_price_cell_markers() {
        let mut q = quote("1");
        q.currency = "CNY".to_string();
        q.total_price = 7000.0;
        q.estimated_taxes = Some(70.0);
        assert_eq!(plain(&price(&q, false)), "7000.00 CNY VOLATILE\nLANDED: $7070.00");
    }

    #[test]
    fn test_status_and_carrier_cells() {
        let mut q = quote("1");
        q.status = Some("ALLOCATED".to_string());
        q.po_number = Some("PO-9".to_string());
        q.is_audited = true;
        q.risk_flags = vec!["Port congestion".to_string()];

        assert_eq!(plain(&status(&q)), "ALLOCATED\nPO: PO-9");
        assert_eq!(plain(&carrier(&q)), "Maersk ✔ VERIFIED\n⚠ Port congestion");
    }
}
