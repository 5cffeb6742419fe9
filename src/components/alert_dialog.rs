//! Blocking alert popup

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, dialog_block, key_hints};
use crate::model::{Alert, AlertKind};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Color,
    text::Line,
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct AlertDialog;

impl AlertDialog {
    pub fn draw_with_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let color = match alert.kind {
            AlertKind::Info => Color::Cyan,
            AlertKind::Error => Color::Red,
        };
        let height = alert.message.lines().count() as u16 + 6;
        let popup = centered_popup(area, 60, height);
        frame.render_widget(Clear, popup);

        let mut lines = vec![Line::from("")];
        lines.extend(alert.message.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
        lines.push(key_hints(&[("Enter", "OK")]));

        let paragraph = Paragraph::new(lines)
            .block(dialog_block(&alert.title, color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

impl Component for AlertDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => Some(Action::DismissAlert),
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
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_multiline_message() {
        let alert = Alert::info(
            "ERP Sync",
            "ERP Sync Success!\nRef: SAP-LOG-1A2B3C4D\nSystem: SAP S/4HANA",
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| AlertDialog.draw_with_alert(frame, frame.area(), &alert))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("ERP Sync Success!"));
        assert!(text.contains("Ref: SAP-LOG-1A2B3C4D"));
    }
}
