//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Backend work and dialog state live in the [`Dispatcher`]; App only routes
//! keys, owns view state, and draws.

use crate::action::Action;
use crate::component::Component;
use crate::components::simulate_dialog::SimulateView;
use crate::components::{
    draw_dashboard, AlertDialog, AllocateDialog, AuditDialog, CommentPanelView, DashboardContext,
    DraftReviewDialog, EmailDialog, ExceptionDialog, HelpDialog, MfaDialog, PreviewDialog,
    QuitDialog, QuoteTable, SimulateDialog,
};
use crate::dispatcher::{Dispatcher, Outcome};
use crate::model::{ActiveDialog, Alert, Quote};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Screen-wide overlays drawn above everything but alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    QuitConfirm,
}

/// Which surface receives keys when no dialog is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Comments,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    pub dispatcher: Dispatcher,
    pub table: QuoteTable,
    pub overlay: Option<Overlay>,
    /// Blocking alerts, shown one at a time in arrival order
    pub alerts: VecDeque<Alert>,
    pub focus: Focus,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Saved file to hand to the system viewer (handled by main loop)
    pub pending_viewer_file: Option<PathBuf>,
    org_id: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub comment_view: CommentPanelView,
    pub email_dialog: EmailDialog,
    pub allocate_dialog: AllocateDialog,
    pub exception_dialog: ExceptionDialog,
    pub draft_review_dialog: DraftReviewDialog,
    pub audit_dialog: AuditDialog,
    pub simulate_dialog: SimulateDialog,
    pub preview_dialog: PreviewDialog,
    pub mfa_dialog: MfaDialog,
    pub alert_dialog: AlertDialog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

impl App {
    pub fn new(dispatcher: Dispatcher, org_id: impl Into<String>) -> App {
        App {
            dispatcher,
            table: QuoteTable::new(),
            overlay: None,
            alerts: VecDeque::new(),
            focus: Focus::Table,
            should_quit: false,
            status_message: None,
            pending_viewer_file: None,
            org_id: org_id.into(),
            comment_view: CommentPanelView,
            email_dialog: EmailDialog::default(),
            allocate_dialog: AllocateDialog,
            exception_dialog: ExceptionDialog,
            draft_review_dialog: DraftReviewDialog::default(),
            audit_dialog: AuditDialog::default(),
            simulate_dialog: SimulateDialog,
            preview_dialog: PreviewDialog,
            mfa_dialog: MfaDialog,
            alert_dialog: AlertDialog,
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog,
        }
    }

    pub fn selected_quote(&self) -> Option<Quote> {
        self.table.selected_quote(self.dispatcher.quotes()).cloned()
    }

    /// Run `f` on the selected quote, or say why nothing happened
    fn with_selected(&mut self, f: impl FnOnce(&mut Dispatcher, &Quote)) {
        match self.selected_quote() {
            Some(quote) => f(&mut self.dispatcher, &quote),
            None => self.status_message = Some("No quote selected".to_string()),
        }
    }

    fn apply_outcomes(&mut self) {
        for outcome in self.dispatcher.take_outcomes() {
            match outcome {
                Outcome::Status(message) => self.status_message = Some(message),
                Outcome::Alert(alert) => self.alerts.push_back(alert),
                Outcome::QuotesReplaced => self.table.sync_selection(self.dispatcher.quotes()),
                Outcome::OpenExternal(path) => self.pending_viewer_file = Some(path),
            }
        }
        if self.dispatcher.comments.is_none() {
            self.focus = Focus::Table;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        tracing::info!(org = %self.org_id, "loading quotes");
        self.dispatcher.refresh();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if !self.alerts.is_empty() {
            return self.alert_dialog.handle_key_event(key);
        }

        match self.overlay {
            Some(Overlay::Help) => return self.help_dialog.handle_key_event(key),
            Some(Overlay::QuitConfirm) => return self.quit_dialog.handle_key_event(key),
            None => {}
        }

        if self.dispatcher.dialog.is_open() {
            return self.handle_dialog_key_event(key);
        }

        if self.focus == Focus::Comments {
            if let Some(panel) = &self.dispatcher.comments {
                return self.comment_view.handle_key_with_panel(key, panel);
            }
        }

        self.table.handle_key_event(key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.dispatcher.poll(),
            Action::Resize(_, _) => {}
            Action::OpenQuitDialog => self.overlay = Some(Overlay::QuitConfirm),
            Action::ForceQuit => self.should_quit = true,
            Action::OpenHelp => self.overlay = Some(Overlay::Help),
            Action::CloseOverlay => self.overlay = None,
            Action::DismissAlert => {
                self.alerts.pop_front();
            }

            // ─────────────────────────────────────────────────────────────────
            // Grid Navigation and View
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow => self.table.next(self.dispatcher.quotes()),
            Action::PrevRow => self.table.previous(self.dispatcher.quotes()),
            Action::FirstRow => self.table.select_first(self.dispatcher.quotes()),
            Action::LastRow => self.table.select_last(self.dispatcher.quotes()),
            Action::ToggleNormalize => {
                self.table.toggle_normalize();
                self.status_message = Some(format!("Showing {}", self.table.view_label()));
            }
            Action::TogglePriceSort => self.table.toggle_sort(),
            Action::Refresh => {
                self.dispatcher.refresh();
                self.status_message = Some("Refreshing quotes...".to_string());
            }

            // ─────────────────────────────────────────────────────────────────
            // Row Actions
            // ─────────────────────────────────────────────────────────────────
            Action::DraftEmail => {
                self.email_dialog.scroll_offset = 0;
                self.with_selected(|d, q| d.draft_email(q));
            }
            Action::OpenAllocate => self.with_selected(|d, q| d.open_allocate(q)),
            Action::OpenException => self.with_selected(|d, q| d.open_exception(q)),
            Action::OpenAudit => {
                self.audit_dialog.scroll_offset = 0;
                self.with_selected(|d, q| d.open_audit(q));
            }
            Action::OpenSimulate => self.with_selected(|d, q| d.open_simulate(q)),
            Action::OpenPreview => self.with_selected(|d, q| d.open_preview(q)),
            Action::ExportCsv => self.dispatcher.request_export(),
            Action::SyncErp => self.with_selected(|d, q| d.sync_erp(q)),
            Action::OpenComments => {
                self.with_selected(|d, q| d.open_comments(q));
                if self.dispatcher.comments.is_some() {
                    self.focus = Focus::Comments;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Workflow Dialogs
            // ─────────────────────────────────────────────────────────────────
            Action::CloseDialog => self.dispatcher.close_dialog(),
            Action::SubmitDialog => self.dispatcher.submit(),
            Action::DialogInput(c) => self.dispatcher.input_char(c),
            Action::DialogBackspace => self.dispatcher.backspace(),
            Action::NextReason => self.dispatcher.cycle_reason(true),
            Action::PrevReason => self.dispatcher.cycle_reason(false),
            Action::RetryEmail => self.dispatcher.retry_email(),
            Action::DownloadBookingPdf => self.dispatcher.download_booking_pdf(),
            Action::ApproveAudit => self.dispatcher.approve_audit(),
            Action::ChallengeRate => {
                self.draft_review_dialog.scroll_offset = 0;
                self.dispatcher.challenge_rate();
            }
            Action::SaveEstimate => self.dispatcher.save_estimate(),
            Action::DiscardDraft => self.dispatcher.discard_draft(),
            Action::OpenDocument => self.dispatcher.open_document(),

            // ─────────────────────────────────────────────────────────────────
            // Discussion Panel
            // ─────────────────────────────────────────────────────────────────
            Action::FocusComments => {
                if self.dispatcher.comments.is_some() {
                    self.focus = Focus::Comments;
                }
            }
            Action::FocusTable => self.focus = Focus::Table,
            Action::CloseComments => {
                self.dispatcher.close_comments();
                self.focus = Focus::Table;
            }
            Action::ComposeComment => self.dispatcher.start_composing(),
            Action::CancelCompose => self.dispatcher.stop_composing(),
            Action::CommentInput(c) => self.dispatcher.comment_input(c),
            Action::CommentBackspace => self.dispatcher.comment_backspace(),
            Action::PostComment => self.dispatcher.post_comment(),
            Action::ScrollCommentsUp => self.dispatcher.scroll_comments(false),
            Action::ScrollCommentsDown => self.dispatcher.scroll_comments(true),
        }

        self.apply_outcomes();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = DashboardContext {
            quotes: self.dispatcher.quotes(),
            loading: self.dispatcher.is_loading(),
            org_id: &self.org_id,
            comments: self.dispatcher.comments.as_ref(),
            comments_focused: self.focus == Focus::Comments,
            status_message: self.status_message.as_deref(),
            now: Utc::now(),
        };
        draw_dashboard(frame, area, &mut self.table, &self.comment_view, &ctx);

        self.draw_dialog(frame, area);

        match self.overlay {
            Some(Overlay::Help) => self.help_dialog.draw(frame, area)?,
            Some(Overlay::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            None => {}
        }

        if let Some(alert) = self.alerts.front() {
            self.alert_dialog.draw_with_alert(frame, area, alert);
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_dialog_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match &self.dispatcher.dialog {
            ActiveDialog::None => Ok(None),
            ActiveDialog::Email { .. } => self.email_dialog.handle_key_event(key),
            ActiveDialog::Allocate { .. } => self.allocate_dialog.handle_key_event(key),
            ActiveDialog::Exception { .. } => self.exception_dialog.handle_key_event(key),
            ActiveDialog::DraftReview { .. } => self.draft_review_dialog.handle_key_event(key),
            ActiveDialog::Audit { .. } => self.audit_dialog.handle_key_event(key),
            ActiveDialog::Simulate { .. } => self.simulate_dialog.handle_key_event(key),
            ActiveDialog::Preview { .. } => self.preview_dialog.handle_key_event(key),
            ActiveDialog::Mfa { .. } => self.mfa_dialog.handle_key_event(key),
        }
    }

    fn draw_dialog(&mut self, frame: &mut Frame, area: Rect) {
        let recipient = self.dispatcher.settings().notify_address.as_str();
        match &self.dispatcher.dialog {
            ActiveDialog::None => {}
            ActiveDialog::Email {
                quote,
                state,
                download,
            } => self
                .email_dialog
                .draw_with_state(frame, area, quote, state, download.is_some()),
            ActiveDialog::Allocate {
                quote,
                po_number,
                pending,
                error,
            } => self.allocate_dialog.draw_with_form(
                frame,
                area,
                quote,
                po_number,
                pending.is_some(),
                error.as_deref(),
            ),
            ActiveDialog::Exception {
                quote,
                reason,
                pending,
            } => self
                .exception_dialog
                .draw_with_reason(frame, area, quote, *reason, pending.is_some()),
            ActiveDialog::DraftReview { draft, pending } => self
                .draft_review_dialog
                .draw_with_draft(frame, area, draft, recipient, pending.is_some()),
            ActiveDialog::Audit { quote, pending } => {
                self.audit_dialog
                    .draw_with_quote(frame, area, quote, pending.is_some())
            }
            ActiveDialog::Simulate {
                quote,
                hs_code,
                result,
                pending,
                error,
            } => {
                let view = SimulateView {
                    quote,
                    hs_code,
                    result: result.as_ref(),
                    busy: pending.is_some(),
                    error: error.as_deref(),
                };
                self.simulate_dialog.draw_with_view(frame, area, &view);
            }
            ActiveDialog::Preview { quote, document } => self.preview_dialog.draw_with_document(
                frame,
                area,
                quote,
                document,
                self.table.normalize,
            ),
            ActiveDialog::Mfa {
                action,
                code,
                error,
            } => self
                .mfa_dialog
                .draw_with_gate(frame, area, action, code, error.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_text;
    use crate::dispatcher::DispatchSettings;
    use crate::model::quote::fixtures::quote;
    use crate::model::AlertKind;
    use crate::services::runner::fake::FakeApi;
    use crate::services::{RequestContext, RequestRunner};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app_with(quotes: Vec<Quote>) -> (App, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::with_quotes(quotes));
        let runner = RequestRunner::new(
            api.clone(),
            RequestContext {
                org_id: "org_test".to_string(),
                user_id: "tester".to_string(),
            },
        );
        let settings = DispatchSettings {
            notify_address: "warehouse@example.com".to_string(),
            export_dir: std::env::temp_dir().join(format!("quote-desk-app-{}", std::process::id())),
            mfa_code: "123456".to_string(),
            default_hs_code: "8471.30".to_string(),
        };
        let mut app = App::new(Dispatcher::new(runner, settings), "org_test");
        app.init().unwrap();
        app.dispatcher.pump();
        app.apply_outcomes();
        (app, api)
    }

    fn press(app: &mut App, code: KeyCode) {
        let mut current = app.handle_key_event(KeyEvent::from(code)).unwrap();
        while let Some(action) = current {
            current = app.update(action).unwrap();
        }
    }

    #[test]
    fn test_init_loads_and_selects_first_row() {
        let (app, api) = app_with(vec![quote("1"), quote("2")]);
        assert_eq!(api.count("list_quotes"), 1);
        assert_eq!(app.dispatcher.quotes().len(), 2);
        assert_eq!(app.selected_quote().map(|q| q.id.to_string()), Some("1".to_string()));
    }

    #[test]
    fn test_open_dialog_captures_typing() {
        let (mut app, _) = app_with(vec![quote("1")]);
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.dispatcher.dialog, ActiveDialog::Allocate { .. }));

        // 'q' goes into the PO field instead of asking to quit
        press(&mut app, KeyCode::Char('q'));
        assert!(app.overlay.is_none());
        match &app.dispatcher.dialog {
            ActiveDialog::Allocate { po_number, .. } => assert_eq!(po_number, "q"),
            other => panic!("unexpected dialog {:?}", other),
        }

        press(&mut app, KeyCode::Esc);
        assert!(!app.dispatcher.dialog.is_open());
    }

    #[test]
    fn test_blocked_erp_sync_alert_takes_keys() {
        let (mut app, api) = app_with(vec![quote("1")]);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(api.count("erp_sync"), 0);
        assert_eq!(app.alerts.len(), 1);
        assert_eq!(app.alerts[0].kind, AlertKind::Info);

        // table keys are swallowed until the alert is dismissed
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.alerts.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn test_unavailable_action_sets_status() {
        let (mut app, _) = app_with(vec![quote("1")]);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.dispatcher.dialog.is_open());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_comment_focus_and_compose() {
        let (mut app, api) = app_with(vec![quote("1")]);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.focus, Focus::Comments);
        app.dispatcher.pump();

        press(&mut app, KeyCode::Char('i'));
        for c in "ok".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        app.dispatcher.pump();
        assert_eq!(api.count("post_comment 1 ok"), 1);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Table);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Esc);
        assert!(app.dispatcher.comments.is_none());
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn test_quit_flow() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.overlay, Some(Overlay::QuitConfirm));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.overlay.is_none());
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_draw_with_dialog_and_alert() {
        let (mut app, _) = app_with(vec![quote("1")]);
        press(&mut app, KeyCode::Char('l'));
        app.alerts.push_back(Alert::error("Export Failed", "disk full"));

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal
            .draw(|frame| app.draw(frame, frame.area()).unwrap())
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Landed Cost Simulator"));
        assert!(text.contains("disk full"));
    }
}
