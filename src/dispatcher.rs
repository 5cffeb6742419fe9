//! Row action dispatcher
//!
//! Turns row-level user actions into backend requests and dialog state.
//! Everything the screen shows besides view toggles lives here: the loaded
//! quotes, the open workflow dialog, and the discussion panel. Replies are
//! matched to the request that is still wanted; anything else is dropped.

use crate::config::MFA_CODE_LEN;
use crate::model::{
    ActiveDialog, Alert, CommentPanel, DocumentState, EmailState, ExceptionReason, OutboundEmail,
    PendingAction, Quote, ThreadState,
};
use crate::services::{
    booking_file_name, export_rate_sheet, save_download, ApiError, ApiMessage, ApiReply,
    ApiRequest, RequestId, RequestRunner,
};
use std::path::PathBuf;

const CHALLENGE_ACTION: &str = "Negotiation Challenge";
const ERP_BLOCKED: &str = "Please verify the audit findings before synchronizing with ERP.";

/// Values the dispatcher needs from configuration
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub notify_address: String,
    pub export_dir: PathBuf,
    pub mfa_code: String,
    pub default_hs_code: String,
}

/// Something the app shell should react to
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Status(String),
    Alert(Alert),
    /// The loaded list was replaced by a fresh fetch
    QuotesReplaced,
    /// A saved file should be opened in the system viewer
    OpenExternal(PathBuf),
}

pub struct Dispatcher {
    runner: RequestRunner,
    settings: DispatchSettings,
    quotes: Vec<Quote>,
    loading: Option<RequestId>,
    pub dialog: ActiveDialog,
    pub comments: Option<CommentPanel>,
    erp_syncs: Vec<RequestId>,
    outcomes: Vec<Outcome>,
}

impl Dispatcher {
    pub fn new(runner: RequestRunner, settings: DispatchSettings) -> Self {
        Self {
            runner,
            settings,
            quotes: Vec::new(),
            loading: None,
            dialog: ActiveDialog::None,
            comments: None,
            erp_syncs: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Outcomes produced since the last call
    pub fn take_outcomes(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.outcomes)
    }

    fn status(&mut self, message: impl Into<String>) {
        self.outcomes.push(Outcome::Status(message.into()));
    }

    fn alert(&mut self, alert: Alert) {
        self.outcomes.push(Outcome::Alert(alert));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Quote list
    // ═══════════════════════════════════════════════════════════════════════════

    /// Refetch the whole list; the reply replaces what is loaded
    pub fn refresh(&mut self) {
        self.loading = Some(self.runner.spawn(ApiRequest::ListQuotes));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Email
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn draft_email(&mut self, quote: &Quote) {
        let id = self.runner.spawn(ApiRequest::GenerateEmail(quote.clone()));
        self.dialog = ActiveDialog::Email {
            quote: quote.clone(),
            state: EmailState::Drafting(id),
            download: None,
        };
    }

    pub fn retry_email(&mut self) {
        let quote = match &self.dialog {
            ActiveDialog::Email {
                quote,
                state: EmailState::Failed(_),
                ..
            } => quote.clone(),
            _ => return,
        };
        self.draft_email(&quote);
    }

    pub fn download_booking_pdf(&mut self) {
        let request = match &self.dialog {
            ActiveDialog::Email {
                quote,
                state: EmailState::Ready(_),
                download: None,
            } => ApiRequest::BookingPdf(quote.clone()),
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let ActiveDialog::Email { download, .. } = &mut self.dialog {
            *download = Some(id);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Allocation and exceptions
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_allocate(&mut self, quote: &Quote) {
        if quote.is_allocated() {
            self.status(format!(
                "Already allocated to PO {}",
                quote.po_number.as_deref().unwrap_or_default()
            ));
            return;
        }
        self.dialog = ActiveDialog::Allocate {
            quote: quote.clone(),
            po_number: quote.po_number.clone().unwrap_or_default(),
            pending: None,
            error: None,
        };
    }

    fn submit_allocation(&mut self) {
        let request = match &mut self.dialog {
            ActiveDialog::Allocate {
                quote,
                po_number,
                error,
                ..
            } => {
                let po = po_number.trim();
                if po.is_empty() {
                    *error = Some("PO number is required".to_string());
                    return;
                }
                *error = None;
                ApiRequest::Allocate {
                    id: quote.id.clone(),
                    po_number: po.to_string(),
                }
            }
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let ActiveDialog::Allocate { pending, .. } = &mut self.dialog {
            *pending = Some(id);
        }
    }

    pub fn open_exception(&mut self, quote: &Quote) {
        if !quote.is_allocated() {
            self.status("Exceptions can only be reported for allocated quotes");
            return;
        }
        self.dialog = ActiveDialog::Exception {
            quote: quote.clone(),
            reason: ExceptionReason::default(),
            pending: None,
        };
    }

    pub fn cycle_reason(&mut self, forward: bool) {
        if let ActiveDialog::Exception {
            reason,
            pending: None,
            ..
        } = &mut self.dialog
        {
            *reason = if forward {
                reason.next()
            } else {
                reason.previous()
            };
        }
    }

    fn submit_exception(&mut self) {
        let request = match &self.dialog {
            ActiveDialog::Exception { quote, reason, .. } => ApiRequest::ReportException {
                po_number: quote.po_number.clone().unwrap_or_default(),
                reason: *reason,
            },
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let ActiveDialog::Exception { pending, .. } = &mut self.dialog {
            *pending = Some(id);
        }
    }

    fn send_draft(&mut self) {
        let request = match &self.dialog {
            ActiveDialog::DraftReview { draft, .. } => ApiRequest::SendEmail(OutboundEmail {
                to: self.settings.notify_address.clone(),
                subject: draft.draft_subject.clone(),
                body: draft.draft_body.clone(),
            }),
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let ActiveDialog::DraftReview { pending, .. } = &mut self.dialog {
            *pending = Some(id);
        }
    }

    /// Drop a reviewed draft without contacting the backend
    pub fn discard_draft(&mut self) {
        if matches!(self.dialog, ActiveDialog::DraftReview { pending: None, .. }) {
            self.dialog = ActiveDialog::None;
            self.status("Draft discarded");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Audit
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_audit(&mut self, quote: &Quote) {
        if !quote.has_insights() {
            self.status("No audit findings for this quote");
            return;
        }
        self.dialog = ActiveDialog::Audit {
            quote: quote.clone(),
            pending: None,
        };
    }

    fn audit_request(&self, build: impl FnOnce(&Quote) -> ApiRequest) -> Option<ApiRequest> {
        match &self.dialog {
            ActiveDialog::Audit {
                quote,
                pending: None,
            } if !quote.is_audited => Some(build(quote)),
            _ => None,
        }
    }

    fn start_audit_request(&mut self, request: ApiRequest) {
        let id = self.runner.spawn(request);
        if let ActiveDialog::Audit { pending, .. } = &mut self.dialog {
            *pending = Some(id);
        }
    }

    pub fn approve_audit(&mut self) {
        if let Some(request) = self.audit_request(|q| ApiRequest::ApproveAudit(q.id.clone())) {
            self.start_audit_request(request);
        }
    }

    pub fn challenge_rate(&mut self) {
        let request = self.audit_request(|q| ApiRequest::ChallengeRate {
            quote: q.clone(),
            challenges: q.challenges(),
        });
        if let Some(request) = request {
            self.start_audit_request(request);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Landed cost simulation
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_simulate(&mut self, quote: &Quote) {
        self.dialog = ActiveDialog::Simulate {
            quote: quote.clone(),
            hs_code: self.settings.default_hs_code.clone(),
            result: None,
            pending: None,
            error: None,
        };
    }

    fn calculate(&mut self) {
        let request = match &mut self.dialog {
            ActiveDialog::Simulate {
                quote,
                hs_code,
                error,
                ..
            } => {
                let code = hs_code.trim();
                if code.is_empty() {
                    *error = Some("HS code is required".to_string());
                    return;
                }
                *error = None;
                ApiRequest::Simulate {
                    id: quote.id.clone(),
                    hs_code: code.to_string(),
                }
            }
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let ActiveDialog::Simulate { pending, .. } = &mut self.dialog {
            *pending = Some(id);
        }
    }

    /// Close the simulation and refetch so the grid shows the stored estimate
    pub fn save_estimate(&mut self) {
        if matches!(
            self.dialog,
            ActiveDialog::Simulate {
                result: Some(_),
                pending: None,
                ..
            }
        ) {
            self.dialog = ActiveDialog::None;
            self.refresh();
            self.status("Estimate saved");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Document preview
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_preview(&mut self, quote: &Quote) {
        let Some(path) = quote.pdf_path.clone().filter(|p| !p.is_empty()) else {
            self.status("No original document for this quote");
            return;
        };
        let id = self.runner.spawn(ApiRequest::FetchDocument(path));
        self.dialog = ActiveDialog::Preview {
            quote: quote.clone(),
            document: DocumentState::Loading(id),
        };
    }

    pub fn open_document(&mut self) {
        if let ActiveDialog::Preview {
            document: DocumentState::Saved { path, .. },
            ..
        } = &self.dialog
        {
            self.outcomes.push(Outcome::OpenExternal(path.clone()));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Export behind the MFA gate
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn request_export(&mut self) {
        if self.quotes.is_empty() {
            self.status("Nothing to export");
            return;
        }
        self.dialog = ActiveDialog::Mfa {
            action: PendingAction::ExportCsv(self.quotes.clone()),
            code: String::new(),
            error: None,
        };
    }

    fn verify_mfa(&mut self) {
        let accepted = match &mut self.dialog {
            ActiveDialog::Mfa { code, error, .. } => {
                if code.len() != MFA_CODE_LEN {
                    *error = Some(format!("Enter the {}-digit code", MFA_CODE_LEN));
                    return;
                }
                if *code != self.settings.mfa_code {
                    tracing::warn!("rejected verification code");
                    *error = Some("Invalid MFA code".to_string());
                    code.clear();
                    return;
                }
                true
            }
            _ => false,
        };
        if !accepted {
            return;
        }

        if let ActiveDialog::Mfa { action, .. } = std::mem::take(&mut self.dialog) {
            self.run_pending(action);
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        tracing::info!(action = %action.describe(), "running verified action");
        match action {
            PendingAction::ExportCsv(rows) => {
                match export_rate_sheet(&rows, &self.settings.export_dir) {
                    Ok(path) => {
                        self.status(format!("Exported {} quotes to {}", rows.len(), path.display()))
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "export failed");
                        self.alert(Alert::error("Export Failed", format!("{:#}", err)));
                    }
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ERP
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn sync_erp(&mut self, quote: &Quote) {
        if !quote.is_audited {
            self.alert(Alert::info("ERP Sync", ERP_BLOCKED));
            return;
        }
        let id = self.runner.spawn(ApiRequest::ErpSync(quote.id.clone()));
        self.erp_syncs.push(id);
        self.status(format!("Syncing {} with ERP...", quote.carrier_name()));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Dialog input
    // ═══════════════════════════════════════════════════════════════════════════

    /// Primary confirm of the open dialog
    pub fn submit(&mut self) {
        if self.dialog.is_busy() {
            return;
        }
        match &self.dialog {
            ActiveDialog::Allocate { .. } => self.submit_allocation(),
            ActiveDialog::Exception { .. } => self.submit_exception(),
            ActiveDialog::DraftReview { .. } => self.send_draft(),
            ActiveDialog::Simulate { .. } => self.calculate(),
            ActiveDialog::Mfa { .. } => self.verify_mfa(),
            _ => {}
        }
    }

    pub fn input_char(&mut self, c: char) {
        match &mut self.dialog {
            ActiveDialog::Allocate {
                po_number,
                pending: None,
                ..
            } => po_number.push(c),
            ActiveDialog::Simulate {
                hs_code,
                pending: None,
                ..
            } => hs_code.push(c),
            ActiveDialog::Mfa { code, .. } => {
                if c.is_ascii_digit() && code.len() < MFA_CODE_LEN {
                    code.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match &mut self.dialog {
            ActiveDialog::Allocate {
                po_number,
                pending: None,
                ..
            } => {
                po_number.pop();
            }
            ActiveDialog::Simulate {
                hs_code,
                pending: None,
                ..
            } => {
                hs_code.pop();
            }
            ActiveDialog::Mfa { code, .. } => {
                code.pop();
            }
            _ => {}
        }
    }

    /// Close the open dialog; a reply still in flight for it will be dropped
    pub fn close_dialog(&mut self) {
        if self.dialog.is_open() {
            tracing::debug!(dialog = self.dialog.name(), "closing dialog");
        }
        self.dialog = ActiveDialog::None;
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Discussion panel
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_comments(&mut self, quote: &Quote) {
        let id = self.runner.spawn(ApiRequest::ListComments(quote.id.clone()));
        self.comments = Some(CommentPanel::new(
            quote.id.clone(),
            quote.filename.clone(),
            id,
        ));
    }

    pub fn close_comments(&mut self) {
        self.comments = None;
    }

    pub fn start_composing(&mut self) {
        if let Some(panel) = &mut self.comments {
            panel.composing = true;
        }
    }

    pub fn stop_composing(&mut self) {
        if let Some(panel) = &mut self.comments {
            panel.composing = false;
        }
    }

    pub fn comment_input(&mut self, c: char) {
        if let Some(panel) = &mut self.comments {
            panel.draft.push(c);
        }
    }

    pub fn comment_backspace(&mut self) {
        if let Some(panel) = &mut self.comments {
            panel.draft.pop();
        }
    }

    pub fn scroll_comments(&mut self, down: bool) {
        if let Some(panel) = &mut self.comments {
            panel.scroll_offset = if down {
                (panel.scroll_offset + 1).min(panel.comments.len().saturating_sub(1))
            } else {
                panel.scroll_offset.saturating_sub(1)
            };
        }
    }

    /// Post the composed note; blank input issues no request
    pub fn post_comment(&mut self) {
        let request = match &self.comments {
            Some(panel) if panel.posting.is_none() && !panel.draft.trim().is_empty() => {
                ApiRequest::PostComment {
                    id: panel.quote_id.clone(),
                    content: panel.draft.trim().to_string(),
                }
            }
            _ => return,
        };
        let id = self.runner.spawn(request);
        if let Some(panel) = &mut self.comments {
            panel.posting = Some(id);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Replies
    // ═══════════════════════════════════════════════════════════════════════════

    /// Apply every reply that has arrived
    pub fn poll(&mut self) {
        for message in self.runner.drain() {
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: ApiMessage) {
        let ApiMessage {
            id,
            request,
            result,
        } = message;

        if let Err(err) = &result {
            tracing::error!(id, request, error = %err, "request failed");
        }

        if self.loading == Some(id) {
            self.loading = None;
            self.apply_quote_list(result);
        } else if let Some(pos) = self.erp_syncs.iter().position(|p| *p == id) {
            self.erp_syncs.remove(pos);
            self.apply_erp_sync(result);
        } else if self.comment_request(id) {
            self.apply_comment_reply(id, result);
        } else if self.dialog.pending_request() == Some(id) {
            self.apply_dialog_reply(result);
        } else {
            tracing::debug!(id, request, "dropping reply nobody is waiting for");
        }
    }

    fn apply_quote_list(&mut self, result: Result<ApiReply, ApiError>) {
        match result {
            Ok(ApiReply::Quotes(quotes)) => {
                tracing::info!(count = quotes.len(), "loaded quotes");
                self.quotes = quotes;
                self.outcomes.push(Outcome::QuotesReplaced);
            }
            Ok(other) => tracing::warn!(?other, "unexpected reply to quote list"),
            Err(err) => self.alert(Alert::error("Failed to load quotes", err.to_string())),
        }
    }

    fn apply_erp_sync(&mut self, result: Result<ApiReply, ApiError>) {
        match result {
            Ok(ApiReply::ErpReceipt(receipt)) => self.alert(Alert::info(
                "ERP Sync",
                format!(
                    "ERP Sync Success!\nRef: {}\nSystem: {}",
                    receipt.erp_reference, receipt.details
                ),
            )),
            Ok(other) => tracing::warn!(?other, "unexpected reply to ERP sync"),
            Err(err) => self.alert(Alert::error("ERP Sync", format!("ERP Sync Error: {}", err))),
        }
    }

    fn comment_request(&self, id: RequestId) -> bool {
        self.comments.as_ref().is_some_and(|panel| {
            panel.thread == ThreadState::Loading(id) || panel.posting == Some(id)
        })
    }

    fn apply_comment_reply(&mut self, id: RequestId, result: Result<ApiReply, ApiError>) {
        let Some(panel) = self.comments.as_mut() else {
            return;
        };

        if panel.posting == Some(id) {
            panel.posting = None;
            match result {
                Ok(ApiReply::Comment(comment)) => {
                    panel.comments.push(comment);
                    panel.draft.clear();
                    panel.composing = false;
                }
                Ok(other) => tracing::warn!(?other, "unexpected reply to comment post"),
                Err(err) => self.outcomes.push(Outcome::Alert(Alert::error(
                    "Failed to post comment",
                    err.to_string(),
                ))),
            }
            return;
        }

        match result {
            Ok(ApiReply::Comments(comments)) => {
                panel.comments = comments;
                panel.thread = ThreadState::Ready;
            }
            Ok(other) => {
                tracing::warn!(?other, "unexpected reply to comment list");
                panel.thread = ThreadState::Ready;
            }
            Err(err) => panel.thread = ThreadState::Failed(err.to_string()),
        }
    }

    fn apply_dialog_reply(&mut self, result: Result<ApiReply, ApiError>) {
        let dialog = std::mem::take(&mut self.dialog);
        self.dialog = match (dialog, result) {
            // Email
            (ActiveDialog::Email { quote, state: EmailState::Drafting(_), download }, result) => {
                let state = match result {
                    Ok(ApiReply::EmailDraft(draft)) => EmailState::Ready(draft),
                    Ok(_) => EmailState::Failed("Unexpected reply".to_string()),
                    Err(err) => EmailState::Failed(err.to_string()),
                };
                ActiveDialog::Email { quote, state, download }
            }
            (ActiveDialog::Email { quote, state, .. }, result) => {
                match result {
                    Ok(ApiReply::BookingPdf(bytes)) => {
                        let name = booking_file_name(quote.carrier_name());
                        match save_download(&self.settings.export_dir, &name, &bytes) {
                            Ok(path) => self.status(format!(
                                "Saved booking confirmation to {}",
                                path.display()
                            )),
                            Err(err) => self.alert(Alert::error(
                                "Failed to save booking confirmation",
                                format!("{:#}", err),
                            )),
                        }
                    }
                    Ok(_) => {}
                    Err(err) => self.alert(Alert::error(
                        "Failed to download booking confirmation",
                        err.to_string(),
                    )),
                }
                ActiveDialog::Email { quote, state, download: None }
            }

            // Allocation refetches on success
            (ActiveDialog::Allocate { quote, po_number, .. }, result) => match result {
                Ok(_) => {
                    self.status(format!("Allocated {} to PO {}", quote.carrier_name(), po_number.trim()));
                    self.refresh();
                    ActiveDialog::None
                }
                Err(err) => ActiveDialog::Allocate {
                    quote,
                    po_number,
                    pending: None,
                    error: Some(format!("Failed to allocate PO: {}", err)),
                },
            },

            (ActiveDialog::Exception { quote, reason, .. }, result) => match result {
                Ok(ApiReply::Draft(draft)) => ActiveDialog::DraftReview { draft, pending: None },
                Ok(_) => ActiveDialog::None,
                Err(err) => {
                    self.alert(Alert::error("Failed to report exception", err.to_string()));
                    ActiveDialog::Exception { quote, reason, pending: None }
                }
            },

            (ActiveDialog::DraftReview { draft, .. }, result) => match result {
                Ok(_) => {
                    self.status(format!("Email sent to {}", self.settings.notify_address));
                    ActiveDialog::None
                }
                Err(err) => {
                    self.alert(Alert::error("Failed to send email", err.to_string()));
                    ActiveDialog::DraftReview { draft, pending: None }
                }
            },

            // Approval refetches; a challenge turns into a draft to review
            (ActiveDialog::Audit { quote, .. }, result) => match result {
                Ok(ApiReply::Draft(mut draft)) => {
                    draft.action = CHALLENGE_ACTION.to_string();
                    ActiveDialog::DraftReview { draft, pending: None }
                }
                Ok(_) => {
                    self.status(format!("Audit approved for {}", quote.carrier_name()));
                    self.refresh();
                    ActiveDialog::None
                }
                Err(err) => {
                    self.alert(Alert::error("Audit action failed", err.to_string()));
                    ActiveDialog::Audit { quote, pending: None }
                }
            },

            (ActiveDialog::Simulate { quote, hs_code, result: previous, .. }, result) => {
                match result {
                    Ok(ApiReply::Simulation(estimate)) => ActiveDialog::Simulate {
                        quote,
                        hs_code,
                        result: Some(estimate),
                        pending: None,
                        error: None,
                    },
                    Ok(_) => ActiveDialog::Simulate {
                        quote,
                        hs_code,
                        result: previous,
                        pending: None,
                        error: None,
                    },
                    Err(err) => ActiveDialog::Simulate {
                        quote,
                        hs_code,
                        result: previous,
                        pending: None,
                        error: Some(format!("Failed to run landed cost simulation: {}", err)),
                    },
                }
            }

            (ActiveDialog::Preview { quote, .. }, result) => {
                let document = match result {
                    Ok(ApiReply::Document(bytes)) => {
                        let name = document_file_name(&quote);
                        match save_download(&self.settings.export_dir, &name, &bytes) {
                            Ok(path) => DocumentState::Saved {
                                path,
                                bytes: bytes.len(),
                            },
                            Err(err) => DocumentState::Failed(format!("{:#}", err)),
                        }
                    }
                    Ok(_) => DocumentState::Failed("Unexpected reply".to_string()),
                    Err(err) => DocumentState::Failed(err.to_string()),
                };
                ActiveDialog::Preview { quote, document }
            }

            (dialog, _) => dialog,
        };
    }

    /// Block until one reply arrives and apply it
    #[cfg(test)]
    pub fn pump(&mut self) {
        if let Some(message) = self.runner.recv_timeout(std::time::Duration::from_secs(5)) {
            self.handle_message(message);
        }
    }
}

/// Local file name for a downloaded original document
fn document_file_name(quote: &Quote) -> String {
    quote
        .pdf_path
        .as_deref()
        .and_then(|p| p.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("quote_{}.pdf", quote.id))
}
