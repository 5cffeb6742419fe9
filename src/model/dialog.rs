//! Workflow dialog state
//!
//! A single enum holds whichever workflow dialog is open, together with the
//! transient form state and the last server reply that dialog needs. Making
//! it one value rules out two workflows being open at once.

use super::quote::Quote;
use super::workflow::{EmailDraft, ExceptionReason, LandedCostEstimate, OutboundDraft};
use crate::services::RequestId;
use std::path::PathBuf;

/// Progress of the booking email draft
#[derive(Debug, Clone, PartialEq)]
pub enum EmailState {
    Drafting(RequestId),
    Ready(EmailDraft),
    Failed(String),
}

/// Progress of the original document download in the preview
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentState {
    Loading(RequestId),
    Saved { path: PathBuf, bytes: usize },
    Failed(String),
}

/// Sensitive action parked behind the MFA gate
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Rows captured when the export was requested
    ExportCsv(Vec<Quote>),
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::ExportCsv(rows) => format!("Export {} quotes to CSV", rows.len()),
        }
    }
}

/// The workflow dialog currently on screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Email {
        quote: Quote,
        state: EmailState,
        download: Option<RequestId>,
    },
    Allocate {
        quote: Quote,
        po_number: String,
        pending: Option<RequestId>,
        error: Option<String>,
    },
    Exception {
        quote: Quote,
        reason: ExceptionReason,
        pending: Option<RequestId>,
    },
    /// Drafted outbound message awaiting Approve & Send or Discard
    DraftReview {
        draft: OutboundDraft,
        pending: Option<RequestId>,
    },
    Audit {
        quote: Quote,
        pending: Option<RequestId>,
    },
    Simulate {
        quote: Quote,
        hs_code: String,
        result: Option<LandedCostEstimate>,
        pending: Option<RequestId>,
        error: Option<String>,
    },
    Preview {
        quote: Quote,
        document: DocumentState,
    },
    Mfa {
        action: PendingAction,
        code: String,
        error: Option<String>,
    },
}

impl ActiveDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, ActiveDialog::None)
    }

    /// Request the dialog is waiting on, if any
    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            ActiveDialog::None | ActiveDialog::Mfa { .. } => None,
            ActiveDialog::Email { state, download, .. } => match state {
                EmailState::Drafting(id) => Some(*id),
                _ => *download,
            },
            ActiveDialog::Allocate { pending, .. }
            | ActiveDialog::Exception { pending, .. }
            | ActiveDialog::DraftReview { pending, .. }
            | ActiveDialog::Audit { pending, .. }
            | ActiveDialog::Simulate { pending, .. } => *pending,
            ActiveDialog::Preview { document, .. } => match document {
                DocumentState::Loading(id) => Some(*id),
                _ => None,
            },
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending_request().is_some()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActiveDialog::None => "none",
            ActiveDialog::Email { .. } => "email",
            ActiveDialog::Allocate { .. } => "allocate",
            ActiveDialog::Exception { .. } => "exception",
            ActiveDialog::DraftReview { .. } => "draft-review",
            ActiveDialog::Audit { .. } => "audit",
            ActiveDialog::Simulate { .. } => "simulate",
            ActiveDialog::Preview { .. } => "preview",
            ActiveDialog::Mfa { .. } => "mfa",
        }
    }
}

/// Severity of a blocking alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// Blocking message that must be acknowledged
///
/// Alerts sit above any open dialog without touching its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}
