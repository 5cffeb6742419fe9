//! Action enum - All possible application actions
//!
//! Components turn key events into Actions; the App applies them to the
//! quote grid and the dispatcher.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drains finished requests
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Quit without confirmation
    ForceQuit,
    /// Open help overlay
    OpenHelp,
    /// Close the help or quit overlay
    CloseOverlay,
    /// Acknowledge the blocking alert
    DismissAlert,

    // ─────────────────────────────────────────────────────────────────────────
    // Grid Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextRow,
    PrevRow,
    FirstRow,
    LastRow,

    // ─────────────────────────────────────────────────────────────────────────
    // Grid View
    // ─────────────────────────────────────────────────────────────────────────
    /// Switch between raw and normalized prices
    ToggleNormalize,
    /// Cycle the price column sort
    TogglePriceSort,
    /// Refetch the quote list
    Refresh,

    // ─────────────────────────────────────────────────────────────────────────
    // Row Actions (selected quote)
    // ─────────────────────────────────────────────────────────────────────────
    DraftEmail,
    OpenAllocate,
    OpenException,
    OpenAudit,
    OpenSimulate,
    OpenPreview,
    /// Export the loaded list (behind verification)
    ExportCsv,
    SyncErp,
    OpenComments,

    // ─────────────────────────────────────────────────────────────────────────
    // Workflow Dialogs
    // ─────────────────────────────────────────────────────────────────────────
    CloseDialog,
    /// Primary confirm of the open dialog
    SubmitDialog,
    DialogInput(char),
    DialogBackspace,
    NextReason,
    PrevReason,
    RetryEmail,
    DownloadBookingPdf,
    ApproveAudit,
    ChallengeRate,
    SaveEstimate,
    DiscardDraft,
    /// Open the downloaded original in the system viewer
    OpenDocument,

    // ─────────────────────────────────────────────────────────────────────────
    // Discussion Panel
    // ─────────────────────────────────────────────────────────────────────────
    FocusComments,
    FocusTable,
    CloseComments,
    ComposeComment,
    CancelCompose,
    CommentInput(char),
    CommentBackspace,
    PostComment,
    ScrollCommentsUp,
    ScrollCommentsDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseOverlay => write!(f, "CloseOverlay"),
            Action::DismissAlert => write!(f, "DismissAlert"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::ToggleNormalize => write!(f, "ToggleNormalize"),
            Action::TogglePriceSort => write!(f, "TogglePriceSort"),
            Action::Refresh => write!(f, "Refresh"),
            Action::DraftEmail => write!(f, "DraftEmail"),
            Action::OpenAllocate => write!(f, "OpenAllocate"),
            Action::OpenException => write!(f, "OpenException"),
            Action::OpenAudit => write!(f, "OpenAudit"),
            Action::OpenSimulate => write!(f, "OpenSimulate"),
            Action::OpenPreview => write!(f, "OpenPreview"),
            Action::ExportCsv => write!(f, "ExportCsv"),
            Action::SyncErp => write!(f, "SyncErp"),
            Action::OpenComments => write!(f, "OpenComments"),
            Action::CloseDialog => write!(f, "CloseDialog"),
            Action::SubmitDialog => write!(f, "SubmitDialog"),
            Action::DialogInput(c) => write!(f, "DialogInput('{}')", c),
            Action::DialogBackspace => write!(f, "DialogBackspace"),
            Action::NextReason => write!(f, "NextReason"),
            Action::PrevReason => write!(f, "PrevReason"),
            Action::RetryEmail => write!(f, "RetryEmail"),
            Action::DownloadBookingPdf => write!(f, "DownloadBookingPdf"),
            Action::ApproveAudit => write!(f, "ApproveAudit"),
            Action::ChallengeRate => write!(f, "ChallengeRate"),
            Action::SaveEstimate => write!(f, "SaveEstimate"),
            Action::DiscardDraft => write!(f, "DiscardDraft"),
            Action::OpenDocument => write!(f, "OpenDocument"),
            Action::FocusComments => write!(f, "FocusComments"),
            Action::FocusTable => write!(f, "FocusTable"),
            Action::CloseComments => write!(f, "CloseComments"),
            Action::ComposeComment => write!(f, "ComposeComment"),
            Action::CancelCompose => write!(f, "CancelCompose"),
            Action::CommentInput(_) => write!(f, "CommentInput"),
            Action::CommentBackspace => write!(f, "CommentBackspace"),
            Action::PostComment => write!(f, "PostComment"),
            Action::ScrollCommentsUp => write!(f, "ScrollCommentsUp"),
            Action::ScrollCommentsDown => write!(f, "ScrollCommentsDown"),
        }
    }
}
