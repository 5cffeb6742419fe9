//! Model layer - quote data and screen state
//!
//! - `Quote` and the derived display rules for the grid
//! - `ActiveDialog` - the one workflow dialog that may be open
//! - `CommentPanel` - the discussion side panel

pub mod comment;
pub mod dialog;
pub mod grid;
pub mod quote;
pub mod workflow;

pub use comment::{Comment, CommentPanel, ThreadState};
pub use dialog::{ActiveDialog, Alert, AlertKind, DocumentState, EmailState, PendingAction};
pub use grid::{row_order, PriceSort};
pub use quote::{AgentInsight, CarbonClass, InsightStatus, Quote, QuoteId, Surcharge};
pub use workflow::{
    EmailDraft, ErpReceipt, ExceptionReason, LandedCostEstimate, OutboundDraft, OutboundEmail,
};
