//! External service interactions
//!
//! - HTTP calls to the quote backend
//! - Background request execution
//! - Rate sheet export and downloaded documents

pub mod api;
pub mod export;
pub mod runner;

pub use api::{ApiError, HttpQuoteApi, RequestContext};
pub use export::{booking_file_name, export_rate_sheet, save_download};
pub use runner::{ApiMessage, ApiReply, ApiRequest, RequestId, RequestRunner};
