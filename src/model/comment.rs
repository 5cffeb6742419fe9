//! Team discussion thread attached to a quote

use super::quote::QuoteId;
use crate::services::RequestId;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// An internal note left on a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Comment {
    /// Parse the backend timestamp, which may lack a UTC offset
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn age_text(&self, now: DateTime<Utc>) -> String {
        match self.posted_at() {
            Some(at) => relative_age(now, at),
            None => self.timestamp.clone(),
        }
    }

    pub fn initial(&self) -> char {
        self.user_id.chars().next().unwrap_or('?')
    }
}

/// Human-friendly "how long ago" text
pub fn relative_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };

    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86_399 => plural(secs / 3600, "hour"),
        _ => plural(secs / 86_400, "day"),
    }
}

/// Loading state of the thread
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadState {
    Loading(RequestId),
    Ready,
    Failed(String),
}

/// Side panel state, independent of the workflow dialogs
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPanel {
    pub quote_id: QuoteId,
    pub filename: String,
    pub comments: Vec<Comment>,
    pub thread: ThreadState,
    pub draft: String,
    pub composing: bool,
    pub posting: Option<RequestId>,
    pub scroll_offset: usize,
}

impl CommentPanel {
    pub fn new(quote_id: QuoteId, filename: String, request: RequestId) -> Self {
        Self {
            quote_id,
            filename,
            comments: Vec::new(),
            thread: ThreadState::Loading(request),
            draft: String::new(),
            composing: false,
            posting: None,
            scroll_offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(timestamp: &str) -> Comment {
        Comment {
            id: 1,
            user_id: "PilotUser_01".to_string(),
            content: "Check the BAF".to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let c = comment("2026-10-16T09:30:00.123456");
        let expected = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        assert_eq!(c.posted_at().unwrap().timestamp(), expected.timestamp());
    }

    #[test]
    fn test_age_text() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(comment("2026-10-16T11:59:30Z").age_text(now), "just now");
        assert_eq!(comment("2026-10-16T11:55:00Z").age_text(now), "5 minutes ago");
        assert_eq!(comment("2026-10-16T11:00:00Z").age_text(now), "1 hour ago");
        assert_eq!(comment("2026-10-14T12:00:00Z").age_text(now), "2 days ago");
        assert_eq!(comment("yesterday").age_text(now), "yesterday");
    }
}
