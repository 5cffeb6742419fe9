//! HTTP client for the quote backend
//!
//! The backend is an external collaborator; this module only knows the
//! endpoint shapes. `QuoteApi` is the seam the dispatcher talks to, so tests
//! can swap in an in-memory fake.

use crate::model::{
    AgentInsight, Comment, EmailDraft, ErpReceipt, ExceptionReason, LandedCostEstimate,
    OutboundDraft, OutboundEmail, Quote, QuoteId,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const ORG_HEADER: &str = "X-Organization-ID";

/// Who is making a request; supplied once by the composition root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub org_id: String,
    pub user_id: String,
}

/// Errors from backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("invalid response: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Build the error for a non-2xx reply, preferring the backend's own message
fn server_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    ApiError::Server { status, message }
}

/// Operations the dashboard needs from the backend
pub trait QuoteApi: Send + Sync {
    fn list_quotes(&self, ctx: &RequestContext) -> Result<Vec<Quote>, ApiError>;

    fn generate_email(&self, ctx: &RequestContext, quote: &Quote) -> Result<EmailDraft, ApiError>;

    fn booking_pdf(&self, ctx: &RequestContext, quote: &Quote) -> Result<Vec<u8>, ApiError>;

    fn allocate(&self, ctx: &RequestContext, id: &QuoteId, po_number: &str)
        -> Result<(), ApiError>;

    fn report_exception(
        &self,
        ctx: &RequestContext,
        po_number: &str,
        reason: ExceptionReason,
    ) -> Result<OutboundDraft, ApiError>;

    fn send_email(&self, ctx: &RequestContext, email: &OutboundEmail) -> Result<(), ApiError>;

    fn approve_audit(&self, ctx: &RequestContext, id: &QuoteId) -> Result<(), ApiError>;

    fn challenge_rate(
        &self,
        ctx: &RequestContext,
        quote: &Quote,
        challenges: &[AgentInsight],
    ) -> Result<OutboundDraft, ApiError>;

    fn simulate(
        &self,
        ctx: &RequestContext,
        id: &QuoteId,
        hs_code: &str,
    ) -> Result<LandedCostEstimate, ApiError>;

    fn erp_sync(&self, ctx: &RequestContext, id: &QuoteId) -> Result<ErpReceipt, ApiError>;

    fn fetch_document(&self, ctx: &RequestContext, pdf_path: &str) -> Result<Vec<u8>, ApiError>;

    fn list_comments(&self, ctx: &RequestContext, id: &QuoteId) -> Result<Vec<Comment>, ApiError>;

    fn post_comment(
        &self,
        ctx: &RequestContext,
        id: &QuoteId,
        content: &str,
    ) -> Result<Comment, ApiError>;
}

#[derive(Deserialize)]
struct SimulationReply {
    simulation: LandedCostEstimate,
}

#[derive(Serialize)]
struct ChallengeBody<'a> {
    quote: &'a Quote,
    challenges: &'a [AgentInsight],
}

/// Blocking `reqwest` implementation of [`QuoteApi`]
pub struct HttpQuoteApi {
    base_url: String,
    client: Client,
}

impl HttpQuoteApi {
    /// Create a client; calls have no overall timeout, only a connect timeout
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, ctx: &RequestContext, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .header(ORG_HEADER, &ctx.org_id)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(server_error(status.as_u16(), &body))
    }

    fn get_json<T: DeserializeOwned>(&self, ctx: &RequestContext, path: &str) -> Result<T, ApiError> {
        let response = self.send(ctx, self.client.get(self.url(path)))?;
        response.json().map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn post_json<B, T>(&self, ctx: &RequestContext, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(ctx, self.client.post(self.url(path)).json(body))?;
        response.json().map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn bytes(&self, ctx: &RequestContext, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self.send(ctx, request)?;
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

impl QuoteApi for HttpQuoteApi {
    fn list_quotes(&self, ctx: &RequestContext) -> Result<Vec<Quote>, ApiError> {
        self.get_json(ctx, "/api/quotes")
    }

    fn generate_email(&self, ctx: &RequestContext, quote: &Quote) -> Result<EmailDraft, ApiError> {
        self.post_json(ctx, "/api/generate-email", quote)
    }

    fn booking_pdf(&self, ctx: &RequestContext, quote: &Quote) -> Result<Vec<u8>, ApiError> {
        let request = self
            .client
            .post(self.url("/api/generate-booking-pdf"))
            .json(quote);
        self.bytes(ctx, request)
    }

    fn allocate(
        &self,
        ctx: &RequestContext,
        id: &QuoteId,
        po_number: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/quotes/{}/allocate", id);
        self.post_json::<_, serde_json::Value>(ctx, &path, &json!({ "po_number": po_number }))
            .map(|_| ())
    }

    fn report_exception(
        &self,
        ctx: &RequestContext,
        po_number: &str,
        reason: ExceptionReason,
    ) -> Result<OutboundDraft, ApiError> {
        let body = json!({ "po_number": po_number, "reason": reason.wire_value() });
        self.post_json(ctx, "/api/shipments/exception", &body)
    }

    fn send_email(&self, ctx: &RequestContext, email: &OutboundEmail) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>(ctx, "/api/email/send", email)
            .map(|_| ())
    }

    fn approve_audit(&self, ctx: &RequestContext, id: &QuoteId) -> Result<(), ApiError> {
        let path = format!("/api/quotes/{}/approve-audit", id);
        self.post_json::<_, serde_json::Value>(ctx, &path, &json!({ "user_id": ctx.user_id }))
            .map(|_| ())
    }

    fn challenge_rate(
        &self,
        ctx: &RequestContext,
        quote: &Quote,
        challenges: &[AgentInsight],
    ) -> Result<OutboundDraft, ApiError> {
        let body = ChallengeBody { quote, challenges };
        self.post_json(ctx, "/api/negotiation/challenge", &body)
    }

    fn simulate(
        &self,
        ctx: &RequestContext,
        id: &QuoteId,
        hs_code: &str,
    ) -> Result<LandedCostEstimate, ApiError> {
        let path = format!("/api/quotes/{}/simulate", id);
        let reply: SimulationReply = self.post_json(ctx, &path, &json!({ "hs_code": hs_code }))?;
        Ok(reply.simulation)
    }

    fn erp_sync(&self, ctx: &RequestContext, id: &QuoteId) -> Result<ErpReceipt, ApiError> {
        self.post_json(ctx, "/api/erp/sync", &json!({ "quote_id": id }))
    }

    fn fetch_document(&self, ctx: &RequestContext, pdf_path: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!("/api/uploads/{}", pdf_path.trim_start_matches('/'));
        self.bytes(ctx, self.client.get(self.url(&path)))
    }

    fn list_comments(&self, ctx: &RequestContext, id: &QuoteId) -> Result<Vec<Comment>, ApiError> {
        self.get_json(ctx, &format!("/api/quotes/{}/comments", id))
    }

    fn post_comment(
        &self,
        ctx: &RequestContext,
        id: &QuoteId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let path = format!("/api/quotes/{}/comments", id);
        let body = json!({ "content": content, "user_id": ctx.user_id });
        self.post_json(ctx, &path, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = HttpQuoteApi::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url("/api/quotes"), "http://localhost:5000/api/quotes");
        assert_eq!(api.url("api/erp/sync"), "http://localhost:5000/api/erp/sync");
    }

    #[test]
    fn test_server_error_prefers_backend_message() {
        let err = server_error(400, r#"{"error": "PO Number required"}"#);
        assert_eq!(err.to_string(), "PO Number required");

        let err = server_error(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert!(matches!(err, ApiError::Server { status: 502, .. }));
    }

    #[test]
    fn test_challenge_body_shape() {
        let quote = crate::model::quote::fixtures::quote("3");
        let body = ChallengeBody {
            quote: &quote,
            challenges: &[],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["quote"]["id"], "3");
        assert!(value["challenges"].as_array().unwrap().is_empty());
    }
}
