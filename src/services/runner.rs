//! Background request runner
//!
//! Each backend call runs on its own worker thread so the UI never blocks.
//! Results come back over a channel and are drained on every tick. Nothing
//! here retries, deduplicates or times out a call.

use super::api::{ApiError, QuoteApi, RequestContext};
use crate::model::{
    AgentInsight, Comment, EmailDraft, ErpReceipt, ExceptionReason, LandedCostEstimate,
    OutboundDraft, OutboundEmail, Quote, QuoteId,
};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Identifies one issued request; replies carry it back
pub type RequestId = u64;

/// A backend call to run in the background
#[derive(Debug, Clone)]
pub enum ApiRequest {
    ListQuotes,
    GenerateEmail(Quote),
    BookingPdf(Quote),
    Allocate { id: QuoteId, po_number: String },
    ReportException { po_number: String, reason: ExceptionReason },
    SendEmail(OutboundEmail),
    ApproveAudit(QuoteId),
    ChallengeRate { quote: Quote, challenges: Vec<AgentInsight> },
    Simulate { id: QuoteId, hs_code: String },
    ErpSync(QuoteId),
    FetchDocument(String),
    ListComments(QuoteId),
    PostComment { id: QuoteId, content: String },
}

impl ApiRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::ListQuotes => "list-quotes",
            ApiRequest::GenerateEmail(_) => "generate-email",
            ApiRequest::BookingPdf(_) => "booking-pdf",
            ApiRequest::Allocate { .. } => "allocate",
            ApiRequest::ReportException { .. } => "report-exception",
            ApiRequest::SendEmail(_) => "send-email",
            ApiRequest::ApproveAudit(_) => "approve-audit",
            ApiRequest::ChallengeRate { .. } => "challenge-rate",
            ApiRequest::Simulate { .. } => "simulate",
            ApiRequest::ErpSync(_) => "erp-sync",
            ApiRequest::FetchDocument(_) => "fetch-document",
            ApiRequest::ListComments(_) => "list-comments",
            ApiRequest::PostComment { .. } => "post-comment",
        }
    }

    /// Perform the call against `api`
    pub fn execute(self, api: &dyn QuoteApi, ctx: &RequestContext) -> Result<ApiReply, ApiError> {
        match self {
            ApiRequest::ListQuotes => api.list_quotes(ctx).map(ApiReply::Quotes),
            ApiRequest::GenerateEmail(quote) => {
                api.generate_email(ctx, &quote).map(ApiReply::EmailDraft)
            }
            ApiRequest::BookingPdf(quote) => api.booking_pdf(ctx, &quote).map(ApiReply::BookingPdf),
            ApiRequest::Allocate { id, po_number } => {
                api.allocate(ctx, &id, &po_number).map(|_| ApiReply::Done)
            }
            ApiRequest::ReportException { po_number, reason } => api
                .report_exception(ctx, &po_number, reason)
                .map(ApiReply::Draft),
            ApiRequest::SendEmail(email) => api.send_email(ctx, &email).map(|_| ApiReply::Done),
            ApiRequest::ApproveAudit(id) => api.approve_audit(ctx, &id).map(|_| ApiReply::Done),
            ApiRequest::ChallengeRate { quote, challenges } => api
                .challenge_rate(ctx, &quote, &challenges)
                .map(ApiReply::Draft),
            ApiRequest::Simulate { id, hs_code } => {
                api.simulate(ctx, &id, &hs_code).map(ApiReply::Simulation)
            }
            ApiRequest::ErpSync(id) => api.erp_sync(ctx, &id).map(ApiReply::ErpReceipt),
            ApiRequest::FetchDocument(path) => {
                api.fetch_document(ctx, &path).map(ApiReply::Document)
            }
            ApiRequest::ListComments(id) => api.list_comments(ctx, &id).map(ApiReply::Comments),
            ApiRequest::PostComment { id, content } => {
                api.post_comment(ctx, &id, &content).map(ApiReply::Comment)
            }
        }
    }
}

/// Successful reply payloads
#[derive(Debug)]
pub enum ApiReply {
    Quotes(Vec<Quote>),
    EmailDraft(EmailDraft),
    BookingPdf(Vec<u8>),
    Draft(OutboundDraft),
    Simulation(LandedCostEstimate),
    ErpReceipt(ErpReceipt),
    Document(Vec<u8>),
    Comments(Vec<Comment>),
    Comment(Comment),
    /// Mutation acknowledged with nothing worth keeping
    Done,
}

/// Outcome of one request, tagged with the id it was issued under
#[derive(Debug)]
pub struct ApiMessage {
    pub id: RequestId,
    pub request: &'static str,
    pub result: Result<ApiReply, ApiError>,
}

/// Spawns backend calls and collects their replies
pub struct RequestRunner {
    api: Arc<dyn QuoteApi>,
    ctx: RequestContext,
    sender: Sender<ApiMessage>,
    receiver: Receiver<ApiMessage>,
    next_id: RequestId,
}

impl RequestRunner {
    pub fn new(api: Arc<dyn QuoteApi>, ctx: RequestContext) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            ctx,
            sender,
            receiver,
            next_id: 1,
        }
    }

    /// Start `request` on a worker thread and return its id
    pub fn spawn(&mut self, request: ApiRequest) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;

        let api = Arc::clone(&self.api);
        let ctx = self.ctx.clone();
        let tx = self.sender.clone();
        let name = request.name();
        tracing::debug!(id, request = name, "spawning request");

        thread::spawn(move || {
            let started = Instant::now();
            let result = request.execute(api.as_ref(), &ctx);
            tracing::debug!(
                id,
                request = name,
                ok = result.is_ok(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request finished"
            );
            let _ = tx.send(ApiMessage {
                id,
                request: name,
                result,
            });
        });

        id
    }

    /// Collect every reply that has arrived since the last drain
    pub fn drain(&self) -> Vec<ApiMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => messages.push(message),
                // The runner holds a sender itself, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }

    /// Block until the next reply arrives
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<ApiMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory backend used by the runner and dispatcher tests

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeApi {
        pub quotes: Mutex<Vec<Quote>>,
        pub calls: Mutex<Vec<String>>,
        pub fail: Mutex<Vec<&'static str>>,
    }

    impl FakeApi {
        pub fn with_quotes(quotes: Vec<Quote>) -> Self {
            Self {
                quotes: Mutex::new(quotes),
                ..Default::default()
            }
        }

        pub fn fail_on(&self, call: &'static str) {
            self.fail.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls().iter().filter(|c| c.starts_with(prefix)).count()
        }

        fn record(&self, call: &'static str, detail: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("{} {}", call, detail));
            if self.fail.lock().unwrap().contains(&call) {
                return Err(ApiError::Server {
                    status: 500,
                    message: format!("{} failed", call),
                });
            }
            Ok(())
        }
    }

    fn draft(action: &str) -> OutboundDraft {
        OutboundDraft {
            action: action.to_string(),
            draft_subject: "Schedule impact".to_string(),
            draft_body: "Dear team".to_string(),
        }
    }

    impl QuoteApi for FakeApi {
        fn list_quotes(&self, ctx: &RequestContext) -> Result<Vec<Quote>, ApiError> {
            self.record("list_quotes", ctx.org_id.clone())?;
            Ok(self.quotes.lock().unwrap().clone())
        }

        fn generate_email(&self, _: &RequestContext, quote: &Quote) -> Result<EmailDraft, ApiError> {
            self.record("generate_email", quote.id.to_string())?;
            Ok(EmailDraft {
                subject: format!("Booking {}", quote.carrier_name()),
                body: "Please confirm".to_string(),
            })
        }

        fn booking_pdf(&self, _: &RequestContext, quote: &Quote) -> Result<Vec<u8>, ApiError> {
            self.record("booking_pdf", quote.id.to_string())?;
            Ok(b"%PDF-1.4 booking".to_vec())
        }

        fn allocate(&self, _: &RequestContext, id: &QuoteId, po: &str) -> Result<(), ApiError> {
            self.record("allocate", format!("{} {}", id, po))
        }

        fn report_exception(
            &self,
            _: &RequestContext,
            po: &str,
            reason: ExceptionReason,
        ) -> Result<OutboundDraft, ApiError> {
            self.record("report_exception", format!("{} {}", po, reason.wire_value()))?;
            Ok(draft("Email Drafted"))
        }

        fn send_email(&self, _: &RequestContext, email: &OutboundEmail) -> Result<(), ApiError> {
            self.record("send_email", email.to.clone())
        }

        fn approve_audit(&self, ctx: &RequestContext, id: &QuoteId) -> Result<(), ApiError> {
            self.record("approve_audit", format!("{} {}", id, ctx.user_id))
        }

        fn challenge_rate(
            &self,
            _: &RequestContext,
            quote: &Quote,
            challenges: &[AgentInsight],
        ) -> Result<OutboundDraft, ApiError> {
            self.record("challenge_rate", format!("{} {}", quote.id, challenges.len()))?;
            Ok(draft(""))
        }

        fn simulate(
            &self,
            _: &RequestContext,
            id: &QuoteId,
            hs_code: &str,
        ) -> Result<LandedCostEstimate, ApiError> {
            self.record("simulate", format!("{} {}", id, hs_code))?;
            Ok(LandedCostEstimate {
                estimated_duties: 0.0,
                estimated_taxes: 50.0,
                total_landed_cost: 1050.0,
                hs_description: "Laptops".to_string(),
            })
        }

        fn erp_sync(&self, _: &RequestContext, id: &QuoteId) -> Result<ErpReceipt, ApiError> {
            self.record("erp_sync", id.to_string())?;
            Ok(ErpReceipt {
                erp_reference: "SAP-LOG-1A2B3C4D".to_string(),
                details: "Data transmitted to Oracle Financials Cloud".to_string(),
            })
        }

        fn fetch_document(&self, _: &RequestContext, path: &str) -> Result<Vec<u8>, ApiError> {
            self.record("fetch_document", path.to_string())?;
            Ok(b"%PDF-1.4 original".to_vec())
        }

        fn list_comments(&self, _: &RequestContext, id: &QuoteId) -> Result<Vec<Comment>, ApiError> {
            self.record("list_comments", id.to_string())?;
            Ok(vec![Comment {
                id: 1,
                user_id: "ops".to_string(),
                content: "Looks fine".to_string(),
                timestamp: "2026-10-16T09:00:00".to_string(),
            }])
        }

        fn post_comment(
            &self,
            ctx: &RequestContext,
            id: &QuoteId,
            content: &str,
        ) -> Result<Comment, ApiError> {
            self.record("post_comment", format!("{} {}", id, content))?;
            Ok(Comment {
                id: 2,
                user_id: ctx.user_id.clone(),
                content: content.to_string(),
                timestamp: "2026-10-16T10:00:00".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeApi;
    use super::*;
    use crate::model::quote::fixtures::quote;
    use std::time::Duration;

    fn ctx() -> RequestContext {
        RequestContext {
            org_id: "org_test".to_string(),
            user_id: "tester".to_string(),
        }
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let api = Arc::new(FakeApi::with_quotes(vec![quote("1")]));
        let mut runner = RequestRunner::new(api, ctx());

        let first = runner.spawn(ApiRequest::ListQuotes);
        let second = runner.spawn(ApiRequest::ListQuotes);
        assert!(second > first);
    }

    #[test]
    fn test_reply_carries_request_id_and_context() {
        let api = Arc::new(FakeApi::with_quotes(vec![quote("1"), quote("2")]));
        let mut runner = RequestRunner::new(api.clone(), ctx());

        let id = runner.spawn(ApiRequest::ListQuotes);
        let message = runner.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(message.id, id);
        assert_eq!(message.request, "list-quotes");
        match message.result {
            Ok(ApiReply::Quotes(quotes)) => assert_eq!(quotes.len(), 2),
            other => panic!("unexpected reply: {:?}", other),
        }
        assert_eq!(api.calls(), vec!["list_quotes org_test".to_string()]);
    }

    #[test]
    fn test_failures_are_reported_not_retried() {
        let api = Arc::new(FakeApi::default());
        api.fail_on("erp_sync");
        let mut runner = RequestRunner::new(api.clone(), ctx());

        runner.spawn(ApiRequest::ErpSync(QuoteId::from("7")));
        let message = runner.recv_timeout(Duration::from_secs(5)).unwrap();

        assert!(matches!(message.result, Err(ApiError::Server { status: 500, .. })));
        assert_eq!(api.count("erp_sync"), 1);
    }

    #[test]
    fn test_drain_is_empty_without_requests() {
        let runner = RequestRunner::new(Arc::new(FakeApi::default()), ctx());
        assert!(runner.drain().is_empty());
    }
}
