//! The request-execution core: one signed attempt, plus the retrying
//! wrapper that paces re-attempts with an exponential backoff schedule.
//!
//! A single attempt either produces [`ResponseParts`] (a 2xx response with
//! its body fully read) or an [`Error`]: `Domain` for non-2xx statuses,
//! `Transport` when no response arrived at all. The retry loop re-attempts
//! transport failures always, 5xx responses only when the operation is
//! flagged retryable, and nothing else. Cancellation wins over any pending
//! retry decision.

use std::sync::Arc;

use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode, Url};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backoff::ExponentialBackoff;
use crate::client::transport::Transport;
use crate::error::{DomainError, Error};

/// Header carrying the bearer token shared between agent and service.
pub(crate) const HEADER_TOKEN: &str = "x-harness-token";

/// Header carrying the request-correlation value (the commit sha).
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// Status and fully-read body of one successful attempt.
#[derive(Debug)]
pub(crate) struct ResponseParts {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Raw response body; empty for 204 responses.
    pub body: Vec<u8>,
}

/// Executes signed requests against the service through the configured
/// transport.
#[derive(Clone, Debug)]
pub(crate) struct Executor {
    transport: Arc<dyn Transport>,
    token: String,
}

impl Executor {
    pub(crate) fn new(transport: Arc<dyn Transport>, token: impl Into<String>) -> Self {
        Self {
            transport,
            token: token.into(),
        }
    }

    /// Builds a request with the auth and correlation headers attached.
    fn build_request(
        &self,
        method: Method,
        url: &str,
        request_id: &str,
        body: Option<&[u8]>,
    ) -> Result<reqwest::Request, Error> {
        let url = Url::parse(url)?;
        let mut request = reqwest::Request::new(method, url);

        let token = HeaderValue::from_str(&self.token)
            .map_err(|_| Error::InvalidHeader { name: "X-Harness-Token" })?;
        request.headers_mut().insert(HEADER_TOKEN, token);

        // The commit sha doubles as a request id for log correlation.
        if !request_id.is_empty() {
            let request_id = HeaderValue::from_str(request_id)
                .map_err(|_| Error::InvalidHeader { name: "X-Request-ID" })?;
            request.headers_mut().insert(HEADER_REQUEST_ID, request_id);
        }

        if let Some(body) = body {
            *request.body_mut() = Some(reqwest::Body::from(body.to_vec()));
        }

        Ok(request)
    }

    /// Performs one attempt: send, classify the status, read the body.
    ///
    /// A 204 returns immediately with an empty body. Any status of 300 or
    /// above becomes a [`DomainError`] carrying the best available
    /// message. The body is always consumed before returning so the
    /// connection can be reused.
    pub(crate) async fn do_request(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        request_id: &str,
        body: Option<&[u8]>,
    ) -> Result<ResponseParts, Error> {
        let request = self.build_request(method, url, request_id, body)?;

        let response = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(Error::Cancelled),
            result = self.transport.execute(request) => result.map_err(Error::Transport)?,
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(ResponseParts {
                status,
                body: Vec::new(),
            });
        }

        let body = response.bytes().await.map_err(Error::Transport)?;
        if status.as_u16() >= 300 {
            return Err(Error::Domain(DomainError::from_response(status, &body)));
        }

        Ok(ResponseParts {
            status,
            body: body.to_vec(),
        })
    }

    /// Sends a request and hands the live response back without reading
    /// its body. Used for the raw artifact download, where the caller owns
    /// the stream.
    pub(crate) async fn open(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Response, Error> {
        let request = self.build_request(method, url, "", None)?;
        tokio::select! {
            biased;
            () = ctx.cancelled() => Err(Error::Cancelled),
            result = self.transport.execute(request) => result.map_err(Error::Transport),
        }
    }

    /// Runs [`do_request`](Self::do_request) under a backoff schedule.
    ///
    /// Server errors (5xx) are retried only when `retry_on_server_error`
    /// is set; transport failures are always retried, as the server may
    /// just be recovering from an outage. Exhausting the schedule returns
    /// the most recent underlying error. Cancellation is re-checked after
    /// every attempt and during every sleep, and is never retried.
    pub(crate) async fn retry_request(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        request_id: &str,
        body: Option<&[u8]>,
        retry_on_server_error: bool,
        mut backoff: ExponentialBackoff,
    ) -> Result<ResponseParts, Error> {
        loop {
            let attempt = self
                .do_request(ctx, method.clone(), url, request_id, body)
                .await;

            if ctx.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let retryable = match &attempt {
                Err(Error::Domain(err)) => retry_on_server_error && err.code >= 500,
                Err(Error::Transport(_)) => true,
                _ => false,
            };
            if !retryable {
                return attempt;
            }

            match backoff.next_backoff() {
                None => return attempt,
                Some(delay) => {
                    debug!("retrying {url} in {delay:?}");
                    tokio::select! {
                        biased;
                        () = ctx.cancelled() => return Err(Error::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::client::testutil::StubTransport;

    fn executor(stub: &Arc<StubTransport>) -> Executor {
        Executor::new(Arc::clone(stub) as Arc<dyn Transport>, "test-token")
    }

    fn fast_backoff() -> ExponentialBackoff {
        ExponentialBackoff::with_initial_interval(Duration::from_millis(1), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_do_request_returns_body_on_success() {
        let stub = StubTransport::always(200, r#"{"selected_tests": 2}"#);
        let parts = executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
            )
            .await
            .unwrap();

        assert_eq!(parts.status, StatusCode::OK);
        assert_eq!(parts.body, br#"{"selected_tests": 2}"#);
    }

    #[tokio::test]
    async fn test_do_request_attaches_token_and_request_id() {
        let stub = StubTransport::always(200, "{}");
        executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::POST,
                "http://ti.example.com/reports/write",
                "sha123",
                Some(b"[]"),
            )
            .await
            .unwrap();

        let headers = stub.last_request().headers;
        assert_eq!(headers.get(HEADER_TOKEN).unwrap(), "test-token");
        assert_eq!(headers.get(HEADER_REQUEST_ID).unwrap(), "sha123");
    }

    #[tokio::test]
    async fn test_do_request_omits_request_id_when_empty() {
        let stub = StubTransport::always(200, "{}");
        executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/healthz",
                "",
                None,
            )
            .await
            .unwrap();

        assert!(stub.last_request().headers.get(HEADER_REQUEST_ID).is_none());
    }

    #[tokio::test]
    async fn test_do_request_no_content_skips_body() {
        let stub = StubTransport::always(204, "");
        let parts = executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::POST,
                "http://ti.example.com/reports/write",
                "",
                None,
            )
            .await
            .unwrap();

        assert_eq!(parts.status, StatusCode::NO_CONTENT);
        assert!(parts.body.is_empty());
    }

    #[tokio::test]
    async fn test_do_request_surfaces_structured_error_message() {
        let stub = StubTransport::always(404, r#"{"code": 404, "message": "step not found"}"#);
        let err = executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
            )
            .await
            .unwrap_err();

        match err {
            Error::Domain(e) => {
                assert_eq!(e.code, 404);
                assert_eq!(e.message, "step not found");
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_do_request_uses_raw_body_when_unstructured() {
        let stub = StubTransport::always(500, "stack trace here");
        let err = executor(&stub)
            .do_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Domain(ref e) if e.message == "stack trace here"));
    }

    #[tokio::test]
    async fn test_do_request_invalid_url() {
        let stub = StubTransport::always(200, "{}");
        let err = executor(&stub)
            .do_request(&CancellationToken::new(), Method::GET, "not a url", "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_server_errors() {
        let stub = StubTransport::scripted(vec![(503, ""), (503, "")], (200, "{}"));
        let parts = executor(&stub)
            .retry_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
                true,
                fast_backoff(),
            )
            .await
            .unwrap();

        assert_eq!(parts.status, StatusCode::OK);
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn test_retry_disabled_returns_server_error_after_one_attempt() {
        let stub = StubTransport::always(503, "");
        let err = executor(&stub)
            .retry_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
                false,
                fast_backoff(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Domain(ref e) if e.code == 503));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_never_retried() {
        let stub = StubTransport::always(400, r#"{"message": "bad request"}"#);
        let err = executor(&stub)
            .retry_request(
                &CancellationToken::new(),
                Method::POST,
                "http://ti.example.com/tests",
                "",
                Some(b"{}"),
                true,
                fast_backoff(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Domain(ref e) if e.code == 400));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_schedule_returns_last_error() {
        let stub = StubTransport::always(503, "still down");
        // A first interval of at least 25ms can never fit a 1ms budget, so
        // the schedule stops before the second attempt.
        let backoff = ExponentialBackoff::with_initial_interval(
            Duration::from_millis(50),
            Duration::from_millis(1),
        );
        let err = executor(&stub)
            .retry_request(
                &CancellationToken::new(),
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
                true,
                backoff,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Domain(ref e) if e.code == 503 && e.message == "still down"));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_context_aborts_before_attempt() {
        let stub = StubTransport::always(200, "{}");
        let ctx = CancellationToken::new();
        ctx.cancel();

        let err = executor(&stub)
            .retry_request(
                &ctx,
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
                true,
                fast_backoff(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_retry_sleep_stops_the_loop() {
        let stub = StubTransport::always(503, "");
        let ctx = CancellationToken::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            // Fires inside the first retry sleep, which is at least 250ms.
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let backoff =
            ExponentialBackoff::with_initial_interval(Duration::from_millis(500), Duration::ZERO);
        let err = executor(&stub)
            .retry_request(
                &ctx,
                Method::GET,
                "http://ti.example.com/tests",
                "",
                None,
                true,
                backoff,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried_until_exhaustion() {
        // Nothing listens on port 1; every attempt fails at connect time.
        let executor = Executor::new(
            Arc::new(crate::client::transport::HttpTransport::Shared) as Arc<dyn Transport>,
            "test-token",
        );
        let backoff = ExponentialBackoff::with_initial_interval(
            Duration::from_millis(1),
            Duration::from_millis(20),
        );
        let err = executor
            .retry_request(
                &CancellationToken::new(),
                Method::GET,
                "http://127.0.0.1:1/healthz",
                "",
                None,
                false,
                backoff,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }
}
