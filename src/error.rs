//! Error types for the Test Intelligence client.
//!
//! The client distinguishes failures that happen before any network
//! activity (validation), failures of the transport itself (connect, TLS,
//! timeout), and failures reported by the service as a non-2xx response
//! ([`DomainError`]).
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, Error>`. Errors are values;
//! none are used for control flow. A call that returns `Err` leaves any
//! typed output at its default value.
//!
//! # Example
//!
//! ```rust,ignore
//! use ti_client::Error;
//!
//! match client.healthz(&ctx).await {
//!     Ok(()) => println!("service is up"),
//!     Err(Error::Domain(e)) => println!("service responded {}: {}", e.code, e.message),
//!     Err(Error::Transport(e)) => println!("could not reach service: {e}"),
//!     Err(err) => println!("{err}"),
//! }
//! ```

use thiserror::Error;

/// A structured error constructed from a non-2xx service response.
///
/// Carries the HTTP status code and the best available message: the
/// structured error payload's message if the body parses, otherwise the
/// raw body text, otherwise the canonical reason phrase for the status.
///
/// # Example
///
/// ```rust
/// use ti_client::DomainError;
///
/// let error = DomainError {
///     code: 404,
///     message: "Not Found".to_string(),
/// };
/// assert_eq!(error.to_string(), "404: Not Found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct DomainError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The error message reported by the service.
    pub message: String,
}

/// Shape of the structured error payload the service returns in non-2xx
/// response bodies.
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorPayload {
    #[serde(default, alias = "Code")]
    #[allow(dead_code)]
    code: i64,
    #[serde(default, alias = "Message")]
    message: String,
}

impl DomainError {
    /// Builds a `DomainError` from a response status and body.
    ///
    /// Message precedence: structured payload message, then raw body text,
    /// then the canonical reason phrase for the status code.
    #[must_use]
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(body) {
            payload.message
        } else {
            String::from_utf8_lossy(body).into_owned()
        };
        Self {
            code: status.as_u16(),
            message,
        }
    }
}

/// Unified error type for all client operations.
///
/// Use pattern matching to distinguish retryable transport failures from
/// terminal validation and client-side errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument or configuration field is empty.
    ///
    /// Detected before any I/O; never retried.
    #[error("{0} is not set")]
    Validation(&'static str),

    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The request never produced a response (connect, TLS, or timeout
    /// failure).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be parsed.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value contained bytes that cannot be sent on the wire.
    #[error("invalid header value for {name}")]
    InvalidHeader {
        /// Name of the offending header.
        name: &'static str,
    },

    /// Request serialization or response decoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The upload payload variant is not accepted by the endpoint.
    #[error("payload type not supported")]
    UnsupportedPayload,

    /// The caller-supplied cancellation context fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Domain(e) => Some(e.code),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
