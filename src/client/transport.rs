//! The transport capability behind every outbound request.
//!
//! Operations depend on the [`Transport`] trait rather than a concrete
//! HTTP client, so tests can substitute a stub without touching the
//! network. Production code uses [`HttpTransport`]: either the shared
//! process-wide default client, or a per-client instance carrying custom
//! TLS settings.

use std::fmt;
use std::sync::OnceLock;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Identity};
use tracing::debug;

/// Sends one HTTP request and returns the raw response.
///
/// Implementations must be cheap to call concurrently; the client shares
/// one transport across all operations.
#[async_trait]
pub(crate) trait Transport: Send + Sync + fmt::Debug {
    /// Executes the request, returning the response or a transport-level
    /// failure (connect, TLS, timeout).
    async fn execute(&self, request: reqwest::Request)
        -> Result<reqwest::Response, reqwest::Error>;
}

/// Production transport: the shared default client, or a dedicated client
/// carrying non-default TLS settings.
#[derive(Debug)]
pub(crate) enum HttpTransport {
    /// The lazily-initialized process-wide default client.
    Shared,
    /// A client built for custom TLS requirements (skip-verify, extra
    /// trust roots, or an mTLS identity).
    Custom(reqwest::Client),
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        match self {
            Self::Shared => shared_client().execute(request).await,
            Self::Custom(client) => client.execute(request).await,
        }
    }
}

/// Returns the process-wide default client, creating it on first use.
///
/// Redirects are never followed: the caller decides what to do with a
/// redirect response.
pub(crate) fn shared_client() -> &'static reqwest::Client {
    static SHARED: OnceLock<reqwest::Client> = OnceLock::new();
    SHARED.get_or_init(|| {
        base_builder()
            .build()
            .expect("failed to create default HTTP client")
    })
}

fn base_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .use_rustls_tls()
        .redirect(Policy::none())
}

/// Builds a dedicated client for non-default security settings.
///
/// `skip_verify` disables certificate verification and takes precedence
/// over any supplied trust roots. A client identity is attached for mTLS
/// presentation regardless of the verify mode.
///
/// # Panics
///
/// Panics if the underlying client cannot be created, which only happens
/// on TLS backend initialization failure.
pub(crate) fn build_transport(
    skip_verify: bool,
    roots: Option<Vec<Certificate>>,
    identity: Option<Identity>,
) -> reqwest::Client {
    let mut builder = base_builder();

    if skip_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(roots) = verification_roots(skip_verify, roots) {
        for cert in roots {
            builder = builder.add_root_certificate(cert);
        }
    }

    if let Some(identity) = identity {
        debug!("setting mTLS client certs in TI service client");
        builder = builder.identity(identity);
    }

    builder
        .build()
        .expect("failed to create custom HTTP client")
}

/// Returns the trust roots that should participate in verification.
///
/// Skip-verify mode verifies nothing, so any supplied roots are ignored.
fn verification_roots(
    skip_verify: bool,
    roots: Option<Vec<Certificate>>,
) -> Option<Vec<Certificate>> {
    if skip_verify {
        None
    } else {
        roots
    }
}
