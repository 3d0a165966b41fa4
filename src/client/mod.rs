//! The HTTP client for the Test Intelligence service.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`TiClient`]: the operation façade, one method per remote operation
//! - [`UploadPayload`]: the tagged payload accepted by the v2 callgraph
//!   upload
//!
//! Supporting layers, in call order:
//!
//! - `tls`: resolves mTLS client identities and custom trust roots once,
//!   at client construction
//! - `transport`: the send capability — a shared default client, or a
//!   dedicated one when non-default TLS settings are requested
//! - `executor`: builds the signed request, classifies the response, and
//!   paces retries with an exponential backoff schedule
//!
//! # Retry Behavior
//!
//! Transport-level failures (connect, TLS, timeout) are always retried up
//! to the operation's backoff budget. Responses of 500 and above are
//! retried only for operations flagged retry-on-server-error. Client
//! errors (4xx) and validation failures are never retried. Cancellation
//! through the caller's token interrupts the in-flight attempt and any
//! retry sleep, and always wins over a pending retry decision.

mod executor;
mod http;
#[cfg(test)]
pub(crate) mod testutil;
mod tls;
mod transport;

pub use http::{TiClient, UploadPayload};
