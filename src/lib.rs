//! # Test Intelligence Client
//!
//! A Rust client for the Harness Test Intelligence (TI) service: select
//! which tests to run for a change, upload code-dependency callgraphs,
//! report results, and track the time the feature saves.
//!
//! ## Overview
//!
//! This crate provides:
//! - A typed operation façade ([`TiClient`]) with one method per remote
//!   operation
//! - Per-operation argument validation before any network activity
//! - A retrying request executor with exponential backoff, sized per
//!   operation
//! - mTLS client certificates and custom trust roots, resolved once at
//!   construction
//! - Checksum-chaining and telemetry helpers used when building upload
//!   payloads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ti_client::{TiClient, TiConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = TiClient::new(
//!     TiConfig::builder()
//!         .endpoint("https://ti.example.com")
//!         .token("secret-token")
//!         .account_id("acct")
//!         .org_id("org")
//!         .project_id("proj")
//!         .pipeline_id("pipe")
//!         .build_id("42")
//!         .stage_id("unit")
//!         .repo("github.com/org/repo")
//!         .sha("deadbeef")
//!         .build(),
//! );
//!
//! let ctx = CancellationToken::new();
//!
//! // Liveness probe.
//! client.healthz(&ctx).await?;
//!
//! // Ask which tests to run for this change.
//! let selection = client
//!     .select_tests(&ctx, "step1", "feature", "main", &request, false)
//!     .await?;
//! println!("running {} of {} tests", selection.selected_tests, selection.total_tests);
//! ```
//!
//! ## Cancellation
//!
//! Every operation takes a [`tokio_util::sync::CancellationToken`].
//! Cancelling it aborts the in-flight attempt and any retry sleep
//! promptly; a cancelled call returns [`Error::Cancelled`] and is never
//! retried.
//!
//! ## Design Principles
//!
//! - **Immutable configuration**: a client is built once from a
//!   [`TiConfig`] and holds no mutable state, so it is safe to share
//!   across tasks
//! - **Validate before send**: missing identifiers are reported as
//!   [`Error::Validation`] without touching the network
//! - **Errors are values**: every failure is returned, none are panics
//! - **Async-first**: designed for the Tokio runtime

pub mod backoff;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

// Re-export public types at the crate root for convenience
pub use backoff::ExponentialBackoff;
pub use client::{TiClient, UploadPayload};
pub use config::{TiConfig, TiConfigBuilder};
pub use error::{DomainError, Error};
