//! Configuration for the Test Intelligence client.
//!
//! [`TiConfig`] is the immutable bundle of endpoint, credentials, tenant
//! identifiers, and security settings a [`crate::TiClient`] is built from.
//! It is created once via [`TiConfigBuilder`] and never mutated afterward;
//! per-call values (step ID, branch names, report type) are passed as
//! method arguments instead.
//!
//! # Example
//!
//! ```rust
//! use ti_client::TiConfig;
//!
//! let config = TiConfig::builder()
//!     .endpoint("https://ti.example.com/")
//!     .token("secret-token")
//!     .account_id("acct")
//!     .org_id("org")
//!     .project_id("proj")
//!     .pipeline_id("pipe")
//!     .build_id("42")
//!     .stage_id("unit")
//!     .repo("github.com/org/repo")
//!     .sha("deadbeef")
//!     .build();
//!
//! // Trailing slash is stripped at build time.
//! assert_eq!(config.endpoint(), "https://ti.example.com");
//! ```

/// Immutable configuration for a Test Intelligence client.
///
/// Emptiness of individual fields is not checked here: each remote
/// operation validates exactly the fields it needs right before the call,
/// so a partially-filled config is fine for operations that do not use the
/// missing values.
///
/// # Thread Safety
///
/// `TiConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TiConfig {
    endpoint: String,
    token: String,
    account_id: String,
    org_id: String,
    project_id: String,
    pipeline_id: String,
    build_id: String,
    stage_id: String,
    repo: String,
    sha: String,
    commit_link: String,
    skip_verify: bool,
    additional_certs_dir: String,
    mtls_client_cert: String,
    mtls_client_key: String,
}

// Verify TiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TiConfig>();
};

impl TiConfig {
    /// Creates a new builder for constructing a `TiConfig`.
    #[must_use]
    pub fn builder() -> TiConfigBuilder {
        TiConfigBuilder::default()
    }

    /// Returns the service endpoint URL, without a trailing slash.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the bearer token shared between the agent and the service.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the organization identifier.
    #[must_use]
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the pipeline identifier.
    #[must_use]
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Returns the build identifier.
    #[must_use]
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Returns the stage identifier.
    #[must_use]
    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    /// Returns the repository slug.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the commit sha of the build, also used as the
    /// `X-Request-ID` correlation value.
    #[must_use]
    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// Returns the commit link metadata.
    #[must_use]
    pub fn commit_link(&self) -> &str {
        &self.commit_link
    }

    /// Returns whether TLS certificate verification is disabled.
    #[must_use]
    pub const fn skip_verify(&self) -> bool {
        self.skip_verify
    }

    /// Returns the directory scanned for additional trust-root
    /// certificates, or an empty string if none was configured.
    #[must_use]
    pub fn additional_certs_dir(&self) -> &str {
        &self.additional_certs_dir
    }

    /// Returns the base64-encoded mTLS client certificate, if supplied.
    #[must_use]
    pub fn mtls_client_cert(&self) -> &str {
        &self.mtls_client_cert
    }

    /// Returns the base64-encoded mTLS client key, if supplied.
    #[must_use]
    pub fn mtls_client_key(&self) -> &str {
        &self.mtls_client_key
    }
}

/// Builder for [`TiConfig`] instances.
///
/// Every field defaults to empty/false. The builder is infallible:
/// required fields are enforced per operation at call time, not here.
#[derive(Debug, Default)]
pub struct TiConfigBuilder {
    config: TiConfig,
}

impl TiConfigBuilder {
    /// Sets the service endpoint URL. A single trailing slash is stripped
    /// when the config is built.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    /// Sets the account identifier.
    #[must_use]
    pub fn account_id(mut self, id: impl Into<String>) -> Self {
        self.config.account_id = id.into();
        self
    }

    /// Sets the organization identifier.
    #[must_use]
    pub fn org_id(mut self, id: impl Into<String>) -> Self {
        self.config.org_id = id.into();
        self
    }

    /// Sets the project identifier.
    #[must_use]
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.config.project_id = id.into();
        self
    }

    /// Sets the pipeline identifier.
    #[must_use]
    pub fn pipeline_id(mut self, id: impl Into<String>) -> Self {
        self.config.pipeline_id = id.into();
        self
    }

    /// Sets the build identifier.
    #[must_use]
    pub fn build_id(mut self, id: impl Into<String>) -> Self {
        self.config.build_id = id.into();
        self
    }

    /// Sets the stage identifier.
    #[must_use]
    pub fn stage_id(mut self, id: impl Into<String>) -> Self {
        self.config.stage_id = id.into();
        self
    }

    /// Sets the repository slug.
    #[must_use]
    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.config.repo = repo.into();
        self
    }

    /// Sets the commit sha.
    #[must_use]
    pub fn sha(mut self, sha: impl Into<String>) -> Self {
        self.config.sha = sha.into();
        self
    }

    /// Sets the commit link metadata.
    #[must_use]
    pub fn commit_link(mut self, link: impl Into<String>) -> Self {
        self.config.commit_link = link.into();
        self
    }

    /// Disables TLS certificate verification when `true`.
    ///
    /// Takes precedence over any additional trust roots.
    #[must_use]
    pub const fn skip_verify(mut self, skip: bool) -> Self {
        self.config.skip_verify = skip;
        self
    }

    /// Sets a directory whose files are loaded as additional PEM trust
    /// roots.
    #[must_use]
    pub fn additional_certs_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.additional_certs_dir = dir.into();
        self
    }

    /// Sets the base64-encoded mTLS client certificate.
    #[must_use]
    pub fn mtls_client_cert(mut self, cert: impl Into<String>) -> Self {
        self.config.mtls_client_cert = cert.into();
        self
    }

    /// Sets the base64-encoded mTLS client key.
    #[must_use]
    pub fn mtls_client_key(mut self, key: impl Into<String>) -> Self {
        self.config.mtls_client_key = key.into();
        self
    }

    /// Builds the [`TiConfig`], stripping a single trailing slash from the
    /// endpoint.
    #[must_use]
    pub fn build(mut self) -> TiConfig {
        if let Some(stripped) = self.config.endpoint.strip_suffix('/') {
            self.config.endpoint = stripped.to_string();
        }
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_strips_trailing_slash() {
        let config = TiConfig::builder()
            .endpoint("https://svc.example.com/")
            .build();
        assert_eq!(config.endpoint(), "https://svc.example.com");
    }

    #[test]
    fn test_builder_keeps_endpoint_without_trailing_slash() {
        let config = TiConfig::builder()
            .endpoint("https://svc.example.com")
            .build();
        assert_eq!(config.endpoint(), "https://svc.example.com");
    }

    #[test]
    fn test_builder_strips_only_one_slash() {
        let config = TiConfig::builder()
            .endpoint("https://svc.example.com//")
            .build();
        assert_eq!(config.endpoint(), "https://svc.example.com/");
    }

    #[test]
    fn test_builder_defaults_are_empty() {
        let config = TiConfig::builder().build();
        assert_eq!(config.endpoint(), "");
        assert_eq!(config.token(), "");
        assert!(!config.skip_verify());
        assert_eq!(config.additional_certs_dir(), "");
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let config = TiConfig::builder()
            .endpoint("https://ti.example.com")
            .token("tok")
            .account_id("acct")
            .org_id("org")
            .project_id("proj")
            .pipeline_id("pipe")
            .build_id("42")
            .stage_id("unit")
            .repo("github.com/org/repo")
            .sha("deadbeef")
            .commit_link("https://github.com/org/repo/commit/deadbeef")
            .skip_verify(true)
            .additional_certs_dir("/etc/certs")
            .mtls_client_cert("Y2VydA==")
            .mtls_client_key("a2V5")
            .build();

        assert_eq!(config.token(), "tok");
        assert_eq!(config.account_id(), "acct");
        assert_eq!(config.org_id(), "org");
        assert_eq!(config.project_id(), "proj");
        assert_eq!(config.pipeline_id(), "pipe");
        assert_eq!(config.build_id(), "42");
        assert_eq!(config.stage_id(), "unit");
        assert_eq!(config.repo(), "github.com/org/repo");
        assert_eq!(config.sha(), "deadbeef");
        assert!(config.skip_verify());
        assert_eq!(config.additional_certs_dir(), "/etc/certs");
        assert_eq!(config.mtls_client_cert(), "Y2VydA==");
        assert_eq!(config.mtls_client_key(), "a2V5");
    }

    #[test]
    fn test_config_is_clone_and_debug() {
        let config = TiConfig::builder().endpoint("https://ti.example.com").build();
        let cloned = config.clone();
        assert_eq!(cloned, config);
        assert!(format!("{config:?}").contains("TiConfig"));
    }
}
