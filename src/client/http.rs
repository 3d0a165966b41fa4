//! The Test Intelligence operation façade.
//!
//! [`TiClient`] exposes one method per remote operation. Every call runs
//! the same way: validate the required identifiers, build the endpoint URL
//! from the configured scope and the call parameters, then hand the
//! request to the executor — directly for single-attempt operations, or
//! under an exponential backoff budget sized to the expected backend
//! processing time.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::backoff::ExponentialBackoff;
use crate::client::executor::{Executor, ResponseParts};
use crate::client::tls::{
    resolve_client_identity, resolve_trust_roots, DEFAULT_MTLS_CERT_PATH, DEFAULT_MTLS_KEY_PATH,
};
use crate::client::transport::{build_transport, HttpTransport};
use crate::config::TiConfig;
use crate::error::{DomainError, Error};
use crate::types::{
    CommitInfoResp, DownloadLink, GetTestTimesReq, GetTestTimesResp, MLSelectTestsRequest,
    SelectTestsReq, SelectTestsResp, SummaryRequest, SummaryResponse, TestCase, TestCases,
    TestCasesRequest,
};
use crate::types::savings::{IntelligenceExecutionState, SavingsFeature, SavingsRequest};

/// Retry budget for result writes, test selection, and timing lookups.
const RESULT_BUDGET: Duration = Duration::from_secs(10 * 60);

/// Retry budget for callgraph uploads, which the backend may take a long
/// time to ingest.
const UPLOAD_BUDGET: Duration = Duration::from_secs(45 * 60);

/// Retry budget for download-link and metadata lookups.
const LOOKUP_BUDGET: Duration = Duration::from_secs(5 * 60);

/// Payload accepted by the JSON callgraph upload endpoint.
///
/// The endpoint takes pre-serialized JSON text and passes it through
/// verbatim; every other shape is rejected before any network activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadPayload {
    /// JSON text forwarded to the service unchanged.
    RawJsonText(String),
    /// A payload shape the endpoint does not accept.
    Unsupported,
}

/// A client for the Test Intelligence service.
///
/// Construct once with [`TiClient::new`] and share freely: the client
/// holds only immutable configuration and resolved TLS credentials, so it
/// is safe for concurrent use. Each call creates its own backoff schedule
/// and honors its own cancellation token.
///
/// # Example
///
/// ```rust,ignore
/// use ti_client::{TiClient, TiConfig};
/// use tokio_util::sync::CancellationToken;
///
/// let client = TiClient::new(
///     TiConfig::builder()
///         .endpoint("https://ti.example.com")
///         .token("secret")
///         .account_id("acct")
///         .org_id("org")
///         .project_id("proj")
///         .pipeline_id("pipe")
///         .build_id("42")
///         .stage_id("unit")
///         .build(),
/// );
///
/// let ctx = CancellationToken::new();
/// client.healthz(&ctx).await?;
/// ```
#[derive(Debug)]
pub struct TiClient {
    config: TiConfig,
    executor: Executor,
}

// Verify TiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TiClient>();
};

impl TiClient {
    /// Creates a client, resolving mTLS credentials and trust roots once.
    ///
    /// A dedicated transport is built only when non-default security
    /// settings are present (skip-verify, a trust-root directory, or a
    /// client certificate); otherwise the process-wide default transport
    /// is reused.
    #[must_use]
    pub fn new(config: TiConfig) -> Self {
        let identity = resolve_client_identity(
            config.mtls_client_cert(),
            config.mtls_client_key(),
            Path::new(DEFAULT_MTLS_CERT_PATH),
            Path::new(DEFAULT_MTLS_KEY_PATH),
        );
        let roots = resolve_trust_roots(config.additional_certs_dir());

        let transport = if config.skip_verify() || roots.is_some() || identity.is_some() {
            HttpTransport::Custom(build_transport(config.skip_verify(), roots, identity))
        } else {
            HttpTransport::Shared
        };

        let executor = Executor::new(Arc::new(transport), config.token());
        Self { config, executor }
    }

    #[cfg(test)]
    pub(crate) fn with_transport(
        config: TiConfig,
        transport: Arc<dyn crate::client::transport::Transport>,
    ) -> Self {
        let executor = Executor::new(transport, config.token());
        Self { config, executor }
    }

    /// Returns the configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &TiConfig {
        &self.config
    }

    /// Submits test results for a step.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, a
    /// transport error if the service stays unreachable past the retry
    /// budget, or a [`DomainError`] for a non-2xx response.
    pub async fn write(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        report: &str,
        tests: &[TestCase],
    ) -> Result<(), Error> {
        self.validate_write_args(step_id, report)?;
        let url = self.write_url(step_id, report);
        let body = serde_json::to_vec(tests)?;
        self.executor
            .retry_request(
                ctx,
                Method::POST,
                &url,
                self.config.sha(),
                Some(&body),
                false,
                ExponentialBackoff::new(RESULT_BUDGET),
            )
            .await?;
        Ok(())
    }

    /// Asks the service which tests should run for the given change set.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn select_tests(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        source: &str,
        target: &str,
        request: &SelectTestsReq,
        failed_test_rerun_enabled: bool,
    ) -> Result<SelectTestsResp, Error> {
        self.validate_select_tests_args(step_id, source, target)?;
        let url = self.select_tests_url(step_id, source, target, failed_test_rerun_enabled);
        let body = serde_json::to_vec(request)?;
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::POST,
                &url,
                self.config.sha(),
                Some(&body),
                false,
                ExponentialBackoff::new(RESULT_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Asks the ML-based selector which tests should run.
    ///
    /// Fire-and-forget from a retry perspective: a single attempt, no
    /// backoff.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn ml_select_tests(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        ml_key: &str,
        source: &str,
        target: &str,
        request: &MLSelectTestsRequest,
    ) -> Result<SelectTestsResp, Error> {
        self.validate_scope_args()?;
        let url = self.ml_select_tests_url(step_id, ml_key, source, target);
        let body = serde_json::to_vec(request)?;
        let parts = self
            .executor
            .do_request(ctx, Method::POST, &url, "", Some(&body))
            .await?;
        decode(&parts)
    }

    /// Uploads the binary callgraph for a step.
    ///
    /// The payload is sent as its base64 JSON-string encoding, matching
    /// the service's legacy upload format.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn upload_cg(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        source: &str,
        target: &str,
        time_ms: i64,
        callgraph: &[u8],
        failed_test_rerun_enabled: bool,
    ) -> Result<(), Error> {
        self.validate_upload_cg_args(step_id, source, target)?;
        let url =
            self.upload_cg_url(step_id, source, target, time_ms, false, failed_test_rerun_enabled);
        self.upload_cg_internal(ctx, &url, callgraph).await
    }

    /// Uploads the callgraph for a step whose tests failed, skipping the
    /// advance of the last-known-good commit.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn upload_cg_failed_test(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        source: &str,
        target: &str,
        time_ms: i64,
        callgraph: &[u8],
    ) -> Result<(), Error> {
        self.validate_upload_cg_args(step_id, source, target)?;
        let url = self.upload_cg_url(step_id, source, target, time_ms, true, false);
        self.upload_cg_internal(ctx, &url, callgraph).await
    }

    async fn upload_cg_internal(
        &self,
        ctx: &CancellationToken,
        url: &str,
        callgraph: &[u8],
    ) -> Result<(), Error> {
        let body = serde_json::to_vec(&BASE64.encode(callgraph))?;
        self.executor
            .retry_request(
                ctx,
                Method::POST,
                url,
                self.config.sha(),
                Some(&body),
                true,
                ExponentialBackoff::new(UPLOAD_BUDGET),
            )
            .await?;
        Ok(())
    }

    /// Uploads a JSON callgraph through the v2 endpoint.
    ///
    /// Only [`UploadPayload::RawJsonText`] is accepted; the text is passed
    /// through verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPayload`] for any other payload shape,
    /// a validation error if endpoint or token are missing, or the
    /// underlying transport/service error.
    pub async fn upload_cg_v2(
        &self,
        ctx: &CancellationToken,
        payload: &UploadPayload,
    ) -> Result<(), Error> {
        self.validate_ti_args()?;
        let UploadPayload::RawJsonText(text) = payload else {
            return Err(Error::UnsupportedPayload);
        };
        let url = format!("{}/v2/uploadcg", self.config.endpoint());
        self.executor
            .retry_request(
                ctx,
                Method::POST,
                &url,
                "",
                Some(text.as_bytes()),
                true,
                ExponentialBackoff::new(UPLOAD_BUDGET),
            )
            .await?;
        Ok(())
    }

    /// Resolves the download links for the test agent matching the given
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns a validation error if endpoint, token, or language are
    /// missing, or the underlying transport/service error.
    pub async fn download_link(
        &self,
        ctx: &CancellationToken,
        language: &str,
        os: &str,
        arch: &str,
        framework: &str,
        version: &str,
        env: &str,
    ) -> Result<Vec<DownloadLink>, Error> {
        self.validate_download_link_args(language)?;
        let url = self.download_link_url(language, os, arch, framework, version, env);
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::GET,
                &url,
                "",
                None,
                true,
                ExponentialBackoff::new(LOOKUP_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Streams an agent artifact from the given URL.
    ///
    /// The response is returned live, without status classification or
    /// body decoding; the caller owns reading and dropping it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request could not be sent.
    pub async fn download_agent(
        &self,
        ctx: &CancellationToken,
        url: &str,
    ) -> Result<reqwest::Response, Error> {
        self.executor.open(ctx, Method::GET, url).await
    }

    /// Fetches historical test timing data.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn get_test_times(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        request: &GetTestTimesReq,
    ) -> Result<GetTestTimesResp, Error> {
        self.validate_scope_args()?;
        let url = self.test_times_url(step_id);
        let body = serde_json::to_vec(request)?;
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::POST,
                &url,
                "",
                Some(&body),
                true,
                ExponentialBackoff::new(RESULT_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Looks up the last commit of `branch` for which the service holds a
    /// callgraph.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn commit_info(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        branch: &str,
    ) -> Result<CommitInfoResp, Error> {
        self.validate_commit_info_args(step_id, branch)?;
        let url = self.commit_info_url(step_id, branch);
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::GET,
                &url,
                "",
                None,
                true,
                ExponentialBackoff::new(LOOKUP_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Fetches the test execution summary for a build.
    ///
    /// Empty scope fields in the request are filled from the client
    /// configuration; the report type defaults to `"junit"`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn summary(
        &self,
        ctx: &CancellationToken,
        mut request: SummaryRequest,
    ) -> Result<SummaryResponse, Error> {
        self.validate_scope_args()?;
        self.fill_basic_arguments(&mut request);
        let url = self.summary_url(&request);
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::GET,
                &url,
                "",
                None,
                true,
                ExponentialBackoff::new(LOOKUP_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Pages through the test cases executed in a build.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn get_test_cases(
        &self,
        ctx: &CancellationToken,
        mut request: TestCasesRequest,
    ) -> Result<TestCases, Error> {
        self.validate_scope_args()?;
        self.fill_basic_arguments(&mut request.basic_info);
        let url = self.test_cases_url(&request);
        let parts = self
            .executor
            .retry_request(
                ctx,
                Method::GET,
                &url,
                "",
                None,
                true,
                ExponentialBackoff::new(LOOKUP_BUDGET),
            )
            .await?;
        decode(&parts)
    }

    /// Reports the time savings of an intelligence feature for a step.
    ///
    /// Fire-and-forget telemetry: a single attempt, no backoff.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing identifier, or
    /// the underlying transport/service error.
    pub async fn write_savings(
        &self,
        ctx: &CancellationToken,
        step_id: &str,
        feature_name: SavingsFeature,
        feature_state: IntelligenceExecutionState,
        time_taken_ms: i64,
        request: &SavingsRequest,
    ) -> Result<(), Error> {
        self.validate_write_savings_args(step_id)?;
        let url = self.savings_url(step_id, feature_name, feature_state, time_taken_ms);
        let body = serde_json::to_vec(request)?;
        self.executor
            .do_request(ctx, Method::POST, &url, "", Some(&body))
            .await?;
        Ok(())
    }

    /// Pings the liveness endpoint; anything but HTTP 200 is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] carrying the unexpected status, or the
    /// underlying transport error.
    pub async fn healthz(&self, ctx: &CancellationToken) -> Result<(), Error> {
        let url = format!("{}/healthz", self.config.endpoint());
        let parts = self
            .executor
            .do_request(ctx, Method::GET, &url, "", None)
            .await?;
        if parts.status != reqwest::StatusCode::OK {
            return Err(Error::Domain(DomainError {
                code: parts.status.as_u16(),
                message: format!("TI healthz ping failed with status {}", parts.status),
            }));
        }
        Ok(())
    }

    // ---- endpoint path construction -------------------------------------

    fn scope_params<'a>(&'a self, step_id: &'a str) -> [(&'static str, &'a str); 7] {
        [
            ("accountId", self.config.account_id()),
            ("orgId", self.config.org_id()),
            ("projectId", self.config.project_id()),
            ("pipelineId", self.config.pipeline_id()),
            ("buildId", self.config.build_id()),
            ("stageId", self.config.stage_id()),
            ("stepId", step_id),
        ]
    }

    fn write_url(&self, step_id: &str, report: &str) -> String {
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([
            ("report", report),
            ("repo", self.config.repo()),
            ("sha", self.config.sha()),
            ("commitLink", self.config.commit_link()),
        ]);
        format!("{}/reports/write?{}", self.config.endpoint(), query(&params))
    }

    fn select_tests_url(
        &self,
        step_id: &str,
        source: &str,
        target: &str,
        failed_test_rerun_enabled: bool,
    ) -> String {
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([
            ("repo", self.config.repo()),
            ("sha", self.config.sha()),
            ("source", source),
            ("target", target),
        ]);
        let mut url = format!("{}/tests/select?{}", self.config.endpoint(), query(&params));
        if failed_test_rerun_enabled {
            url.push_str("&failedTestRerunEnabled=true");
        }
        url
    }

    fn upload_cg_url(
        &self,
        step_id: &str,
        source: &str,
        target: &str,
        time_ms: i64,
        has_failed_tests: bool,
        failed_test_rerun_enabled: bool,
    ) -> String {
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([
            ("repo", self.config.repo()),
            ("sha", self.config.sha()),
            ("source", source),
            ("target", target),
        ]);
        let mut url = format!(
            "{}/tests/uploadcg?{}&timeMs={time_ms}",
            self.config.endpoint(),
            query(&params)
        );
        if has_failed_tests {
            url.push_str("&hasFailedTests=true");
        } else {
            url.push_str("&schemaVersion=1.1");
            if failed_test_rerun_enabled {
                url.push_str("&failedTestRerunEnabled=true");
            }
        }
        url
    }

    fn test_times_url(&self, step_id: &str) -> String {
        format!(
            "{}/tests/timedata?{}",
            self.config.endpoint(),
            query(&self.scope_params(step_id))
        )
    }

    fn download_link_url(
        &self,
        language: &str,
        os: &str,
        arch: &str,
        framework: &str,
        version: &str,
        env: &str,
    ) -> String {
        format!(
            "{}/agents/link?{}",
            self.config.endpoint(),
            query(&[
                ("accountId", self.config.account_id()),
                ("language", language),
                ("os", os),
                ("arch", arch),
                ("framework", framework),
                ("version", version),
                ("buildenv", env),
            ])
        )
    }

    fn commit_info_url(&self, step_id: &str, branch: &str) -> String {
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([("repo", self.config.repo()), ("branch", branch)]);
        format!(
            "{}/vcs/commitinfo?{}",
            self.config.endpoint(),
            query(&params)
        )
    }

    fn ml_select_tests_url(
        &self,
        step_id: &str,
        ml_key: &str,
        source: &str,
        target: &str,
    ) -> String {
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([
            ("repo", self.config.repo()),
            ("sha", self.config.sha()),
            ("source", source),
            ("target", target),
            ("mlKey", ml_key),
            ("commitLink", self.config.commit_link()),
        ]);
        format!(
            "{}/ml/tests/select?{}",
            self.config.endpoint(),
            query(&params)
        )
    }

    fn summary_url(&self, request: &SummaryRequest) -> String {
        format!(
            "{}/reports/summary?{}",
            self.config.endpoint(),
            query(&[
                ("accountId", self.config.account_id()),
                ("orgId", request.org_id.as_str()),
                ("projectId", request.project_id.as_str()),
                ("pipelineId", request.pipeline_id.as_str()),
                ("buildId", request.build_id.as_str()),
                ("stageId", request.stage_id.as_str()),
                ("stepId", request.step_id.as_str()),
                ("report", request.report_type.as_str()),
            ])
        )
    }

    fn test_cases_url(&self, request: &TestCasesRequest) -> String {
        let info = &request.basic_info;
        format!(
            "{}/reports/test_cases?{}",
            self.config.endpoint(),
            query(&[
                ("accountId", self.config.account_id()),
                ("orgId", info.org_id.as_str()),
                ("projectId", info.project_id.as_str()),
                ("pipelineId", info.pipeline_id.as_str()),
                ("buildId", info.build_id.as_str()),
                ("stageId", info.stage_id.as_str()),
                ("stepId", info.step_id.as_str()),
                ("report", info.report_type.as_str()),
                ("testCaseSearchTerm", request.test_case_search_term.as_str()),
                ("sort", request.sort.as_str()),
                ("order", request.order.as_str()),
                ("pageIndex", request.page_index.as_str()),
                ("pageSize", request.page_size.as_str()),
                ("suite_name", request.suite_name.as_str()),
            ])
        )
    }

    fn savings_url(
        &self,
        step_id: &str,
        feature_name: SavingsFeature,
        feature_state: IntelligenceExecutionState,
        time_taken_ms: i64,
    ) -> String {
        let time_ms = time_taken_ms.to_string();
        let mut params = self.scope_params(step_id).to_vec();
        params.extend([
            ("repo", self.config.repo()),
            ("featureName", feature_name.as_str()),
            ("featureState", feature_state.as_str()),
            ("timeMs", time_ms.as_str()),
        ]);
        format!("{}/savings?{}", self.config.endpoint(), query(&params))
    }

    /// Fills empty scope fields of a report query from the client
    /// configuration. `all_stages` drops the stage/step scope entirely.
    fn fill_basic_arguments(&self, request: &mut SummaryRequest) {
        if request.org_id.is_empty() {
            request.org_id = self.config.org_id().to_string();
        }
        if request.project_id.is_empty() {
            request.project_id = self.config.project_id().to_string();
        }
        if request.pipeline_id.is_empty() {
            request.pipeline_id = self.config.pipeline_id().to_string();
        }
        if request.build_id.is_empty() {
            request.build_id = self.config.build_id().to_string();
        }
        if request.report_type.is_empty() {
            request.report_type = "junit".to_string();
        }
        if request.all_stages {
            request.stage_id = String::new();
            request.step_id = String::new();
        }
    }

    // ---- argument validation --------------------------------------------

    fn validate_ti_args(&self) -> Result<(), Error> {
        if self.config.endpoint().is_empty() {
            return Err(Error::Validation("ti endpoint"));
        }
        if self.config.token().is_empty() {
            return Err(Error::Validation("ti token"));
        }
        Ok(())
    }

    fn validate_basic_args(&self) -> Result<(), Error> {
        if self.config.account_id().is_empty() {
            return Err(Error::Validation("accountID"));
        }
        if self.config.org_id().is_empty() {
            return Err(Error::Validation("orgID"));
        }
        if self.config.project_id().is_empty() {
            return Err(Error::Validation("projectID"));
        }
        if self.config.pipeline_id().is_empty() {
            return Err(Error::Validation("pipelineID"));
        }
        Ok(())
    }

    fn validate_run_args(&self, step_id: &str) -> Result<(), Error> {
        if self.config.build_id().is_empty() {
            return Err(Error::Validation("buildID"));
        }
        if self.config.stage_id().is_empty() {
            return Err(Error::Validation("stageID"));
        }
        if step_id.is_empty() {
            return Err(Error::Validation("stepID"));
        }
        Ok(())
    }

    /// Base checks shared by operations scoped to a pipeline but not to a
    /// single step.
    fn validate_scope_args(&self) -> Result<(), Error> {
        self.validate_ti_args()?;
        self.validate_basic_args()
    }

    fn validate_write_args(&self, step_id: &str, report: &str) -> Result<(), Error> {
        self.validate_scope_args()?;
        self.validate_run_args(step_id)?;
        if report.is_empty() {
            return Err(Error::Validation("report"));
        }
        Ok(())
    }

    fn validate_write_savings_args(&self, step_id: &str) -> Result<(), Error> {
        self.validate_scope_args()?;
        self.validate_run_args(step_id)
    }

    fn validate_select_tests_args(
        &self,
        step_id: &str,
        source: &str,
        target: &str,
    ) -> Result<(), Error> {
        self.validate_scope_args()?;
        self.validate_run_args(step_id)?;
        if source.is_empty() {
            return Err(Error::Validation("source branch"));
        }
        if target.is_empty() {
            return Err(Error::Validation("target branch"));
        }
        Ok(())
    }

    fn validate_upload_cg_args(
        &self,
        step_id: &str,
        source: &str,
        target: &str,
    ) -> Result<(), Error> {
        self.validate_select_tests_args(step_id, source, target)
    }

    fn validate_commit_info_args(&self, step_id: &str, branch: &str) -> Result<(), Error> {
        self.validate_scope_args()?;
        self.validate_run_args(step_id)?;
        if branch.is_empty() {
            return Err(Error::Validation("source branch"));
        }
        Ok(())
    }

    fn validate_download_link_args(&self, language: &str) -> Result<(), Error> {
        self.validate_ti_args()?;
        if language.is_empty() {
            return Err(Error::Validation("language"));
        }
        Ok(())
    }
}

/// Percent-encodes and joins query parameters in the given order.
fn query(params: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    out
}

/// Decodes a response body into the caller's expected shape.
///
/// An empty body (such as a 204) decodes to the type's default value.
fn decode<T>(parts: &ResponseParts) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if parts.body.is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&parts.body)?)
}
