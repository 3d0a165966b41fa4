//! Callgraph documents uploaded through the JSON (`v2`) upload path.
//!
//! Field names follow the service's camelCase document schema.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded outcome of a test, as stored with its chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestState {
    /// The test passed.
    Success,
    /// The test failed.
    Failure,
    /// The test produced conflicting results across runs.
    Flaky,
    /// No outcome recorded.
    #[default]
    Unknown,
}

/// Tenant scope a callgraph upload belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// Document id.
    #[serde(default, rename = "_id")]
    pub id: String,
    /// Account identifier.
    #[serde(default)]
    pub account_id: String,
    /// Organization identifier.
    #[serde(default)]
    pub org_id: String,
    /// Project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Repository slug.
    #[serde(default)]
    pub repo: String,
    /// Creation time of the document.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Expiry time of the document.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form metadata.
    #[serde(default)]
    pub extra_info: HashMap<String, String>,
    /// Unique id of the parent scope, when nested.
    #[serde(default)]
    pub parent_unique_id: String,
    /// Unique id of this scope.
    #[serde(default)]
    pub unique_id: String,
}

/// A dependency chain: the source paths one test depends on, with the
/// combined checksum recorded at upload time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Document id.
    #[serde(default, rename = "_id")]
    pub id: String,
    /// Id of the identifier document this chain belongs to.
    #[serde(default)]
    pub key: String,
    /// Path of the test this chain belongs to.
    #[serde(default)]
    pub path: String,
    /// Checksum of the test file itself.
    #[serde(default)]
    pub test_checksum: String,
    /// Combined checksum of the chain's source paths.
    #[serde(default)]
    pub checksum: String,
    /// Outcome recorded for the test.
    #[serde(default)]
    pub state: TestState,
    /// Free-form metadata.
    #[serde(default)]
    pub extra_info: HashMap<String, String>,
    /// Last update time of the document.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Expiry time of the document.
    #[serde(default)]
    pub expire_at: Option<DateTime<Utc>>,
}

/// The source paths a test is known to depend on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicativeChain {
    /// Repository-relative source paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_paths: Vec<String>,
}

/// A test document with its known dependency chains.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    /// Document id.
    #[serde(default, rename = "_id")]
    pub id: String,
    /// Id of the identifier document this test belongs to.
    #[serde(default)]
    pub key: String,
    /// Repository-relative path of the test.
    #[serde(default)]
    pub path: String,
    /// Dependency chains recorded for the test.
    #[serde(default)]
    pub indicative_chains: Vec<IndicativeChain>,
    /// Last update time of the document.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Expiry time of the document.
    #[serde(default)]
    pub expire_at: Option<DateTime<Utc>>,
}

/// Request body for the JSON callgraph upload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCgRequest {
    /// Tenant scope of the upload.
    #[serde(default)]
    pub identifier: Identifier,
    /// Test documents.
    #[serde(default)]
    pub tests: Vec<Test>,
    /// Chain documents.
    #[serde(default)]
    pub chains: Vec<Chain>,
    /// Number of tests recorded per source path.
    #[serde(default)]
    pub path_to_test_num_map: HashMap<String, i32>,
    /// Total number of tests in the upload.
    #[serde(default)]
    pub total_tests: i32,
    /// Paths of tests that failed in this run.
    #[serde(default)]
    pub failed_tests: Vec<String>,
}
