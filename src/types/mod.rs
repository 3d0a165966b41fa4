//! Data-transfer types exchanged with the Test Intelligence service.
//!
//! These are plain serializable records: the client passes them through
//! unchanged and attaches no behavior beyond serde derives and a few
//! string-conversion helpers.

pub mod callgraph;
pub mod savings;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Execution status of a single test case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The test ran and passed.
    #[default]
    Passed,
    /// The test was skipped.
    Skipped,
    /// The test ran and failed an assertion.
    Failed,
    /// The test errored before producing a result.
    Error,
}

/// Outcome details of a test case.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// Final status of the test.
    #[serde(default)]
    pub status: Status,
    /// Failure or error message, if any.
    #[serde(default)]
    pub message: String,
    /// Failure or error type reported by the runner.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Longer description, typically a stack trace.
    #[serde(default)]
    pub desc: String,
}

/// A single executed test case, as reported to the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test method or case name.
    #[serde(default)]
    pub name: String,
    /// Fully qualified class the test belongs to.
    #[serde(default)]
    pub class_name: String,
    /// Suite the test was reported under.
    #[serde(default)]
    pub suite_name: String,
    /// Source file the test lives in, when known.
    #[serde(default)]
    pub file_name: String,
    /// Outcome of the run.
    #[serde(default)]
    pub result: TestCaseResult,
    /// Wall-clock duration of the test in milliseconds.
    #[serde(default)]
    pub duration_ms: i64,
    /// Captured standard output.
    #[serde(default)]
    pub stdout: String,
    /// Captured standard error.
    #[serde(default)]
    pub stderr: String,
}

/// Change status of a file in the diff under test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// The file was modified.
    #[default]
    Modified,
    /// The file was added.
    Added,
    /// The file was deleted.
    Deleted,
}

/// Converts a raw status string to a [`FileStatus`].
///
/// Anything that is not exactly `"added"` or `"deleted"` maps to
/// [`FileStatus::Modified`].
#[must_use]
pub fn convert_to_file_status(status: &str) -> FileStatus {
    match status {
        "added" => FileStatus::Added,
        "deleted" => FileStatus::Deleted,
        _ => FileStatus::Modified,
    }
}

/// A changed file in the diff under test.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Repository-relative path of the file.
    #[serde(default)]
    pub name: String,
    /// Change status of the file.
    #[serde(default)]
    pub status: FileStatus,
}

/// Request body for test selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectTestsReq {
    /// When `true`, asks the service to select every known test.
    #[serde(default)]
    pub select_all: bool,
    /// Files changed between the source and target revisions.
    #[serde(default)]
    pub files: Vec<File>,
}

/// Request body for ML-based test selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MLSelectTestsRequest {
    /// Files changed between the source and target revisions.
    #[serde(default)]
    pub files: Vec<File>,
}

/// Why a test was selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    /// Selected because source code it depends on changed.
    SourceCode,
    /// Selected because the test itself is new.
    NewTest,
    /// Selected because the test itself changed.
    UpdatedTest,
    /// Selected because the test was recently flaky.
    FlakyTest,
    /// Selection reason not recognized by this client version.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A test the service selected for execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnableTest {
    /// Package the test belongs to.
    #[serde(default)]
    pub pkg: String,
    /// Class the test belongs to.
    #[serde(default)]
    pub class: String,
    /// Test method, when the selection is method-granular.
    #[serde(default)]
    pub method: String,
    /// Why this test was selected.
    #[serde(default)]
    pub selection: SelectionType,
}

/// Response body for test selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectTestsResp {
    /// Total number of tests known to the service.
    #[serde(default)]
    pub total_tests: i32,
    /// Number of tests selected for this run.
    #[serde(default)]
    pub selected_tests: i32,
    /// Number of selected tests that are new.
    #[serde(default)]
    pub new_tests: i32,
    /// Number of selected tests whose source changed.
    #[serde(default)]
    pub updated_tests: i32,
    /// Number of tests selected through source-code dependencies.
    #[serde(default)]
    pub src_code_tests: i32,
    /// Whether the service fell back to running everything.
    #[serde(default)]
    pub select_all: bool,
    /// The selected tests.
    #[serde(default)]
    pub tests: Vec<RunnableTest>,
}

/// A location an agent artifact can be downloaded from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Absolute download URL.
    #[serde(default)]
    pub url: String,
    /// Path, relative to the install directory, the artifact should be
    /// written to.
    #[serde(default)]
    pub relpath: String,
}

/// Request body for test timing data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTestTimesReq {
    /// Include the per-file timing map in the response.
    #[serde(default)]
    pub include_filename: bool,
    /// Include the per-suite timing map in the response.
    #[serde(default)]
    pub include_test_suite: bool,
    /// Include the per-test timing map in the response.
    #[serde(default)]
    pub include_test_case: bool,
    /// Include the per-class timing map in the response.
    #[serde(default)]
    pub include_class_name: bool,
}

/// Response body for test timing data. Maps are keyed by the requested
/// dimension; values are cumulative durations in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTestTimesResp {
    /// Timing keyed by source file.
    #[serde(default)]
    pub file_time_map: HashMap<String, i64>,
    /// Timing keyed by suite name.
    #[serde(default)]
    pub suite_time_map: HashMap<String, i64>,
    /// Timing keyed by class name.
    #[serde(default)]
    pub class_time_map: HashMap<String, i64>,
    /// Timing keyed by individual test.
    #[serde(default)]
    pub test_time_map: HashMap<String, i64>,
}

/// Response body for commit lookup: the most recent commit of a branch
/// for which the service holds a callgraph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfoResp {
    /// Sha of the last commit with a recorded callgraph, or empty if the
    /// branch has none.
    #[serde(default)]
    pub last_successful_commit_id: String,
}

/// Scope selector shared by report queries. Empty fields are filled from
/// the client configuration before the request is sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Organization identifier override.
    #[serde(default)]
    pub org_id: String,
    /// Project identifier override.
    #[serde(default)]
    pub project_id: String,
    /// Pipeline identifier override.
    #[serde(default)]
    pub pipeline_id: String,
    /// Build identifier override.
    #[serde(default)]
    pub build_id: String,
    /// Stage identifier override.
    #[serde(default)]
    pub stage_id: String,
    /// Step identifier override.
    #[serde(default)]
    pub step_id: String,
    /// Report format; defaults to `"junit"` when empty.
    #[serde(default)]
    pub report_type: String,
    /// When `true`, drops the stage/step scope to query the whole build.
    #[serde(default)]
    pub all_stages: bool,
}

/// Response body for the execution summary of a build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Total number of reported tests.
    #[serde(default)]
    pub total_tests: i32,
    /// Number of failed tests.
    #[serde(default)]
    pub failed_tests: i32,
    /// Number of passed tests.
    #[serde(default)]
    pub successful_tests: i32,
    /// Number of skipped tests.
    #[serde(default)]
    pub skipped_tests: i32,
    /// Cumulative duration of the reported tests in milliseconds.
    #[serde(default)]
    pub duration_ms: i64,
}

/// Request parameters for paging through executed test cases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCasesRequest {
    /// Scope selector; empty fields are filled from the client.
    #[serde(default)]
    pub basic_info: SummaryRequest,
    /// Substring filter on test case names.
    #[serde(default)]
    pub test_case_search_term: String,
    /// Column to sort by.
    #[serde(default)]
    pub sort: String,
    /// Sort order, `"ASC"` or `"DESC"`.
    #[serde(default)]
    pub order: String,
    /// Zero-based page index.
    #[serde(default)]
    pub page_index: String,
    /// Page size.
    #[serde(default)]
    pub page_size: String,
    /// Filter on a single suite name.
    #[serde(default)]
    pub suite_name: String,
}

/// Paging metadata attached to test case listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Total number of pages available.
    #[serde(default)]
    pub total_pages: i32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_items: i32,
    /// Number of items on this page.
    #[serde(default)]
    pub page_item_count: i32,
    /// Requested page size.
    #[serde(default)]
    pub page_size: i32,
}

/// One page of executed test cases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCases {
    /// Paging metadata.
    #[serde(default)]
    pub metadata: ResponseMetadata,
    /// The test cases on this page.
    #[serde(default)]
    pub content: Vec<TestCase>,
}
