//! Time-savings reporting types.

use serde::{Deserialize, Serialize};

/// The intelligence feature a savings entry is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsFeature {
    /// Build cache savings.
    #[serde(rename = "build_cache")]
    BuildCache,
    /// Test Intelligence savings.
    #[serde(rename = "test_intelligence")]
    Ti,
    /// Docker layer caching savings.
    #[serde(rename = "docker_layer_caching")]
    Dlc,
}

impl SavingsFeature {
    /// Returns the wire name of the feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildCache => "build_cache",
            Self::Ti => "test_intelligence",
            Self::Dlc => "docker_layer_caching",
        }
    }
}

/// How the feature executed for the step being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntelligenceExecutionState {
    /// The feature was on but everything ran.
    #[serde(rename = "FULL_RUN")]
    FullRun,
    /// The feature skipped work.
    #[serde(rename = "OPTIMIZED")]
    Optimized,
    /// The feature was off.
    #[serde(rename = "DISABLED")]
    Disabled,
}

impl IntelligenceExecutionState {
    /// Returns the wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullRun => "FULL_RUN",
            Self::Optimized => "OPTIMIZED",
            Self::Disabled => "DISABLED",
        }
    }
}

/// A single build task observed in a Gradle/Maven profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradleTask {
    /// Task name.
    #[serde(default)]
    pub name: String,
    /// Task duration in milliseconds.
    #[serde(default)]
    pub time_ms: i64,
    /// Terminal state of the task, e.g. `EXECUTED` or `FROM-CACHE`.
    #[serde(default)]
    pub state: String,
}

/// A build goal with its tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradleGoal {
    /// Goal name.
    #[serde(default)]
    pub name: String,
    /// Goal duration in milliseconds.
    #[serde(default)]
    pub time_ms: i64,
    /// Tasks run for this goal.
    #[serde(default)]
    pub tasks: Vec<GradleTask>,
}

/// One profiled build invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradleProfile {
    /// Goals run by the invocation.
    #[serde(default)]
    pub goals: Vec<GradleGoal>,
    /// The command line that was run.
    #[serde(default, rename = "command")]
    pub cmd: String,
    /// Total build duration in milliseconds.
    #[serde(default)]
    pub build_time_ms: i64,
    /// Portion spent executing tasks, in milliseconds.
    #[serde(default)]
    pub task_execution_time_ms: i64,
}

/// Build-tool metrics attached to a savings report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradleMetrics {
    /// Profiles collected during the step.
    #[serde(default)]
    pub profiles: Vec<GradleProfile>,
}

/// Docker-layer-caching metrics attached to a savings report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlcMetrics {
    /// Total number of image layers built.
    #[serde(default)]
    pub total_layers: i64,
    /// Number of layers served from cache.
    #[serde(default)]
    pub cached_layers: i64,
}

/// Request body for a savings report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsRequest {
    /// Build-tool metrics, when the feature is build cache.
    #[serde(default)]
    pub gradle_metrics: GradleMetrics,
    /// Layer-cache metrics, when the feature is docker layer caching.
    #[serde(default)]
    pub dlc_metrics: DlcMetrics,
}

/// Savings recorded for one feature of one step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsOverview {
    /// Feature the savings are attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<SavingsFeature>,
    /// Observed step duration in milliseconds.
    #[serde(default)]
    pub time_taken_ms: i64,
    /// Estimated time saved in milliseconds.
    #[serde(default)]
    pub time_saved_ms: i64,
    /// Baseline duration the estimate is measured against.
    #[serde(default)]
    pub baseline_ms: i64,
    /// How the feature executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_state: Option<IntelligenceExecutionState>,
}

/// Response body for a savings query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsResponse {
    /// Per-feature savings entries.
    #[serde(default)]
    pub overview: Vec<SavingsOverview>,
    /// Layer-cache metrics for the build.
    #[serde(default)]
    pub dlc_metrics: DlcMetrics,
}
