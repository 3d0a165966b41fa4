//! Counters used when reporting telemetry about a test run.

use std::collections::HashSet;

use crate::types::{RunnableTest, TestCase};

/// Counts the distinct class names across executed test cases.
#[must_use]
pub fn count_distinct_classes(test_cases: &[TestCase]) -> usize {
    test_cases
        .iter()
        .map(|test_case| test_case.class_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Counts the distinct classes across selected tests.
#[must_use]
pub fn count_distinct_selected_classes(tests: &[RunnableTest]) -> usize {
    tests
        .iter()
        .map(|test| test.class.as_str())
        .collect::<HashSet<_>>()
        .len()
}
