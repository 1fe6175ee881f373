//! Domain entities for testboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::family::SheetFamily;
use crate::status::StatusBucket;

/// Module key used when a row has no feature or story name.
pub const DEFAULT_MODULE_KEY: &str = "Other";

/// Status label used when a row carries no status text.
pub const NOT_STARTED_LABEL: &str = "Not Started";

/// A mapping of priority labels to the number of rows carrying them.
pub type PriorityCounts = BTreeMap<String, u64>;

/// A mapping of module keys to their aggregates.
pub type ModuleMap = BTreeMap<String, ModuleAggregate>;

/// `round(100 * numerator / denominator)` with halves rounded up; zero when
/// the denominator is zero.
pub fn rounded_percent(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let scaled = (200 * numerator as u128 + denominator as u128) / (2 * denominator as u128);
    scaled.min(u32::MAX as u128) as u32
}

/// One named test case within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseEntry {
    /// Test case name as written in the sheet.
    pub name: String,
    /// Manual test cases on the row.
    pub manual: u64,
    /// Automated test cases on the row.
    pub automated: u64,
    /// Raw status text, or "Not Started".
    pub status: String,
}

/// Rolled-up counts for one feature or story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAggregate {
    /// Manual plus automated test cases.
    pub total_test_cases: u64,
    /// Manual test cases.
    pub manual_count: u64,
    /// Automated test cases.
    pub automated_count: u64,
    /// Number of sheet rows folded into this module.
    pub row_count: u64,
    /// Named test cases in sheet order. Duplicates are kept.
    pub test_case_entries: Vec<TestCaseEntry>,
}

impl ModuleAggregate {
    /// Add counts from a single row.
    pub fn add_counts(&mut self, manual: u64, automated: u64) {
        self.manual_count = self.manual_count.saturating_add(manual);
        self.automated_count = self.automated_count.saturating_add(automated);
        self.total_test_cases = self
            .total_test_cases
            .saturating_add(manual.saturating_add(automated));
        self.row_count = self.row_count.saturating_add(1);
    }

    /// Fold another aggregate for the same key into this one.
    pub fn absorb(&mut self, other: &ModuleAggregate) {
        self.manual_count = self.manual_count.saturating_add(other.manual_count);
        self.automated_count = self.automated_count.saturating_add(other.automated_count);
        self.total_test_cases = self.total_test_cases.saturating_add(other.total_test_cases);
        self.row_count = self.row_count.saturating_add(other.row_count);
        self.test_case_entries
            .extend(other.test_case_entries.iter().cloned());
    }
}

/// Counts per status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub struct StatusBreakdown {
    /// Rows whose status reads as done.
    pub done: u64,
    /// Rows in progress.
    pub in_progress: u64,
    /// Rows not started, including rows without status.
    pub yet_to_start: u64,
    /// Failed rows and unrecognized statuses.
    pub other: u64,
}

impl StatusBreakdown {
    /// Increment the count for `bucket`.
    pub fn record(&mut self, bucket: StatusBucket) {
        let slot = self.slot_mut(bucket);
        *slot = slot.saturating_add(1);
    }

    /// Count for `bucket`.
    pub fn get(&self, bucket: StatusBucket) -> u64 {
        match bucket {
            StatusBucket::Done => self.done,
            StatusBucket::InProgress => self.in_progress,
            StatusBucket::YetToStart => self.yet_to_start,
            StatusBucket::Other => self.other,
        }
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u64 {
        self.done
            .saturating_add(self.in_progress)
            .saturating_add(self.yet_to_start)
            .saturating_add(self.other)
    }

    /// Element-wise sum.
    pub fn merged(&self, other: &StatusBreakdown) -> StatusBreakdown {
        StatusBreakdown {
            done: self.done.saturating_add(other.done),
            in_progress: self.in_progress.saturating_add(other.in_progress),
            yet_to_start: self.yet_to_start.saturating_add(other.yet_to_start),
            other: self.other.saturating_add(other.other),
        }
    }

    fn slot_mut(&mut self, bucket: StatusBucket) -> &mut u64 {
        match bucket {
            StatusBucket::Done => &mut self.done,
            StatusBucket::InProgress => &mut self.in_progress,
            StatusBucket::YetToStart => &mut self.yet_to_start,
            StatusBucket::Other => &mut self.other,
        }
    }
}

/// A row surfaced in the "recent tests" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTest {
    /// Test case name, or a label derived from the module.
    pub name: String,
    /// Raw status text, or "Not Started".
    pub status: String,
    /// Module key the row was grouped under.
    pub module: String,
    /// Manual test cases on the row.
    pub manual: u64,
    /// Automated test cases on the row.
    pub automated: u64,
    /// Priority label, or "N/A".
    pub priority: String,
}

/// First row seen for a smoke-test feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDetail {
    /// Feature name.
    pub name: String,
    /// First test case of the feature, or "N/A".
    pub test_case: String,
    /// Manual test cases on that row.
    pub manual: u64,
    /// Automated test cases on that row.
    pub automated: u64,
    /// Manual plus automated.
    pub total: u64,
    /// Raw status text, or "Not Started".
    pub status: String,
    /// Comments cell.
    pub comments: String,
}

/// Complete aggregate for one ingested sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    /// Sheet family the metrics were computed for.
    pub family: SheetFamily,
    /// Rows that carried measurable data.
    pub total: u64,
    /// Rows counted as passed.
    pub passed: u64,
    /// Rows counted as failed.
    pub failed: u64,
    /// Rows counted as skipped.
    pub skipped: u64,
    /// `passed / total` as a rounded percentage.
    pub pass_rate: u32,
    /// Sum of manual test cases.
    pub total_manual: u64,
    /// Sum of automated test cases.
    pub total_automated: u64,
    /// Sum of manual plus automated test cases.
    pub total_test_cases: u64,
    /// Rows per status bucket.
    pub status_breakdown: StatusBreakdown,
    /// Aggregates per feature or story.
    #[schema(value_type = BTreeMap<String, ModuleAggregate>)]
    pub modules_by_key: ModuleMap,
    /// Rows per priority label.
    #[schema(value_type = BTreeMap<String, u64>)]
    pub tests_by_priority: PriorityCounts,
    /// The first rows of the sheet, for quick inspection.
    pub recent_tests: Vec<RecentTest>,
    /// First row per feature (smoke sheets only).
    pub feature_details: Vec<FeatureDetail>,
}

impl ReportMetrics {
    /// Zeroed metrics for `family`.
    pub fn empty(family: SheetFamily) -> Self {
        Self {
            family,
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            pass_rate: 0,
            total_manual: 0,
            total_automated: 0,
            total_test_cases: 0,
            status_breakdown: StatusBreakdown::default(),
            modules_by_key: ModuleMap::new(),
            tests_by_priority: PriorityCounts::new(),
            recent_tests: Vec::new(),
            feature_details: Vec::new(),
        }
    }
}

/// Dashboard-level merge of the smoke and regression metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    /// Rows across both sheets.
    pub total: u64,
    /// Passed rows across both sheets.
    pub passed: u64,
    /// Failed rows across both sheets.
    pub failed: u64,
    /// Skipped rows across both sheets.
    pub skipped: u64,
    /// Manual test cases across both sheets.
    pub total_manual: u64,
    /// Automated test cases across both sheets.
    pub total_automated: u64,
    /// Test cases across both sheets.
    pub total_test_cases: u64,
    /// Combined pass rate.
    pub pass_rate: u32,
    /// Automated share of all test cases.
    pub automation_rate: u32,
    /// Summed status buckets.
    pub status_breakdown: StatusBreakdown,
    /// Summed priority counts.
    #[schema(value_type = BTreeMap<String, u64>)]
    pub tests_by_priority: PriorityCounts,
}

/// Everything the reporting surface renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Smoke sheet metrics.
    pub smoke_tests: ReportMetrics,
    /// Regression sheet metrics.
    pub regression_tests: ReportMetrics,
    /// Combined summary.
    pub overall: OverallSummary,
}

#[cfg(test)]
mod tests {
    use super::{ModuleAggregate, ReportMetrics, StatusBreakdown, TestCaseEntry, rounded_percent};
    use crate::family::SheetFamily;
    use crate::status::StatusBucket;

    #[test]
    fn rounded_percent_rounds_half_up_and_guards_zero() {
        assert_eq!(rounded_percent(20, 30), 67);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(5, 5), 100);
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(7, 0), 0);
    }

    #[test]
    fn module_counts_stay_consistent() {
        let mut module = ModuleAggregate::default();
        module.add_counts(2, 1);
        module.add_counts(0, 4);

        assert_eq!(module.total_test_cases, 7);
        assert_eq!(
            module.total_test_cases,
            module.manual_count + module.automated_count
        );
        assert_eq!(module.row_count, 2);
    }

    #[test]
    fn module_counts_saturate_instead_of_wrapping() {
        let mut module = ModuleAggregate::default();
        module.add_counts(u64::MAX, 1);
        let copy = module.clone();
        module.absorb(&copy);

        assert_eq!(module.manual_count, u64::MAX);
        assert_eq!(module.total_test_cases, u64::MAX);
        assert_eq!(module.automated_count, 2);
    }

    #[test]
    fn absorb_sums_and_appends_entries() {
        let entry = |name: &str| TestCaseEntry {
            name: name.to_string(),
            manual: 1,
            automated: 0,
            status: "done".to_string(),
        };
        let mut left = ModuleAggregate::default();
        left.add_counts(1, 0);
        left.test_case_entries.push(entry("a"));
        let mut right = ModuleAggregate::default();
        right.add_counts(1, 0);
        right.test_case_entries.push(entry("a"));

        left.absorb(&right);

        assert_eq!(left.total_test_cases, 2);
        assert_eq!(left.row_count, 2);
        assert_eq!(left.test_case_entries.len(), 2);
    }

    #[test]
    fn breakdown_records_and_merges_buckets() {
        let mut breakdown = StatusBreakdown::default();
        breakdown.record(StatusBucket::Done);
        breakdown.record(StatusBucket::YetToStart);
        breakdown.record(StatusBucket::YetToStart);

        let merged = breakdown.merged(&breakdown);

        assert_eq!(breakdown.get(StatusBucket::YetToStart), 2);
        assert_eq!(merged.total(), 6);
        assert_eq!(merged.get(StatusBucket::Done), 2);
    }

    #[test]
    fn metrics_serialize_with_camel_case_fields() {
        let value = serde_json::to_value(ReportMetrics::empty(SheetFamily::Smoke)).expect("json");

        assert_eq!(value["family"], "smoke");
        assert_eq!(value["passRate"], 0);
        assert_eq!(value["totalTestCases"], 0);
        assert!(value["modulesByKey"].as_object().expect("map").is_empty());
        assert_eq!(value["statusBreakdown"]["yet-to-start"], 0);
        assert_eq!(value["statusBreakdown"]["in-progress"], 0);
    }
}
