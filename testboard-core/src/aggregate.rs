//! Folding classified rows into per-sheet metrics.

use crate::classify::ClassifiedRow;
use crate::domain::{
    DEFAULT_MODULE_KEY, FeatureDetail, NOT_STARTED_LABEL, PriorityCounts, RecentTest,
    ReportMetrics, TestCaseEntry, rounded_percent,
};
use crate::family::{Counter, SheetFamily};

/// Running totals for one sheet. Rows must be pushed in sheet order.
#[derive(Debug, Clone)]
pub struct MetricsAccumulator {
    metrics: ReportMetrics,
}

impl MetricsAccumulator {
    /// Start an empty accumulator for `family`.
    pub fn new(family: SheetFamily) -> Self {
        Self {
            metrics: ReportMetrics::empty(family),
        }
    }

    /// Add one classified row.
    pub fn push(&mut self, row: &ClassifiedRow) {
        let family = self.metrics.family;
        let profile = family.profile();
        let metrics = &mut self.metrics;
        let manual = row.manual_count;
        let automated = row.automated_count;
        let status = status_label(&row.raw_status_text);

        metrics.total = metrics.total.saturating_add(1);
        metrics.total_manual = metrics.total_manual.saturating_add(manual);
        metrics.total_automated = metrics.total_automated.saturating_add(automated);
        metrics.total_test_cases = metrics
            .total_test_cases
            .saturating_add(manual.saturating_add(automated));

        let counter = match family.counter_for(row.status_class) {
            Counter::Passed => &mut metrics.passed,
            Counter::Failed => &mut metrics.failed,
            Counter::Skipped => &mut metrics.skipped,
        };
        *counter = counter.saturating_add(1);
        metrics.status_breakdown.record(row.status_bucket);

        let module_key = if row.group_key.is_empty() {
            DEFAULT_MODULE_KEY
        } else {
            row.group_key.as_str()
        };
        let module = metrics
            .modules_by_key
            .entry(module_key.to_string())
            .or_default();
        module.add_counts(manual, automated);
        if !row.test_case_name.is_empty() {
            module.test_case_entries.push(TestCaseEntry {
                name: row.test_case_name.clone(),
                manual,
                automated,
                status: status.clone(),
            });
        }

        if !row.priority.is_empty() {
            tally(&mut metrics.tests_by_priority, &row.priority);
        }

        if profile.track_feature_details
            && !row.group_key.is_empty()
            && !metrics
                .feature_details
                .iter()
                .any(|detail| detail.name == row.group_key)
        {
            metrics.feature_details.push(FeatureDetail {
                name: row.group_key.clone(),
                test_case: non_empty_or(&row.test_case_name, "N/A"),
                manual,
                automated,
                total: manual.saturating_add(automated),
                status: status.clone(),
                comments: row.comments.clone(),
            });
        }

        if metrics.recent_tests.len() < profile.recent_limit {
            metrics.recent_tests.push(RecentTest {
                name: recent_name(family, row),
                status,
                module: module_key.to_string(),
                manual,
                automated,
                priority: non_empty_or(&row.priority, "N/A"),
            });
        }
    }

    /// Count a priority for a row that is otherwise left out.
    pub fn tally_priority(&mut self, priority: &str) {
        if !priority.is_empty() {
            tally(&mut self.metrics.tests_by_priority, priority);
        }
    }

    /// Finish the sheet and compute derived rates.
    pub fn finish(mut self) -> ReportMetrics {
        self.metrics.pass_rate = rounded_percent(self.metrics.passed, self.metrics.total);
        self.metrics
    }
}

/// Fold rows, in order, into the metrics for `family`.
pub fn fold<'a, I>(rows: I, family: SheetFamily) -> ReportMetrics
where
    I: IntoIterator<Item = &'a ClassifiedRow>,
{
    let mut accumulator = MetricsAccumulator::new(family);
    for row in rows {
        accumulator.push(row);
    }
    accumulator.finish()
}

fn tally(priorities: &mut PriorityCounts, priority: &str) {
    let count = priorities.entry(priority.to_string()).or_insert(0);
    *count = count.saturating_add(1);
}

fn status_label(raw: &str) -> String {
    non_empty_or(raw, NOT_STARTED_LABEL)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn recent_name(family: SheetFamily, row: &ClassifiedRow) -> String {
    if !row.test_case_name.is_empty() {
        return row.test_case_name.clone();
    }
    match family {
        SheetFamily::Smoke if !row.group_key.is_empty() => format!("Feature: {}", row.group_key),
        SheetFamily::Regression if !row.group_key.is_empty() => row.group_key.clone(),
        _ => format!("Test {}", row.line + 1),
    }
}
