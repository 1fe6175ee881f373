//! Merging the two per-sheet aggregates into a dashboard summary.

use crate::domain::{ModuleMap, OverallSummary, PriorityCounts, ReportMetrics, rounded_percent};

/// Combine smoke and regression metrics into one summary.
pub fn combine(smoke: &ReportMetrics, regression: &ReportMetrics) -> OverallSummary {
    let total = smoke.total.saturating_add(regression.total);
    let passed = smoke.passed.saturating_add(regression.passed);
    let total_automated = smoke
        .total_automated
        .saturating_add(regression.total_automated);
    let total_test_cases = smoke
        .total_test_cases
        .saturating_add(regression.total_test_cases);

    OverallSummary {
        total,
        passed,
        failed: smoke.failed.saturating_add(regression.failed),
        skipped: smoke.skipped.saturating_add(regression.skipped),
        total_manual: smoke.total_manual.saturating_add(regression.total_manual),
        total_automated,
        total_test_cases,
        pass_rate: rounded_percent(passed, total),
        automation_rate: rounded_percent(total_automated, total_test_cases.max(1)),
        status_breakdown: smoke.status_breakdown.merged(&regression.status_breakdown),
        tests_by_priority: merge_priorities(&smoke.tests_by_priority, &regression.tests_by_priority),
    }
}

/// Merge two module maps by key. Entries from `left` come first.
pub fn merge_modules(left: &ModuleMap, right: &ModuleMap) -> ModuleMap {
    let mut merged = left.clone();
    for (key, module) in right {
        merged.entry(key.clone()).or_default().absorb(module);
    }
    merged
}

/// Sum two priority tallies.
pub fn merge_priorities(left: &PriorityCounts, right: &PriorityCounts) -> PriorityCounts {
    let mut merged = left.clone();
    for (priority, count) in right {
        let slot = merged.entry(priority.clone()).or_insert(0);
        *slot = slot.saturating_add(*count);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{combine, merge_modules, merge_priorities};
    use crate::domain::{ModuleAggregate, ModuleMap, PriorityCounts, ReportMetrics, TestCaseEntry};
    use crate::family::SheetFamily;

    fn metrics(family: SheetFamily, automated: u64, test_cases: u64) -> ReportMetrics {
        let mut metrics = ReportMetrics::empty(family);
        metrics.total_automated = automated;
        metrics.total_manual = test_cases - automated;
        metrics.total_test_cases = test_cases;
        metrics
    }

    #[test]
    fn automation_rate_uses_combined_totals() {
        let smoke = metrics(SheetFamily::Smoke, 5, 10);
        let regression = metrics(SheetFamily::Regression, 15, 20);

        let overall = combine(&smoke, &regression);

        assert_eq!(overall.total_automated, 20);
        assert_eq!(overall.total_test_cases, 30);
        assert_eq!(overall.automation_rate, 67);
    }

    #[test]
    fn pass_rate_rounds_combined_counts() {
        let mut smoke = ReportMetrics::empty(SheetFamily::Smoke);
        smoke.total = 10;
        smoke.passed = 5;
        let mut regression = ReportMetrics::empty(SheetFamily::Regression);
        regression.total = 20;
        regression.passed = 15;

        let overall = combine(&smoke, &regression);

        assert_eq!(overall.total, 30);
        assert_eq!(overall.passed, 20);
        assert_eq!(overall.pass_rate, 67);
    }

    #[test]
    fn empty_inputs_combine_to_zero() {
        let overall = combine(
            &ReportMetrics::empty(SheetFamily::Smoke),
            &ReportMetrics::empty(SheetFamily::Regression),
        );

        assert_eq!(overall.total, 0);
        assert_eq!(overall.pass_rate, 0);
        assert_eq!(overall.automation_rate, 0);
    }

    #[test]
    fn pass_rate_and_counters_are_summed() {
        let mut smoke = ReportMetrics::empty(SheetFamily::Smoke);
        smoke.total = 4;
        smoke.passed = 3;
        smoke.failed = 1;
        let mut regression = ReportMetrics::empty(SheetFamily::Regression);
        regression.total = 4;
        regression.passed = 1;
        regression.skipped = 3;

        let overall = combine(&smoke, &regression);

        assert_eq!(overall.total, 8);
        assert_eq!(overall.pass_rate, 50);
        assert_eq!((overall.failed, overall.skipped), (1, 3));
    }

    #[test]
    fn merge_modules_sums_shared_keys_and_keeps_the_rest() {
        let entry = |name: &str| TestCaseEntry {
            name: name.to_string(),
            manual: 1,
            automated: 0,
            status: "Done".to_string(),
        };
        let mut shared_left = ModuleAggregate::default();
        shared_left.add_counts(1, 0);
        shared_left.test_case_entries.push(entry("left"));
        let mut shared_right = ModuleAggregate::default();
        shared_right.add_counts(2, 3);
        shared_right.test_case_entries.push(entry("right"));
        let mut only_right = ModuleAggregate::default();
        only_right.add_counts(0, 1);

        let left = ModuleMap::from([("Login".to_string(), shared_left)]);
        let right = ModuleMap::from([
            ("Login".to_string(), shared_right),
            ("Cart".to_string(), only_right.clone()),
        ]);

        let merged = merge_modules(&left, &right);

        let login = &merged["Login"];
        assert_eq!(login.total_test_cases, 6);
        assert_eq!(login.row_count, 2);
        let names: Vec<_> = login.test_case_entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["left", "right"]);
        assert_eq!(merged["Cart"], only_right);
    }

    #[test]
    fn merge_priorities_adds_counts() {
        let left = PriorityCounts::from([("P1".to_string(), 2)]);
        let right = PriorityCounts::from([("P1".to_string(), 1), ("P3".to_string(), 4)]);

        let merged = merge_priorities(&left, &right);

        assert_eq!(merged["P1"], 3);
        assert_eq!(merged["P3"], 4);
    }
}
