//! Report formatting utilities for testboard outputs.

use std::fmt::Write;

use serde::Serialize;

use crate::domain::{Dashboard, PriorityCounts, ReportMetrics, StatusBreakdown};
use crate::modules::{ModuleProgress, progress_table};

/// Number of module rows shown in the dashboard report.
pub const TOP_MODULES: usize = 15;

/// Render the whole dashboard as Markdown.
pub fn render_dashboard_markdown(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    let overall = &dashboard.overall;
    let _ = writeln!(output, "# Testboard Dashboard\n");
    let _ = writeln!(output, "## Overall\n");
    let _ = writeln!(output, "- Rows: {}", overall.total);
    let _ = writeln!(
        output,
        "- Passed / failed / skipped: {} / {} / {}",
        overall.passed, overall.failed, overall.skipped
    );
    let _ = writeln!(output, "- Pass rate: {}%", overall.pass_rate);
    let _ = writeln!(
        output,
        "- Test cases: {} ({} manual, {} automated)",
        overall.total_test_cases, overall.total_manual, overall.total_automated
    );
    let _ = writeln!(output, "- Automation rate: {}%\n", overall.automation_rate);
    append_breakdown(&mut output, &overall.status_breakdown);
    append_priorities(&mut output, &overall.tests_by_priority);

    for metrics in [&dashboard.smoke_tests, &dashboard.regression_tests] {
        append_metrics(&mut output, metrics, "##");
    }

    let modules = progress_table(dashboard);
    let shown = modules.len().min(TOP_MODULES);
    let _ = writeln!(output, "## Top modules\n");
    append_module_table(&mut output, &modules[..shown]);
    output
}

/// Render a single sheet's metrics as Markdown.
pub fn render_metrics_markdown(metrics: &ReportMetrics) -> String {
    let mut output = String::new();
    append_metrics(&mut output, metrics, "#");
    output
}

/// Render module progress rows as a Markdown table.
pub fn render_modules_markdown(modules: &[ModuleProgress]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Module Progress\n");
    append_module_table(&mut output, modules);
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Priority counts, most frequent first and then by label.
pub fn format_priorities(priorities: &PriorityCounts) -> Vec<(String, u64)> {
    let mut items: Vec<(String, u64)> = priorities
        .iter()
        .map(|(label, count)| (label.clone(), *count))
        .collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

fn family_title(metrics: &ReportMetrics) -> &'static str {
    metrics.family.profile().test_type
}

fn append_metrics(output: &mut String, metrics: &ReportMetrics, heading: &str) {
    let _ = writeln!(output, "{heading} {}s\n", family_title(metrics));
    let _ = writeln!(
        output,
        "- Rows: {} (passed {}, failed {}, skipped {})",
        metrics.total, metrics.passed, metrics.failed, metrics.skipped
    );
    let _ = writeln!(output, "- Pass rate: {}%", metrics.pass_rate);
    let _ = writeln!(
        output,
        "- Test cases: {} ({} manual, {} automated)\n",
        metrics.total_test_cases, metrics.total_manual, metrics.total_automated
    );

    if metrics.modules_by_key.is_empty() {
        let _ = writeln!(output, "No modules found.\n");
    } else {
        let _ = writeln!(output, "| Module | Rows | Manual | Automated | Total |");
        let _ = writeln!(output, "|---|---:|---:|---:|---:|");
        for (name, module) in &metrics.modules_by_key {
            let _ = writeln!(
                output,
                "| {name} | {} | {} | {} | {} |",
                module.row_count,
                module.manual_count,
                module.automated_count,
                module.total_test_cases
            );
        }
        let _ = writeln!(output);
    }

    if !metrics.recent_tests.is_empty() {
        let _ = writeln!(output, "Recent tests:");
        for test in &metrics.recent_tests {
            let _ = writeln!(
                output,
                "- {} [{}] ({}, priority {})",
                test.name, test.status, test.module, test.priority
            );
        }
        let _ = writeln!(output);
    }
}

fn append_breakdown(output: &mut String, breakdown: &StatusBreakdown) {
    let _ = writeln!(output, "### Status\n");
    let _ = writeln!(output, "- Done: {}", breakdown.done);
    let _ = writeln!(output, "- In progress: {}", breakdown.in_progress);
    let _ = writeln!(output, "- Yet to start: {}", breakdown.yet_to_start);
    let _ = writeln!(output, "- Other: {}\n", breakdown.other);
}

fn append_priorities(output: &mut String, priorities: &PriorityCounts) {
    if priorities.is_empty() {
        let _ = writeln!(output, "### Priorities\nNo priorities recorded.\n");
        return;
    }
    let _ = writeln!(output, "### Priorities");
    for (label, count) in format_priorities(priorities) {
        let _ = writeln!(output, "- {label}: {count}");
    }
    let _ = writeln!(output);
}

fn append_module_table(output: &mut String, modules: &[ModuleProgress]) {
    if modules.is_empty() {
        let _ = writeln!(output, "No modules found.\n");
        return;
    }
    let _ = writeln!(
        output,
        "| Type | Module | Total | Manual | Automated | Overall % | Effective % | Status |"
    );
    let _ = writeln!(output, "|---|---|---:|---:|---:|---:|---:|---|");
    for module in modules {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {}% | {}% | {} |",
            module.test_type,
            module.name,
            module.total_tcs,
            module.manual,
            module.automated,
            module.overall_percent,
            module.effective_percent,
            module.status_text
        );
    }
    let _ = writeln!(output);
}
