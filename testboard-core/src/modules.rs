//! Per-module automation progress table with optional filtering.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DEFAULT_MODULE_KEY, Dashboard, ModuleAggregate, ReportMetrics, rounded_percent};

/// Progress tier derived from the effective automation percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressTier {
    /// 100% and above.
    Complete,
    /// 90% and above.
    NearComplete,
    /// 80% and above.
    Excellent,
    /// 60% and above.
    Good,
    /// 40% and above.
    InProgress,
    /// Below 40%.
    GettingStarted,
}

impl ProgressTier {
    /// Tier for an effective percentage.
    pub fn for_percent(percent: u32) -> Self {
        match percent {
            100.. => ProgressTier::Complete,
            90..=99 => ProgressTier::NearComplete,
            80..=89 => ProgressTier::Excellent,
            60..=79 => ProgressTier::Good,
            40..=59 => ProgressTier::InProgress,
            _ => ProgressTier::GettingStarted,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ProgressTier::Complete => "Complete",
            ProgressTier::NearComplete => "Near Complete",
            ProgressTier::Excellent => "Excellent Progress",
            ProgressTier::Good => "Good Progress",
            ProgressTier::InProgress => "In Progress",
            ProgressTier::GettingStarted => "Getting Started",
        }
    }
}

/// One row of the module progress table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    /// "Smoke Test" or "Regression Test".
    pub test_type: String,
    /// Module key.
    pub name: String,
    /// Total test cases.
    #[serde(rename = "totalTCs")]
    pub total_tcs: u64,
    /// Manual test cases.
    pub manual: u64,
    /// Automated test cases.
    pub automated: u64,
    /// Test cases that can be automated.
    pub automatable: u64,
    /// Automated share of all test cases.
    pub overall_percent: u32,
    /// Automated share of automatable test cases.
    pub effective_percent: u32,
    /// Tier label.
    pub status_text: String,
    /// Tier identifier.
    pub status_class: ProgressTier,
}

impl ModuleProgress {
    fn from_aggregate(test_type: &str, name: &str, module: &ModuleAggregate) -> Self {
        let total_tcs = module.total_test_cases;
        let automated = module.automated_count;
        let manual = module.manual_count;
        let automatable = if total_tcs > 0 {
            total_tcs
        } else {
            manual.saturating_add(automated)
        };
        let overall_percent = rounded_percent(automated, total_tcs);
        let effective_percent = if automatable > 0 {
            rounded_percent(automated, automatable)
        } else {
            overall_percent
        };
        let tier = ProgressTier::for_percent(effective_percent);

        Self {
            test_type: test_type.to_string(),
            name: name.to_string(),
            total_tcs,
            manual,
            automated,
            automatable,
            overall_percent,
            effective_percent,
            status_text: tier.label().to_string(),
            status_class: tier,
        }
    }
}

/// Progress rows for one sheet, skipping blank and catch-all modules.
pub fn module_rows(metrics: &ReportMetrics) -> Vec<ModuleProgress> {
    let test_type = metrics.family.profile().test_type;
    metrics
        .modules_by_key
        .iter()
        .filter(|(name, _)| {
            !name.trim().is_empty() && !name.eq_ignore_ascii_case(DEFAULT_MODULE_KEY)
        })
        .map(|(name, module)| ModuleProgress::from_aggregate(test_type, name, module))
        .collect()
}

/// Progress rows for both sheets, highest effective percentage first.
pub fn progress_table(dashboard: &Dashboard) -> Vec<ModuleProgress> {
    let mut rows = module_rows(&dashboard.smoke_tests);
    rows.extend(module_rows(&dashboard.regression_tests));
    rows.sort_by_key(|row| Reverse(row.effective_percent));
    rows
}

/// Comparison written as `>N`, `<N` or `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFilter {
    /// Strictly greater than.
    Above(u64),
    /// Strictly less than.
    Below(u64),
    /// Equal to.
    Exactly(u64),
    /// The number did not parse; nothing matches.
    Invalid,
}

impl NumericFilter {
    /// Parse a filter expression. Leading digits are read as the number.
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();
        let parsed = if expr.contains('>') {
            leading_number(strip_operator(expr, '>')).map(NumericFilter::Above)
        } else if expr.contains('<') {
            leading_number(strip_operator(expr, '<')).map(NumericFilter::Below)
        } else {
            leading_number(expr).map(NumericFilter::Exactly)
        };
        parsed.unwrap_or(NumericFilter::Invalid)
    }

    /// Whether `value` satisfies the filter.
    pub fn matches(self, value: u64) -> bool {
        match self {
            NumericFilter::Above(limit) => value > limit,
            NumericFilter::Below(limit) => value < limit,
            NumericFilter::Exactly(limit) => value == limit,
            NumericFilter::Invalid => false,
        }
    }
}

fn strip_operator(expr: &str, operator: char) -> &str {
    expr.trim_start_matches(operator).trim()
}

fn leading_number(text: &str) -> Option<u64> {
    let end = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Optional filters over the progress table. Empty fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ModuleFilter {
    /// Substring of the test type.
    pub test_type: Option<String>,
    /// Substring of the module name.
    pub module_name: Option<String>,
    /// Total test cases, e.g. `>10`.
    #[serde(rename = "totalTCs")]
    pub total_tcs: Option<String>,
    /// Manual test cases.
    pub manual: Option<String>,
    /// Automated test cases.
    pub automated: Option<String>,
    /// Overall percentage.
    pub overall_percent: Option<String>,
    /// Effective percentage.
    pub effective_percent: Option<String>,
    /// Substring of the tier label.
    pub status: Option<String>,
}

impl ModuleFilter {
    /// Whether `row` passes every configured filter.
    pub fn matches(&self, row: &ModuleProgress) -> bool {
        substring(&self.test_type, &row.test_type)
            && substring(&self.module_name, &row.name)
            && substring(&self.status, &row.status_text)
            && numeric(&self.total_tcs, row.total_tcs)
            && numeric(&self.manual, row.manual)
            && numeric(&self.automated, row.automated)
            && numeric(&self.overall_percent, u64::from(row.overall_percent))
            && numeric(&self.effective_percent, u64::from(row.effective_percent))
    }

    /// Keep only rows that match.
    pub fn apply(&self, rows: Vec<ModuleProgress>) -> Vec<ModuleProgress> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

fn configured(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn substring(filter: &Option<String>, value: &str) -> bool {
    configured(filter)
        .map(|needle| value.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(true)
}

fn numeric(filter: &Option<String>, value: u64) -> bool {
    configured(filter)
        .map(|expr| NumericFilter::parse(expr).matches(value))
        .unwrap_or(true)
}
