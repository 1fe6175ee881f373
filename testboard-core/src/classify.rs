//! Per-row interpretation: skip noise, carry the group key forward and
//! classify status text.

use crate::columns::{ColumnRole, HeaderMap};
use crate::family::FamilyProfile;
use crate::keywords::matches_any;
use crate::status::{StatusBucket, StatusClass, classify_status};

/// A data row that carries measurable signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    /// Position of the row among the sheet's data rows.
    pub line: usize,
    /// Feature or story name, possibly inherited from an earlier row.
    pub group_key: String,
    /// Test case name, empty when the sheet has none.
    pub test_case_name: String,
    /// Manual test cases.
    pub manual_count: u64,
    /// Automated test cases.
    pub automated_count: u64,
    /// Fine-grained status.
    pub status_class: StatusClass,
    /// Coarse status bucket.
    pub status_bucket: StatusBucket,
    /// Status cell, or the comments cell when the status cell is empty.
    pub raw_status_text: String,
    /// Priority label, empty when absent.
    pub priority: String,
    /// Comments cell, empty when absent.
    pub comments: String,
}

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Every cell is blank.
    Blank,
    /// The row repeats a header or sheet title.
    Banner,
    /// No test case name and no counts.
    NoSignal,
}

/// Keep-or-skip decision for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDecision {
    /// The row contributes to the metrics.
    Keep(ClassifiedRow),
    /// The row is ignored.
    Skip(SkipReason),
    /// A story row without counts. Only its priority is tallied.
    PriorityOnly(String),
}

/// Result of classifying one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    /// Group key to carry into the next row.
    pub group_key: String,
    /// What happened to this row.
    pub decision: RowDecision,
}

/// Classify one data row.
///
/// `carried_key` is the group key in effect before this row; the outcome
/// returns the key in effect after it. Banner and blank rows leave the key
/// untouched, while a row without counts can still introduce a new key.
pub fn classify(
    line: usize,
    row: &[String],
    header_map: &HeaderMap,
    profile: &FamilyProfile,
    carried_key: &str,
) -> RowOutcome {
    let skip = |reason| RowOutcome {
        group_key: carried_key.to_string(),
        decision: RowDecision::Skip(reason),
    };

    if row.iter().all(|cell| cell.trim().is_empty()) {
        return skip(SkipReason::Blank);
    }

    let row_text = row.join(" ").to_lowercase();
    if matches_any(profile.banner_rules, &row_text) {
        return skip(SkipReason::Banner);
    }

    let explicit_key = header_map.cell(row, ColumnRole::GroupKey);
    let group_key = if explicit_key.is_empty() {
        carried_key.to_string()
    } else {
        explicit_key.to_string()
    };

    let test_case_name = header_map.cell(row, ColumnRole::TestCaseName).to_string();
    let automated_count = parse_count(header_map.cell(row, ColumnRole::AutomatedCount));
    let manual_count = if header_map.has(ColumnRole::ManualCount) {
        parse_count(header_map.cell(row, ColumnRole::ManualCount))
    } else {
        parse_count(header_map.cell(row, ColumnRole::TotalCount)).saturating_sub(automated_count)
    };

    if test_case_name.is_empty() && manual_count == 0 && automated_count == 0 {
        let priority = header_map.cell(row, ColumnRole::Priority);
        let decision = if profile.tally_uncounted_priorities
            && !explicit_key.is_empty()
            && !priority.is_empty()
        {
            RowDecision::PriorityOnly(priority.to_string())
        } else {
            RowDecision::Skip(SkipReason::NoSignal)
        };
        return RowOutcome {
            group_key,
            decision,
        };
    }

    let comments = header_map.cell(row, ColumnRole::Comments).to_string();
    let status_cell = header_map.cell(row, ColumnRole::StatusIndicator);
    let raw_status_text = if status_cell.is_empty() {
        comments.clone()
    } else {
        status_cell.to_string()
    };
    let status_class = classify_status(&raw_status_text);

    let classified = ClassifiedRow {
        line,
        group_key: group_key.clone(),
        test_case_name,
        manual_count,
        automated_count,
        status_class,
        status_bucket: status_class.bucket(),
        raw_status_text,
        priority: header_map.cell(row, ColumnRole::Priority).to_string(),
        comments,
    };
    RowOutcome {
        group_key,
        decision: RowDecision::Keep(classified),
    }
}

/// Largest count a single cell can contribute.
pub const MAX_COUNT: u64 = 1_000_000_000;

/// Parse a count cell: the leading run of ASCII digits, or 0.
///
/// `"12 cases"` reads as 12, `"3.5"` as 3; blanks, words and negative numbers
/// read as 0.
/// Values above [`MAX_COUNT`] are clamped to it.
pub fn parse_count(cell: &str) -> u64 {
    let trimmed = cell.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    trimmed
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |count, digit| {
            count
                .saturating_mul(10)
                .saturating_add(u64::from(digit - b'0'))
        })
        .min(MAX_COUNT)
}
