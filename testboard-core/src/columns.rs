//! Semantic column resolution driven by per-family keyword tables.

use std::fmt;

use crate::keywords::{KeywordClause, matches_any};

/// Semantic role a sheet column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnRole {
    /// Feature or story name that groups rows into modules.
    GroupKey,
    /// Individual test-case description.
    TestCaseName,
    /// Number of manual test cases.
    ManualCount,
    /// Number of automated test cases.
    AutomatedCount,
    /// Total number of test cases (manual is derived from it).
    TotalCount,
    /// Free-text status or automation progress.
    StatusIndicator,
    /// Priority label.
    Priority,
    /// Free-text comments, used as a status fallback.
    Comments,
}

impl ColumnRole {
    /// Every role, in declaration order.
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::GroupKey,
        ColumnRole::TestCaseName,
        ColumnRole::ManualCount,
        ColumnRole::AutomatedCount,
        ColumnRole::TotalCount,
        ColumnRole::StatusIndicator,
        ColumnRole::Priority,
        ColumnRole::Comments,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Stable label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::GroupKey => "group_key",
            ColumnRole::TestCaseName => "test_case_name",
            ColumnRole::ManualCount => "manual_count",
            ColumnRole::AutomatedCount => "automated_count",
            ColumnRole::TotalCount => "total_count",
            ColumnRole::StatusIndicator => "status_indicator",
            ColumnRole::Priority => "priority",
            ColumnRole::Comments => "comments",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a column-mapping table: a role and the header keywords that
/// identify it.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    /// Role bound by this rule.
    pub role: ColumnRole,
    /// Header predicate, as a disjunction of clauses.
    pub clauses: &'static [KeywordClause],
}

/// Resolved column index per role. Absent roles are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    slots: [Option<usize>; 8],
}

impl HeaderMap {
    /// Column index bound to `role`, if any.
    pub fn index(&self, role: ColumnRole) -> Option<usize> {
        self.slots[role.slot()]
    }

    /// Whether `role` resolved to a column.
    pub fn has(&self, role: ColumnRole) -> bool {
        self.index(role).is_some()
    }

    /// Trimmed cell for `role`, or `""` when the role is absent or the row is
    /// too short.
    pub fn cell<'a>(&self, row: &'a [String], role: ColumnRole) -> &'a str {
        self.index(role)
            .and_then(|index| row.get(index))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    /// Bound roles with their column index, in role order.
    pub fn bound(&self) -> impl Iterator<Item = (ColumnRole, usize)> + '_ {
        ColumnRole::ALL
            .into_iter()
            .filter_map(|role| self.index(role).map(|index| (role, index)))
    }

    /// `role=index` pairs for every bound role, e.g. `group_key=0, comments=3`.
    pub fn describe(&self) -> String {
        self.bound()
            .map(|(role, index)| format!("{role}={index}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Bind columns to roles following the rule table order.
///
/// Each role takes the first header (left to right) matching its predicate
/// that no earlier role has claimed.
pub fn map_columns(headers: &[String], rules: &[RoleRule]) -> HeaderMap {
    let lowered: Vec<String> = headers.iter().map(|header| header.to_lowercase()).collect();
    let mut claimed = vec![false; headers.len()];
    let mut map = HeaderMap::default();

    for rule in rules {
        if map.has(rule.role) {
            continue;
        }
        let found = lowered
            .iter()
            .enumerate()
            .find(|(index, header)| !claimed[*index] && matches_any(rule.clauses, header))
            .map(|(index, _)| index);
        if let Some(index) = found {
            claimed[index] = true;
            map.slots[rule.role.slot()] = Some(index);
        }
    }

    map
}
