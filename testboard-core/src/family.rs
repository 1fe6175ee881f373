//! Sheet families and their configuration tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::columns::{ColumnRole, RoleRule};
use crate::error::TestboardError;
use crate::keywords::KeywordClause;
use crate::status::StatusClass;

/// The two kinds of tracking sheet the dashboard understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SheetFamily {
    /// Smoke tests: features with manual/automated TC counts.
    Smoke,
    /// Regression tests: stories with priority and total/automated cases.
    Regression,
}

/// Headline counter a classified row increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// `passed`
    Passed,
    /// `failed`
    Failed,
    /// `skipped`
    Skipped,
}

/// Static per-family configuration.
#[derive(Debug)]
pub struct FamilyProfile {
    /// Column-role table, in role-priority order.
    pub column_rules: &'static [RoleRule],
    /// Row text that marks a repeated header or banner row.
    pub banner_rules: &'static [KeywordClause],
    /// Number of rows kept in `recentTests`.
    pub recent_limit: usize,
    /// Whether `featureDetails` is collected.
    pub track_feature_details: bool,
    /// Whether a keyed row without counts still adds its priority to
    /// `testsByPriority`.
    pub tally_uncounted_priorities: bool,
    /// Label used by the module table.
    pub test_type: &'static str,
}

const SMOKE_COLUMNS: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::GroupKey,
        clauses: &[KeywordClause::contains(&["feature"])],
    },
    RoleRule {
        role: ColumnRole::TestCaseName,
        clauses: &[KeywordClause::contains(&["test", "case"])],
    },
    RoleRule {
        role: ColumnRole::ManualCount,
        clauses: &[
            KeywordClause::contains(&["manual", "tc"]),
            KeywordClause::contains(&["manual", "case"]),
        ],
    },
    RoleRule {
        role: ColumnRole::AutomatedCount,
        clauses: &[
            KeywordClause::contains(&["automated", "tc"]),
            KeywordClause::contains(&["automated", "case"]),
        ],
    },
    RoleRule {
        role: ColumnRole::StatusIndicator,
        clauses: &[
            KeywordClause::contains(&["automation"]),
            KeywordClause::contains(&["%"]),
        ],
    },
    RoleRule {
        role: ColumnRole::Priority,
        clauses: &[KeywordClause::contains(&["prior"])],
    },
    RoleRule {
        role: ColumnRole::Comments,
        clauses: &[KeywordClause::contains(&["comment"])],
    },
];

const SMOKE_BANNERS: &[KeywordClause] = &[
    KeywordClause::contains(&["smoke test"]),
    KeywordClause::contains(&["automation status"]),
    KeywordClause::contains(&["features", "test cases"]),
];

const REGRESSION_COLUMNS: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::GroupKey,
        clauses: &[KeywordClause::contains(&["stor"])],
    },
    RoleRule {
        role: ColumnRole::Priority,
        clauses: &[KeywordClause::contains(&["prior"])],
    },
    RoleRule {
        role: ColumnRole::StatusIndicator,
        clauses: &[KeywordClause::contains(&["status"])],
    },
    RoleRule {
        role: ColumnRole::TotalCount,
        clauses: &[KeywordClause::contains(&["total", "case"])],
    },
    RoleRule {
        role: ColumnRole::AutomatedCount,
        clauses: &[KeywordClause::contains(&["automated", "case"])],
    },
    RoleRule {
        role: ColumnRole::ManualCount,
        clauses: &[KeywordClause::contains(&["manual", "case"])],
    },
    RoleRule {
        role: ColumnRole::Comments,
        clauses: &[KeywordClause::contains(&["comment"])],
    },
];

const REGRESSION_BANNERS: &[KeywordClause] = &[
    KeywordClause::contains(&["stories", "total cases"]),
    KeywordClause::contains(&["total use cases"]),
    KeywordClause::contains(&["total case", "automated case"]),
    KeywordClause::all_except(&["total", "case"], &["stories"]),
];

static SMOKE_PROFILE: FamilyProfile = FamilyProfile {
    column_rules: SMOKE_COLUMNS,
    banner_rules: SMOKE_BANNERS,
    recent_limit: 15,
    track_feature_details: true,
    tally_uncounted_priorities: false,
    test_type: "Smoke Test",
};

static REGRESSION_PROFILE: FamilyProfile = FamilyProfile {
    column_rules: REGRESSION_COLUMNS,
    banner_rules: REGRESSION_BANNERS,
    recent_limit: 10,
    track_feature_details: false,
    tally_uncounted_priorities: true,
    test_type: "Regression Test",
};

impl SheetFamily {
    /// Both families, smoke first.
    pub const ALL: [SheetFamily; 2] = [SheetFamily::Smoke, SheetFamily::Regression];

    /// Configuration tables for this family.
    pub fn profile(self) -> &'static FamilyProfile {
        match self {
            SheetFamily::Smoke => &SMOKE_PROFILE,
            SheetFamily::Regression => &REGRESSION_PROFILE,
        }
    }

    /// Counter incremented for a status class.
    ///
    /// The two sheets disagree on where "not started" rows land: smoke sheets
    /// count them as failed, regression sheets as skipped.
    pub fn counter_for(self, class: StatusClass) -> Counter {
        match (self, class) {
            (_, StatusClass::Done) => Counter::Passed,
            (_, StatusClass::Failed) => Counter::Failed,
            (_, StatusClass::InProgress | StatusClass::Unrecognized) => Counter::Skipped,
            (SheetFamily::Smoke, StatusClass::NotStarted | StatusClass::Empty) => Counter::Failed,
            (SheetFamily::Regression, StatusClass::NotStarted | StatusClass::Empty) => {
                Counter::Skipped
            }
        }
    }

    /// Stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetFamily::Smoke => "smoke",
            SheetFamily::Regression => "regression",
        }
    }
}

impl fmt::Display for SheetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetFamily {
    type Err = TestboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "smoke" | "smoke-tests" | "smoke_tests" => Ok(SheetFamily::Smoke),
            "regression" | "regression-tests" | "regression_tests" => Ok(SheetFamily::Regression),
            other => Err(TestboardError::Other(format!("unknown sheet family: {other}"))),
        }
    }
}
