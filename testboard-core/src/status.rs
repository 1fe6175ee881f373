//! Status taxonomy shared by both sheet families.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::keywords::{KeywordClause, matches_any};

/// Fine-grained classification of a free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Finished, completed or passing.
    Done,
    /// Actively being worked on.
    InProgress,
    /// Explicitly not started yet.
    NotStarted,
    /// Failed, blocked or erroring.
    Failed,
    /// Non-empty text matching no keyword.
    Unrecognized,
    /// No status text at all.
    Empty,
}

impl StatusClass {
    /// Bucket this class is reported under in status breakdowns.
    pub fn bucket(self) -> StatusBucket {
        match self {
            StatusClass::Done => StatusBucket::Done,
            StatusClass::InProgress => StatusBucket::InProgress,
            StatusClass::NotStarted | StatusClass::Empty => StatusBucket::YetToStart,
            StatusClass::Failed | StatusClass::Unrecognized => StatusBucket::Other,
        }
    }
}

/// Coarse status bucket surfaced in `statusBreakdown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatusBucket {
    /// Work is done.
    Done,
    /// Work is underway.
    InProgress,
    /// Work has not started.
    YetToStart,
    /// Anything else, including failures.
    Other,
}

/// Keyword table evaluated top to bottom; the first match wins.
pub const STATUS_TAXONOMY: &[(StatusClass, &[KeywordClause])] = &[
    (
        StatusClass::Done,
        &[
            KeywordClause::contains(&["done"]),
            KeywordClause::contains(&["completed"]),
            KeywordClause::contains(&["pass"]),
        ],
    ),
    (
        StatusClass::InProgress,
        &[
            KeywordClause::contains(&["progress"]),
            KeywordClause::contains(&["wip"]),
            KeywordClause::contains(&["pending"]),
        ],
    ),
    (
        StatusClass::NotStarted,
        &[
            KeywordClause::contains(&["not started"]),
            KeywordClause::contains(&["todo"]),
            KeywordClause::contains(&["yet to start"]),
        ],
    ),
    (
        StatusClass::Failed,
        &[
            KeywordClause::contains(&["fail"]),
            KeywordClause::contains(&["block"]),
            KeywordClause::contains(&["error"]),
        ],
    ),
];

/// Classify free status text. Matching is case-insensitive.
pub fn classify_status(text: &str) -> StatusClass {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return StatusClass::Empty;
    }
    STATUS_TAXONOMY
        .iter()
        .find(|(_, clauses)| matches_any(clauses, &lowered))
        .map(|(class, _)| *class)
        .unwrap_or(StatusClass::Unrecognized)
}
