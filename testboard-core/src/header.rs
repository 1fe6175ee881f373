//! Header row detection for exports that prepend banner rows.

use crate::keywords::{KeywordClause, matches_any};
use crate::tokenizer::RawRow;

/// Cell keywords that mark a row as the column header row.
pub const HEADER_KEYWORDS: &[KeywordClause] = &[
    KeywordClause::all_except(&["feature"], &["automation"]),
    KeywordClause::contains(&["test", "case"]),
    KeywordClause::contains(&["stor"]),
    KeywordClause::contains(&["prior"]),
    KeywordClause::contains(&["comment"]),
];

/// Tokenized sheet split into its header row and the rows after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSheet {
    /// Index of the header row, `None` when every row is blank.
    pub header_index: Option<usize>,
    /// Header cells (empty when no header was found).
    pub headers: RawRow,
    /// Rows strictly after the header row.
    pub data_rows: Vec<RawRow>,
}

/// Find the header row and split the remaining rows off as data.
pub fn locate(rows: Vec<RawRow>) -> LocatedSheet {
    let header_index = rows
        .iter()
        .position(|row| has_content(row) && row.iter().any(|cell| is_header_cell(cell)))
        .or_else(|| rows.iter().position(|row| has_content(row)));

    let Some(index) = header_index else {
        return LocatedSheet {
            header_index: None,
            headers: Vec::new(),
            data_rows: rows,
        };
    };

    let mut rows = rows.into_iter().skip(index);
    let headers = rows.next().unwrap_or_default();
    LocatedSheet {
        header_index: Some(index),
        headers,
        data_rows: rows.collect(),
    }
}

fn has_content(row: &RawRow) -> bool {
    row.iter().any(|cell| !cell.is_empty())
}

fn is_header_cell(cell: &str) -> bool {
    matches_any(HEADER_KEYWORDS, &cell.to_lowercase())
}
