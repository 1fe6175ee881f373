//! End-to-end sheet processing: CSV text in, metrics out.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::aggregate::MetricsAccumulator;
use crate::classify::{RowDecision, classify};
use crate::columns::map_columns;
use crate::combine::combine;
use crate::domain::{Dashboard, ReportMetrics};
use crate::family::SheetFamily;
use crate::header::locate;
use crate::tokenizer::{RawRow, tokenize};

/// A tokenized sheet split at its header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSheet {
    /// Header cells.
    pub headers: RawRow,
    /// Rows below the header.
    pub data: Vec<RawRow>,
}

/// Tokenize CSV text and split off the header row.
pub fn parse_sheet(text: &str) -> ParsedSheet {
    let located = locate(tokenize(text));
    ParsedSheet {
        headers: located.headers,
        data: located.data_rows,
    }
}

/// Compute metrics for an already parsed sheet.
pub fn analyze(sheet: &ParsedSheet, family: SheetFamily) -> ReportMetrics {
    let profile = family.profile();
    let header_map = map_columns(&sheet.headers, profile.column_rules);
    let mut accumulator = MetricsAccumulator::new(family);
    let mut carried_key = String::new();
    let mut skipped = 0usize;

    for (line, row) in sheet.data.iter().enumerate() {
        let outcome = classify(line, row, &header_map, profile, &carried_key);
        match &outcome.decision {
            RowDecision::Keep(classified) => accumulator.push(classified),
            RowDecision::PriorityOnly(priority) => {
                accumulator.tally_priority(priority);
                skipped += 1;
            }
            RowDecision::Skip(_) => skipped += 1,
        }
        carried_key = outcome.group_key;
    }

    let metrics = accumulator.finish();
    log::debug!(
        "{family} sheet: {} rows kept, {skipped} skipped, columns [{}]",
        metrics.total,
        header_map.describe()
    );
    metrics
}

/// Parse and analyze one CSV export.
pub fn ingest(text: &str, family: SheetFamily) -> ReportMetrics {
    analyze(&parse_sheet(text), family)
}

/// Build the full dashboard from both CSV exports.
pub fn build_dashboard(smoke_text: &str, regression_text: &str) -> Dashboard {
    let smoke_tests = ingest(smoke_text, SheetFamily::Smoke);
    let regression_tests = ingest(regression_text, SheetFamily::Regression);
    let overall = combine(&smoke_tests, &regression_tests);
    Dashboard {
        smoke_tests,
        regression_tests,
        overall,
    }
}
