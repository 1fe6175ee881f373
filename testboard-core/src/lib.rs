#![deny(missing_docs)]
//! Testboard core library.
//!
//! Turns loosely structured smoke and regression tracking sheets, exported
//! as CSV, into aggregate test metrics and a combined dashboard.

pub mod aggregate;
pub mod classify;
pub mod columns;
pub mod combine;
pub mod domain;
pub mod error;
pub mod family;
pub mod header;
/// Keyword predicates used by the classification tables.
pub mod keywords;
pub mod modules;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod status;
pub mod tokenizer;

pub use aggregate::{MetricsAccumulator, fold};
pub use classify::{
    ClassifiedRow, MAX_COUNT, RowDecision, RowOutcome, SkipReason, classify, parse_count,
};
pub use columns::{ColumnRole, HeaderMap, map_columns};
pub use combine::{combine, merge_modules, merge_priorities};
pub use domain::{
    Dashboard, FeatureDetail, ModuleAggregate, OverallSummary, RecentTest, ReportMetrics,
    StatusBreakdown, TestCaseEntry, rounded_percent,
};
pub use error::{Result, TestboardError};
pub use family::SheetFamily;
pub use header::{LocatedSheet, locate};
pub use modules::{ModuleFilter, ModuleProgress, NumericFilter, ProgressTier, progress_table};
pub use pipeline::{ParsedSheet, analyze, build_dashboard, ingest, parse_sheet};
pub use report::{
    format_priorities, render_dashboard_markdown, render_json, render_metrics_markdown,
    render_modules_markdown,
};
pub use source::{FileSheetSource, SheetSource, load_dashboard};
pub use status::{StatusBucket, StatusClass, classify_status};
pub use tokenizer::{RawRow, tokenize};
