#![deny(missing_docs)]
//! Testboard command-line interface.
//!
//! Summarizes smoke and regression tracking sheets from CSV files or URLs.

mod fetch;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fetch::SourceLoader;
use std::fmt::Write;
use std::path::PathBuf;
use std::str::FromStr;
use testboard_core::{
    Dashboard, ModuleFilter, ModuleProgress, ReportMetrics, SheetFamily, build_dashboard,
    format_priorities, ingest, progress_table, render_dashboard_markdown, render_json,
    render_metrics_markdown, render_modules_markdown,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "testboard", version, about = "Testboard CLI")]
struct Cli {
    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SheetPairArgs {
    /// Smoke sheet CSV export (path or URL).
    #[arg(long, env = "TESTBOARD_SMOKE_SOURCE")]
    smoke: String,
    /// Regression sheet CSV export (path or URL).
    #[arg(long, env = "TESTBOARD_REGRESSION_SOURCE")]
    regression: String,
}

#[derive(Args, Clone, Default)]
struct ModuleFilterArgs {
    /// Keep modules whose test type contains this text.
    #[arg(long)]
    test_type: Option<String>,
    /// Keep modules whose name contains this text.
    #[arg(long)]
    module_name: Option<String>,
    /// Total test cases filter (`>N`, `<N` or `N`).
    #[arg(long)]
    total_tcs: Option<String>,
    /// Manual test cases filter.
    #[arg(long)]
    manual: Option<String>,
    /// Automated test cases filter.
    #[arg(long)]
    automated: Option<String>,
    /// Overall automation percentage filter.
    #[arg(long)]
    overall_percent: Option<String>,
    /// Effective automation percentage filter.
    #[arg(long)]
    effective_percent: Option<String>,
    /// Keep modules whose status contains this text.
    #[arg(long)]
    status: Option<String>,
}

impl From<ModuleFilterArgs> for ModuleFilter {
    fn from(args: ModuleFilterArgs) -> Self {
        ModuleFilter {
            test_type: args.test_type,
            module_name: args.module_name,
            total_tcs: args.total_tcs,
            manual: args.manual,
            automated: args.automated,
            overall_percent: args.overall_percent,
            effective_percent: args.effective_percent,
            status: args.status,
        }
    }
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the combined dashboard from both sheets.
    Analyze {
        #[command(flatten)]
        sheets: SheetPairArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Aggregate a single sheet.
    Sheet {
        /// Which kind of sheet the export is.
        #[arg(long, value_parser = SheetFamily::from_str)]
        family: SheetFamily,
        /// CSV export (path or URL).
        source: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// List module automation progress across both sheets.
    Modules {
        #[command(flatten)]
        sheets: SheetPairArgs,
        #[command(flatten)]
        filter: ModuleFilterArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    }
    run(cli.command).await
}

#[cfg(test)]
fn main() {}

async fn run(command: Commands) -> CliResult<()> {
    let loader = SourceLoader::new()?;
    match command {
        Commands::Analyze { sheets, report } => {
            let dashboard = load_dashboard(&loader, &sheets).await?;
            emit_dashboard(&dashboard, &report).await
        }
        Commands::Sheet {
            family,
            source,
            report,
        } => {
            let text = loader.load(&source).await?;
            let metrics = ingest(&text, family);
            emit_metrics(&metrics, &report).await
        }
        Commands::Modules {
            sheets,
            filter,
            report,
        } => {
            let dashboard = load_dashboard(&loader, &sheets).await?;
            let filter = ModuleFilter::from(filter);
            let rows = filter.apply(progress_table(&dashboard));
            emit_modules(&rows, &report).await
        }
    }
}

async fn load_dashboard(loader: &SourceLoader, sheets: &SheetPairArgs) -> CliResult<Dashboard> {
    let (smoke, regression) = loader.load_pair(&sheets.smoke, &sheets.regression).await?;
    let dashboard = build_dashboard(&smoke, &regression);
    log::debug!(
        "dashboard: {} smoke rows, {} regression rows",
        dashboard.smoke_tests.total,
        dashboard.regression_tests.total
    );
    Ok(dashboard)
}

async fn emit_dashboard(dashboard: &Dashboard, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_dashboard_text(dashboard),
        OutputFormat::Markdown => render_dashboard_markdown(dashboard),
        OutputFormat::Json => render_json(dashboard)?,
    };
    emit_output(output, contents).await
}

async fn emit_metrics(metrics: &ReportMetrics, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_metrics_text(metrics),
        OutputFormat::Markdown => render_metrics_markdown(metrics),
        OutputFormat::Json => render_json(metrics)?,
    };
    emit_output(output, contents).await
}

async fn emit_modules(rows: &[ModuleProgress], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_modules_text(rows),
        OutputFormat::Markdown => render_modules_markdown(rows),
        OutputFormat::Json => render_json(rows)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_dashboard_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    let overall = &dashboard.overall;
    let _ = writeln!(
        output,
        "Overall: {} rows, {} passed, {} failed, {} skipped",
        overall.total, overall.passed, overall.failed, overall.skipped
    );
    let _ = writeln!(output, "Pass rate: {}%", overall.pass_rate);
    let _ = writeln!(
        output,
        "Automation: {}% ({} of {} test cases)",
        overall.automation_rate, overall.total_automated, overall.total_test_cases
    );
    for (label, count) in format_priorities(&overall.tests_by_priority) {
        let _ = writeln!(output, "Priority {label}: {count}");
    }
    let _ = writeln!(output);
    output.push_str(&render_metrics_text(&dashboard.smoke_tests));
    let _ = writeln!(output);
    output.push_str(&render_metrics_text(&dashboard.regression_tests));
    output
}

fn render_metrics_text(metrics: &ReportMetrics) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Sheet: {}", metrics.family);
    let _ = writeln!(
        output,
        "Rows: {} (passed {}, failed {}, skipped {})",
        metrics.total, metrics.passed, metrics.failed, metrics.skipped
    );
    let _ = writeln!(output, "Pass rate: {}%", metrics.pass_rate);
    let _ = writeln!(
        output,
        "Test cases: {} manual, {} automated, {} total",
        metrics.total_manual, metrics.total_automated, metrics.total_test_cases
    );
    if metrics.modules_by_key.is_empty() {
        let _ = writeln!(output, "Modules: none");
        return output;
    }
    let _ = writeln!(output, "Modules:");
    for (name, module) in &metrics.modules_by_key {
        let _ = writeln!(
            output,
            "  - {name}: {} test cases ({} manual, {} automated)",
            module.total_test_cases, module.manual_count, module.automated_count
        );
    }
    output
}

fn render_modules_text(rows: &[ModuleProgress]) -> String {
    let mut output = String::new();
    if rows.is_empty() {
        let _ = writeln!(output, "No modules match.");
        return output;
    }
    for row in rows {
        let _ = writeln!(
            output,
            "{} / {}: {} of {} automated, {}% effective ({})",
            row.test_type, row.name, row.automated, row.total_tcs, row.effective_percent,
            row.status_text
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Commands, ModuleFilterArgs, OutputArgs, OutputFormat, SheetPairArgs,
        render_dashboard_text, render_metrics_text, render_modules_text, run,
    };
    use clap::Parser;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use std::path::{Path, PathBuf};
    use testboard_core::{SheetFamily, build_dashboard, ingest, progress_table};

    const SMOKE_CSV: &str = "Smoke Test - Happy Path,,,,\n\
Features,Test Case,Manual TCs,Automated TCs,Automation %\n\
Login,valid user,1,1,Done\n\
,locked user,1,0,In Progress\n\
Cart,add item,0,2,Done";

    const REGRESSION_CSV: &str = "Stories,Priority,Status,Total Cases,Automated Cases\n\
Payments,P1,Done,10,8\n\
Refunds,P2,Blocked,4,0";

    static UNIQUE_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let counter = UNIQUE_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        PathBuf::from(format!("testboard_cli_test_{nanos}_{counter}"))
    }

    fn write_sheets(root: &Path) -> SheetPairArgs {
        std::fs::create_dir_all(root).expect("create temp dir");
        let smoke = root.join("smoke.csv");
        let regression = root.join("regression.csv");
        std::fs::write(&smoke, SMOKE_CSV).expect("write smoke");
        std::fs::write(&regression, REGRESSION_CSV).expect("write regression");
        SheetPairArgs {
            smoke: smoke.display().to_string(),
            regression: regression.display().to_string(),
        }
    }

    fn output_to(path: &Path, format: OutputFormat) -> OutputArgs {
        OutputArgs {
            format,
            report_output: Some(path.to_path_buf()),
        }
    }

    #[test]
    fn family_flag_accepts_sheet_family_names() {
        let cli = Cli::try_parse_from([
            "testboard",
            "sheet",
            "--family",
            "regression-tests",
            "regression.csv",
        ])
        .expect("parse");

        assert!(matches!(
            cli.command,
            Commands::Sheet {
                family: SheetFamily::Regression,
                ..
            }
        ));
    }

    #[test]
    fn unknown_family_is_rejected() {
        let err = Cli::try_parse_from(["testboard", "sheet", "--family", "nightly", "x.csv"])
            .err()
            .expect("should fail");

        assert!(err.to_string().contains("unknown sheet family: nightly"));
    }

    #[tokio::test]
    async fn analyze_writes_json_dashboard() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let sheets = write_sheets(&root);
        let report_path = root.join("out").join("dashboard.json");

        run(Commands::Analyze {
            sheets,
            report: output_to(&report_path, OutputFormat::Json),
        })
        .await
        .expect("analyze");

        let contents = std::fs::read_to_string(&report_path).expect("report");
        let parsed: serde_json::Value = serde_json::from_str(&contents).expect("json");
        assert_eq!(parsed["overall"]["total"], 5);
        assert_eq!(parsed["overall"]["automationRate"], 58);
        assert_eq!(parsed["smokeTests"]["modulesByKey"]["Login"]["totalTestCases"], 3);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn sheet_reads_remote_source() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/regression.csv");
                then.status(200).body(REGRESSION_CSV);
            })
            .await;
        let root = std::env::temp_dir().join(unique_dir_name());
        let report_path = root.join("regression.md");

        run(Commands::Sheet {
            family: SheetFamily::Regression,
            source: server.url("/regression.csv"),
            report: output_to(&report_path, OutputFormat::Markdown),
        })
        .await
        .expect("sheet");

        let contents = std::fs::read_to_string(&report_path).expect("report");
        assert!(contents.starts_with("# Regression Tests"));
        assert!(contents.contains("| Payments | 1 | 2 | 8 | 10 |"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn modules_applies_filters() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let sheets = write_sheets(&root);
        let report_path = root.join("modules.txt");

        run(Commands::Modules {
            sheets,
            filter: ModuleFilterArgs {
                test_type: Some("regression".to_string()),
                ..ModuleFilterArgs::default()
            },
            report: output_to(&report_path, OutputFormat::Text),
        })
        .await
        .expect("modules");

        let contents = std::fs::read_to_string(&report_path).expect("report");
        assert!(contents.contains("Regression Test / Payments: 8 of 10 automated, 80% effective"));
        assert!(contents.contains("Regression Test / Refunds"));
        assert!(!contents.contains("Smoke Test"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn analyze_fails_on_missing_source() {
        let result = run(Commands::Analyze {
            sheets: SheetPairArgs {
                smoke: "/nonexistent/smoke.csv".to_string(),
                regression: "/nonexistent/regression.csv".to_string(),
            },
            report: OutputArgs {
                format: OutputFormat::Text,
                report_output: None,
            },
        })
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn text_renderers_cover_sections() {
        let dashboard = build_dashboard(SMOKE_CSV, REGRESSION_CSV);

        let text = render_dashboard_text(&dashboard);
        assert!(text.contains("Overall: 5 rows, 3 passed, 1 failed, 1 skipped"));
        assert!(text.contains("Priority P1: 1"));
        assert!(text.contains("Sheet: smoke"));
        assert!(text.contains("Sheet: regression"));

        let empty = render_metrics_text(&ingest("", SheetFamily::Smoke));
        assert!(empty.contains("Modules: none"));

        let rows = render_modules_text(&progress_table(&dashboard));
        assert!(rows.starts_with("Smoke Test / Cart"));
        assert_eq!(render_modules_text(&[]), "No modules match.\n");
    }
}
