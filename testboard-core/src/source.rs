//! Where sheet CSV text comes from.

use std::path::PathBuf;

use crate::domain::Dashboard;
use crate::error::Result;
use crate::family::SheetFamily;
use crate::pipeline::build_dashboard;

/// Supplies the raw CSV export for a sheet family.
#[cfg_attr(test, mockall::automock)]
pub trait SheetSource {
    /// Fetch the CSV text for `family`.
    fn fetch_csv(&self, family: SheetFamily) -> Result<String>;
}

/// Reads both exports from local files.
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    smoke: PathBuf,
    regression: PathBuf,
}

impl FileSheetSource {
    /// Create a source backed by two CSV files.
    pub fn new(smoke: impl Into<PathBuf>, regression: impl Into<PathBuf>) -> Self {
        Self {
            smoke: smoke.into(),
            regression: regression.into(),
        }
    }

    fn path(&self, family: SheetFamily) -> &PathBuf {
        match family {
            SheetFamily::Smoke => &self.smoke,
            SheetFamily::Regression => &self.regression,
        }
    }
}

impl SheetSource for FileSheetSource {
    fn fetch_csv(&self, family: SheetFamily) -> Result<String> {
        Ok(std::fs::read_to_string(self.path(family))?)
    }
}

/// Fetch both sheets from `source` and build the dashboard.
pub fn load_dashboard(source: &dyn SheetSource) -> Result<Dashboard> {
    let smoke = source.fetch_csv(SheetFamily::Smoke)?;
    let regression = source.fetch_csv(SheetFamily::Regression)?;
    Ok(build_dashboard(&smoke, &regression))
}

#[cfg(test)]
mod tests {
    use super::{FileSheetSource, MockSheetSource, SheetSource, load_dashboard};
    use crate::error::TestboardError;
    use crate::family::SheetFamily;
    use mockall::predicate::eq;

    #[test]
    fn load_dashboard_reads_both_families() {
        let mut source = MockSheetSource::new();
        source
            .expect_fetch_csv()
            .with(eq(SheetFamily::Smoke))
            .times(1)
            .returning(|_| Ok("Features,Test Case,Manual TCs,Automated TCs\nLogin,a,1,1".into()));
        source
            .expect_fetch_csv()
            .with(eq(SheetFamily::Regression))
            .times(1)
            .returning(|_| Ok("Stories,Status,Total Cases,Automated Cases\nPay,Done,4,2".into()));

        let dashboard = load_dashboard(&source).expect("dashboard");

        assert_eq!(dashboard.smoke_tests.total_test_cases, 2);
        assert_eq!(dashboard.regression_tests.total_test_cases, 4);
        assert_eq!(dashboard.overall.total_automated, 3);
        assert_eq!(dashboard.overall.passed, 1);
    }

    #[test]
    fn load_dashboard_propagates_fetch_errors() {
        let mut source = MockSheetSource::new();
        source.expect_fetch_csv().returning(|_| {
            Err(TestboardError::Fetch {
                status: 403,
                url: "https://sheets.invalid/export".to_string(),
            })
        });

        let err = load_dashboard(&source).expect_err("should fail");

        assert!(matches!(err, TestboardError::Fetch { status: 403, .. }));
    }

    #[test]
    fn file_source_reads_each_path() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let smoke = root.join("smoke.csv");
        let regression = root.join("regression.csv");
        std::fs::write(&smoke, "smoke body").expect("write smoke");
        std::fs::write(&regression, "regression body").expect("write regression");

        let source = FileSheetSource::new(&smoke, &regression);

        assert_eq!(
            source.fetch_csv(SheetFamily::Smoke).expect("smoke"),
            "smoke body"
        );
        assert_eq!(
            source.fetch_csv(SheetFamily::Regression).expect("regression"),
            "regression body"
        );
        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn file_source_reports_missing_files() {
        let source = FileSheetSource::new("/nonexistent/smoke.csv", "/nonexistent/r.csv");

        let err = source.fetch_csv(SheetFamily::Smoke).expect_err("missing");

        assert!(matches!(err, TestboardError::Io(_)));
    }

    fn unique_dir_name() -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        format!("testboard-source-{nanos}")
    }
}
