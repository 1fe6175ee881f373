//! Google Sheets CSV export client.

use reqwest::blocking::Client;
use testboard_core::{Result, SheetFamily, SheetSource, TestboardError};

/// Default spreadsheet holding both tracking tabs.
pub const DEFAULT_SPREADSHEET_ID: &str = "1cEoULby4Ye6ul5wsTCHSdT8eL93qJks2KNmIP6hK_Ko";
/// Default tab id of the smoke sheet.
pub const DEFAULT_SMOKE_GID: &str = "954974616";
/// Default tab id of the regression sheet.
pub const DEFAULT_REGRESSION_GID: &str = "1915752702";

/// Location of the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    /// Base URL of the Sheets host.
    pub base_url: String,
    /// Spreadsheet document id.
    pub spreadsheet_id: String,
    /// Tab id of the smoke sheet.
    pub smoke_gid: String,
    /// Tab id of the regression sheet.
    pub regression_gid: String,
}

impl SheetsConfig {
    /// Build the export configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("TESTBOARD_SHEETS_URL")
                .unwrap_or_else(|_| "https://docs.google.com".to_string()),
            spreadsheet_id: std::env::var("TESTBOARD_SPREADSHEET_ID")
                .unwrap_or_else(|_| DEFAULT_SPREADSHEET_ID.to_string()),
            smoke_gid: std::env::var("TESTBOARD_SMOKE_GID")
                .unwrap_or_else(|_| DEFAULT_SMOKE_GID.to_string()),
            regression_gid: std::env::var("TESTBOARD_REGRESSION_GID")
                .unwrap_or_else(|_| DEFAULT_REGRESSION_GID.to_string()),
        }
    }

    /// Tab id for `family`.
    pub fn gid(&self, family: SheetFamily) -> &str {
        match family {
            SheetFamily::Smoke => &self.smoke_gid,
            SheetFamily::Regression => &self.regression_gid,
        }
    }

    /// CSV export URL for `family`.
    pub fn export_url(&self, family: SheetFamily) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            self.gid(family)
        )
    }
}

/// Fetches sheet exports over HTTP. Redirects are followed.
///
/// Holds a blocking client, so construct it off the async runtime.
#[derive(Debug, Clone)]
pub struct GoogleSheetsSource {
    config: SheetsConfig,
    client: Client,
}

impl GoogleSheetsSource {
    /// Create a source for `config`.
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

impl SheetSource for GoogleSheetsSource {
    fn fetch_csv(&self, family: SheetFamily) -> Result<String> {
        let url = self.config.export_url(family);
        log::info!("fetching {family} sheet from {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| TestboardError::Http(format!("sheet request failed: {err}")))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            log::error!("{family} sheet export answered {status}");
            return Err(TestboardError::Fetch { status, url });
        }
        response
            .text()
            .map_err(|err| TestboardError::Http(format!("sheet body read failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{GoogleSheetsSource, SheetsConfig};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use std::sync::{Mutex, OnceLock};
    use testboard_core::{SheetFamily, SheetSource, TestboardError};

    fn config(base_url: &str) -> SheetsConfig {
        SheetsConfig {
            base_url: base_url.to_string(),
            spreadsheet_id: "sheet-id".to_string(),
            smoke_gid: "11".to_string(),
            regression_gid: "22".to_string(),
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock")
    }

    fn set_env(key: &str, value: &str) {
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove_env(key: &str) {
        unsafe {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn export_url_targets_the_family_tab() {
        let config = config("https://sheets.example/");

        assert_eq!(
            config.export_url(SheetFamily::Regression),
            "https://sheets.example/spreadsheets/d/sheet-id/export?format=csv&gid=22"
        );
    }

    #[test]
    fn from_env_reads_overrides_and_defaults() {
        let _guard = env_lock();
        set_env("TESTBOARD_SPREADSHEET_ID", "custom-id");
        set_env("TESTBOARD_SMOKE_GID", "7");
        remove_env("TESTBOARD_REGRESSION_GID");
        remove_env("TESTBOARD_SHEETS_URL");

        let config = SheetsConfig::from_env();

        assert_eq!(config.spreadsheet_id, "custom-id");
        assert_eq!(config.smoke_gid, "7");
        assert_eq!(config.regression_gid, super::DEFAULT_REGRESSION_GID);
        assert_eq!(config.base_url, "https://docs.google.com");
        remove_env("TESTBOARD_SPREADSHEET_ID");
        remove_env("TESTBOARD_SMOKE_GID");
    }

    #[test]
    fn fetches_csv_and_follows_redirects() {
        let server = MockServer::start();
        let export = server.mock(|when, then| {
            when.method(GET)
                .path("/spreadsheets/d/sheet-id/export")
                .query_param("format", "csv")
                .query_param("gid", "11");
            then.status(307)
                .header("Location", server.url("/content/smoke.csv"));
        });
        let content = server.mock(|when, then| {
            when.method(GET).path("/content/smoke.csv");
            then.status(200).body("Features,Test Case\nLogin,valid");
        });

        let source = GoogleSheetsSource::new(config(&server.base_url()));
        let body = source.fetch_csv(SheetFamily::Smoke).expect("csv");

        export.assert();
        content.assert();
        assert_eq!(body, "Features,Test Case\nLogin,valid");
    }

    #[test]
    fn non_success_status_is_a_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/spreadsheets/d/sheet-id/export");
            then.status(403).body("denied");
        });

        let source = GoogleSheetsSource::new(config(&server.base_url()));
        let err = source
            .fetch_csv(SheetFamily::Regression)
            .expect_err("should fail");

        assert!(matches!(err, TestboardError::Fetch { status: 403, .. }));
        assert!(err.to_string().contains("Anyone with the link can view"));
    }
}
