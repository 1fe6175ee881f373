//! HTTP handlers for the testboard server.

use std::future::Future;

use actix_web::{HttpResponse, Responder, get, web};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use testboard_core::{
    ModuleFilter, ModuleProgress, OverallSummary, ReportMetrics, SheetFamily, SheetSource,
    analyze, build_dashboard, parse_sheet, progress_table,
};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;
use crate::sheets::{GoogleSheetsSource, SheetsConfig};

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Where the sheet exports live.
    pub sheets: SheetsConfig,
    /// Deployment label reported by the health check.
    pub environment: String,
}

impl AppState {
    /// Build application state from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Self {
        Self {
            sheets: SheetsConfig::from_env(),
            environment: std::env::var("TESTBOARD_ENVIRONMENT")
                .unwrap_or_else(|_| "local".to_string()),
        }
    }
}

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always true.
    pub success: bool,
    /// Always "ok".
    pub status: String,
    /// Response time, RFC 3339.
    pub timestamp: String,
    /// Deployment label.
    pub environment: String,
}

/// A single sheet with its metrics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SheetResponse {
    /// Always true.
    pub success: bool,
    /// Header row.
    pub headers: Vec<String>,
    /// Rows below the header.
    pub data: Vec<Vec<String>>,
    /// Aggregated metrics.
    pub metrics: ReportMetrics,
}

/// Both sheets plus the combined summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Always true.
    pub success: bool,
    /// Response time, RFC 3339.
    pub timestamp: String,
    /// Smoke sheet metrics.
    pub smoke_tests: ReportMetrics,
    /// Regression sheet metrics.
    pub regression_tests: ReportMetrics,
    /// Combined summary.
    pub overall: OverallSummary,
}

/// Module progress rows after filtering.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModulesResponse {
    /// Always true.
    pub success: bool,
    /// Matching modules, highest effective percentage first.
    pub modules: Vec<ModuleProgress>,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error message.
    pub error: String,
}

impl ErrorResponse {
    fn new(error: String) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Starts the blocking fetch immediately so that two calls run side by side.
fn spawn_fetch(
    config: &SheetsConfig,
    family: SheetFamily,
) -> impl Future<Output = Result<String, String>> + use<> {
    let config = config.clone();
    let pending = web::block(move || GoogleSheetsSource::new(config).fetch_csv(family));
    async move {
        match pending.await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(err.to_string()),
            Err(err) => Err(format!("sheet fetch failed: {err}")),
        }
    }
}

async fn fetch_both(config: &SheetsConfig) -> Result<(String, String), String> {
    let smoke = spawn_fetch(config, SheetFamily::Smoke);
    let regression = spawn_fetch(config, SheetFamily::Regression);
    let smoke = smoke.await?;
    let regression = regression.await?;
    Ok((smoke, regression))
}

async fn sheet_response(state: &AppState, family: SheetFamily) -> HttpResponse {
    match spawn_fetch(&state.sheets, family).await {
        Ok(text) => {
            let sheet = parse_sheet(&text);
            let metrics = analyze(&sheet, family);
            HttpResponse::Ok().json(SheetResponse {
                success: true,
                headers: sheet.headers,
                data: sheet.data,
                metrics,
            })
        }
        Err(message) => {
            log::error!("{family} sheet failed: {message}");
            HttpResponse::InternalServerError().json(ErrorResponse::new(message))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
#[get("/api/health")]
/// Report liveness.
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        timestamp: timestamp(),
        environment: state.environment.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/smoke-tests",
    responses(
        (status = 200, description = "Smoke sheet and metrics", body = SheetResponse),
        (status = 500, description = "Sheet fetch failed", body = ErrorResponse)
    ),
    tag = "sheets"
)]
#[get("/api/smoke-tests")]
/// Fetch and aggregate the smoke sheet.
pub async fn smoke_tests(state: web::Data<AppState>) -> impl Responder {
    sheet_response(&state, SheetFamily::Smoke).await
}

#[utoipa::path(
    get,
    path = "/regression-tests",
    responses(
        (status = 200, description = "Regression sheet and metrics", body = SheetResponse),
        (status = 500, description = "Sheet fetch failed", body = ErrorResponse)
    ),
    tag = "sheets"
)]
#[get("/api/regression-tests")]
/// Fetch and aggregate the regression sheet.
pub async fn regression_tests(state: web::Data<AppState>) -> impl Responder {
    sheet_response(&state, SheetFamily::Regression).await
}

#[utoipa::path(
    get,
    path = "/dashboard-data",
    responses(
        (status = 200, description = "Dashboard, or a failure payload with success=false", body = DashboardResponse)
    ),
    tag = "dashboard"
)]
#[get("/api/dashboard-data")]
/// Fetch both sheets and build the dashboard.
///
/// Fetch failures still answer 200 so the UI can render its error state.
pub async fn dashboard_data(state: web::Data<AppState>) -> impl Responder {
    match fetch_both(&state.sheets).await {
        Ok((smoke, regression)) => {
            let dashboard = build_dashboard(&smoke, &regression);
            log::info!(
                "dashboard built: {} smoke rows, {} regression rows",
                dashboard.smoke_tests.total,
                dashboard.regression_tests.total
            );
            HttpResponse::Ok().json(DashboardResponse {
                success: true,
                timestamp: timestamp(),
                smoke_tests: dashboard.smoke_tests,
                regression_tests: dashboard.regression_tests,
                overall: dashboard.overall,
            })
        }
        Err(message) => {
            log::error!("dashboard failed: {message}");
            HttpResponse::Ok().json(ErrorResponse::new(message))
        }
    }
}

#[utoipa::path(
    get,
    path = "/modules",
    params(ModuleFilter),
    responses(
        (status = 200, description = "Module progress rows", body = ModulesResponse),
        (status = 500, description = "Sheet fetch failed", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
#[get("/api/modules")]
/// Module automation progress across both sheets.
pub async fn modules(
    state: web::Data<AppState>,
    filter: web::Query<ModuleFilter>,
) -> impl Responder {
    match fetch_both(&state.sheets).await {
        Ok((smoke, regression)) => {
            let dashboard = build_dashboard(&smoke, &regression);
            HttpResponse::Ok().json(ModulesResponse {
                success: true,
                modules: filter.apply(progress_table(&dashboard)),
            })
        }
        Err(message) => {
            log::error!("module table failed: {message}");
            HttpResponse::InternalServerError().json(ErrorResponse::new(message))
        }
    }
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
