//! OpenAPI specification for the testboard server.

use utoipa::OpenApi;

use testboard_core::{
    FeatureDetail, ModuleAggregate, ModuleProgress, OverallSummary, ProgressTier, RecentTest,
    ReportMetrics, SheetFamily, StatusBreakdown, TestCaseEntry,
};

use crate::routes::{
    DashboardResponse, ErrorResponse, HealthResponse, ModulesResponse, SheetResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::smoke_tests,
        crate::routes::regression_tests,
        crate::routes::dashboard_data,
        crate::routes::modules,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            HealthResponse,
            SheetResponse,
            DashboardResponse,
            ModulesResponse,
            ErrorResponse,
            ReportMetrics,
            OverallSummary,
            ModuleAggregate,
            TestCaseEntry,
            StatusBreakdown,
            RecentTest,
            FeatureDetail,
            SheetFamily,
            ModuleProgress,
            ProgressTier
        )
    ),
    tags(
        (name = "sheets", description = "Individual tracking sheets"),
        (name = "dashboard", description = "Combined dashboard data"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the testboard server.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_includes_expected_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/smoke-tests"));
        assert!(paths.contains_key("/regression-tests"));
        assert!(paths.contains_key("/dashboard-data"));
        assert!(paths.contains_key("/modules"));
        assert!(paths.contains_key("/openapi.json"));
    }
}
