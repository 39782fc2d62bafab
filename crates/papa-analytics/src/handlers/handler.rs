use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

use super::types::{AppState, ErrorResponse, FunnelReportQuery, FunnelReportResponse};
use crate::error::AnalyticsError;
use crate::services::ReportRequest;
use crate::types::{
    AnalyticsWindow, FunnelReport, FunnelSummary, ResolvedWindow, StepFunnelEntry, Timeframe,
};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FunnelReportQuery {
    fn into_request(self) -> Result<ReportRequest, AnalyticsError> {
        let shop = non_empty(self.shop).ok_or_else(|| AnalyticsError::not_found("shop"))?;
        let window = AnalyticsWindow::from_params(
            self.timeframe.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?;

        let mut request = ReportRequest::new(shop).with_window(window);
        request.popup_id = non_empty(self.popup_id);
        Ok(request)
    }
}

/// Funnel report for a shop, optionally scoped to one popup
#[utoipa::path(
    get,
    path = "/analytics/funnel",
    params(FunnelReportQuery),
    responses(
        (status = 200, description = "Funnel report computed", body = FunnelReportResponse),
        (status = 400, description = "Invalid time window", body = ErrorResponse),
        (status = 404, description = "Shop or popup not found", body = ErrorResponse),
        (status = 500, description = "Aggregation failed", body = ErrorResponse)
    ),
    tag = "Funnel Analytics"
)]
pub async fn get_funnel_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FunnelReportQuery>,
) -> Result<Json<FunnelReportResponse>, AnalyticsError> {
    let request = query.into_request()?;
    debug!("Funnel report requested for {}", request.shop_domain);

    let report = state.analytics_service.compute_report(&request).await?;

    Ok(Json(FunnelReportResponse {
        success: true,
        data: report,
    }))
}

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(get_funnel_report),
    components(
        schemas(
            FunnelReportResponse,
            ErrorResponse,
            FunnelReport,
            FunnelSummary,
            StepFunnelEntry,
            ResolvedWindow,
            Timeframe
        )
    ),
    tags(
        (name = "Funnel Analytics", description = "Popup funnel reporting endpoints")
    )
)]
pub struct FunnelAnalyticsApiDoc;

pub fn configure_routes() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;

    axum::Router::new().route("/analytics/funnel", get(get_funnel_report))
}
