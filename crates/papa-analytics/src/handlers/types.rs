use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::services::FunnelAnalyticsService;
use crate::types::FunnelReport;

pub struct AppState {
    pub analytics_service: Arc<FunnelAnalyticsService>,
}

/// Query string of the funnel report endpoint. Dates stay raw here so that a
/// bad value surfaces as an `InvalidWindow` body instead of an extractor error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FunnelReportQuery {
    /// Shop domain, e.g. `example.myshopify.com`
    pub shop: Option<String>,
    /// Restrict the report to one popup of the shop
    pub popup_id: Option<String>,
    /// `7d` (default), `30d`, `90d` or `all`
    pub timeframe: Option<String>,
    /// ISO 8601 lower bound; overrides `timeframe`
    pub start_date: Option<String>,
    /// ISO 8601 upper bound; overrides `timeframe`
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FunnelReportResponse {
    pub success: bool,
    pub data: FunnelReport,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
