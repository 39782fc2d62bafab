mod report;
mod service;

pub use report::{build_step_funnel, build_summary, fold_daily_series, rate, EventTotals};
pub use service::{FunnelAnalyticsService, ReportRequest};
