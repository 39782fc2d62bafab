use chrono::Duration;
use papa_core::{DateTime, UtcDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AnalyticsError;

/// Number of most recent distinct dates kept in the daily series
pub const DAILY_SERIES_DAYS: u32 = 30;

/// Named relative timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// Lookback in days, `None` for `all`
    pub fn days(&self) -> Option<i64> {
        match self {
            Timeframe::Last7Days => Some(7),
            Timeframe::Last30Days => Some(30),
            Timeframe::Last90Days => Some(90),
            Timeframe::All => None,
        }
    }
}

impl FromStr for Timeframe {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Timeframe::Last7Days),
            "30d" => Ok(Timeframe::Last30Days),
            "90d" => Ok(Timeframe::Last90Days),
            "all" => Ok(Timeframe::All),
            other => Err(AnalyticsError::InvalidWindow(format!(
                "unknown timeframe '{}', expected one of 7d, 30d, 90d, all",
                other
            ))),
        }
    }
}

/// Inclusive timestamp bounds; either side may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<UtcDateTime>,
    pub end: Option<UtcDateTime>,
}

impl DateRange {
    pub fn new(
        start: Option<UtcDateTime>,
        end: Option<UtcDateTime>,
    ) -> Result<Self, AnalyticsError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AnalyticsError::InvalidWindow(format!(
                    "start date {} is after end date {}",
                    start.to_rfc3339(),
                    end.to_rfc3339()
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, timestamp: &UtcDateTime) -> bool {
        self.start.map_or(true, |start| *timestamp >= start)
            && self.end.map_or(true, |end| *timestamp <= end)
    }
}

/// The time window a report covers, as requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsWindow {
    /// Explicit bounds, used verbatim
    Range(DateRange),
    /// Relative to the time the report is computed
    Relative(Timeframe),
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        AnalyticsWindow::Relative(Timeframe::default())
    }
}

impl AnalyticsWindow {
    /// Build a window from raw query parameters. Explicit dates win over the
    /// named timeframe; a missing timeframe means `7d`.
    pub fn from_params(
        timeframe: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, AnalyticsError> {
        let start = parse_bound("startDate", start_date)?;
        let end = parse_bound("endDate", end_date)?;

        if start.is_some() || end.is_some() {
            return Ok(AnalyticsWindow::Range(DateRange::new(start, end)?));
        }

        match non_empty(timeframe) {
            Some(raw) => Ok(AnalyticsWindow::Relative(raw.parse()?)),
            None => Ok(AnalyticsWindow::default()),
        }
    }

    pub fn resolve(&self, now: UtcDateTime) -> ResolvedWindow {
        match self {
            AnalyticsWindow::Range(range) => ResolvedWindow {
                timeframe: None,
                start: range.start,
                end: range.end,
            },
            AnalyticsWindow::Relative(timeframe) => ResolvedWindow {
                timeframe: Some(*timeframe),
                start: timeframe.days().map(|days| now - Duration::days(days)),
                end: None,
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<UtcDateTime>, AnalyticsError> {
    non_empty(value)
        .map(|raw| {
            raw.parse::<DateTime>()
                .map(UtcDateTime::from)
                .map_err(|e| AnalyticsError::InvalidWindow(format!("{}: {}", name, e)))
        })
        .transpose()
}

/// Window bounds after resolution, echoed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub start: Option<UtcDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end: Option<UtcDateTime>,
}

impl ResolvedWindow {
    pub fn date_range(&self) -> Option<DateRange> {
        let range = DateRange {
            start: self.start,
            end: self.end,
        };
        (!range.is_unbounded()).then_some(range)
    }
}

/// Filter threaded through every storage call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub shop_id: String,
    pub popup_id: Option<String>,
    pub date_range: Option<DateRange>,
}

impl QueryFilter {
    pub fn new(
        shop_id: impl Into<String>,
        popup_id: Option<String>,
        date_range: Option<DateRange>,
    ) -> Self {
        Self {
            shop_id: shop_id.into(),
            popup_id,
            date_range,
        }
    }

    /// Whether a row with these attributes falls inside the filter
    pub fn matches(&self, shop_id: &str, popup_id: Option<&str>, at: &UtcDateTime) -> bool {
        if self.shop_id != shop_id {
            return false;
        }
        if let Some(wanted) = &self.popup_id {
            if popup_id != Some(wanted.as_str()) {
                return false;
            }
        }
        self.date_range.map_or(true, |range| range.contains(at))
    }
}

/// Count of events for one step number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCount {
    pub step_number: i32,
    pub count: u64,
}

/// Count of events for one (calendar date, event type) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyEventCount {
    /// `YYYY-MM-DD`, UTC
    pub date: String,
    pub event_type: String,
    pub count: u64,
}

/// Event totals and rates. Rates are percentages rounded to two decimals
/// and may exceed 100 when visitors fire an event more than once.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSummary {
    pub impressions: u64,
    pub clicks: u64,
    pub closes: u64,
    pub completions: u64,
    pub emails_collected: u64,
    pub click_rate: f64,
    pub close_rate: f64,
    pub conversion_rate: f64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepFunnelEntry {
    pub step_number: i32,
    /// Absent when the report is not scoped to a popup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_type: Option<String>,
    pub views: u64,
    pub completions: u64,
    pub completion_rate: f64,
    /// `views - completions`; negative only if the event log is inconsistent
    pub drop_off_count: i64,
    pub drop_off_rate: f64,
}

/// Date (`YYYY-MM-DD`) -> event type -> count
pub type DailySeries = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub shop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_id: Option<String>,
    pub summary: FunnelSummary,
    pub step_funnel: Vec<StepFunnelEntry>,
    #[schema(value_type = Object)]
    pub daily_series: DailySeries,
    pub window: ResolvedWindow,
}
