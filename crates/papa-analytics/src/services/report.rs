//! Pure assembly of report sections from raw counts

use papa_entities::popup_steps;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::{
    DailyEventCount, DailySeries, FunnelSummary, StepCount, StepFunnelEntry, DAILY_SERIES_DAYS,
};

/// `part / whole * 100` rounded to two decimals, `0` when `whole` is zero.
/// Not clamped: a result above 100 means events fired more than once per view.
pub fn rate(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw totals feeding the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub closes: u64,
    pub completions: u64,
    pub emails_collected: u64,
}

pub fn build_summary(totals: EventTotals) -> FunnelSummary {
    let impressions = totals.impressions as f64;
    FunnelSummary {
        impressions: totals.impressions,
        clicks: totals.clicks,
        closes: totals.closes,
        completions: totals.completions,
        emails_collected: totals.emails_collected,
        click_rate: rate(totals.clicks as f64, impressions),
        close_rate: rate(totals.closes as f64, impressions),
        conversion_rate: rate(totals.emails_collected as f64, impressions),
        completion_rate: rate(totals.completions as f64, impressions),
    }
}

/// Per-step funnel. Configured steps drive the rows when present; otherwise
/// every step number seen in either grouping gets a row without a type.
pub fn build_step_funnel(
    configured: Option<&[popup_steps::Model]>,
    views: &[StepCount],
    completions: &[StepCount],
) -> Vec<StepFunnelEntry> {
    let views: BTreeMap<i32, u64> = views.iter().map(|s| (s.step_number, s.count)).collect();
    let completions: BTreeMap<i32, u64> = completions
        .iter()
        .map(|s| (s.step_number, s.count))
        .collect();

    let rows: Vec<(i32, Option<String>)> = match configured {
        Some(steps) => {
            let mut steps: Vec<_> = steps
                .iter()
                .map(|s| (s.step_number, Some(s.step_type.clone())))
                .collect();
            steps.sort_by_key(|(number, _)| *number);
            steps
        }
        None => views
            .keys()
            .chain(completions.keys())
            .copied()
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .map(|number| (number, None))
            .collect(),
    };

    rows.into_iter()
        .map(|(step_number, step_type)| {
            let step_views = views.get(&step_number).copied().unwrap_or(0);
            let step_completions = completions.get(&step_number).copied().unwrap_or(0);
            let drop_off_count = step_views as i64 - step_completions as i64;

            StepFunnelEntry {
                step_number,
                step_type,
                views: step_views,
                completions: step_completions,
                completion_rate: rate(step_completions as f64, step_views as f64),
                drop_off_count,
                drop_off_rate: rate(drop_off_count as f64, step_views as f64),
            }
        })
        .collect()
}

/// Fold flat (date, event type, count) rows into the nested daily map,
/// keeping only the most recent dates.
pub fn fold_daily_series(rows: Vec<DailyEventCount>) -> DailySeries {
    let mut series = DailySeries::new();
    for row in rows {
        *series
            .entry(row.date)
            .or_default()
            .entry(row.event_type)
            .or_insert(0) += row.count;
    }

    while series.len() > DAILY_SERIES_DAYS as usize {
        series.pop_first();
    }

    series
}
