use chrono::{SubsecRound, Utc};
use papa_core::UtcDateTime;
use papa_entities::EventType;
use std::sync::Arc;
use tracing::{debug, error};

use super::report::{build_step_funnel, build_summary, fold_daily_series, EventTotals};
use crate::error::AnalyticsError;
use crate::store::AnalyticsStore;
use crate::types::{AnalyticsWindow, FunnelReport, QueryFilter, DAILY_SERIES_DAYS};

/// Input for one report computation
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub shop_domain: String,
    pub popup_id: Option<String>,
    pub window: AnalyticsWindow,
}

impl ReportRequest {
    pub fn new(shop_domain: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            popup_id: None,
            window: AnalyticsWindow::default(),
        }
    }

    pub fn with_popup(mut self, popup_id: impl Into<String>) -> Self {
        self.popup_id = Some(popup_id.into());
        self
    }

    pub fn with_window(mut self, window: AnalyticsWindow) -> Self {
        self.window = window;
        self
    }
}

pub struct FunnelAnalyticsService {
    store: Arc<dyn AnalyticsStore>,
}

impl FunnelAnalyticsService {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    pub async fn compute_report(
        &self,
        request: &ReportRequest,
    ) -> Result<FunnelReport, AnalyticsError> {
        self.compute_report_at(request, Utc::now()).await
    }

    /// Compute the report with relative windows anchored at `now`, truncated
    /// to whole seconds. Calls within the same second on an unchanged event
    /// log serialize identically.
    pub async fn compute_report_at(
        &self,
        request: &ReportRequest,
        now: UtcDateTime,
    ) -> Result<FunnelReport, AnalyticsError> {
        let now = now.trunc_subsecs(0);

        // Storage errors here are AggregationFailed; NotFound means absent
        let shop = self
            .store
            .find_shop_by_domain(&request.shop_domain)
            .await?
            .ok_or_else(|| {
                AnalyticsError::not_found(format!("shop '{}'", request.shop_domain))
            })?;

        let steps = match &request.popup_id {
            Some(popup_id) => {
                let popup = self
                    .store
                    .find_popup(&shop.id, popup_id)
                    .await?
                    .ok_or_else(|| AnalyticsError::not_found(format!("popup '{}'", popup_id)))?;
                Some(self.store.list_steps_for_popup(&popup.id).await?)
            }
            None => None,
        };

        let window = request.window.resolve(now);
        let filter = QueryFilter::new(
            shop.id.clone(),
            request.popup_id.clone(),
            window.date_range(),
        );

        debug!(
            "Computing funnel report for shop {} (popup: {:?}, window: {:?})",
            shop.id, filter.popup_id, window
        );

        let store = self.store.as_ref();
        let result = tokio::try_join!(
            store.count_events(&filter, &[EventType::Impression]),
            store.count_events(&filter, &EventType::CLICK_LIKE),
            store.count_events(&filter, &[EventType::Close]),
            store.count_events(&filter, &[EventType::Complete]),
            store.group_events_by_step_number(&filter, EventType::StepView),
            store.group_events_by_step_number(&filter, EventType::StepComplete),
            store.count_collected_emails(&filter),
            store.daily_event_counts(&filter, DAILY_SERIES_DAYS),
        );

        let (
            impressions,
            clicks,
            closes,
            completions,
            step_views,
            step_completions,
            emails,
            daily,
        ) = result.map_err(|e| {
            error!("Funnel aggregation failed for shop {}: {}", shop.id, e);
            AnalyticsError::from(e)
        })?;

        let summary = build_summary(EventTotals {
            impressions,
            clicks,
            closes,
            completions,
            emails_collected: emails,
        });
        let step_funnel = build_step_funnel(steps.as_deref(), &step_views, &step_completions);

        Ok(FunnelReport {
            shop_id: shop.id,
            popup_id: request.popup_id.clone(),
            summary,
            step_funnel,
            daily_series: fold_daily_series(daily),
            window,
        })
    }
}
