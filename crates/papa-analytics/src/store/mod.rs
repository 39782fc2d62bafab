//! Storage seam for funnel analytics
//!
//! The service only ever reads through [`AnalyticsStore`], so the Postgres
//! implementation can be swapped for an in-memory one in tests.

mod sea_orm_store;

use async_trait::async_trait;
use papa_entities::{popup_steps, popups, shops, EventType};
use sea_orm::DbErr;

use crate::types::{DailyEventCount, QueryFilter, StepCount};

pub use sea_orm_store::SeaOrmAnalyticsStore;

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn find_shop_by_domain(&self, domain: &str) -> Result<Option<shops::Model>, DbErr>;

    /// Popup by id, only if it belongs to the shop
    async fn find_popup(
        &self,
        shop_id: &str,
        popup_id: &str,
    ) -> Result<Option<popups::Model>, DbErr>;

    /// Configured steps ordered by step number ascending
    async fn list_steps_for_popup(&self, popup_id: &str)
        -> Result<Vec<popup_steps::Model>, DbErr>;

    /// Number of events matching the filter whose type is any of `event_types`
    async fn count_events(
        &self,
        filter: &QueryFilter,
        event_types: &[EventType],
    ) -> Result<u64, DbErr>;

    /// Events of one type grouped by step number, ascending. Events without a
    /// step number are skipped.
    async fn group_events_by_step_number(
        &self,
        filter: &QueryFilter,
        event_type: EventType,
    ) -> Result<Vec<StepCount>, DbErr>;

    async fn count_collected_emails(&self, filter: &QueryFilter) -> Result<u64, DbErr>;

    /// Per (UTC date, event type) counts for the `limit` most recent distinct
    /// dates that have any events in the filter.
    async fn daily_event_counts(
        &self,
        filter: &QueryFilter,
        limit: u32,
    ) -> Result<Vec<DailyEventCount>, DbErr>;
}
