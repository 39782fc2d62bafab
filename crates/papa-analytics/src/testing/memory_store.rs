use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use papa_entities::{collected_emails, popup_events, popup_steps, popups, shops, EventType};
use sea_orm::DbErr;
use std::collections::{BTreeMap, BTreeSet};

use crate::store::AnalyticsStore;
use crate::types::{DailyEventCount, QueryFilter, StepCount};

/// Fixed instant all fixtures are created at
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// In-memory store with the same filtering rules as the SQL store
#[derive(Default)]
pub struct InMemoryAnalyticsStore {
    shops: Vec<shops::Model>,
    popups: Vec<popups::Model>,
    steps: Vec<popup_steps::Model>,
    events: Vec<popup_events::Model>,
    emails: Vec<collected_emails::Model>,
    failure: Option<String>,
    lookup_failure: Option<String>,
}

impl InMemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shop(mut self, id: &str, domain: &str) -> Self {
        self.shops.push(shops::Model {
            id: id.to_string(),
            shop_domain: domain.to_string(),
            created_at: fixture_time(),
            updated_at: fixture_time(),
        });
        self
    }

    pub fn with_popup(mut self, shop_id: &str, popup_id: &str) -> Self {
        self.popups.push(popups::Model {
            id: popup_id.to_string(),
            shop_id: shop_id.to_string(),
            name: format!("Popup {}", popup_id),
            is_active: true,
            created_at: fixture_time(),
            updated_at: fixture_time(),
        });
        self
    }

    pub fn with_step(mut self, popup_id: &str, step_number: i32, step_type: &str) -> Self {
        self.steps.push(popup_steps::Model {
            id: format!("{}-step-{}", popup_id, step_number),
            popup_id: popup_id.to_string(),
            step_number,
            step_type: step_type.to_string(),
            created_at: fixture_time(),
        });
        self
    }

    /// Append `count` identical events
    pub fn with_events(
        mut self,
        shop_id: &str,
        popup_id: Option<&str>,
        event_type: EventType,
        step_number: Option<i32>,
        timestamp: DateTime<Utc>,
        count: usize,
    ) -> Self {
        for _ in 0..count {
            let id = self.events.len() as i64 + 1;
            self.events.push(popup_events::Model {
                id,
                shop_id: shop_id.to_string(),
                popup_id: popup_id.map(str::to_string),
                event_type,
                step_number,
                timestamp,
            });
        }
        self
    }

    pub fn with_emails(
        mut self,
        shop_id: &str,
        popup_id: Option<&str>,
        created_at: DateTime<Utc>,
        count: usize,
    ) -> Self {
        for _ in 0..count {
            let n = self.emails.len() + 1;
            self.emails.push(collected_emails::Model {
                id: format!("email-{}", n),
                shop_id: shop_id.to_string(),
                popup_id: popup_id.map(str::to_string),
                email: format!("visitor{}@example.com", n),
                created_at,
            });
        }
        self
    }

    /// Make every aggregate query fail; lookups keep working
    pub fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Make shop, popup and step lookups fail
    pub fn failing_lookups_with(mut self, message: &str) -> Self {
        self.lookup_failure = Some(message.to_string());
        self
    }

    fn check_failure(&self) -> Result<(), DbErr> {
        match &self.failure {
            Some(message) => Err(DbErr::Custom(message.clone())),
            None => Ok(()),
        }
    }

    fn check_lookup_failure(&self) -> Result<(), DbErr> {
        match &self.lookup_failure {
            Some(message) => Err(DbErr::Custom(message.clone())),
            None => Ok(()),
        }
    }

    fn matching_events<'a>(
        &'a self,
        filter: &'a QueryFilter,
    ) -> impl Iterator<Item = &'a popup_events::Model> + 'a {
        self.events
            .iter()
            .filter(move |e| filter.matches(&e.shop_id, e.popup_id.as_deref(), &e.timestamp))
    }
}

#[async_trait]
impl AnalyticsStore for InMemoryAnalyticsStore {
    async fn find_shop_by_domain(&self, domain: &str) -> Result<Option<shops::Model>, DbErr> {
        self.check_lookup_failure()?;
        Ok(self.shops.iter().find(|s| s.shop_domain == domain).cloned())
    }

    async fn find_popup(
        &self,
        shop_id: &str,
        popup_id: &str,
    ) -> Result<Option<popups::Model>, DbErr> {
        self.check_lookup_failure()?;
        Ok(self
            .popups
            .iter()
            .find(|p| p.id == popup_id && p.shop_id == shop_id)
            .cloned())
    }

    async fn list_steps_for_popup(
        &self,
        popup_id: &str,
    ) -> Result<Vec<popup_steps::Model>, DbErr> {
        self.check_lookup_failure()?;
        let mut steps: Vec<_> = self
            .steps
            .iter()
            .filter(|s| s.popup_id == popup_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.step_number);
        Ok(steps)
    }

    async fn count_events(
        &self,
        filter: &QueryFilter,
        event_types: &[EventType],
    ) -> Result<u64, DbErr> {
        self.check_failure()?;
        Ok(self
            .matching_events(filter)
            .filter(|e| event_types.contains(&e.event_type))
            .count() as u64)
    }

    async fn group_events_by_step_number(
        &self,
        filter: &QueryFilter,
        event_type: EventType,
    ) -> Result<Vec<StepCount>, DbErr> {
        self.check_failure()?;
        let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
        for event in self.matching_events(filter) {
            if event.event_type != event_type {
                continue;
            }
            if let Some(step_number) = event.step_number {
                *counts.entry(step_number).or_insert(0) += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(step_number, count)| StepCount { step_number, count })
            .collect())
    }

    async fn count_collected_emails(&self, filter: &QueryFilter) -> Result<u64, DbErr> {
        self.check_failure()?;
        Ok(self
            .emails
            .iter()
            .filter(|e| filter.matches(&e.shop_id, e.popup_id.as_deref(), &e.created_at))
            .count() as u64)
    }

    async fn daily_event_counts(
        &self,
        filter: &QueryFilter,
        limit: u32,
    ) -> Result<Vec<DailyEventCount>, DbErr> {
        self.check_failure()?;
        let dates: BTreeSet<String> = self
            .matching_events(filter)
            .map(|e| e.timestamp.format("%Y-%m-%d").to_string())
            .collect();
        let recent: BTreeSet<String> = dates.into_iter().rev().take(limit as usize).collect();

        let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
        for event in self.matching_events(filter) {
            let date = event.timestamp.format("%Y-%m-%d").to_string();
            if recent.contains(&date) {
                *counts
                    .entry((date, event.event_type.as_str().to_string()))
                    .or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|((date, event_type), count)| DailyEventCount {
                date,
                event_type,
                count,
            })
            .collect())
    }
}
