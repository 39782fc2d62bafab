//! Popup funnel analytics
//!
//! Read-only aggregation over the popup event log: summary counts and rates,
//! a per-step funnel, and a daily event series for one shop.

pub mod error;
pub mod handlers;
pub mod services;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use error::AnalyticsError;
pub use services::{FunnelAnalyticsService, ReportRequest};
pub use store::{AnalyticsStore, SeaOrmAnalyticsStore};
pub use types::*;
