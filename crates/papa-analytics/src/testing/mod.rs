//! Test doubles shared by the service and handler tests

mod memory_store;

pub use memory_store::InMemoryAnalyticsStore;
