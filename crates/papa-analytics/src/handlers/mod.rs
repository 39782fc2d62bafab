pub mod handler;
pub mod types;

pub use handler::{configure_routes, FunnelAnalyticsApiDoc};
pub use types::AppState;
