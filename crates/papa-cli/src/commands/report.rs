use clap::Args;
use papa_analytics::{AnalyticsWindow, FunnelAnalyticsService, ReportRequest, SeaOrmAnalyticsStore};
use std::sync::Arc;
use tracing::debug;

use super::DatabaseArgs;

#[derive(Args)]
pub struct ReportCommand {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Shop domain, e.g. example.myshopify.com
    #[arg(long)]
    pub shop: String,

    /// Restrict the report to one popup
    #[arg(long)]
    pub popup_id: Option<String>,

    /// Relative window: 7d, 30d, 90d or all
    #[arg(long)]
    pub timeframe: Option<String>,

    /// ISO 8601 start of an explicit window
    #[arg(long)]
    pub start_date: Option<String>,

    /// ISO 8601 end of an explicit window
    #[arg(long)]
    pub end_date: Option<String>,
}

impl ReportCommand {
    fn request(&self) -> anyhow::Result<ReportRequest> {
        let window = AnalyticsWindow::from_params(
            self.timeframe.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?;

        let mut request = ReportRequest::new(self.shop.clone()).with_window(window);
        request.popup_id = self.popup_id.clone().filter(|id| !id.trim().is_empty());
        Ok(request)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let request = self.request()?;
        let config = self.database.config();

        let rt = tokio::runtime::Runtime::new()?;
        let report = rt.block_on(async {
            debug!("Initializing database connection...");
            let db = papa_database::establish_connection(&config).await?;
            let service = FunnelAnalyticsService::new(Arc::new(SeaOrmAnalyticsStore::new(db)));
            anyhow::Ok(service.compute_report(&request).await?)
        })?;

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papa_analytics::{AnalyticsError, Timeframe};

    fn command() -> ReportCommand {
        ReportCommand {
            database: DatabaseArgs {
                database_url: "postgres://localhost/papa".to_string(),
                db_max_connections: None,
                db_min_connections: None,
            },
            shop: "papa.myshopify.com".to_string(),
            popup_id: None,
            timeframe: None,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_request_defaults_to_seven_days() {
        let request = command().request().unwrap();
        assert_eq!(request.shop_domain, "papa.myshopify.com");
        assert_eq!(request.popup_id, None);
        assert_eq!(request.window, AnalyticsWindow::Relative(Timeframe::Last7Days));
    }

    #[test]
    fn test_request_rejects_unknown_timeframe() {
        let mut cmd = command();
        cmd.timeframe = Some("1y".to_string());

        let err = cmd.request().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalyticsError>(),
            Some(AnalyticsError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_request_with_explicit_range() {
        let mut cmd = command();
        cmd.popup_id = Some("popup_1".to_string());
        cmd.start_date = Some("2024-01-01".to_string());

        let request = cmd.request().unwrap();
        assert_eq!(request.popup_id.as_deref(), Some("popup_1"));
        assert!(matches!(request.window, AnalyticsWindow::Range(_)));
    }
}
