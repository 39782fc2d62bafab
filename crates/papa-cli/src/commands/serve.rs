use axum::{response::Json, routing::get, Router};
use clap::Args;
use papa_analytics::handlers::{configure_routes, AppState, FunnelAnalyticsApiDoc};
use papa_analytics::{FunnelAnalyticsService, SeaOrmAnalyticsStore};
use papa_core::{ServerConfig, DEFAULT_ADDRESS};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::DatabaseArgs;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = DEFAULT_ADDRESS, env = "PAPA_ADDRESS")]
    pub address: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let config = ServerConfig::new(self.address.clone(), self.database.config())?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run_server(config))
    }
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    debug!("Initializing database connection...");
    let db = papa_database::establish_connection(&config.database).await?;

    let store = Arc::new(SeaOrmAnalyticsStore::new(db));
    let service = Arc::new(FunnelAnalyticsService::new(store));
    let app = build_router(service);

    let listener = TcpListener::bind(config.socket_addr()?).await?;
    info!("Papa Popup analytics API listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Analytics API server exited");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c signal: {}", e);
        return;
    }
    info!("Received Ctrl+C, shutting down");
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn create_openapi() -> utoipa::openapi::OpenApi {
    use utoipa::openapi::*;

    let mut openapi = OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Papa Popup")
                .description(Some("Funnel analytics for storefront popups"))
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .servers(Some(vec![ServerBuilder::new()
            .url("/api")
            .description(Some("Base path for all API endpoints"))
            .build()]))
        .build();
    openapi.merge(FunnelAnalyticsApiDoc::openapi());
    openapi
}

/// Full application router: API under `/api`, health check and Swagger UI
pub fn build_router(service: Arc<FunnelAnalyticsService>) -> Router {
    let state = Arc::new(AppState {
        analytics_service: service,
    });

    Router::new()
        .route("/health", get(health))
        .nest("/api", configure_routes().with_state(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", create_openapi()))
        .layer(TraceLayer::new_for_http())
}
