//! Papa Popup CLI
//!
//! Runs the funnel analytics API or prints a single report from the command line.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ReportCommand, ServeCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "PAPA_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "PAPA_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analytics HTTP API server
    Serve(ServeCommand),
    /// Compute one funnel report and print it as JSON
    Report(ReportCommand),
}

fn log_filter(log_level: &str) -> anyhow::Result<tracing_subscriber::EnvFilter> {
    // RUST_LOG takes full control when set
    if std::env::var("RUST_LOG").is_ok() {
        return tracing_subscriber::EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG environment variable: {}", e));
    }

    Ok(tracing_subscriber::EnvFilter::new(format!(
        "papa_cli={level},\
         papa_core={level},\
         papa_database={level},\
         papa_migrations={level},\
         papa_analytics={level},\
         tower_http={level},\
         sqlx=warn,\
         sea_orm=warn,\
         sea_orm_migration=warn,\
         h2=warn,\
         tower=warn,\
         hyper=warn,\
         rustls=warn",
        level = log_level
    )))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer() // "compact" or any other value
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(log_filter(&cli.log_level)?)
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve(serve_cmd) => serve_cmd.execute(),
        Commands::Report(report_cmd) => report_cmd.execute(),
    }
}
