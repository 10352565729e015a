use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dashboard_patcher::app::state::AppState;
use dashboard_patcher::config::{Config, LogFormat};
use dashboard_patcher::mongo::client::MongoConnector;
use dashboard_patcher::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format);

    let connector = MongoConnector::new(&config.app_name, &config.default_database);
    let state = AppState::new(Arc::new(connector));

    let listener = config.bind().await?;

    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = %config.static_dir.display(),
        "Dashboard patcher server running"
    );

    server::serve(listener, state, &config.static_dir, server::shutdown_signal()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
