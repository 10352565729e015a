use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;

/// Runtime configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard-patcher", version, about = "Web panel for editing the dashboards collection")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory served at the web root.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Database used when the connection string names none.
    #[arg(long, env = "DEFAULT_DATABASE", default_value = "test")]
    pub default_database: String,

    /// Reported to the server as the client application name.
    #[arg(long, env = "APP_NAME", default_value = "Dashboard Patcher")]
    pub app_name: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Bind the listener; `host` may be a name such as `localhost`.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", self.host, self.port))
    }
}
