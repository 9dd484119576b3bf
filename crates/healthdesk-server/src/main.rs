use clap::Parser;
use healthdesk_core::AppConfig;
use healthdesk_server::{AppState, HealthdeskServer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "healthdesk", version, about = "Server health dashboard backend")]
struct Cli {
    /// Path to config.toml. Defaults to ./config.toml when present.
    #[arg(long, env = "HEALTHDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Override `server.bind`, e.g. 0.0.0.0:5000
    #[arg(long)]
    bind: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    HealthdeskServer::new(AppState::from_config(config)).run().await
}
