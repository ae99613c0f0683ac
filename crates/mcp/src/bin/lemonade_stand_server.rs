use anyhow::{Context, Result};
use mcp_adapter::LemonadeStandServer;
use stand_core::config::{AppConfig, CONFIG};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config: &AppConfig = &CONFIG;
    init_tracing(config)?;

    info!(seeded = config.weather_seed.is_some(), "initializing Lemonade Stand MCP server");
    LemonadeStandServer::from_config(config).serve_stdio().await
}

// stdout carries the MCP stream, so logs go to stderr and a daily file.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lemonade-stand-server")
        .build(&config.logging.directory)
        .context("failed to create rolling file appender")?;

    let writer = std::io::stderr
        .with_max_level(tracing::Level::DEBUG)
        .and(file_appender);

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
