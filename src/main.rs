use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use filmdeck::api::FilmClient;
use filmdeck::app::route::Route;
use filmdeck::util::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "filmdeck", version, about = "Terminal client for a film catalog API")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the catalog API (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Screen to open first, e.g. /search or /films/3
    #[arg(short, long)]
    route: Option<String>,

    /// Enable debug logging to file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let _guard = setup_logging(&config, cli.debug)?;

    let raw_route = cli.route.as_deref().unwrap_or(&config.ui.start_route);
    let start: Route = raw_route.parse()?;

    let client = FilmClient::new(&config.api.base_url)
        .with_context(|| format!("Invalid API URL: {}", config.api.base_url))?;

    info!(api = %client.base_url(), docs = %client.docs_url(), route = %start, "filmdeck starting");

    filmdeck::app::event_loop::run(client, start).await
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if !debug {
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "filmdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("filmdeck=debug")
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
