use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ytdlp_api::downloader::{tools, YtDlpCli};
use ytdlp_api::server::{self, AppContext};
use ytdlp_api::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let ytdlp_path = tools::find_ytdlp(config.ytdlp_path.as_deref());
    match tools::get_version(&ytdlp_path).await {
        Some(version) => tracing::info!("Tool found: yt-dlp {} ({})", version, ytdlp_path.display()),
        None => tracing::warn!(
            "yt-dlp not runnable at {}; requests will fail until it is installed",
            ytdlp_path.display()
        ),
    }

    match config.proxy() {
        Some(proxy) => tracing::info!(
            "Using proxy {}",
            ytdlp_api::downloader::utils::redact_credentials(proxy)
        ),
        None => tracing::info!("No proxy configured"),
    }

    let ctx = AppContext::new(config, Arc::new(YtDlpCli::new(ytdlp_path)));

    server::serve(ctx).await.context("server error")?;

    Ok(())
}
