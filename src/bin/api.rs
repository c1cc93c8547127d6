use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use aneel_data::cache::DatasetCache;
use aneel_data::config::ConfigLoader;
use aneel_data::server;

#[derive(Parser)]
#[command(name = "aneel-api")]
#[command(about = "Read-only query API over the processed ANEEL datasets")]
#[command(version, author)]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    bind: Option<String>,

    #[arg(long)]
    processed_dir: Option<Utf8PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    let processed_dir = cli.processed_dir.unwrap_or_else(|| config.processed_dir.clone());

    let cache = DatasetCache::load(&processed_dir).into_diagnostic()?;
    tracing::info!(datasets = cache.len(), dir = %processed_dir, "cache loaded");

    let bind_addr = cli.bind.unwrap_or_else(|| config.bind_addr.clone());
    server::serve(Arc::new(cache), &bind_addr)
        .await
        .into_diagnostic()
}
