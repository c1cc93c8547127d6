use std::thread;
use std::time::Duration;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use aneel_data::config::ConfigLoader;
use aneel_data::watch::{ChangeKind, ChangeWatcher, HttpPageFetcher};

#[derive(Parser)]
#[command(name = "aneel-watch")]
#[command(about = "Poll regulator pages and report content changes")]
#[command(version, author)]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    interval_secs: Option<u64>,

    #[arg(long)]
    once: bool,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    let interval = Duration::from_secs(cli.interval_secs.unwrap_or(config.watch.interval_secs));

    let fetcher = HttpPageFetcher::new().into_diagnostic()?;
    let mut watcher = ChangeWatcher::new(fetcher, config.watch.targets.clone());

    loop {
        for event in watcher.poll_once() {
            if event.kind == ChangeKind::Changed {
                println!("Mudança detectada em: {} - {}", event.name, event.url);
            }
        }
        if cli.once {
            break;
        }
        thread::sleep(interval);
    }
    Ok(())
}
