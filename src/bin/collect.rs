use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use aneel_data::catalog::CkanHttpClient;
use aneel_data::config::ConfigLoader;
use aneel_data::domain::DatasetId;
use aneel_data::error::AneelError;
use aneel_data::fetch::HttpFetcher;
use aneel_data::ingest::Ingestor;
use aneel_data::report::{JsonOutput, OutputMode, print_summary};

#[derive(Parser)]
#[command(name = "aneel-collect")]
#[command(about = "Collect, download and normalize ANEEL open-data resources")]
#[command(version, author)]
struct Cli {
    #[arg(help = "Dataset ids to ingest (defaults to the configured list)")]
    datasets: Vec<String>,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    processed_dir: Option<Utf8PathBuf>,

    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<AneelError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AneelError) -> u8 {
    match error {
        AneelError::ConfigRead(_) | AneelError::ConfigParse(_) | AneelError::InvalidDatasetId(_) => 2,
        AneelError::CatalogHttp(_)
        | AneelError::CatalogStatus { .. }
        | AneelError::FetchHttp(_)
        | AneelError::FetchStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;

    let datasets: Vec<DatasetId> = if cli.datasets.is_empty() {
        config.datasets.clone()
    } else {
        cli.datasets
            .iter()
            .map(|id| id.parse())
            .collect::<Result<_, AneelError>>()
            .into_diagnostic()?
    };

    let processed_dir = cli.processed_dir.unwrap_or_else(|| config.processed_dir.clone());
    let csv_options = config.csv.to_options().into_diagnostic()?;
    let catalog = CkanHttpClient::new(&config.catalog_url).into_diagnostic()?;
    let fetcher = HttpFetcher::new().into_diagnostic()?;
    let ingestor = Ingestor::new(catalog, fetcher, processed_dir, csv_options);

    let report = ingestor.run(&datasets).into_diagnostic()?;

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    match output_mode {
        OutputMode::Json => JsonOutput::print_report(&report).into_diagnostic()?,
        OutputMode::Human => print_summary(&report),
    }
    Ok(())
}
