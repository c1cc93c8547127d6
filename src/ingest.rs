use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::catalog::CatalogClient;
use crate::decode::CsvOptions;
use crate::domain::{DatasetId, TabularFormat};
use crate::error::AneelError;
use crate::fetch::{FetchOutcome, FileFetcher};
use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Discovery,
    Fetch,
    Normalize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOutcome {
    Ingested { clean: Utf8PathBuf },
    SkippedExisting { path: Utf8PathBuf },
    Failed { stage: IngestStage, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestItem {
    pub dataset: String,
    pub resource: Option<String>,
    pub url: Option<String>,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub items: Vec<IngestItem>,
}

impl IngestReport {
    // Normalized paths produced by this run, in ingestion order.
    pub fn produced(&self) -> Vec<&Utf8Path> {
        self.items
            .iter()
            .filter_map(|item| match &item.outcome {
                ItemOutcome::Ingested { clean } => Some(clean.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
            .count()
    }
}

pub struct Ingestor<C: CatalogClient, F: FileFetcher> {
    catalog: C,
    fetcher: F,
    processed_dir: Utf8PathBuf,
    csv_options: CsvOptions,
}

impl<C: CatalogClient, F: FileFetcher> Ingestor<C, F> {
    pub fn new(catalog: C, fetcher: F, processed_dir: Utf8PathBuf, csv_options: CsvOptions) -> Self {
        Self {
            catalog,
            fetcher,
            processed_dir,
            csv_options,
        }
    }

    // One dataset's or one resource's failure never aborts the run; every
    // attempt is recorded in the report. Nothing retries.
    pub fn run(&self, datasets: &[DatasetId]) -> Result<IngestReport, AneelError> {
        fs::create_dir_all(self.processed_dir.as_std_path())
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;

        let mut report = IngestReport::default();
        for dataset in datasets {
            tracing::info!(dataset = %dataset, "discovering resources");
            let resources = match self.catalog.list_resources(dataset) {
                Ok(resources) => resources,
                Err(err) => {
                    tracing::warn!(dataset = %dataset, error = %err, "discovery failed, skipping dataset");
                    report.items.push(IngestItem {
                        dataset: dataset.to_string(),
                        resource: None,
                        url: None,
                        outcome: ItemOutcome::Failed {
                            stage: IngestStage::Discovery,
                            error: err.to_string(),
                        },
                    });
                    continue;
                }
            };

            for resource in resources {
                if TabularFormat::from_url(&resource.url).is_none() {
                    continue;
                }
                let outcome = self.ingest_resource(&resource.url);
                if let ItemOutcome::Failed { stage, error } = &outcome {
                    tracing::warn!(
                        dataset = %dataset,
                        resource = resource.display_name(),
                        stage = ?stage,
                        error = %error,
                        "resource skipped"
                    );
                }
                report.items.push(IngestItem {
                    dataset: dataset.to_string(),
                    resource: Some(resource.display_name().to_string()),
                    url: Some(resource.url.clone()),
                    outcome,
                });
            }
        }
        Ok(report)
    }

    fn ingest_resource(&self, url: &str) -> ItemOutcome {
        let fetched = match self.fetcher.fetch(url, &self.processed_dir) {
            Ok(outcome) => outcome,
            Err(err) => {
                return ItemOutcome::Failed {
                    stage: IngestStage::Fetch,
                    error: err.to_string(),
                };
            }
        };

        match fetched {
            // Files skipped as already present are not re-normalized on
            // this run; their clean copy came from the run that wrote them.
            FetchOutcome::AlreadyExists(path) => {
                tracing::info!(path = %path, "already present, skipping");
                ItemOutcome::SkippedExisting { path }
            }
            FetchOutcome::Downloaded(path) => match normalize(&path, &self.csv_options) {
                Ok(clean) => ItemOutcome::Ingested { clean },
                Err(err) => ItemOutcome::Failed {
                    stage: IngestStage::Normalize,
                    error: err.to_string(),
                },
            },
        }
    }
}
