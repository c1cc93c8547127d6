use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::decode::{CsvOptions, TextEncoding};
use crate::domain::DatasetId;
use crate::error::AneelError;
use crate::watch::WatchTarget;

pub const DEFAULT_CONFIG_FILE: &str = "aneel.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub datasets: Vec<DatasetId>,
    pub processed_dir: Utf8PathBuf,
    pub catalog_url: String,
    pub bind_addr: String,
    pub csv: CsvConfig,
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: default_datasets(),
            processed_dir: Utf8PathBuf::from("processed"),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            csv: CsvConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,
    pub encoding: TextEncoding,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            encoding: TextEncoding::Latin1,
        }
    }
}

impl CsvConfig {
    pub fn to_options(&self) -> Result<CsvOptions, AneelError> {
        if !self.delimiter.is_ascii() {
            return Err(AneelError::ConfigParse(format!(
                "csv delimiter must be ASCII, got {:?}",
                self.delimiter
            )));
        }
        Ok(CsvOptions {
            delimiter: self.delimiter as u8,
            encoding: self.encoding,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub interval_secs: u64,
    pub targets: Vec<WatchTarget>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            targets: vec![
                WatchTarget {
                    name: "ANEEL_CP".to_string(),
                    url: "https://www.aneel.gov.br/consultas-publicas".to_string(),
                },
                WatchTarget {
                    name: "MME_Portarias".to_string(),
                    url: "https://www.gov.br/mme/pt-br/acesso-a-informacao/portarias".to_string(),
                },
            ],
        }
    }
}

fn default_datasets() -> Vec<DatasetId> {
    ["geracao", "indicadores-de-distribuicao", "sird"]
        .iter()
        .map(|id| id.parse().expect("default dataset ids are valid"))
        .collect()
}

pub struct ConfigLoader;

impl ConfigLoader {
    // An explicitly passed path must exist and parse; the default file is
    // optional and its absence yields the built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<Config, AneelError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| AneelError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| AneelError::ConfigParse(err.to_string()))
    }
}
