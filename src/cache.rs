use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::decode::{CsvOptions, TextEncoding, read_csv, read_spreadsheet};
use crate::domain::TabularFormat;
use crate::error::AneelError;
use crate::table::Table;

// Known naming convention for the loss dataset, checked in this order.
pub const LOSS_DATASET_CANDIDATES: [&str; 2] = ["perdas.xlsx", "perdas.csv"];

#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<String, Table>,
}

impl DatasetCache {
    // Built once at process start; never refreshed. Files added to the
    // directory afterwards stay invisible until restart.
    pub fn load(directory: &Utf8Path) -> Result<Self, AneelError> {
        let mut tables = HashMap::new();
        if !directory.as_std_path().exists() {
            tracing::warn!(directory = %directory, "processed directory missing, starting empty");
            return Ok(Self { tables });
        }

        let entries = fs::read_dir(directory.as_std_path())
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|err| AneelError::Filesystem(err.to_string()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                continue;
            };
            let Some(name) = path.file_name().map(|name| name.to_string()) else {
                continue;
            };

            match Self::load_file(&path) {
                Ok(Some(table)) => {
                    tracing::info!(file = %name, rows = table.len(), "cached");
                    tables.insert(name, table);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(file = %name, error = %err, "omitted from cache");
                }
            }
        }
        Ok(Self { tables })
    }

    fn load_file(path: &Utf8Path) -> Result<Option<Table>, AneelError> {
        match TabularFormat::from_path(path) {
            Some(TabularFormat::Csv) => {
                let utf8 = CsvOptions {
                    delimiter: b',',
                    encoding: TextEncoding::Utf8,
                };
                match read_csv(path, &utf8) {
                    Ok(table) => Ok(Some(table)),
                    // One retry as Latin-1, then give up on the file.
                    Err(_) => {
                        let latin1 = CsvOptions {
                            delimiter: b',',
                            encoding: TextEncoding::Latin1,
                        };
                        read_csv(path, &latin1).map(Some)
                    }
                }
            }
            Some(TabularFormat::Xls) | Some(TabularFormat::Xlsx) => {
                read_spreadsheet(path).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn from_tables(tables: HashMap<String, Table>) -> Self {
        Self { tables }
    }

    pub fn names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn loss_table(&self) -> Option<(&str, &Table)> {
        LOSS_DATASET_CANDIDATES
            .iter()
            .find_map(|name| self.tables.get(*name).map(|table| (*name, table)))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
