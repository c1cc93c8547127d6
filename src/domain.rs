use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::AneelError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId(String);

impl DatasetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetId {
    type Err = AneelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !is_valid {
            return Err(AneelError::InvalidDatasetId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for DatasetId {
    type Error = AneelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatasetId> for String {
    fn from(value: DatasetId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

impl ResourceDescriptor {
    // Catalog entries carry a null or empty name often enough that the id
    // has to stand in for it.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xls,
    Xlsx,
}

impl TabularFormat {
    pub fn from_url(url: &str) -> Option<Self> {
        let without_query = url.split('?').next().unwrap_or(url);
        Self::from_extension(without_query.rsplit('.').next().unwrap_or(""))
    }

    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        Self::from_extension(path.extension().unwrap_or(""))
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(TabularFormat::Csv),
            "xls" => Some(TabularFormat::Xls),
            "xlsx" => Some(TabularFormat::Xlsx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    use super::*;

    #[test]
    fn parse_dataset_id_valid() {
        let id: DatasetId = " Geracao ".parse().unwrap();
        assert_eq!(id.as_str(), "geracao");

        let id: DatasetId = "indicadores-de-distribuicao".parse().unwrap();
        assert_eq!(id.as_str(), "indicadores-de-distribuicao");
    }

    #[test]
    fn parse_dataset_id_invalid() {
        let err = "".parse::<DatasetId>().unwrap_err();
        assert_matches!(err, AneelError::InvalidDatasetId(_));

        let err = "tarifas medias".parse::<DatasetId>().unwrap_err();
        assert_matches!(err, AneelError::InvalidDatasetId(_));
    }

    #[test]
    fn format_from_url_strips_query() {
        assert_eq!(
            TabularFormat::from_url("https://x/y/report.csv?v=2"),
            Some(TabularFormat::Csv)
        );
        assert_eq!(
            TabularFormat::from_url("https://x/y/perdas.XLSX"),
            Some(TabularFormat::Xlsx)
        );
        assert_eq!(TabularFormat::from_url("https://x/y/relatorio.pdf"), None);
        assert_eq!(TabularFormat::from_url("https://x/y/sem-extensao"), None);
    }

    #[test]
    fn format_from_path() {
        let path = Utf8PathBuf::from("processed/perdas.xls");
        assert_eq!(TabularFormat::from_path(&path), Some(TabularFormat::Xls));
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let resource = ResourceDescriptor {
            id: "res-1".to_string(),
            name: Some("  ".to_string()),
            url: "https://x/a.csv".to_string(),
        };
        assert_eq!(resource.display_name(), "res-1");

        let resource = ResourceDescriptor {
            id: "res-2".to_string(),
            name: None,
            url: "https://x/b.csv".to_string(),
        };
        assert_eq!(resource.display_name(), "res-2");
    }
}
