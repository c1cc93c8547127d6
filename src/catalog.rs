use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::{DatasetId, ResourceDescriptor};
use crate::error::AneelError;

pub const DEFAULT_CATALOG_URL: &str = "https://dadosabertos.aneel.gov.br/api/3/action";

pub trait CatalogClient: Send + Sync {
    fn list_resources(&self, dataset: &DatasetId) -> Result<Vec<ResourceDescriptor>, AneelError>;
}

#[derive(Debug, Deserialize)]
struct PackageShowResponse {
    success: bool,
    #[serde(default)]
    result: Option<PackageResult>,
}

#[derive(Debug, Deserialize)]
struct PackageResult {
    #[serde(default)]
    resources: Vec<ResourceDescriptor>,
}

#[derive(Clone)]
pub struct CkanHttpClient {
    client: Client,
    base_url: String,
}

impl CkanHttpClient {
    pub fn new(base_url: &str) -> Result<Self, AneelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("aneel-data/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AneelError::CatalogHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|err| AneelError::CatalogHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn package_show_url(&self) -> String {
        format!("{}/package_show", self.base_url)
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, AneelError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "catalog request failed".to_string());
        Err(AneelError::CatalogStatus { status, message })
    }
}

impl CatalogClient for CkanHttpClient {
    fn list_resources(&self, dataset: &DatasetId) -> Result<Vec<ResourceDescriptor>, AneelError> {
        let url = self.package_show_url();
        let response = self
            .client
            .get(&url)
            .query(&[("id", dataset.as_str())])
            .send()
            .map_err(|err| AneelError::CatalogHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let payload: PackageShowResponse = response
            .json()
            .map_err(|err| AneelError::CatalogHttp(err.to_string()))?;

        if !payload.success {
            return Err(AneelError::DatasetUnknown(dataset.to_string()));
        }
        Ok(payload.result.map(|result| result.resources).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_package_show_payload() {
        let raw = r#"{
            "success": true,
            "result": {
                "resources": [
                    {"id": "r1", "name": "Perdas por distribuidora", "url": "https://x/perdas.xlsx"},
                    {"id": "r2", "url": "https://x/notas.pdf"}
                ]
            }
        }"#;
        let payload: PackageShowResponse = serde_json::from_str(raw).unwrap();
        assert!(payload.success);
        let resources = payload.result.unwrap().resources;
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].display_name(), "Perdas por distribuidora");
        assert_eq!(resources[1].display_name(), "r2");
    }

    #[test]
    fn decode_unknown_dataset_payload() {
        let payload: PackageShowResponse =
            serde_json::from_str(r#"{"success": false, "error": {"message": "Not found"}}"#).unwrap();
        assert!(!payload.success);
        assert!(payload.result.is_none());
    }
}
