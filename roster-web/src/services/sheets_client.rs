//! Google Sheets API client
//!
//! Reads a range via `GET /v4/spreadsheets/{id}/values/{range}?key=...`.
//! The API omits `values` entirely when the range holds no data.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use roster_common::config::SheetCoordinates;
use roster_common::sync::RowSource;
use roster_common::{Error, Result};

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const USER_AGENT: &str = concat!("fleet-roster/", env!("CARGO_PKG_VERSION"));

/// `spreadsheets.values.get` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

impl ValueRange {
    /// Rows as strings, `None` if the response carried no values
    pub fn into_rows(self) -> Option<Vec<Vec<String>>> {
        self.values.map(|rows| {
            rows.into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect())
                .collect()
        })
    }
}

/// Stringify one cell; formatted values arrive as strings already
pub fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Row source backed by the Google Sheets REST API
pub struct SheetsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SHEETS_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn values_url(&self, coords: &SheetCoordinates) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("Sheets base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                coords.spreadsheet_id.as_str(),
                "values",
                coords.range.as_str(),
            ]);
        url.query_pairs_mut().append_pair("key", &coords.api_key);
        Ok(url)
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    async fn fetch_rows(&self, coords: &SheetCoordinates) -> Result<Option<Vec<Vec<String>>>> {
        let url = self.values_url(coords)?;

        tracing::debug!(
            spreadsheet_id = %coords.spreadsheet_id,
            range = %coords.range,
            "Fetching spreadsheet values"
        );

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Sheets request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Sheets API returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Sheets response parse error: {}", e)))?;

        Ok(value_range.into_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coords() -> SheetCoordinates {
        SheetCoordinates {
            spreadsheet_id: "1AbC-xyz".to_string(),
            range: "Fleet Roster!A1:M500".to_string(),
            api_key: "k&y".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(SheetsClient::new().is_ok());
    }

    #[test]
    fn test_values_url_encodes_range_and_key() {
        let client = SheetsClient::with_base_url("https://sheets.example.test/").unwrap();
        let url = client.values_url(&coords()).unwrap();

        assert_eq!(
            url.as_str(),
            "https://sheets.example.test/v4/spreadsheets/1AbC-xyz/values/Fleet%20Roster!A1:M500?key=k%26y"
        );
    }

    #[test]
    fn test_value_range_without_values_is_none() {
        let range: ValueRange =
            serde_json::from_value(json!({"range": "Fleet!A1:M1", "majorDimension": "ROWS"}))
                .unwrap();
        assert!(range.into_rows().is_none());
    }

    #[test]
    fn test_value_range_stringifies_cells() {
        let range: ValueRange = serde_json::from_value(json!({
            "range": "Fleet!A1:M2",
            "majorDimension": "ROWS",
            "values": [["55 — Patrol"], ["7", 155001, true, null]]
        }))
        .unwrap();

        let rows = range.into_rows().unwrap();
        assert_eq!(rows[0], vec!["55 — Patrol"]);
        assert_eq!(rows[1], vec!["7", "155001", "true", ""]);
    }
}
