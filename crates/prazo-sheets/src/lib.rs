//! # prazo-sheets
//!
//! Google Sheets backend for the prazo timeline API.
//!
//! Implements [`prazo_core::SheetStore`] against the Sheets v4 values API:
//! whole-sheet reads, column-scan row lookup, and batch cell writes with
//! user-entered interpretation (so timestamp strings land as real date
//! cells). [`GoogleSheetsProvider`] opens a fresh, freshly-authorized
//! session per request; nothing is pooled or cached across requests.

pub mod auth;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use prazo_core::{a1, CellWrite, SheetStore, StoreError, StoreProvider};

pub use auth::ServiceAccountKey;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Writes are interpreted as if typed into the cell, so the sheet recognizes
/// date strings and applies its own formatting.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest {
    value_input_option: &'static str,
    data: Vec<WriteRange>,
}

#[derive(Debug, Serialize)]
struct WriteRange {
    range: String,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Qualify an A1 range with its sheet name (`"SUBTAREFA!AB5"`).
fn qualified_range(sheet: &str, range: &str) -> String {
    format!("{sheet}!{range}")
}

/// The whole-column range for a 1-based column (`"SUBTAREFA!X:X"`).
fn column_range(sheet: &str, column: u32) -> String {
    let letters = a1::col_to_letters(column);
    format!("{sheet}!{letters}:{letters}")
}

// ============================================================================
// Client
// ============================================================================

/// An authorized session against one spreadsheet.
pub struct GoogleSheets {
    http: reqwest::Client,
    token: String,
    spreadsheet_id: String,
}

impl GoogleSheets {
    /// Open a session: authorize the key and bind to a spreadsheet id.
    pub async fn connect(
        spreadsheet_id: impl Into<String>,
        key: &ServiceAccountKey,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::new();
        let token = auth::fetch_access_token(&http, key).await?;
        Ok(Self {
            http,
            token,
            spreadsheet_id: spreadsheet_id.into(),
        })
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = format!("{API_BASE}/{}/values/{range}", self.spreadsheet_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        Ok(body.values)
    }
}

/// Turn a non-2xx response into a [`StoreError::Api`], preferring the
/// structured error message when the body carries one.
async fn api_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    StoreError::Api { status, message }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn read_all(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.get_values(sheet).await
    }

    async fn find_row(
        &self,
        sheet: &str,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, StoreError> {
        let rows = self.get_values(&column_range(sheet, column)).await?;
        let hit = rows
            .iter()
            .position(|row| row.first().is_some_and(|cell| cell == value));
        Ok(hit.map(|i| i as u32 + 1))
    }

    async fn batch_update(&self, sheet: &str, writes: &[CellWrite]) -> Result<(), StoreError> {
        let request = BatchUpdateRequest {
            value_input_option: VALUE_INPUT_OPTION,
            data: writes
                .iter()
                .map(|w| WriteRange {
                    range: qualified_range(sheet, &w.range),
                    values: vec![vec![w.value.clone()]],
                })
                .collect(),
        };

        let url = format!("{API_BASE}/{}/values:batchUpdate", self.spreadsheet_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Opens a fresh [`GoogleSheets`] session per request.
///
/// The key file is re-read and the token re-fetched on every connect; a
/// rotated key takes effect on the next request without a restart.
#[derive(Clone, Debug)]
pub struct GoogleSheetsProvider {
    spreadsheet_id: String,
    creds_file: PathBuf,
}

impl GoogleSheetsProvider {
    pub fn new(spreadsheet_id: impl Into<String>, creds_file: impl Into<PathBuf>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            creds_file: creds_file.into(),
        }
    }
}

#[async_trait]
impl StoreProvider for GoogleSheetsProvider {
    type Store = GoogleSheets;

    async fn connect(&self) -> Result<GoogleSheets, StoreError> {
        let key = ServiceAccountKey::from_file(&self.creds_file)?;
        GoogleSheets::connect(self.spreadsheet_id.clone(), &key).await
    }
}
