//! The boundary to the backing tabular store.
//!
//! Readers and the update writer only ever talk to a [`SheetStore`], so the
//! transformation logic is testable against [`MemoryStore`] and the live
//! Google Sheets backend stays in its own crate. [`StoreProvider`] captures
//! the session policy: every HTTP request opens and authorizes a fresh
//! session, nothing is pooled or reused across requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::a1;

/// Store access failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential error: {0}")]
    Credentials(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("backing store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// One cell write: an A1 range on a sheet (`"AB5"`) and its new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWrite {
    pub range: String,
    pub value: String,
}

impl CellWrite {
    pub fn new(range: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            value: value.into(),
        }
    }
}

/// A named-sheet tabular store.
///
/// Implementations interpret batch-written values the way a user typing them
/// would (so a `DD/MM/YYYY HH:MM:SS` string lands as a real date cell).
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read every row of a sheet. Rows are ragged: trailing empty cells are
    /// not transmitted.
    async fn read_all(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Find the first row whose cell in the given 1-based column equals
    /// `value` exactly. Returns the 1-based row number, header included.
    async fn find_row(
        &self,
        sheet: &str,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, StoreError>;

    /// Apply a batch of cell writes to one sheet in a single call.
    async fn batch_update(&self, sheet: &str, writes: &[CellWrite]) -> Result<(), StoreError>;
}

/// Opens a fresh store session.
#[async_trait]
pub trait StoreProvider: Send + Sync + 'static {
    type Store: SheetStore;

    /// Open and authorize a new session with the backing store.
    async fn connect(&self) -> Result<Self::Store, StoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory [`SheetStore`] over named grids of strings.
///
/// Backs the unit and router tests; clones share the same underlying data,
/// so a test can keep a handle and assert on cells written through the API.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    sheets: Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet with the given rows (builder style).
    pub fn with_sheet(self, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.sheets
            .lock()
            .expect("memory store lock")
            .insert(name.into(), rows);
        self
    }

    /// Read back a single cell by A1 range, for assertions.
    pub fn cell_value(&self, sheet: &str, range: &str) -> Option<String> {
        let (letters, row) = a1::split_range(range)?;
        let col = a1::letters_to_col(letters)?;
        let sheets = self.sheets.lock().expect("memory store lock");
        sheets
            .get(sheet)?
            .get(row as usize - 1)?
            .get(col as usize - 1)
            .cloned()
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn read_all(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let sheets = self.sheets.lock().expect("memory store lock");
        Ok(sheets.get(sheet).cloned().unwrap_or_default())
    }

    async fn find_row(
        &self,
        sheet: &str,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, StoreError> {
        let sheets = self.sheets.lock().expect("memory store lock");
        let Some(rows) = sheets.get(sheet) else {
            return Ok(None);
        };
        let index = column as usize - 1;
        let hit = rows
            .iter()
            .position(|row| row.get(index).is_some_and(|cell| cell == value));
        Ok(hit.map(|i| i as u32 + 1))
    }

    async fn batch_update(&self, sheet: &str, writes: &[CellWrite]) -> Result<(), StoreError> {
        let mut sheets = self.sheets.lock().expect("memory store lock");
        let rows = sheets.entry(sheet.to_string()).or_default();
        for write in writes {
            let (letters, row) = a1::split_range(&write.range).ok_or_else(|| {
                StoreError::MalformedResponse(format!("bad range {:?}", write.range))
            })?;
            let col = a1::letters_to_col(letters).ok_or_else(|| {
                StoreError::MalformedResponse(format!("bad range {:?}", write.range))
            })?;
            let (row, col) = (row as usize - 1, col as usize - 1);
            if rows.len() <= row {
                rows.resize(row + 1, Vec::new());
            }
            if rows[row].len() <= col {
                rows[row].resize(col + 1, String::new());
            }
            rows[row][col] = write.value.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl StoreProvider for MemoryStore {
    type Store = MemoryStore;

    async fn connect(&self) -> Result<MemoryStore, StoreError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn read_all_returns_rows_or_empty() {
        let store = MemoryStore::new().with_sheet("S", vec![row(&["a", "b"])]);
        assert_eq!(store.read_all("S").await.unwrap(), vec![row(&["a", "b"])]);
        assert!(store.read_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_row_matches_exact_cell_in_column() {
        let store = MemoryStore::new().with_sheet(
            "S",
            vec![row(&["id"]), row(&["T-1"]), row(&["T-2"])],
        );
        assert_eq!(store.find_row("S", 1, "T-2").await.unwrap(), Some(3));
        assert_eq!(store.find_row("S", 1, "T-9").await.unwrap(), None);
        // Short rows never match a wide column.
        assert_eq!(store.find_row("S", 4, "T-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn batch_update_grows_grid_as_needed() {
        let store = MemoryStore::new().with_sheet("S", vec![row(&["x"])]);
        store
            .batch_update(
                "S",
                &[
                    CellWrite::new("AB5", "01/03/2024 00:00:00"),
                    CellWrite::new("A1", "y"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            store.cell_value("S", "AB5").as_deref(),
            Some("01/03/2024 00:00:00")
        );
        assert_eq!(store.cell_value("S", "A1").as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = MemoryStore::new().with_sheet("S", vec![row(&["x"])]);
        let session = store.connect().await.unwrap();
        session
            .batch_update("S", &[CellWrite::new("B1", "written")])
            .await
            .unwrap();
        assert_eq!(store.cell_value("S", "B1").as_deref(), Some("written"));
    }
}
