//! Schedule-date updates.
//!
//! An update is one find followed by one batch write: locate the row whose
//! identifier column matches, then set each target column of that row in a
//! single call. There is no locking; two concurrent updates to the same row
//! race, and the last write wins at the backing store.

use thiserror::Error;

use crate::store::{CellWrite, SheetStore, StoreError};

/// Update failure.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("identifier {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Set new cell values on the row identified by `target_id`.
///
/// `id_column` is the 1-based column searched for the identifier; `updates`
/// pairs A1 column letters with the new cell value for that column. A missing
/// identifier is an explicit [`UpdateError::NotFound`], never a silent no-op.
pub async fn update_schedule_dates<S: SheetStore>(
    store: &S,
    sheet: &str,
    id_column: u32,
    target_id: &str,
    updates: &[(&str, String)],
) -> Result<(), UpdateError> {
    let row = store
        .find_row(sheet, id_column, target_id)
        .await?
        .ok_or_else(|| UpdateError::NotFound(target_id.to_string()))?;

    let writes: Vec<CellWrite> = updates
        .iter()
        .map(|(column, value)| CellWrite::new(format!("{column}{row}"), value.clone()))
        .collect();

    store.batch_update(sheet, &writes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn task_sheet_fixture() -> MemoryStore {
        // Ids live in column X (1-based 24), matching the live tasks sheet.
        let mut task_row = vec![String::new(); 24];
        task_row[23] = "T-1".to_string();
        MemoryStore::new().with_sheet("SUBTAREFA", vec![vec!["header".to_string()], task_row])
    }

    #[tokio::test]
    async fn writes_each_column_on_the_matched_row() {
        let store = task_sheet_fixture();
        update_schedule_dates(
            &store,
            "SUBTAREFA",
            24,
            "T-1",
            &[
                ("AB", "01/03/2024 00:00:00".to_string()),
                ("AH", "15/03/2024 00:00:00".to_string()),
            ],
        )
        .await
        .unwrap();

        assert_eq!(
            store.cell_value("SUBTAREFA", "AB2").as_deref(),
            Some("01/03/2024 00:00:00")
        );
        assert_eq!(
            store.cell_value("SUBTAREFA", "AH2").as_deref(),
            Some("15/03/2024 00:00:00")
        );
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let store = task_sheet_fixture();
        let result = update_schedule_dates(
            &store,
            "SUBTAREFA",
            24,
            "T-9",
            &[("AB", String::new())],
        )
        .await;
        assert!(matches!(result, Err(UpdateError::NotFound(id)) if id == "T-9"));
    }

    #[tokio::test]
    async fn empty_value_clears_the_cell() {
        let store = task_sheet_fixture();
        store
            .batch_update("SUBTAREFA", &[CellWrite::new("AB2", "old")])
            .await
            .unwrap();
        update_schedule_dates(&store, "SUBTAREFA", 24, "T-1", &[("AB", String::new())])
            .await
            .unwrap();
        assert_eq!(store.cell_value("SUBTAREFA", "AB2").as_deref(), Some(""));
    }
}
