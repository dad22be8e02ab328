//! # prazo-core
//!
//! Domain model and row transformation for the prazo timeline API.
//!
//! This crate provides:
//! - The [`Record`] type: one normalized project or task entry, serialized as
//!   the fixed-position row array a timeline chart consumes
//! - Row-to-record readers for the two source sheets
//! - Date parsing for the inconsistent formats found in human-entered cells
//! - Status classification into a fixed set of chart color tags
//! - The [`SheetStore`] trait boundary to the backing tabular store
//!
//! ## Example
//!
//! ```rust
//! use prazo_core::{reader, test_rows, StatusTag};
//!
//! let row = test_rows::project_row("P-1", "Rollout", "01/02/2024", "15/02/2024");
//! let record = reader::project_record(&row).expect("schedulable row");
//!
//! assert_eq!(record.id, "P-1");
//! assert_eq!(record.group, "Rollout");
//! assert_eq!(record.status_tag, StatusTag::Unclassified);
//! ```

pub mod a1;
pub mod dates;
pub mod reader;
pub mod status;
pub mod store;
pub mod writer;

use chrono::{Datelike, NaiveDate};
use serde::ser::{Serialize, SerializeSeq, Serializer};

pub use dates::{parse_date, to_sheet_timestamp, DateError};
pub use reader::{project_records, task_records};
pub use status::StatusTag;
pub use store::{CellWrite, MemoryStore, SheetStore, StoreError, StoreProvider};
pub use writer::{update_schedule_dates, UpdateError};

// ============================================================================
// Row access
// ============================================================================

/// Read the trimmed cell at a zero-based index.
///
/// Rows coming back from the store are ragged: trailing empty cells are not
/// transmitted, so a row may be shorter than the column it is addressed at.
/// Out-of-range access degrades to the empty string instead of failing.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |s| s.trim())
}

// ============================================================================
// Record
// ============================================================================

/// Group name given to tasks whose project reference has no match.
pub const UNASSIGNED_GROUP: &str = "Tarefas Soltas";

/// Number of slots in the serialized row array.
///
/// The chart front end consumes rows positionally; twelve of the slots are
/// placeholder capacity it expects but this system never fills.
pub const RECORD_SLOTS: usize = 32;

const RESERVED_SLOTS: usize = 12;

/// One normalized project or task entry.
///
/// A record only exists when its source row had an identifier and both
/// planned dates resolved; rows that cannot be placed on a timeline are
/// dropped by the readers. `planned_end` is never earlier than
/// `planned_start` (inverted ranges are clamped on read).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Identifier from the source sheet (never empty)
    pub id: String,
    /// Display name
    pub name: String,
    /// Raw status label as entered by a human
    pub status: String,
    /// Normalized status category driving chart color
    pub status_tag: StatusTag,
    /// Scheduled bar start
    pub planned_start: NaiveDate,
    /// Scheduled bar end (>= `planned_start`)
    pub planned_end: NaiveDate,
    /// Real-world start, when the sheet has one
    pub actual_start: Option<NaiveDate>,
    /// Real-world end, when the sheet has one
    pub actual_end: Option<NaiveDate>,
    /// Responsible party
    pub responsible: String,
    /// Grouping name: the project name for tasks, the record's own name for
    /// projects
    pub group: String,
    /// Sector label
    pub sector: String,
    /// Classification label
    pub classification: String,
}

impl Serialize for Record {
    /// Serialize as the fixed-position row array the chart consumes.
    ///
    /// Field order is a frozen positional contract; months are zero-based.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(RECORD_SLOTS))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.name)?;
        seq.serialize_element(&self.status)?;
        push_date_parts(&mut seq, Some(self.planned_start))?;
        push_date_parts(&mut seq, Some(self.planned_end))?;
        push_date_parts(&mut seq, self.actual_start)?;
        push_date_parts(&mut seq, self.actual_end)?;
        seq.serialize_element(&self.responsible)?;
        seq.serialize_element(&self.group)?;
        seq.serialize_element(self.status_tag.as_str())?;
        for _ in 0..RESERVED_SLOTS {
            seq.serialize_element(&None::<u32>)?;
        }
        seq.serialize_element(&self.sector)?;
        seq.serialize_element(&self.classification)?;
        seq.end()
    }
}

/// Emit a date as year / zero-based month / day, or three nulls when absent.
fn push_date_parts<S: SerializeSeq>(
    seq: &mut S,
    date: Option<NaiveDate>,
) -> Result<(), S::Error> {
    match date {
        Some(d) => {
            seq.serialize_element(&d.year())?;
            seq.serialize_element(&d.month0())?;
            seq.serialize_element(&d.day())?;
        }
        None => {
            for _ in 0..3 {
                seq.serialize_element(&None::<u32>)?;
            }
        }
    }
    Ok(())
}

// ============================================================================
// Test fixtures
// ============================================================================

/// Row builders shared by unit tests, doc tests, and downstream integration
/// tests. Columns match the live sheet layouts in [`reader`].
pub mod test_rows {
    use crate::reader::{project_sheet, task_sheet};

    /// A projects-sheet row with the given id, name, and planned dates.
    pub fn project_row(id: &str, name: &str, start: &str, end: &str) -> Vec<String> {
        let mut row = vec![String::new(); project_sheet::PLANNED_END + 1];
        row[project_sheet::ID] = id.to_string();
        row[project_sheet::NAME] = name.to_string();
        row[project_sheet::PLANNED_START] = start.to_string();
        row[project_sheet::PLANNED_END] = end.to_string();
        row
    }

    /// A tasks-sheet row wide enough to pass the width gate.
    pub fn task_row(id: &str, project_ref: &str, name: &str, start: &str, deadline: &str) -> Vec<String> {
        let mut row = vec![String::new(); task_sheet::MIN_WIDTH];
        row[task_sheet::ID] = id.to_string();
        row[task_sheet::PROJECT_REF] = project_ref.to_string();
        row[task_sheet::NAME] = name.to_string();
        row[task_sheet::START_DATE] = start.to_string();
        row[task_sheet::DEADLINE] = deadline.to_string();
        row
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_record() -> Record {
        Record {
            id: "P-7".to_string(),
            name: "Migração ERP".to_string(),
            status: "Em Andamento".to_string(),
            status_tag: StatusTag::InProgress,
            planned_start: date(2024, 3, 1),
            planned_end: date(2024, 4, 15),
            actual_start: Some(date(2024, 3, 4)),
            actual_end: None,
            responsible: "Ana".to_string(),
            group: "Migração ERP".to_string(),
            sector: "TI".to_string(),
            classification: "Interno".to_string(),
        }
    }

    #[test]
    fn cell_returns_trimmed_value() {
        let row = vec!["  a  ".to_string(), "b".to_string()];
        assert_eq!(cell(&row, 0), "a");
        assert_eq!(cell(&row, 1), "b");
    }

    #[test]
    fn cell_out_of_range_is_empty() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, 5), "");
        assert_eq!(cell(&[], 0), "");
    }

    #[test]
    fn record_serializes_to_positional_array() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let Value::Array(slots) = value else {
            panic!("record must serialize as an array")
        };
        assert_eq!(slots.len(), RECORD_SLOTS);

        assert_eq!(slots[0], json!("P-7"));
        assert_eq!(slots[1], json!("Migração ERP"));
        assert_eq!(slots[2], json!("Em Andamento"));
        // Planned range, months zero-based
        assert_eq!(&slots[3..6], &[json!(2024), json!(2), json!(1)]);
        assert_eq!(&slots[6..9], &[json!(2024), json!(3), json!(15)]);
        // Actual start present, actual end absent
        assert_eq!(&slots[9..12], &[json!(2024), json!(2), json!(4)]);
        assert_eq!(&slots[12..15], &[Value::Null, Value::Null, Value::Null]);
        assert_eq!(slots[15], json!("Ana"));
        assert_eq!(slots[16], json!("Migração ERP"));
        assert_eq!(slots[17], json!("status-em-andamento"));
        // Reserved chart slots stay null
        for slot in &slots[18..30] {
            assert_eq!(*slot, Value::Null);
        }
        assert_eq!(slots[30], json!("TI"));
        assert_eq!(slots[31], json!("Interno"));
    }

    #[test]
    fn record_with_no_actual_dates_emits_six_nulls() {
        let mut record = sample_record();
        record.actual_start = None;
        record.actual_end = None;
        let value = serde_json::to_value(record).unwrap();
        let slots = value.as_array().unwrap();
        for slot in &slots[9..15] {
            assert_eq!(*slot, Value::Null);
        }
    }
}
