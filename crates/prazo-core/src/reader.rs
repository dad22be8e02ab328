//! Row-to-record readers for the two source sheets.
//!
//! Both sheets are read whole and transformed row by row. A row becomes a
//! [`Record`] only when it carries an identifier and both planned dates
//! resolve; anything else is skipped, never surfaced as an error. One bad
//! row does not spoil the rest of the sheet.

use std::collections::HashMap;

use crate::dates::parse_date;
use crate::status::StatusTag;
use crate::store::{SheetStore, StoreError};
use crate::{cell, Record, UNASSIGNED_GROUP};

/// Column layout of the projects sheet (zero-based offsets).
///
/// The offsets are fixed by the live sheet; they are not configurable.
pub mod project_sheet {
    pub const SOLICITATION_DATE: usize = 1;
    pub const NAME: usize = 3;
    pub const CLASSIFICATION: usize = 6;
    pub const RESPONSIBLE: usize = 7;
    pub const STATUS: usize = 10;
    pub const ACTUAL_END: usize = 23;
    pub const ID: usize = 24;
    pub const SECTOR: usize = 26;
    pub const PLANNED_START: usize = 28;
    pub const PLANNED_END: usize = 31;

    /// Minimum row width for the id → name lookup used by the task reader.
    pub const LOOKUP_MIN_WIDTH: usize = 25;

    /// 1-based column searched when locating a project row for update.
    pub const ID_SEARCH_COLUMN: u32 = 25;

    /// A1 column letters schedule updates write into. The start column does
    /// not coincide with [`PLANNED_START`]: the sheet derives the displayed
    /// start from this cell.
    pub const START_WRITE_COLUMN: &str = "BB";
    pub const END_WRITE_COLUMN: &str = "AF";
}

/// Column layout of the tasks sheet (zero-based offsets).
pub mod task_sheet {
    pub const PROJECT_REF: usize = 0;
    pub const START_DATE: usize = 2;
    pub const NAME: usize = 4;
    pub const CLASSIFICATION: usize = 7;
    pub const RESPONSIBLE: usize = 8;
    pub const STATUS: usize = 10;
    pub const ACTUAL_END: usize = 22;
    pub const ID: usize = 23;
    pub const ACTUAL_START: usize = 27;
    pub const SECTOR: usize = 30;
    pub const DEADLINE: usize = 33;

    /// Rows narrower than this are not real task rows and are skipped.
    pub const MIN_WIDTH: usize = 35;

    /// 1-based column searched when locating a task row for update.
    pub const ID_SEARCH_COLUMN: u32 = 24;

    /// A1 column letters schedule updates write into.
    pub const START_WRITE_COLUMN: &str = "AB";
    pub const END_WRITE_COLUMN: &str = "AH";
}

// ============================================================================
// Projects
// ============================================================================

/// Read the projects sheet and emit one record per schedulable row.
pub async fn project_records<S: SheetStore>(
    store: &S,
    sheet: &str,
) -> Result<Vec<Record>, StoreError> {
    let rows = store.read_all(sheet).await?;
    Ok(rows
        .iter()
        .skip(1)
        .filter_map(|row| project_record(row))
        .collect())
}

/// Transform one projects-sheet row, header excluded.
///
/// Returns `None` when the row has no identifier or cannot be placed on a
/// timeline (no resolvable planned start or end).
pub fn project_record(row: &[String]) -> Option<Record> {
    use project_sheet as col;

    let id = cell(row, col::ID);
    if id.is_empty() {
        return None;
    }

    let name = cell(row, col::NAME);
    let status = cell(row, col::STATUS);

    let solicitation = parse_date(cell(row, col::SOLICITATION_DATE));
    let planned_start = parse_date(cell(row, col::PLANNED_START)).or(solicitation)?;
    let planned_end = parse_date(cell(row, col::PLANNED_END))?;
    let planned_end = planned_end.max(planned_start);

    Some(Record {
        id: id.to_string(),
        name: name.to_string(),
        status: status.to_string(),
        status_tag: StatusTag::classify(status),
        planned_start,
        planned_end,
        actual_start: solicitation,
        actual_end: parse_date(cell(row, col::ACTUAL_END)),
        responsible: cell(row, col::RESPONSIBLE).to_string(),
        group: name.to_string(),
        sector: cell(row, col::SECTOR).to_string(),
        classification: cell(row, col::CLASSIFICATION).to_string(),
    })
}

// ============================================================================
// Tasks
// ============================================================================

/// Read both sheets and emit one record per schedulable task row, with each
/// task's group resolved through the project lookup.
pub async fn task_records<S: SheetStore>(
    store: &S,
    projects_sheet: &str,
    tasks_sheet: &str,
) -> Result<Vec<Record>, StoreError> {
    let project_rows = store.read_all(projects_sheet).await?;
    let lookup = project_name_lookup(&project_rows);

    let rows = store.read_all(tasks_sheet).await?;
    Ok(rows
        .iter()
        .skip(1)
        .filter_map(|row| task_record(row, &lookup))
        .collect())
}

/// Build the project id → project name lookup from the projects sheet.
///
/// Only rows wide enough to carry an id contribute; duplicate ids keep the
/// last occurrence.
pub fn project_name_lookup(rows: &[Vec<String>]) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for row in rows.iter().skip(1) {
        if row.len() >= project_sheet::LOOKUP_MIN_WIDTH {
            lookup.insert(
                cell(row, project_sheet::ID).to_string(),
                cell(row, project_sheet::NAME).to_string(),
            );
        }
    }
    lookup
}

/// Transform one tasks-sheet row, header excluded.
///
/// Rows narrower than [`task_sheet::MIN_WIDTH`] are skipped outright. The
/// planned end falls back from the deadline to the actual end; the planned
/// start has no fallback.
pub fn task_record(row: &[String], projects: &HashMap<String, String>) -> Option<Record> {
    use task_sheet as col;

    if row.len() < col::MIN_WIDTH {
        return None;
    }

    let id = cell(row, col::ID);
    if id.is_empty() {
        return None;
    }

    let group = projects
        .get(cell(row, col::PROJECT_REF))
        .cloned()
        .unwrap_or_else(|| UNASSIGNED_GROUP.to_string());

    let status = cell(row, col::STATUS);
    let actual_end = parse_date(cell(row, col::ACTUAL_END));

    let planned_start = parse_date(cell(row, col::START_DATE))?;
    let planned_end = parse_date(cell(row, col::DEADLINE)).or(actual_end)?;
    let planned_end = planned_end.max(planned_start);

    Some(Record {
        id: id.to_string(),
        name: cell(row, col::NAME).to_string(),
        status: status.to_string(),
        status_tag: StatusTag::classify(status),
        planned_start,
        planned_end,
        actual_start: parse_date(cell(row, col::ACTUAL_START)),
        actual_end,
        responsible: cell(row, col::RESPONSIBLE).to_string(),
        group,
        sector: cell(row, col::SECTOR).to_string(),
        classification: cell(row, col::CLASSIFICATION).to_string(),
    })
}
