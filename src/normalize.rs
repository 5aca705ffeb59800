//! Turns the untyped wire form into a [`TrackerTable`].
//!
//! Normalization is a pure function: column headers are trimmed and matched
//! case-insensitively, the free-text status column goes through
//! [`Status::classify`], and running the result through `to_raw` and back
//! yields the same table.

use crate::error::{Result, TrackerError};
use crate::model::{RawTable, Status, TrackerRow, TrackerTable};

/// Builds a tracker table from a raw payload.
///
/// Fails with [`TrackerError::Parse`] when one of the required columns
/// (Mentor, Resource, Schedule, Status) cannot be found. The Comments column
/// is optional. Rows whose key cells are all empty are skipped.
pub fn normalize(raw: &RawTable) -> Result<TrackerTable> {
    let mentor_col = require_column(raw, "Mentor")?;
    let resource_col = require_column(raw, "Resource")?;
    let schedule_col = require_column(raw, "Schedule")?;
    let status_col = require_column(raw, "Status")?;
    let comments_col = find_column(raw, "Comments");

    let mut rows = Vec::with_capacity(raw.rows.len());
    for cells in &raw.rows {
        let mentor = cell(cells, mentor_col);
        let resource = cell(cells, resource_col);
        let schedule = cell(cells, schedule_col);
        if mentor.is_empty() && resource.is_empty() && schedule.is_empty() {
            continue;
        }

        let status = Status::classify(&cell(cells, status_col));
        let comments = comments_col.map(|idx| cell(cells, idx)).filter(|c| !c.is_empty());

        rows.push(TrackerRow {
            mentor,
            resource,
            schedule,
            status,
            comments,
        });
    }

    Ok(TrackerTable { rows })
}

fn find_column(raw: &RawTable, name: &str) -> Option<usize> {
    raw.columns
        .iter()
        .position(|column| column.trim().eq_ignore_ascii_case(name))
}

fn require_column(raw: &RawTable, name: &str) -> Result<usize> {
    find_column(raw, name)
        .ok_or_else(|| TrackerError::Parse(format!("missing required column '{name}'")))
}

fn cell(cells: &[String], idx: usize) -> String {
    cells.get(idx).map(|c| c.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawTable {
        RawTable {
            columns: vec![
                " Mentor ".into(),
                "Resource".into(),
                "Schedule".into(),
                "status".into(),
                "Comments ".into(),
            ],
            rows: vec![
                vec![
                    "A".into(),
                    "R1".into(),
                    "W1".into(),
                    "Task completed".into(),
                    "".into(),
                ],
                vec![
                    "A".into(),
                    "R2".into(),
                    "W1".into(),
                    "".into(),
                    "on leave".into(),
                ],
                vec!["".into(), "".into(), "".into(), "".into(), "".into()],
            ],
        }
    }

    #[test]
    fn trims_headers_and_classifies_status() {
        let table = normalize(&raw()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].status, Status::Completed);
        assert_eq!(table.rows[0].comments, None);
        assert_eq!(table.rows[1].status, Status::NotCompleted);
        assert_eq!(table.rows[1].comments.as_deref(), Some("on leave"));
    }

    #[test]
    fn is_idempotent_through_the_wire_form() {
        let table = normalize(&raw()).unwrap();
        let again = normalize(&table.to_raw()).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let mut broken = raw();
        broken.columns[1] = "Person".into();
        assert!(matches!(
            normalize(&broken),
            Err(TrackerError::Parse(_))
        ));
    }
}
