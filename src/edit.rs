//! In-memory row editor.
//!
//! Every operation here mutates the table synchronously and leaves
//! persistence to the caller, which must follow up with an explicit store
//! save. Operations keyed by [`RowKey`] apply to every matching row and
//! return how many rows they touched; a key matching zero rows is reported
//! as [`TrackerError::KeyNotFound`] instead of being silently ignored.

use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::model::{RowKey, Status, TrackerTable};

/// Sets the status of the rows matching `key`.
///
/// The value is validated with [`Status::parse`] before any row is touched,
/// so an unknown value leaves the table unchanged.
pub fn set_status(table: &mut TrackerTable, key: &RowKey, value: &str) -> Result<usize> {
    let status = Status::parse(value)?;
    apply(table, key, |row| row.status = status)
}

/// Sets the comment of the rows matching `key`. An empty string clears it.
pub fn set_comment(table: &mut TrackerTable, key: &RowKey, text: &str) -> Result<usize> {
    let comment = if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    };
    apply(table, key, |row| row.comments = comment.clone())
}

/// Clears status and comment for the rows matching `key`.
pub fn reset_row(table: &mut TrackerTable, key: &RowKey) -> Result<usize> {
    apply(table, key, |row| {
        row.status = Status::NotCompleted;
        row.comments = None;
    })
}

/// Removes the rows matching `key`, re-packing the remainder into a
/// contiguous sequence.
pub fn delete_row(table: &mut TrackerTable, key: &RowKey) -> Result<usize> {
    let before = table.rows.len();
    table.rows.retain(|row| !key.matches(row));
    let removed = before - table.rows.len();
    if removed == 0 {
        return Err(TrackerError::KeyNotFound(key.clone()));
    }
    debug!(%key, removed, "deleted rows");
    Ok(removed)
}

/// Clears status and comment for every row in the table.
pub fn reset_all(table: &mut TrackerTable) {
    for row in &mut table.rows {
        row.status = Status::NotCompleted;
        row.comments = None;
    }
    debug!(row_count = table.rows.len(), "reset all rows");
}

fn apply(
    table: &mut TrackerTable,
    key: &RowKey,
    mut edit: impl FnMut(&mut crate::model::TrackerRow),
) -> Result<usize> {
    let mut touched = 0;
    for row in table.rows.iter_mut().filter(|row| key.matches(row)) {
        edit(row);
        touched += 1;
    }
    if touched == 0 {
        return Err(TrackerError::KeyNotFound(key.clone()));
    }
    debug!(%key, touched, "edited rows");
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackerRow;

    fn table() -> TrackerTable {
        TrackerTable {
            rows: vec![
                TrackerRow {
                    mentor: "A".into(),
                    resource: "R1".into(),
                    schedule: "W1".into(),
                    status: Status::Completed,
                    comments: Some("ok".into()),
                },
                TrackerRow {
                    mentor: "A".into(),
                    resource: "R2".into(),
                    schedule: "W1".into(),
                    status: Status::NotCompleted,
                    comments: None,
                },
            ],
        }
    }

    #[test]
    fn set_status_touches_matching_rows() {
        let mut t = table();
        let touched = set_status(&mut t, &RowKey::new("A", "R1", "W1"), "Not Completed").unwrap();
        assert_eq!(touched, 1);
        assert_eq!(t.rows[0].status, Status::NotCompleted);
        assert_eq!(t.rows[1].status, Status::NotCompleted);
    }

    #[test]
    fn invalid_status_leaves_table_unchanged() {
        let mut t = table();
        let original = t.clone();
        let err = set_status(&mut t, &RowKey::new("A", "R1", "W1"), "finished").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidStatus(_)));
        assert_eq!(t, original);
    }

    #[test]
    fn unknown_key_is_reported() {
        let mut t = table();
        let original = t.clone();
        let err = set_comment(&mut t, &RowKey::new("Z", "Q9", "W3"), "x").unwrap_err();
        assert!(matches!(err, TrackerError::KeyNotFound(_)));
        assert_eq!(t, original);
    }

    #[test]
    fn empty_comment_clears_the_field() {
        let mut t = table();
        set_comment(&mut t, &RowKey::new("A", "R1", "W1"), "").unwrap();
        assert_eq!(t.rows[0].comments, None);
    }

    #[test]
    fn delete_removes_and_repacks() {
        let mut t = table();
        let removed = delete_row(&mut t, &RowKey::new("A", "R1", "W1")).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].resource, "R2");
    }

    #[test]
    fn delete_applies_to_all_duplicates() {
        let mut t = table();
        t.rows.push(t.rows[0].clone());
        let removed = delete_row(&mut t, &RowKey::new("A", "R1", "W1")).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn reset_all_clears_every_row() {
        let mut t = table();
        reset_all(&mut t);
        assert!(t
            .rows
            .iter()
            .all(|row| row.status == Status::NotCompleted && row.comments.is_none()));
    }
}
