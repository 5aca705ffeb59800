use std::fmt;

use serde::Serialize;

use crate::error::{Result, TrackerError};

/// Completion state of a tracked item.
///
/// The raw spreadsheet column is free text; [`Status::classify`] folds any
/// input into one of the two values, while [`Status::parse`] accepts only the
/// canonical spellings and is used to validate edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Completed,
    NotCompleted,
}

impl Status {
    /// Classifies free text into a status.
    ///
    /// The check is case-insensitive and substring based: any text containing
    /// `"not"` is NotCompleted regardless of what else it says, otherwise text
    /// containing `"completed"` is Completed, and everything else (including
    /// the empty string) defaults to NotCompleted.
    pub fn classify(raw: &str) -> Status {
        let lowered = raw.to_lowercase();
        if lowered.contains("not") {
            Status::NotCompleted
        } else if lowered.contains("completed") {
            Status::Completed
        } else {
            Status::NotCompleted
        }
    }

    /// Parses a user-supplied status value, rejecting anything outside the
    /// two recognised spellings.
    pub fn parse(value: &str) -> Result<Status> {
        let folded: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();
        match folded.as_str() {
            "completed" => Ok(Status::Completed),
            "notcompleted" => Ok(Status::NotCompleted),
            _ => Err(TrackerError::InvalidStatus(value.to_string())),
        }
    }

    /// Canonical label written back to the spreadsheet column.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::NotCompleted => "Not Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite key identifying a logical row for edit and delete operations.
///
/// Equality is on the trimmed strings; the source format does not enforce
/// uniqueness, so operations keyed this way may match more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RowKey {
    pub mentor: String,
    pub resource: String,
    pub schedule: String,
}

impl RowKey {
    pub fn new(
        mentor: impl Into<String>,
        resource: impl Into<String>,
        schedule: impl Into<String>,
    ) -> Self {
        Self {
            mentor: mentor.into().trim().to_string(),
            resource: resource.into().trim().to_string(),
            schedule: schedule.into().trim().to_string(),
        }
    }

    /// Whether the given row is addressed by this key.
    pub fn matches(&self, row: &TrackerRow) -> bool {
        row.mentor == self.mentor && row.resource == self.resource && row.schedule == self.schedule
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.mentor, self.resource, self.schedule)
    }
}

/// One row of the tracker table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerRow {
    /// Grouping key, never empty after normalization.
    pub mentor: String,
    /// Person or item being tracked.
    pub resource: String,
    /// Week or period label.
    pub schedule: String,
    pub status: Status,
    pub comments: Option<String>,
}

impl TrackerRow {
    pub fn key(&self) -> RowKey {
        RowKey::new(
            self.mentor.clone(),
            self.resource.clone(),
            self.schedule.clone(),
        )
    }
}

/// Ordered sequence of tracker rows, addressed for edits by [`RowKey`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrackerTable {
    pub rows: Vec<TrackerRow>,
}

/// Canonical column headers, in the order they are written back.
pub const COLUMNS: [&str; 5] = ["Mentor", "Resource", "Schedule", "Status", "Comments"];

impl TrackerTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialises the table into the untyped wire form every backend writes.
    pub fn to_raw(&self) -> RawTable {
        let columns = COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.mentor.clone(),
                    row.resource.clone(),
                    row.schedule.clone(),
                    row.status.label().to_string(),
                    row.comments.clone().unwrap_or_default(),
                ]
            })
            .collect();
        RawTable { columns, rows }
    }

    /// Keys that occur on more than one row, in first-seen order.
    pub fn duplicate_keys(&self) -> Vec<RowKey> {
        let mut seen: Vec<(RowKey, usize)> = Vec::new();
        for row in &self.rows {
            let key = row.key();
            match seen.iter_mut().find(|(k, _)| *k == key) {
                Some((_, count)) => *count += 1,
                None => seen.push((key, 1)),
            }
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key)
            .collect()
    }
}

/// Untyped tabular payload exchanged with the remote backends: a header row
/// plus string cells, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_matches_known_inputs() {
        assert_eq!(Status::classify("Completed"), Status::Completed);
        assert_eq!(Status::classify("Task completed"), Status::Completed);
        assert_eq!(Status::classify("Not completed"), Status::NotCompleted);
        assert_eq!(Status::classify("completed, not yet"), Status::NotCompleted);
        assert_eq!(Status::classify(""), Status::NotCompleted);
        assert_eq!(Status::classify("in progress"), Status::NotCompleted);
    }

    #[test]
    fn classification_is_idempotent_on_labels() {
        for status in [Status::Completed, Status::NotCompleted] {
            assert_eq!(Status::classify(status.label()), status);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown_values() {
        assert_eq!(Status::parse("Completed").unwrap(), Status::Completed);
        assert_eq!(Status::parse("not completed").unwrap(), Status::NotCompleted);
        assert_eq!(Status::parse("NotCompleted").unwrap(), Status::NotCompleted);
        assert!(matches!(
            Status::parse("done"),
            Err(TrackerError::InvalidStatus(_))
        ));
        assert!(matches!(
            Status::parse(""),
            Err(TrackerError::InvalidStatus(_))
        ));
    }

    #[test]
    fn duplicate_keys_are_reported_once() {
        let row = TrackerRow {
            mentor: "A".into(),
            resource: "R1".into(),
            schedule: "W1".into(),
            status: Status::Completed,
            comments: None,
        };
        let table = TrackerTable {
            rows: vec![row.clone(), row.clone(), row],
        };
        assert_eq!(table.duplicate_keys(), vec![RowKey::new("A", "R1", "W1")]);
    }
}
