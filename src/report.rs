//! Groupby/count aggregation feeding the progress views.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TrackerError};
use crate::model::{Status, TrackerRow, TrackerTable};

/// Field of a tracker row that counts can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupField {
    Mentor,
    Resource,
    Schedule,
}

impl GroupField {
    fn value<'a>(&self, row: &'a TrackerRow) -> &'a str {
        match self {
            GroupField::Mentor => &row.mentor,
            GroupField::Resource => &row.resource,
            GroupField::Schedule => &row.schedule,
        }
    }
}

impl FromStr for GroupField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mentor" => Ok(GroupField::Mentor),
            "resource" => Ok(GroupField::Resource),
            "schedule" | "week" => Ok(GroupField::Schedule),
            other => Err(TrackerError::Parse(format!("unknown group field '{other}'"))),
        }
    }
}

/// One bucket of the aggregation: the group values in field order, the
/// status, and a simple tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub group: Vec<String>,
    pub status: Status,
    pub count: usize,
}

/// Counts rows per `(group values, status)` combination.
///
/// Buckets appear in first-seen order. Rows are filtered to the two known
/// statuses before counting; after normalization every row carries one of
/// them, so the filter is a contract boundary rather than an expected path.
pub fn count_by(table: &TrackerTable, fields: &[GroupField]) -> Vec<StatusCount> {
    let mut buckets: Vec<StatusCount> = Vec::new();
    for row in &table.rows {
        if !matches!(row.status, Status::Completed | Status::NotCompleted) {
            continue;
        }
        let group: Vec<String> = fields
            .iter()
            .map(|field| field.value(row).to_string())
            .collect();
        match buckets
            .iter_mut()
            .find(|bucket| bucket.group == group && bucket.status == row.status)
        {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(StatusCount {
                group,
                status: row.status,
                count: 1,
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mentor: &str, resource: &str, schedule: &str, status: Status) -> TrackerRow {
        TrackerRow {
            mentor: mentor.into(),
            resource: resource.into(),
            schedule: schedule.into(),
            status,
            comments: None,
        }
    }

    #[test]
    fn counts_preserve_first_seen_order() {
        let table = TrackerTable {
            rows: vec![
                row("B", "R1", "W1", Status::Completed),
                row("A", "R2", "W1", Status::NotCompleted),
                row("B", "R3", "W2", Status::Completed),
            ],
        };
        let counts = count_by(&table, &[GroupField::Mentor]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].group, vec!["B"]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].group, vec!["A"]);
        assert_eq!(counts[1].status, Status::NotCompleted);
    }

    #[test]
    fn multi_field_grouping_tallies_per_combination() {
        let table = TrackerTable {
            rows: vec![
                row("A", "R1", "W1", Status::Completed),
                row("A", "R1", "W2", Status::Completed),
                row("A", "R1", "W1", Status::Completed),
            ],
        };
        let counts = count_by(&table, &[GroupField::Mentor, GroupField::Schedule]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].group, vec!["A", "W1"]);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn group_field_parses_aliases() {
        assert_eq!("week".parse::<GroupField>().unwrap(), GroupField::Schedule);
        assert!("status".parse::<GroupField>().is_err());
    }
}
