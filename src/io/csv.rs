//! CSV text to and from [`RawTable`].
//!
//! The published-sheet export endpoint serves plain CSV, so the reader
//! handles quoted fields, embedded commas, doubled quotes, and embedded
//! newlines. The writer quotes any field that needs it.

use crate::error::{Result, TrackerError};
use crate::model::RawTable;

/// Parses CSV text into a raw table. The first record is the header row;
/// data records are padded with empty cells to the header width.
pub fn read_table(text: &str) -> Result<RawTable> {
    let mut records = parse_records(text)?;
    if records.is_empty() {
        return Err(TrackerError::Parse("CSV payload is empty".into()));
    }
    let columns = records.remove(0);
    let rows = records
        .into_iter()
        .map(|mut cells| {
            cells.resize(columns.len(), String::new());
            cells
        })
        .collect();
    Ok(RawTable { columns, rows })
}

/// Serialises a raw table as CSV text with a trailing newline.
pub fn write_table(raw: &RawTable) -> String {
    let mut lines = Vec::with_capacity(raw.rows.len() + 1);
    lines.push(join_record(&raw.columns));
    for row in &raw.rows {
        lines.push(join_record(row));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn join_record(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| escape(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(TrackerError::Parse("unterminated quoted CSV field".into()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // Drop records that are entirely empty, e.g. stray blank lines.
    records.retain(|cells| cells.iter().any(|cell| !cell.is_empty()));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_fields_and_crlf() {
        let text = "Mentor,Comments\r\nA,\"hello, \"\"world\"\"\"\r\nB,\r\n";
        let raw = read_table(text).unwrap();
        assert_eq!(raw.columns, vec!["Mentor", "Comments"]);
        assert_eq!(raw.rows[0][1], "hello, \"world\"");
        assert_eq!(raw.rows[1], vec!["B".to_string(), String::new()]);
    }

    #[test]
    fn roundtrip_preserves_awkward_cells() {
        let raw = RawTable {
            columns: vec!["Mentor".into(), "Comments".into()],
            rows: vec![vec!["A".into(), "line1\nline2, \"x\"".into()]],
        };
        let restored = read_table(&write_table(&raw)).unwrap();
        assert_eq!(restored, raw);
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        assert!(matches!(
            read_table("Mentor\n\"oops"),
            Err(TrackerError::Parse(_))
        ));
    }

    #[test]
    fn empty_payload_is_a_parse_error() {
        assert!(read_table("").is_err());
    }
}
