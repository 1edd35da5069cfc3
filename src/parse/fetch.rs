use super::record::{TaskRecord, FOLDER_COLUMN, LIST_COLUMN};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("no header row containing `{FOLDER_COLUMN}` and `{LIST_COLUMN}` was found")]
    MissingHeader,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Gets the raw records out of the contents of a TickTick backup. Backups start with a few lines
/// of metadata before the real header, so this skips forward to the first line naming both the
/// folder and list columns and reads from there. Rows with no content at all are skipped.
pub fn get_raw_records(content: &str) -> Result<Vec<TaskRecord>, ReadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let table = skip_preamble(content).ok_or(ReadError::MissingHeader)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(table.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(TaskRecord::from_fields(headers.iter().zip(row.iter())));
    }

    tracing::debug!(count = records.len(), "read raw records");
    Ok(records)
}

/// Returns the slice of the content starting at the header row, if there is one.
fn skip_preamble(content: &str) -> Option<&str> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.contains(FOLDER_COLUMN) && line.contains(LIST_COLUMN) {
            return Some(&content[offset..]);
        }
        offset += line.len();
    }

    None
}
