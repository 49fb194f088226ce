//! Batch file handling.
//!
//! Batch input is a header-less CSV with one address per row
//! (`id, street, city, state, zip`). The service answers with a header-less
//! CSV of result rows, one per input row, in no particular order.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result, ResultExt};

/// Most records the batch endpoint accepts in one file.
pub const MAX_BATCH_RECORDS: usize = 10_000;

/// Check that a batch file was given and exists.
pub fn check_file(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.ok_or(Error::NoFileProvided)?;
    if path.as_os_str().is_empty() {
        return Err(Error::NoFileProvided);
    }
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Number of records in a batch file. Blank lines are not counted.
pub fn count_records(path: &Path) -> Result<usize> {
    let mut reader = csv_reader_builder()
        .from_path(path)
        .with_context(format!("Failed to open batch file {}", path.display()))?;

    let mut count = 0;
    for record in reader.records() {
        let record =
            record.with_context(format!("Failed to read batch file {}", path.display()))?;
        if !record.iter().all(|field| field.trim().is_empty()) {
            count += 1;
        }
    }
    debug!(path = %path.display(), records = count, "Counted batch records");
    Ok(count)
}

/// Fail with [`Error::BatchSizeTooLarge`] when the file is over the limit.
pub fn check_size(path: &Path) -> Result<usize> {
    let count = count_records(path)?;
    if count > MAX_BATCH_RECORDS {
        return Err(Error::BatchSizeTooLarge(count));
    }
    Ok(count)
}

/// Split a batch response body into rows of fields.
pub fn parse_response(body: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv_reader_builder().from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn csv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::None);
    builder
}
