use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::RecordError;
use crate::error::{Error, Result};

/// Read every non-blank line of a tab-separated file through `parse`.
///
/// Any I/O failure is `Error::FileRead`; the first line that does not parse
/// aborts the read with `Error::MalformedRecord`.
pub fn read_records<T>(
    path: &Path,
    parse: impl Fn(&str) -> std::result::Result<T, RecordError>,
) -> Result<Vec<T>> {
    let file_read = |source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(file_read)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(file_read)?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse(&line).map_err(|source| Error::MalformedRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}
