//! JSON Lines export/import: one `Record` object per line.

use crate::error::Result;
use crate::error::StoreError;
use crate::types::Record;
use crate::validate::validate;
use std::io::Read;
use std::io::Write;

pub fn write_jsonl(records: &[Record], out: &mut dyn Write) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| StoreError::Stream(e.into()))?;
        out.write_all(line.as_bytes()).map_err(StoreError::Stream)?;
        out.write_all(b"\n").map_err(StoreError::Stream)?;
    }
    out.flush().map_err(StoreError::Stream)
}

/// Decode and validate every record, failing on the first bad line.
/// Blank lines are skipped; line numbers in errors are 1-based.
pub fn read_jsonl(input: &mut dyn Read) -> Result<Vec<Record>> {
    let mut data = String::new();
    input.read_to_string(&mut data).map_err(StoreError::Stream)?;
    let mut records = Vec::new();
    for (idx, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line).map_err(|e| StoreError::Import {
            line: idx + 1,
            detail: e.to_string(),
        })?;
        validate(&record).map_err(|e| StoreError::Import {
            line: idx + 1,
            detail: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
