use crate::error::Result;
use crate::stats::TableStats;
use crate::types::Record;

/// Durable, ordered storage of job applications.
///
/// A record's identity is its zero-based position among the data rows at
/// the time of the call. Positions shift down by one after a delete, so a
/// caller holding an old listing may address the wrong row.
pub trait RecordStore: Send + Sync {
    /// Create the table with only its header if it is missing or empty.
    /// Never touches a populated table.
    fn initialize(&self) -> Result<()>;

    fn list(&self) -> Result<Vec<Record>>;

    fn get(&self, position: usize) -> Result<Option<Record>> {
        Ok(self.list()?.into_iter().nth(position))
    }

    /// Add a record after the last row without rewriting earlier rows.
    fn append(&self, record: Record) -> Result<()>;

    fn update(&self, position: usize, record: Record) -> Result<()>;

    fn delete(&self, position: usize) -> Result<()>;

    fn stats(&self) -> Result<TableStats> {
        Ok(crate::stats::summarize(&self.list()?))
    }

    fn export(&self, out: &mut dyn std::io::Write) -> Result<()> {
        crate::interchange::write_jsonl(&self.list()?, out)
    }

    /// Append every record from a JSON Lines stream, all or nothing.
    fn import(&self, input: &mut dyn std::io::Read) -> Result<usize>;
}

pub mod csv_file;
