use super::*;

use crate::error::StoreError;
use crate::types::HEADER;
use crate::validate::validate;
use csv::ReaderBuilder;
use csv::WriterBuilder;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::warn;

/// Table kept in a single CSV file whose first row is [`HEADER`].
///
/// Appends write one row at the end of the file. Updates, deletes and
/// imports rewrite the whole table into a temp file next to it and rename
/// it over the original, so a failed write never leaves a half-written
/// table behind.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn format_err(&self, detail: impl Into<String>) -> StoreError {
        StoreError::Format {
            path: self.path.clone(),
            detail: detail.into(),
        }
    }

    fn csv_err(&self, err: csv::Error) -> StoreError {
        let detail = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => self.io_err(source),
            _ => self.format_err(detail),
        }
    }

    /// Temp files must live in the table's own directory so the final
    /// rename does not cross filesystems.
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// `None` when the table is missing or zero-length, i.e. not initialized.
    fn open_existing(&self) -> Result<Option<File>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        Ok((len > 0).then_some(file))
    }

    fn reader(&self, file: File) -> Result<csv::Reader<File>> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let header = reader.headers().map_err(|e| self.csv_err(e))?;
        if !header.iter().eq(HEADER) {
            let found = header.iter().collect::<Vec<_>>().join(",");
            let expected = HEADER.join(",");
            return Err(self.format_err(format!(
                "unexpected header {found:?}, expected {expected:?}"
            )));
        }
        Ok(reader)
    }

    fn read_table(&self) -> Result<Vec<Record>> {
        let Some(file) = self.open_existing()? else {
            return Ok(Vec::new());
        };
        let mut reader = self.reader(file)?;
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| self.csv_err(e))?;
            // No headers: fields map onto `Record` by position.
            let record: Record = row.deserialize(None).map_err(|e| self.csv_err(e))?;
            records.push(record);
        }
        debug!(path = %self.path.display(), rows = records.len(), "read table");
        Ok(records)
    }

    fn encode(&self, records: &[Record], with_header: bool) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if with_header {
            writer.write_record(HEADER).map_err(|e| self.csv_err(e))?;
        }
        for record in records {
            writer.serialize(record).map_err(|e| self.csv_err(e))?;
        }
        writer.into_inner().map_err(|e| self.io_err(e.into_error()))
    }

    fn replace_contents(&self, bytes: &[u8]) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_err(e))?;
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.io_err(e))?;
        }
        tmp.write_all(bytes).map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;
        Ok(())
    }

    fn write_table(&self, records: &[Record]) -> Result<()> {
        let bytes = self.encode(records, true)?;
        self.replace_contents(&bytes)?;
        debug!(path = %self.path.display(), rows = records.len(), "rewrote table");
        Ok(())
    }

    fn ends_with_newline(&self, file: &mut File, len: u64) -> Result<bool> {
        if len == 0 {
            return Ok(true);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| self.io_err(e))?;
        Ok(last[0] == b'\n')
    }
}

impl RecordStore for CsvRecordStore {
    fn initialize(&self) -> Result<()> {
        if self.open_existing()?.is_some() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "creating table");
        let header = self.encode(&[], true)?;
        self.replace_contents(&header)
    }

    fn list(&self) -> Result<Vec<Record>> {
        self.read_table()
    }

    fn append(&self, record: Record) -> Result<()> {
        validate(&record)?;
        self.initialize()?;
        let existing = self
            .open_existing()?
            .ok_or_else(|| self.io_err(ErrorKind::NotFound.into()))?;
        // Refuse to add rows to a file that is not ours.
        self.reader(existing)?;

        let row = self.encode(std::slice::from_ref(&record), false)?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        let mut bytes = Vec::with_capacity(row.len() + 1);
        if !self.ends_with_newline(&mut file, len)? {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(&row);

        if let Err(err) = file.write_all(&bytes).and_then(|()| file.sync_data()) {
            warn!(path = %self.path.display(), error = %err, "append failed, restoring previous length");
            if let Err(rollback) = file.set_len(len) {
                warn!(path = %self.path.display(), error = %rollback, "rollback failed");
            }
            return Err(self.io_err(err));
        }
        debug!(path = %self.path.display(), company = %record.company, "appended record");
        Ok(())
    }

    fn update(&self, position: usize, record: Record) -> Result<()> {
        validate(&record)?;
        let mut records = self.read_table()?;
        let len = records.len();
        let slot = records
            .get_mut(position)
            .ok_or(StoreError::OutOfRange { position, len })?;
        *slot = record;
        self.write_table(&records)?;
        debug!(path = %self.path.display(), position, "updated record");
        Ok(())
    }

    fn delete(&self, position: usize) -> Result<()> {
        let mut records = self.read_table()?;
        let len = records.len();
        if position >= len {
            return Err(StoreError::OutOfRange { position, len });
        }
        records.remove(position);
        self.write_table(&records)?;
        debug!(path = %self.path.display(), position, "deleted record");
        Ok(())
    }

    fn import(&self, input: &mut dyn std::io::Read) -> Result<usize> {
        let incoming = crate::interchange::read_jsonl(input)?;
        if incoming.is_empty() {
            return Ok(0);
        }
        let mut records = self.read_table()?;
        let count = incoming.len();
        records.extend(incoming);
        self.write_table(&records)?;
        debug!(path = %self.path.display(), count, "imported records");
        Ok(count)
    }
}
