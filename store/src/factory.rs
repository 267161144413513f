use crate::error::Result;
use crate::store::RecordStore;
use crate::store::csv_file::CsvRecordStore;
use std::path::PathBuf;

/// Environment override for the table location.
pub const FILE_ENV_VAR: &str = "JOBTRACK_FILE";

/// Table file used when nothing else is configured, relative to the
/// working directory.
pub const DEFAULT_FILE_NAME: &str = "job_applications.csv";

/// Pick the table path: an explicit path wins, then `JOBTRACK_FILE`, then
/// the configured path, then [`DEFAULT_FILE_NAME`].
pub fn resolve_path(explicit: Option<PathBuf>, configured: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var_os(FILE_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or(configured)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
}

/// Build an initialized store for `path`.
pub fn open_store(path: impl Into<PathBuf>) -> Result<Box<dyn RecordStore>> {
    let store = CsvRecordStore::new(path.into());
    store.initialize()?;
    Ok(Box::new(store))
}
