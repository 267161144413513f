use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Why a record was rejected before anything touched the file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("{field} is not a YYYY-MM-DD date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The position does not name an existing row; the caller's view is stale.
    #[error("no application at position {position} (the table has {len})")]
    OutOfRange { position: usize, len: usize },

    /// The backing file does not follow the fixed schema.
    #[error("malformed table {}: {detail}", .path.display())]
    Format { path: PathBuf, detail: String },

    /// A JSON Lines import rejected one of its input lines.
    #[error("import line {line}: {detail}")]
    Import { line: usize, detail: String },

    #[error("cannot access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a caller-supplied import/export stream failed.
    #[error("stream error")]
    Stream(#[source] std::io::Error),
}

impl StoreError {
    /// Errors the caller can fix by changing its input or refreshing its view.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::OutOfRange { .. } | StoreError::Import { .. }
        )
    }
}
