//! Durable storage for job application records.
//!
//! The table lives in one CSV file. Callers construct a store for a path
//! (see [`factory`]) and go through the [`RecordStore`] trait for every
//! read and write.

pub mod error;
pub mod factory;
pub mod interchange;
pub mod stats;
pub mod store;
pub mod types;
pub mod validate;

pub use error::StoreError;
pub use error::ValidationError;
pub use stats::TableStats;
pub use store::RecordStore;
pub use store::csv_file::CsvRecordStore;
pub use types::Category;
pub use types::Record;
