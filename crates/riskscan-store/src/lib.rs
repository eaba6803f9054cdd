//! riskscan Store
//!
//! Durable, append-only persistence for classification results.
//!
//! Provides:
//! - The denormalized result row and its fixed column order
//! - A CSV sink that writes the header exactly once per file
//! - An in-memory sink for tests and dry runs

pub mod record;
pub mod sink;

pub use record::{ResultRecord, RECORD_FIELDS};
pub use sink::{CsvSink, MemorySink, RecordSink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::record::ResultRecord;
    pub use crate::sink::{CsvSink, RecordSink};
}
