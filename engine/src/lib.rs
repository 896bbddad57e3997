// Report engine library root.
// Parsing of delimited flat files into typed records, predicate-based
// aggregation, and rendering of the text reports.

pub mod config;
pub mod data;
pub mod error;
pub mod interactive;
pub mod report;

pub use data::record_store::RecordStore;
pub use error::{EngineError, Result};
