// Aggregation and text rendering of loaded records.
pub mod aggregate;
pub mod energy;
pub mod reservations;

pub use aggregate::{aggregate, Dated, Measurable, ReportFilter, ReportResult};
