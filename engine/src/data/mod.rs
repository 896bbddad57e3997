pub mod csv_parser;
pub mod record_store;
pub mod records;
