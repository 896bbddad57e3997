pub mod models;
pub mod utils;

// Re-exported so report code can write `shared::finnish_format::format_quantity`.
pub use utils::finnish_format;
