// Loaded records of one schema, in input order.
use super::csv_parser::{read_records, FlatRecord};
use crate::error::{EngineError, Result};
use crate::report::aggregate::{self, Measurable, ReportFilter, ReportResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Immutable, ordered sequence of records produced by a single load.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

impl<T: FlatRecord> RecordStore<T> {
    /// Loads using the schema's default header policy.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::load_with_header(reader, T::HAS_HEADER)
    }

    pub fn load_with_header<R: Read>(reader: R, has_header: bool) -> Result<Self> {
        let records = read_records(reader, has_header)?;
        Ok(RecordStore { records })
    }

    pub fn load_path(path: impl AsRef<Path>, has_header: Option<bool>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EngineError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::load_with_header(BufReader::new(file), has_header.unwrap_or(T::HAS_HEADER))?;
        tracing::info!(path = %path.display(), count = store.len(), "Loaded records");
        Ok(store)
    }
}

impl<T> RecordStore<T> {
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn filter<'a>(&'a self, predicate: impl Fn(&T) -> bool + 'a) -> impl Iterator<Item = &'a T> + 'a {
        self.records.iter().filter(move |r| predicate(r))
    }
}

impl<T: Measurable> RecordStore<T> {
    pub fn aggregate(&self, filter: &ReportFilter, fields: &[T::Field]) -> ReportResult<T::Field> {
        aggregate::aggregate(&self.records, filter, fields)
    }
}
