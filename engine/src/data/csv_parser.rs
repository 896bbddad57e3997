// Delimited flat-file reading and writing for any `FlatRecord` schema.
use crate::error::{EngineError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use shared::finnish_format;
use std::fmt::Display;
use std::io::{Read, Write};
use std::str::FromStr;

/// Literal that marks a boolean field as true. Anything else reads as false.
pub const TRUTHY_LITERAL: &str = "True";

/// A record type that can be read from, and written back to, one delimited line.
pub trait FlatRecord: Sized {
    /// Field separator, e.g. `b'|'` or `b';'`.
    const DELIMITER: u8;
    /// Whether files of this schema start with a header line by default.
    const HAS_HEADER: bool;
    /// Field names in file order. The length is the required field count.
    const FIELDS: &'static [&'static str];

    fn from_fields(fields: &mut FieldCursor<'_>) -> Result<Self>;

    /// Textual form of every field, in the order of `FIELDS`.
    fn to_fields(&self) -> Vec<String>;
}

/// Sequential, typed access to the fields of one record.
///
/// Every accessor consumes the next field and reports conversion failures
/// with the line number and the schema's name for that field.
pub struct FieldCursor<'a> {
    record: &'a StringRecord,
    names: &'static [&'static str],
    line: u64,
    position: usize,
}

impl<'a> FieldCursor<'a> {
    pub fn new(record: &'a StringRecord, names: &'static [&'static str], line: u64) -> Self {
        Self { record, names, line, position: 0 }
    }

    fn next_raw(&mut self) -> Result<(&'a str, &'static str)> {
        let name = self.names.get(self.position).copied().unwrap_or("<unnamed>");
        let value = self
            .record
            .get(self.position)
            .ok_or_else(|| EngineError::malformed(self.line, name, "missing field"))?;
        self.position += 1;
        Ok((value, name))
    }

    fn convert<T>(&mut self, parse: impl FnOnce(&str) -> std::result::Result<T, String>) -> Result<T> {
        let (raw, name) = self.next_raw()?;
        parse(raw).map_err(|reason| EngineError::malformed(self.line, name, reason))
    }

    pub fn text(&mut self) -> Result<String> {
        self.next_raw().map(|(raw, _)| raw.to_string())
    }

    pub fn integer<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.convert(|raw| {
            raw.parse::<T>()
                .map_err(|e| format!("Failed to parse integer '{}': {}", raw, e))
        })
    }

    pub fn decimal(&mut self) -> Result<f64> {
        self.convert(|raw| finnish_format::parse_decimal(raw).map_err(|e| e.to_string()))
    }

    pub fn date(&mut self) -> Result<NaiveDate> {
        self.convert(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| format!("Failed to parse date '{}': {}", raw, e))
        })
    }

    pub fn time(&mut self) -> Result<NaiveTime> {
        self.convert(|raw| parse_time(raw).ok_or_else(|| format!("Failed to parse time '{}'", raw)))
    }

    pub fn timestamp(&mut self) -> Result<NaiveDateTime> {
        self.convert(|raw| {
            parse_timestamp(raw).ok_or_else(|| format!("Failed to parse timestamp '{}'", raw))
        })
    }

    pub fn flag(&mut self) -> Result<bool> {
        self.next_raw().map(|(raw, _)| raw == TRUTHY_LITERAL)
    }
}

// "09:00:00" or "09:00"
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// ISO-8601 local timestamps, with `T` or a space between date and time.
/// A UTC offset is accepted and dropped, keeping the wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Reads every non-empty line of `reader` into a `T`.
///
/// The load is all-or-nothing: the first short line or unconvertible field
/// aborts it. Input order is preserved.
pub fn read_records<T: FlatRecord, R: Read>(reader: R, has_header: bool) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(T::DELIMITER)
        .has_headers(has_header)
        .flexible(true) // field count is checked here, with a better message
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(invalid_utf8_as_malformed::<T>)?;
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(str::is_empty) {
            continue;
        }

        let expected = T::FIELDS.len();
        if record.len() < expected {
            return Err(EngineError::malformed(
                line,
                T::FIELDS[record.len()],
                format!("expected {} fields, found {}", expected, record.len()),
            ));
        }
        if record.len() > expected {
            return Err(EngineError::malformed(
                line,
                "<trailing>",
                format!("expected {} fields, found {}", expected, record.len()),
            ));
        }

        let mut cursor = FieldCursor::new(&record, T::FIELDS, line);
        records.push(T::from_fields(&mut cursor)?);
    }

    tracing::debug!(count = records.len(), has_header, "Parsed delimited records");
    Ok(records)
}

// Undecodable bytes are a bad field like any other, not a reader failure.
fn invalid_utf8_as_malformed<T: FlatRecord>(err: csv::Error) -> EngineError {
    let location = match err.kind() {
        csv::ErrorKind::Utf8 { pos, err: utf8 } => Some((pos.as_ref().map_or(0, |p| p.line()), utf8.field())),
        _ => None,
    };
    match location {
        Some((line, index)) => {
            let field = T::FIELDS.get(index).copied().unwrap_or("<trailing>");
            EngineError::malformed(line, field, "invalid UTF-8")
        }
        None => err.into(),
    }
}

/// Writes `records` in the same layout `read_records` accepts.
pub fn write_records<T: FlatRecord, W: Write>(writer: W, records: &[T], with_header: bool) -> Result<()> {
    let mut wrt = WriterBuilder::new()
        .delimiter(T::DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    if with_header {
        wrt.write_record(T::FIELDS)?;
    }
    for record in records {
        wrt.write_record(record.to_fields())?;
    }
    wrt.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_time_both_precisions() {
        assert_eq!(parse_time("09:00:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("14:30"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("9.00"), None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap().and_hms_opt(5, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-10-13T05:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-13 05:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-13T05:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-13T05:00:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-13T05:00:00.000"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let ts = parse_timestamp("2025-10-13").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 10, 13));
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(parse_timestamp("13.10.2025 05:00"), None);
        assert_eq!(parse_timestamp("2025-13-01T00:00:00"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_cursor_reports_field_name() {
        let record = StringRecord::from(vec!["12", "abc"]);
        let mut cursor = FieldCursor::new(&record, &["id", "amount"], 7);
        assert_eq!(cursor.integer::<u32>().unwrap(), 12);
        let err = cursor.decimal().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("'amount'"));
    }

    #[test]
    fn test_cursor_flag_is_exact_match() {
        let record = StringRecord::from(vec!["True", "true", "False", "yes"]);
        let mut cursor = FieldCursor::new(&record, &["a", "b", "c", "d"], 1);
        assert!(cursor.flag().unwrap());
        assert!(!cursor.flag().unwrap());
        assert!(!cursor.flag().unwrap());
        assert!(!cursor.flag().unwrap());
    }

    #[test]
    fn test_cursor_missing_field() {
        let record = StringRecord::from(vec!["1"]);
        let mut cursor = FieldCursor::new(&record, &["id", "name"], 2);
        cursor.text().unwrap();
        assert!(cursor.text().unwrap_err().to_string().contains("missing field"));
    }
}
