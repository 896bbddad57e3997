// Predicate-driven sums, counts and averages over loaded records.
use crate::error::{EngineError, Result};
use chrono::{Datelike, NaiveDate};
use shared::finnish_format;
use shared::models::{HourlyReading, PhaseReading, Reservation, WH_PER_KWH};
use std::fmt::Debug;

/// Records that a `ReportFilter` can select.
pub trait Dated {
    fn date(&self) -> NaiveDate;

    /// `None` for schemas without a confirmation flag.
    fn confirmed(&self) -> Option<bool> {
        None
    }
}

/// Records with numeric fields that can be summed.
pub trait Measurable: Dated {
    type Field: Copy + PartialEq + Debug;

    /// Value of `field` in source units.
    fn value(&self, field: Self::Field) -> f64;

    /// Source units per report unit. Sums are divided by this once, after
    /// summation.
    fn unit_divisor(_field: Self::Field) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    All,
    Day(NaiveDate),
    /// Inclusive on both ends.
    DateRange { start: NaiveDate, end: NaiveDate },
    /// 1-based month, in any year.
    Month(u32),
    Year(i32),
    Confirmed,
}

impl ReportFilter {
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(EngineError::InvalidUserInput(format!(
                "start date {} is after end date {}",
                finnish_format::format_date(start),
                finnish_format::format_date(end)
            )));
        }
        Ok(ReportFilter::DateRange { start, end })
    }

    pub fn month(month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidUserInput(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(ReportFilter::Month(month))
    }

    pub fn matches<T: Dated>(&self, record: &T) -> bool {
        match *self {
            ReportFilter::All => true,
            ReportFilter::Day(day) => record.date() == day,
            ReportFilter::DateRange { start, end } => (start..=end).contains(&record.date()),
            ReportFilter::Month(month) => record.date().month() == month,
            ReportFilter::Year(year) => record.date().year() == year,
            ReportFilter::Confirmed => record.confirmed() == Some(true),
        }
    }
}

/// Totals for the records one filter selected. Built once by `aggregate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult<F> {
    pub filter: ReportFilter,
    pub count: usize,
    totals: Vec<(F, f64)>,
}

impl<F: Copy + PartialEq> ReportResult<F> {
    /// Total in report units; zero for a field that was not requested.
    pub fn total(&self, field: F) -> f64 {
        self.totals
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(0.0, |(_, total)| *total)
    }

    /// `None` when nothing matched.
    pub fn average(&self, field: F) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total(field) / self.count as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn format_total(&self, field: F) -> String {
        finnish_format::format_quantity(self.total(field))
    }

    /// An empty selection averages to "0,00".
    pub fn format_average(&self, field: F) -> String {
        finnish_format::format_quantity(self.average(field).unwrap_or(0.0))
    }
}

pub fn aggregate<T: Measurable>(records: &[T], filter: &ReportFilter, fields: &[T::Field]) -> ReportResult<T::Field> {
    let selected: Vec<&T> = records.iter().filter(|r| filter.matches(*r)).collect();
    let count = selected.len();

    let totals = fields
        .iter()
        .map(|field| {
            let values: Vec<f64> = selected.iter().map(|r| r.value(*field)).collect();
            (*field, order_independent_sum(values) / T::unit_divisor(*field))
        })
        .collect();

    tracing::debug!(?filter, count, "Aggregated records");
    ReportResult { filter: *filter, count, totals }
}

// Adds in ascending order, so the same values give the same total whatever
// order the records were loaded in.
fn order_independent_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationField {
    Hours,
    HourlyRate,
    TotalPrice,
    /// Total price of confirmed reservations, zero otherwise.
    Revenue,
}

impl Dated for Reservation {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn confirmed(&self) -> Option<bool> {
        Some(self.confirmed)
    }
}

impl Measurable for Reservation {
    type Field = ReservationField;

    fn value(&self, field: ReservationField) -> f64 {
        match field {
            ReservationField::Hours => f64::from(self.duration_hours),
            ReservationField::HourlyRate => self.price,
            ReservationField::TotalPrice => self.total_price(),
            ReservationField::Revenue => self.revenue(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseField {
    Consumption(usize),
    Production(usize),
}

impl PhaseField {
    /// Column order of the daily table: three consumption phases, then production.
    pub const ALL: [PhaseField; 6] = [
        PhaseField::Consumption(0),
        PhaseField::Consumption(1),
        PhaseField::Consumption(2),
        PhaseField::Production(0),
        PhaseField::Production(1),
        PhaseField::Production(2),
    ];
}

impl Dated for PhaseReading {
    fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

impl Measurable for PhaseReading {
    type Field = PhaseField;

    fn value(&self, field: PhaseField) -> f64 {
        match field {
            PhaseField::Consumption(phase) => self.consumption.get(phase).copied().unwrap_or(0.0),
            PhaseField::Production(phase) => self.production.get(phase).copied().unwrap_or(0.0),
        }
    }

    fn unit_divisor(_field: PhaseField) -> f64 {
        WH_PER_KWH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourlyField {
    Consumption,
    Production,
    Temperature,
}

impl HourlyField {
    pub const ALL: [HourlyField; 3] = [HourlyField::Consumption, HourlyField::Production, HourlyField::Temperature];
}

impl Dated for HourlyReading {
    fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

impl Measurable for HourlyReading {
    type Field = HourlyField;

    fn value(&self, field: HourlyField) -> f64 {
        match field {
            HourlyField::Consumption => self.consumption_kwh,
            HourlyField::Production => self.production_kwh,
            HourlyField::Temperature => self.temperature_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn phase(ts: NaiveDateTime, consumption: [f64; 3], production: [f64; 3]) -> PhaseReading {
        PhaseReading { timestamp: ts, consumption, production }
    }

    fn hourly(ts: NaiveDateTime, consumption_kwh: f64, production_kwh: f64, temperature_c: f64) -> HourlyReading {
        HourlyReading { timestamp: ts, consumption_kwh, production_kwh, temperature_c }
    }

    fn reservation(id: u32, duration_hours: u32, price: f64, confirmed: bool) -> Reservation {
        Reservation {
            id,
            name: format!("Booker {}", id),
            email: "booker@example.com".to_string(),
            phone: "0400000000".to_string(),
            date: date(2025, 11, 12),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_hours,
            price,
            confirmed,
            resource: "Hall".to_string(),
            created: at(2025, 8, 12, 14),
        }
    }

    #[test]
    fn test_phase_day_totals_in_kwh() {
        let day = date(2025, 10, 13);
        let records = vec![
            phase(at(2025, 10, 13, 0), [600.0, 1500.0, 250.0], [0.0, 0.0, 0.0]),
            phase(at(2025, 10, 13, 1), [400.0, 500.0, 250.0], [0.0, 0.0, 0.0]),
            phase(at(2025, 10, 14, 0), [9000.0, 9000.0, 9000.0], [0.0, 0.0, 0.0]),
        ];
        let result = aggregate(&records, &ReportFilter::Day(day), &PhaseField::ALL);

        assert_eq!(result.count, 2);
        assert_eq!(result.format_total(PhaseField::Consumption(0)), "1,00");
        assert_eq!(result.format_total(PhaseField::Consumption(1)), "2,00");
        assert_eq!(result.format_total(PhaseField::Consumption(2)), "0,50");
        assert_eq!(result.format_total(PhaseField::Production(0)), "0,00");
    }

    #[test]
    fn test_empty_selection_average_is_zero_string() {
        let records = vec![hourly(at(2025, 1, 1, 0), 1.0, 0.0, -5.0)];
        let result = aggregate(&records, &ReportFilter::Month(7), &HourlyField::ALL);

        assert!(result.is_empty());
        assert_eq!(result.average(HourlyField::Temperature), None);
        assert_eq!(result.format_average(HourlyField::Temperature), "0,00");
        assert_eq!(result.format_total(HourlyField::Consumption), "0,00");
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut records = vec![
            phase(at(2025, 10, 13, 0), [123.0, 7.0, 1.0], [3.0, 0.0, 11.0]),
            phase(at(2025, 10, 13, 1), [456.0, 8.0, 2.0], [5.0, 0.0, 13.0]),
            phase(at(2025, 10, 13, 2), [789.0, 9.0, 3.0], [7.0, 0.0, 17.0]),
            phase(at(2025, 10, 14, 0), [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
        ];
        let filter = ReportFilter::Day(date(2025, 10, 13));
        let forward = aggregate(&records, &filter, &PhaseField::ALL);
        records.reverse();
        let backward = aggregate(&records, &filter, &PhaseField::ALL);
        records.swap(0, 2);
        let shuffled = aggregate(&records, &filter, &PhaseField::ALL);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_decimal_sums_are_order_independent() {
        let mut records = vec![
            hourly(at(2025, 1, 1, 0), 0.1, 0.105, -0.3),
            hourly(at(2025, 1, 1, 1), 0.2, 1.005, 2.7),
            hourly(at(2025, 1, 1, 2), 0.3, 0.015, -1.1),
            hourly(at(2025, 1, 1, 3), 1e-9, 3.335, 0.05),
        ];
        let forward = aggregate(&records, &ReportFilter::All, &HourlyField::ALL);
        records.reverse();
        let backward = aggregate(&records, &ReportFilter::All, &HourlyField::ALL);
        records.swap(1, 3);
        let shuffled = aggregate(&records, &ReportFilter::All, &HourlyField::ALL);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        assert_eq!(forward.format_total(HourlyField::Consumption), "0,60");
    }

    #[test]
    fn test_confirmed_revenue() {
        let records = vec![
            reservation(1, 2, 18.50, true),
            reservation(2, 1, 10.00, true),
            reservation(3, 10, 500.00, false),
        ];
        let result = aggregate(&records, &ReportFilter::Confirmed, &[ReservationField::TotalPrice]);
        assert_eq!(result.count, 2);
        assert_eq!(finnish_format::format_revenue(result.total(ReservationField::TotalPrice), finnish_format::EURO), "47,00 €");

        let all = aggregate(&records, &ReportFilter::All, &[ReservationField::Revenue]);
        assert_eq!(all.count, 3);
        assert_eq!(all.total(ReservationField::Revenue), 47.0);
    }

    #[test]
    fn test_confirmed_filter_never_matches_unflagged_schemas() {
        let records = vec![hourly(at(2025, 1, 1, 0), 1.0, 1.0, 1.0)];
        let result = aggregate(&records, &ReportFilter::Confirmed, &HourlyField::ALL);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = vec![
            hourly(at(2025, 3, 1, 0), 1.0, 0.0, 2.0),
            hourly(at(2025, 3, 2, 12), 2.0, 0.5, 4.0),
            hourly(at(2025, 3, 3, 23), 4.0, 0.5, 6.0),
            hourly(at(2025, 3, 4, 0), 100.0, 100.0, 100.0),
        ];
        let filter = ReportFilter::date_range(date(2025, 3, 1), date(2025, 3, 3)).unwrap();
        let result = aggregate(&records, &filter, &HourlyField::ALL);

        assert_eq!(result.count, 3);
        assert_eq!(result.total(HourlyField::Consumption), 7.0);
        assert_eq!(result.total(HourlyField::Production), 1.0);
        assert_eq!(result.format_average(HourlyField::Temperature), "4,00");
        assert_eq!(result.filter, filter);
    }

    #[test]
    fn test_month_and_year_filters() {
        let records = vec![
            hourly(at(2024, 2, 10, 0), 1.0, 0.0, 0.0),
            hourly(at(2025, 2, 10, 0), 2.0, 0.0, 0.0),
            hourly(at(2025, 3, 10, 0), 4.0, 0.0, 0.0),
        ];
        let february = aggregate(&records, &ReportFilter::Month(2), &[HourlyField::Consumption]);
        assert_eq!(february.total(HourlyField::Consumption), 3.0);

        let year = aggregate(&records, &ReportFilter::Year(2025), &[HourlyField::Consumption]);
        assert_eq!(year.total(HourlyField::Consumption), 6.0);
    }

    #[test]
    fn test_invalid_filters_are_user_input_errors() {
        assert!(ReportFilter::month(0).unwrap_err().is_recoverable());
        assert!(ReportFilter::month(13).is_err());
        assert!(ReportFilter::month(12).is_ok());
        assert!(ReportFilter::date_range(date(2025, 3, 2), date(2025, 3, 1))
            .unwrap_err()
            .is_recoverable());
    }

    #[test]
    fn test_unrequested_field_totals_zero() {
        let records = vec![reservation(1, 2, 18.5, true)];
        let result = aggregate(&records, &ReportFilter::All, &[ReservationField::Hours]);
        assert_eq!(result.total(ReservationField::Hours), 2.0);
        assert_eq!(result.total(ReservationField::TotalPrice), 0.0);
    }
}
