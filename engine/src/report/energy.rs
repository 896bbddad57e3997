// Electricity reports: the per-phase daily table and the period summaries.
use super::aggregate::{aggregate, HourlyField, PhaseField, ReportFilter, ReportResult};
use crate::data::record_store::RecordStore;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::finnish_format::{self, CELSIUS, KWH};
use shared::models::{HourlyReading, PhaseReading};
use std::fmt::Write;

const TABLE_RULE: &str = "---------------------------------------------------------------------------";
const SUMMARY_RULE: &str = "-----------------------------------------------------";

const DAY_WIDTH: usize = 11;
const DATE_WIDTH: usize = 13;
const VALUE_WIDTH: usize = 8;

pub fn week_header(week: u32) -> String {
    let mut header = format!("Week {} electricity consumption and production (kWh, by phase)\n\n", week);
    header.push_str("Day        Date           Consumption [kWh]       Production [kWh]\n");
    header.push_str("          (dd.mm.yyyy)    v1     v2     v3       v1      v2      v3\n");
    header.push_str(TABLE_RULE);
    header.push('\n');
    header
}

/// One table row: weekday, date and the six phase totals of `day` in kWh.
pub fn daily_row(records: &[PhaseReading], day: NaiveDate) -> String {
    let result = aggregate(records, &ReportFilter::Day(day), &PhaseField::ALL);

    let mut row = format!(
        "{:<day_w$}{:<date_w$}",
        finnish_format::weekday_name(day.weekday()),
        finnish_format::format_date(day),
        day_w = DAY_WIDTH,
        date_w = DATE_WIDTH,
    );
    for field in PhaseField::ALL {
        let _ = write!(row, "{:<width$}", result.format_total(field), width = VALUE_WIDTH);
    }
    row.push('\n');
    row
}

pub fn render_daily_table(records: &[PhaseReading], week: u32, days: &[NaiveDate]) -> String {
    let mut table = week_header(week);
    for day in days {
        table.push_str(&daily_row(records, *day));
    }
    table
}

/// Monday through Sunday of an ISO week.
pub fn iso_week_days(year: i32, week: u32) -> Option<Vec<NaiveDate>> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    Some((0..7).map(|offset| monday + Duration::days(offset)).collect())
}

/// Daily table for the ISO week of the store's first reading.
pub fn render_week(store: &RecordStore<PhaseReading>) -> Option<String> {
    let first = store.first()?;
    let iso = first.timestamp.date().iso_week();
    let days = iso_week_days(iso.year(), iso.week())?;
    Some(render_daily_table(store.records(), iso.week(), &days))
}

/// Consecutive weekly tables separated by a blank line pair.
pub fn render_weekly_summary(weeks: &[RecordStore<PhaseReading>]) -> String {
    weeks
        .iter()
        .filter_map(|store| {
            let table = render_week(store);
            if table.is_none() {
                tracing::warn!("Skipping a phase log without readings");
            }
            table
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn summarize(store: &RecordStore<HourlyReading>, filter: &ReportFilter) -> ReportResult<HourlyField> {
    store.aggregate(filter, &HourlyField::ALL)
}

/// Totals and average temperature for the period the result was filtered on.
pub fn render_period_summary(result: &ReportResult<HourlyField>) -> String {
    let mut msg = match result.filter {
        ReportFilter::DateRange { start, end } => format!(
            "\nReport for the period {}-{}\n",
            finnish_format::format_date(start),
            finnish_format::format_date(end)
        ),
        ReportFilter::Month(month) => format!(
            "{}\nReport for the month: {}\n",
            SUMMARY_RULE,
            finnish_format::month_name(month).unwrap_or("unknown")
        ),
        ReportFilter::Year(year) => format!("{}\nReport for the year: {}\n", SUMMARY_RULE, year),
        ReportFilter::Day(day) => format!("{}\nReport for the day: {}\n", SUMMARY_RULE, finnish_format::format_date(day)),
        ReportFilter::All | ReportFilter::Confirmed => format!("{}\nReport for all readings\n", SUMMARY_RULE),
    };

    let _ = writeln!(
        msg,
        "- Total consumption: {}",
        finnish_format::format_with_unit(result.total(HourlyField::Consumption), KWH)
    );
    let _ = writeln!(
        msg,
        "- Total production: {}",
        finnish_format::format_with_unit(result.total(HourlyField::Production), KWH)
    );
    let _ = writeln!(
        msg,
        "- Average temperature: {} {}",
        result.format_average(HourlyField::Temperature),
        CELSIUS
    );
    msg
}
