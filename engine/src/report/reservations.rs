// Reservation listings and the per-reservation detail card.
use super::aggregate::{aggregate, ReportFilter, ReservationField};
use shared::finnish_format;
use shared::models::Reservation;
use std::fmt::Write;

pub fn confirmed_reservations(records: &[Reservation]) -> String {
    records
        .iter()
        .filter(|r| ReportFilter::Confirmed.matches(*r))
        .map(|r| {
            format!(
                "- {}, {}, {} at {}\n",
                r.name,
                r.resource,
                finnish_format::format_date(r.date),
                finnish_format::format_time(r.time)
            )
        })
        .collect()
}

pub fn long_reservations(records: &[Reservation], threshold_hours: u32) -> String {
    records
        .iter()
        .filter(|r| r.is_long(threshold_hours))
        .map(|r| {
            format!(
                "- {}, {} at {}, duration {} h, {}\n",
                r.name,
                finnish_format::format_date(r.date),
                finnish_format::format_time(r.time),
                r.duration_hours,
                r.resource
            )
        })
        .collect()
}

pub fn confirmation_statuses(records: &[Reservation]) -> String {
    records
        .iter()
        .map(|r| {
            let status = if r.confirmed { "Confirmed" } else { "NOT Confirmed" };
            format!("{} → {}\n", r.name, status)
        })
        .collect()
}

pub fn confirmation_summary(records: &[Reservation]) -> String {
    let confirmed = aggregate(records, &ReportFilter::Confirmed, &[]).count;
    format!(
        "- Confirmed reservations: {} pcs\n- Not confirmed reservations: {} pcs\n",
        confirmed,
        records.len() - confirmed
    )
}

pub fn total_revenue(records: &[Reservation], currency: &str) -> String {
    let result = aggregate(records, &ReportFilter::Confirmed, &[ReservationField::TotalPrice]);
    format!(
        "Total revenue from confirmed reservations: {}\n",
        finnish_format::format_revenue(result.total(ReservationField::TotalPrice), currency)
    )
}

/// All five listings under numbered headings.
pub fn render_overview(records: &[Reservation], threshold_hours: u32, currency: &str) -> String {
    let mut out = String::new();
    out.push_str("1) Confirmed Reservations\n");
    out.push_str(&confirmed_reservations(records));
    let _ = writeln!(out, "2) Long Reservations (≥ {} h)", threshold_hours);
    out.push_str(&long_reservations(records, threshold_hours));
    out.push_str("3) Reservation Confirmation Status\n");
    out.push_str(&confirmation_statuses(records));
    out.push_str("4) Confirmation Summary\n");
    out.push_str(&confirmation_summary(records));
    out.push_str("5) Total Revenue from Confirmed Reservations\n");
    out.push_str(&total_revenue(records, currency));
    out
}

pub fn reservation_card(r: &Reservation, currency: &str) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "Reservation number: {}", r.id);
    let _ = writeln!(card, "Booker: {}", r.name);
    let _ = writeln!(card, "Date: {}", finnish_format::format_date(r.date));
    let _ = writeln!(card, "Start time: {}", finnish_format::format_time(r.time));
    let _ = writeln!(card, "Number of hours: {}", r.duration_hours);
    let _ = writeln!(card, "Hourly rate: {}", finnish_format::format_revenue(r.price, currency));
    let _ = writeln!(card, "Total price: {}", finnish_format::format_revenue(r.total_price(), currency));
    let _ = writeln!(card, "Paid: {}", if r.confirmed { "Yes" } else { "No" });
    let _ = writeln!(card, "Venue: {}", r.resource);
    let _ = writeln!(card, "Phone: {}", r.phone);
    let _ = writeln!(card, "Email: {}", r.email);
    card
}

/// Cards separated by blank lines.
pub fn render_cards(records: &[Reservation], currency: &str) -> String {
    records
        .iter()
        .map(|r| reservation_card(r, currency))
        .collect::<Vec<_>>()
        .join("\n")
}
