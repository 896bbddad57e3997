use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Reservations lasting at least this many hours count as long.
pub const LONG_RESERVATION_HOURS: u32 = 3;

/// Watt-hours per kilowatt-hour. Phase logs are recorded in Wh.
pub const WH_PER_KWH: f64 = 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_hours: u32,
    /// Hourly rate in euros.
    pub price: f64,
    pub confirmed: bool,
    pub resource: String,
    pub created: NaiveDateTime,
}

impl Reservation {
    pub fn total_price(&self) -> f64 {
        f64::from(self.duration_hours) * self.price
    }

    /// Only confirmed reservations bring in money.
    pub fn revenue(&self) -> f64 {
        if self.confirmed {
            self.total_price()
        } else {
            0.0
        }
    }

    pub fn is_long(&self, threshold_hours: u32) -> bool {
        self.duration_hours >= threshold_hours
    }
}

/// One hour of per-phase consumption and production, in Wh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhaseReading {
    pub timestamp: NaiveDateTime,
    pub consumption: [f64; 3],
    pub production: [f64; 3],
}

/// One hour of totals already expressed in kWh, plus the outdoor temperature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HourlyReading {
    pub timestamp: NaiveDateTime,
    pub consumption_kwh: f64,
    pub production_kwh: f64,
    pub temperature_c: f64,
}
