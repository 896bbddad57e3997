// Schemas of the three flat-file layouts.
use super::csv_parser::{FieldCursor, FlatRecord, TRUTHY_LITERAL};
use crate::error::Result;
use shared::models::{HourlyReading, PhaseReading, Reservation};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Integers stay integers, everything else keeps the comma separator of the logs.
fn render_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string().replace('.', ",")
    }
}

// Example: 201|Moomin Valley|moomin@whitevalley.org|0509876543|2025-11-12|09:00:00|2|18.50|True|Forest Area 1|2025-08-12 14:33:20
impl FlatRecord for Reservation {
    const DELIMITER: u8 = b'|';
    const HAS_HEADER: bool = false;
    const FIELDS: &'static [&'static str] = &[
        "reservationId",
        "name",
        "email",
        "phone",
        "reservationDate",
        "reservationTime",
        "durationHours",
        "price",
        "confirmed",
        "reservedResource",
        "createdAt",
    ];

    fn from_fields(fields: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(Reservation {
            id: fields.integer()?,
            name: fields.text()?,
            email: fields.text()?,
            phone: fields.text()?,
            date: fields.date()?,
            time: fields.time()?,
            duration_hours: fields.integer()?,
            price: fields.decimal()?,
            confirmed: fields.flag()?,
            resource: fields.text()?,
            created: fields.timestamp()?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            self.time.format("%H:%M:%S").to_string(),
            self.duration_hours.to_string(),
            format!("{:.2}", self.price),
            if self.confirmed { TRUTHY_LITERAL.to_string() } else { "False".to_string() },
            self.resource.clone(),
            self.created.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

// Header: Time;Consumption phase 1 Wh;...;Production phase 3 Wh
// Row:    2025-10-13T00:00:00;1000;2000;500;0;0;0
impl FlatRecord for PhaseReading {
    const DELIMITER: u8 = b';';
    const HAS_HEADER: bool = true;
    const FIELDS: &'static [&'static str] = &[
        "timestamp",
        "consumption_v1",
        "consumption_v2",
        "consumption_v3",
        "production_v1",
        "production_v2",
        "production_v3",
    ];

    fn from_fields(fields: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(PhaseReading {
            timestamp: fields.timestamp()?,
            consumption: [fields.decimal()?, fields.decimal()?, fields.decimal()?],
            production: [fields.decimal()?, fields.decimal()?, fields.decimal()?],
        })
    }

    fn to_fields(&self) -> Vec<String> {
        let mut out = vec![self.timestamp.format(TIMESTAMP_FORMAT).to_string()];
        out.extend(self.consumption.iter().map(|v| render_amount(*v)));
        out.extend(self.production.iter().map(|v| render_amount(*v)));
        out
    }
}

// Header: Time;Consumption (net) kWh;Production (net) kWh;Daily average temperature
// Row:    2025-01-01T00:00:00;1,25;0,00;-3,5
impl FlatRecord for HourlyReading {
    const DELIMITER: u8 = b';';
    const HAS_HEADER: bool = true;
    const FIELDS: &'static [&'static str] = &[
        "timestamp",
        "consumption_kwh",
        "production_kwh",
        "temperature_c",
    ];

    fn from_fields(fields: &mut FieldCursor<'_>) -> Result<Self> {
        Ok(HourlyReading {
            timestamp: fields.timestamp()?,
            consumption_kwh: fields.decimal()?,
            production_kwh: fields.decimal()?,
            temperature_c: fields.decimal()?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            render_amount(self.consumption_kwh),
            render_amount(self.production_kwh),
            render_amount(self.temperature_c),
        ]
    }
}
