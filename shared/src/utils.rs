// Helpers shared by the parsers and the report renderers.

/// Finnish number, date and time conventions used in every report:
/// comma as the decimal separator, `dd.mm.yyyy` dates and `HH.MM` times.
pub mod finnish_format {
    use std::str::FromStr;
    use anyhow::{anyhow, Result};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    pub const EURO: &str = "€";
    pub const KWH: &str = "kWh";
    pub const CELSIUS: &str = "°C";

    const MONTH_NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];

    // Accepts both "18.50" and "18,50". There are no thousand separators in
    // the inputs, so the comma is simply normalized to a dot.
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim().replace(',', ".");

        let value = f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Failed to parse decimal '{}': not a finite number", s));
        }
        Ok(value)
    }

    /// Fixed-point rendering with a comma separator.
    ///
    /// Rounds the exact binary value to nearest with ties to even, which is
    /// what `{:.N}` does. A result that rounds to zero never carries a sign.
    pub fn format_decimal(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.decimals$}", value, decimals = decimals);
        let unsigned = match formatted.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => formatted,
        };
        unsigned.replace('.', ",")
    }

    pub fn format_quantity(value: f64) -> String {
        format_decimal(value, 2)
    }

    pub fn format_with_unit(value: f64, unit: &str) -> String {
        format!("{} {}", format_quantity(value), unit)
    }

    /// Money amount followed by `currency`, e.g. `47,00 €`.
    pub fn format_revenue(value: f64, currency: &str) -> String {
        format_with_unit(value, currency)
    }

    pub fn format_date(date: NaiveDate) -> String {
        date.format("%d.%m.%Y").to_string()
    }

    pub fn format_time(time: NaiveTime) -> String {
        time.format("%H.%M").to_string()
    }

    // User-entered dates, e.g. "13.10.2025"
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s.trim(), e))
    }

    pub fn weekday_name(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    /// `month` is 1-based.
    pub fn month_name(month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        MONTH_NAMES.get(index).copied()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_decimal_accepts_both_separators() {
            assert_eq!(parse_decimal("18.50").unwrap(), 18.5);
            assert_eq!(parse_decimal("18,50").unwrap(), 18.5);
            assert_eq!(parse_decimal(" 1000 ").unwrap(), 1000.0);
        }

        #[test]
        fn test_parse_decimal_rejects_garbage() {
            assert!(parse_decimal("abc").is_err());
            assert!(parse_decimal("").is_err());
            assert!(parse_decimal("NaN").is_err());
            assert!(parse_decimal("inf").is_err());
        }

        #[test]
        fn test_format_quantity() {
            assert_eq!(format_quantity(0.0), "0,00");
            assert_eq!(format_quantity(39.9), "39,90");
            assert_eq!(format_quantity(1234.567), "1234,57");
        }

        #[test]
        fn test_format_decimal_drops_negative_zero() {
            assert_eq!(format_quantity(-0.0), "0,00");
            assert_eq!(format_quantity(-0.001), "0,00");
            assert_eq!(format_quantity(-1.5), "-1,50");
        }

        #[test]
        fn test_format_decimal_ties_to_even() {
            // 0.125 and 0.375 are exact in binary, so the tie rule shows
            assert_eq!(format_quantity(0.125), "0,12");
            assert_eq!(format_quantity(0.375), "0,38");
        }

        #[test]
        fn test_format_revenue() {
            assert_eq!(format_revenue(47.0, EURO), "47,00 €");
            assert_eq!(format_revenue(1234.5, "SEK"), "1234,50 SEK");
            assert_eq!(format_with_unit(2.5, KWH), "2,50 kWh");
        }

        #[test]
        fn test_format_date_and_time() {
            let date = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();
            let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
            assert_eq!(format_date(date), "12.11.2025");
            assert_eq!(format_time(time), "09.00");
        }

        #[test]
        fn test_parse_date() {
            assert_eq!(parse_date("13.10.2025").unwrap(), NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
            assert!(parse_date("2025-10-13").is_err());
            assert!(parse_date("32.10.2025").is_err());
        }

        #[test]
        fn test_month_name() {
            assert_eq!(month_name(1), Some("January"));
            assert_eq!(month_name(12), Some("December"));
            assert_eq!(month_name(0), None);
            assert_eq!(month_name(13), None);
        }

        #[test]
        fn test_weekday_name() {
            let monday = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
            assert_eq!(weekday_name(chrono::Datelike::weekday(&monday)), "Monday");
        }
    }
}
