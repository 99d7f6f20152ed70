//! Replacement-date normalization
//!
//! Spreadsheet dates arrive either as serial day counts (1900 date system,
//! epoch 1899-12-30) or as text. Normalization is total: every input maps to
//! `Some(date)` or `None`, nothing panics or errors.

use crate::types::CellValue;
use chrono::{Datelike, Duration, NaiveDate};

/// Text pattern accepted for textual dates
pub const TEXT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Day zero of the spreadsheet serial-date convention
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Convert a serial day count to a calendar date; any time-of-day fraction is dropped
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days.abs() > i32::MAX as f64 {
        return None;
    }
    let offset = Duration::try_days(days as i64)?;
    serial_epoch().checked_add_signed(offset)
}

/// Parse a `YYYY-MM-DD` string; anything else is `None`
pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, TEXT_DATE_FORMAT).ok()
}

/// Normalize one raw replacement-date cell
pub fn normalize(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Number(serial) => from_serial(*serial),
        CellValue::Text(text) => parse_iso(text),
        CellValue::Date(date) => Some(*date),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Calendar year of a normalized date
pub fn year_of(date: Option<NaiveDate>) -> Option<i32> {
    date.map(|d| d.year())
}

/// `YYYY-MM` label of a normalized date
pub fn month_of(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_zero_is_epoch() {
        assert_eq!(from_serial(0.0), Some(ymd(1899, 12, 30)));
        assert_eq!(normalize(&CellValue::Number(0.0)), Some(ymd(1899, 12, 30)));
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(from_serial(44500.0), Some(ymd(2021, 10, 31)));
        assert_eq!(from_serial(45292.0), Some(ymd(2024, 1, 1)));
        assert_eq!(from_serial(-1.0), Some(ymd(1899, 12, 29)));
    }

    #[test]
    fn test_serial_fraction_is_truncated_to_day() {
        assert_eq!(from_serial(44927.75), Some(ymd(2023, 1, 1)));
    }

    #[test]
    fn test_serial_out_of_range_is_none() {
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(f64::INFINITY), None);
        assert_eq!(from_serial(1e18), None);
        assert_eq!(from_serial(-1e18), None);
    }

    #[test]
    fn test_text_dates() {
        assert_eq!(
            normalize(&CellValue::Text("2023-06-15".to_string())),
            Some(ymd(2023, 6, 15))
        );
        assert_eq!(normalize(&CellValue::Text("15/06/2023".to_string())), None);
        assert_eq!(normalize(&CellValue::Text("2023-02-30".to_string())), None);
        assert_eq!(normalize(&CellValue::Text("2023-06-15 10:00".to_string())), None);
        assert_eq!(normalize(&CellValue::Text(String::new())), None);
    }

    #[test]
    fn test_other_cells_are_none() {
        assert_eq!(normalize(&CellValue::Empty), None);
        assert_eq!(normalize(&CellValue::Bool(true)), None);
    }

    #[test]
    fn test_date_cells_pass_through() {
        let date = ymd(2022, 8, 17);
        assert_eq!(normalize(&CellValue::Date(date)), Some(date));
    }

    #[test]
    fn test_year_and_month_propagate_none() {
        assert_eq!(year_of(None), None);
        assert_eq!(month_of(None), None);
        assert_eq!(year_of(Some(ymd(2021, 10, 31))), Some(2021));
        assert_eq!(month_of(Some(ymd(2021, 3, 5))), Some("2021-03".to_string()));
    }
}
