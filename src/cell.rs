//! Cell decoding and normalization.
//!
//! A raw spreadsheet cell is one of a closed set of variants produced by the
//! workbook decoder. [`normalize_cell`] is the only place that matches on the
//! variant; it turns any cell into a canonical display string and never
//! fails.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::DateSerialConfig;

/// A decoded cell value of unknown original type.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Boolean(bool),
}

/// Converts a spreadsheet date serial to a calendar datetime.
///
/// Day counts are relative to 1899-12-30 (or 1904-01-01 when `is_1904`),
/// with the serial-60 adjustment for the phantom 1900 leap day. The
/// fractional part is the time of day. Returns `None` when the serial is
/// outside chrono's representable range.
pub fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }

    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::days(days + offset))?;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Converts one raw cell into its canonical display string.
///
/// Numbers inside the configured serial window are reinterpreted as date
/// serials: the parser cannot always tell "the number 25000" from "a date
/// that lost its type information", and genuine date columns are worth a
/// small false-positive rate on large plain integers. The reinterpretation
/// is kept only when it formats to a date-like string.
pub fn normalize_cell(cell: &CellValue, window: &DateSerialConfig) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Date(dt) => dt.format("%-m/%-d/%Y").to_string(),
        CellValue::Number(n) => {
            if *n > window.serial_min && *n < window.serial_max {
                if let Some(dt) = serial_to_datetime(*n, false) {
                    let formatted = dt.format("%m/%d/%y").to_string();
                    if formatted.contains('/') {
                        return formatted;
                    }
                }
            }
            n.to_string()
        }
    }
}
