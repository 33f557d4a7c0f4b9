//! Excel serial date conversion.
//!
//! Excel stores dates as days since an epoch: 1899-12-31 in the default
//! system (with the fictitious 1900-02-29 kept for Lotus compatibility) or
//! 1904-01-01 in the Mac system.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// A date, time or date-time accepted by `write_datetime` and date-typed options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateValue {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    /// A time of day with no date, stored as a fraction of a day.
    Time(NaiveTime),
}

impl From<NaiveDateTime> for DateValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for DateValue {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

fn epoch(date_1904: bool) -> NaiveDateTime {
    let (y, m, d) = if date_1904 { (1904, 1, 1) } else { (1899, 12, 31) };
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Convert a date value to an Excel serial number.
pub fn excel_serial(value: DateValue, date_1904: bool) -> f64 {
    let epoch = epoch(date_1904);
    let dt = match value {
        DateValue::DateTime(dt) => dt,
        DateValue::Date(d) => d.and_time(NaiveTime::MIN),
        DateValue::Time(t) => epoch.date().and_time(t),
    };
    let delta = dt - epoch;
    #[allow(clippy::cast_precision_loss)]
    let mut serial = match delta.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_DAY,
        None => delta.num_milliseconds() as f64 / (MICROS_PER_DAY / 1000.0),
    };
    // Excel treats 1900 as a leap year.
    if !date_1904 && serial > 59.0 {
        serial += 1.0;
    }
    serial
}
