use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Maps a calendar day to the unix timestamp of its UTC midnight.
#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    datetime_to_unix_seconds(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Truncates an epoch-millisecond open time to its UTC calendar day.
pub fn unix_millis_to_date(millis: i64) -> ChartResult<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|time| time.date_naive())
        .ok_or_else(|| ChartError::InvalidData(format!("timestamp {millis} ms is out of range")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_to_unix_seconds, unix_millis_to_date};

    #[test]
    fn day_maps_to_utc_midnight() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date");
        assert_eq!(date_to_unix_seconds(day), 1_748_822_400.0);
    }

    #[test]
    fn open_time_truncates_to_day() {
        let date = unix_millis_to_date(1_748_822_400_000 + 13 * 3_600_000).expect("in range");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"));
    }
}
