//! Parsing of the optional `start` / `end` query bounds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::AppError;

/// Which side of the range a bound sits on. Decides how a bare date expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Start,
    End,
}

impl BoundSide {
    fn param(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    fn time_of_day(self) -> &'static str {
        match self {
            Self::Start => "00:00:00.000",
            Self::End => "23:59:59.999",
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

/// Parse an ISO-8601 bound into a UTC instant.
///
/// A trailing `Z` is rewritten to `+00:00` first. Values without an offset are
/// taken as UTC. A bare date covers the whole day: midnight for `start`,
/// 23:59:59.999 for `end`.
pub fn parse_bound(raw: &str, side: BoundSide) -> Result<DateTime<Utc>, AppError> {
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    parse_normalized(&normalized, side).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid {} date '{raw}': expected ISO-8601 such as 2024-01-31 or 2024-01-31T12:00:00Z",
            side.param()
        ))
    })
}

fn parse_normalized(value: &str, side: BoundSide) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }

    // Bare date, optionally followed by an offset (e.g. "2024-01-31+02:00").
    let date_part = value.get(..10)?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let rest = &value[10..];
    if rest.is_empty() {
        let naive = match side {
            BoundSide::Start => date.and_hms_milli_opt(0, 0, 0, 0),
            BoundSide::End => date.and_hms_milli_opt(23, 59, 59, 999),
        }?;
        return Some(naive.and_utc());
    }
    if rest.starts_with('+') || rest.starts_with('-') {
        let full = format!("{date}T{}{rest}", side.time_of_day());
        return DateTime::parse_from_rfc3339(&full)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    None
}

/// Convert a chrono instant into the store's date type.
pub fn to_bson_datetime(dt: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_millis(dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn bare_start_date_is_midnight() {
        let dt = parse_bound("2024-01-01", BoundSide::Start).unwrap();
        assert_eq!(dt, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn bare_end_date_covers_whole_day() {
        let dt = parse_bound("2024-01-31", BoundSide::End).unwrap();
        assert_eq!(dt.timestamp_millis(), utc(2024, 2, 1, 0, 0, 0).timestamp_millis() - 1);
    }

    #[test]
    fn trailing_z_is_accepted() {
        let dt = parse_bound("2024-03-10T08:30:00Z", BoundSide::Start).unwrap();
        assert_eq!(dt, utc(2024, 3, 10, 8, 30, 0));

        let dt = parse_bound("2024-03-10T08:30:00.250Z", BoundSide::Start).unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn explicit_offset_converted_to_utc() {
        let dt = parse_bound("2024-03-10T08:30:00+02:00", BoundSide::End).unwrap();
        assert_eq!(dt, utc(2024, 3, 10, 6, 30, 0));
    }

    #[test]
    fn naive_datetime_taken_as_utc() {
        assert_eq!(
            parse_bound("2024-03-10T08:30:00", BoundSide::Start).unwrap(),
            utc(2024, 3, 10, 8, 30, 0)
        );
        assert_eq!(
            parse_bound("2024-03-10 08:30", BoundSide::Start).unwrap(),
            utc(2024, 3, 10, 8, 30, 0)
        );
    }

    #[test]
    fn bare_date_with_zulu_suffix() {
        assert_eq!(
            parse_bound("2024-01-31Z", BoundSide::Start).unwrap(),
            utc(2024, 1, 31, 0, 0, 0)
        );
    }

    #[test]
    fn malformed_dates_rejected() {
        for raw in ["", "yesterday", "2024-13-01", "2024-02-30", "01/02/2024", "2024-01-01Tnoon"] {
            let err = parse_bound(raw, BoundSide::Start).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn error_names_the_parameter() {
        let err = parse_bound("nope", BoundSide::End).unwrap_err();
        assert!(err.to_string().contains("end"));
    }

    #[test]
    fn bson_conversion_keeps_millis() {
        let dt = parse_bound("2024-01-31", BoundSide::End).unwrap();
        assert_eq!(to_bson_datetime(dt).timestamp_millis(), dt.timestamp_millis());
    }
}
