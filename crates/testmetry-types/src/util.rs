use chrono::{NaiveDateTime, Timelike};

/// Parse an ISO-8601 timestamp, accepting both `T` and space separators and
/// an optional fractional part. Unparseable input falls back to the epoch.
pub fn parse_timestamp(value: &str) -> NaiveDateTime {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return parsed;
        }
    }
    NaiveDateTime::default()
}

/// ISO-8601 rendering with a fractional part only when one is present.
/// This is the exact form folded into metric content hashes.
pub fn iso_timestamp(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        let with_t = parse_timestamp("2021-09-12T08:30:00");
        let with_space = parse_timestamp("2021-09-12 08:30:00");
        assert_eq!(with_t, with_space);
        assert_eq!(iso_timestamp(&with_t), "2021-09-12T08:30:00");
    }

    #[test]
    fn keeps_fractional_seconds() {
        let ts = parse_timestamp("2021-09-12T08:30:00.250000");
        assert_eq!(iso_timestamp(&ts), "2021-09-12T08:30:00.250000");
    }

    #[test]
    fn garbage_falls_back_to_epoch() {
        let ts = parse_timestamp("not a date");
        assert_eq!(iso_timestamp(&ts), "1970-01-01T00:00:00");
    }
}
