//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A `Timestamp` rendered in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Milliseconds as a short human duration (`850ms`, `2.4s`).
pub struct Millis(pub u64);

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1000 {
            write!(f, "{}ms", self.0)
        } else {
            write!(f, "{}.{}s", self.0 / 1000, (self.0 % 1000) / 100)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis() {
        assert_eq!(Millis(850).to_string(), "850ms");
        assert_eq!(Millis(2450).to_string(), "2.4s");
    }

    #[test]
    fn test_local_datetime_shape() {
        let ts = Timestamp::from_second(1_700_000_000).unwrap();
        let rendered = LocalDateTime(&ts).to_string();
        assert!(rendered.starts_with("2023-11-1"));
    }
}
