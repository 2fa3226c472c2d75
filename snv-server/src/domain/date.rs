//! Reference dates for upstream queries.
//!
//! The geolocation service versions the road network by date, so every
//! lookup carries a reference date in `yyyy-MM-dd` form.

use std::fmt;

use chrono::{Days, NaiveDate};

use super::error::DomainError;

/// Wire format of a reference date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceDate(NaiveDate);

impl ReferenceDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a strict `yyyy-MM-dd` date.
    ///
    /// Single-digit months or days, other separators and trailing text are
    /// rejected rather than coerced.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !shaped {
            return Err(DomainError::InvalidDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(s.to_string()))
    }

    /// Resolve an optional caller date.
    ///
    /// A missing or blank input falls back to `today` minus `skew_days`,
    /// which compensates for the upstream cluster lagging behind the
    /// calendar. Anything else must parse.
    pub fn resolve(
        input: Option<&str>,
        today: NaiveDate,
        skew_days: u32,
    ) -> Result<Self, DomainError> {
        match input.map(str::trim) {
            Some(s) if !s.is_empty() => Self::parse(s),
            _ => Ok(Self(
                today
                    .checked_sub_days(Days::new(u64::from(skew_days)))
                    .unwrap_or(NaiveDate::MIN),
            )),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_valid_date() {
        let date = ReferenceDate::parse("2024-03-15").unwrap();
        assert_eq!(date.date(), ymd(2024, 3, 15));
        assert_eq!(date.to_string(), "2024-03-15");
    }

    #[test]
    fn reject_malformed_dates() {
        for bad in [
            "2024-3-15",
            "15/03/2024",
            "2024/03/15",
            "2024-03-15T00:00",
            "2024-13-01",
            "2024-02-30",
            "abcd-ef-gh",
            "",
        ] {
            assert_eq!(
                ReferenceDate::parse(bad),
                Err(DomainError::InvalidDate(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn missing_date_uses_today() {
        let today = ymd(2024, 3, 15);
        let date = ReferenceDate::resolve(None, today, 0).unwrap();
        assert_eq!(date.date(), today);

        let date = ReferenceDate::resolve(Some("   "), today, 0).unwrap();
        assert_eq!(date.date(), today);
    }

    #[test]
    fn missing_date_applies_clock_skew() {
        let today = ymd(2024, 3, 1);
        let date = ReferenceDate::resolve(None, today, 2).unwrap();
        assert_eq!(date.date(), ymd(2024, 2, 28));
    }

    #[test]
    fn explicit_date_ignores_clock_skew() {
        let today = ymd(2024, 3, 15);
        let date = ReferenceDate::resolve(Some("2023-01-02"), today, 5).unwrap();
        assert_eq!(date.date(), ymd(2023, 1, 2));
    }

    #[test]
    fn explicit_bad_date_fails() {
        let today = ymd(2024, 3, 15);
        assert!(ReferenceDate::resolve(Some("02-01-2023"), today, 0).is_err());
    }
}
