//! Federal road (BR) codes.

use std::fmt;

use super::error::DomainError;

const MIN_BR: u16 = 10;
const MAX_BR: u16 = 499;

/// A federal road code, always rendered as three digits (`"040"`).
///
/// # Examples
///
/// ```
/// use snv_server::domain::Br;
///
/// assert_eq!(Br::parse("116").unwrap().as_number(), 116);
/// assert_eq!(Br::sanitize("BR-40").unwrap().to_string(), "040");
/// assert!(Br::parse("40").is_err());
/// assert!(Br::parse("500").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Br(u16);

impl Br {
    /// Parse an exact three-digit code in `010..=499`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidBr(s.to_string()));
        }

        s.parse::<u16>()
            .map_err(|_| DomainError::InvalidBr(s.to_string()))
            .and_then(Self::from_number)
    }

    /// Extract the digits from free text (`"BR-116"`, `"br 40"`) and
    /// validate the resulting number.
    pub fn sanitize(input: &str) -> Result<Self, DomainError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        digits
            .parse::<u16>()
            .map_err(|_| DomainError::InvalidBr(input.to_string()))
            .and_then(Self::from_number)
            .map_err(|_| DomainError::InvalidBr(input.to_string()))
    }

    pub fn from_number(n: u16) -> Result<Self, DomainError> {
        if (MIN_BR..=MAX_BR).contains(&n) {
            Ok(Self(n))
        } else {
            Err(DomainError::InvalidBr(n.to_string()))
        }
    }

    pub fn as_number(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Br {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}
