//! SNV segment codes.

use std::fmt;

use super::br::Br;
use super::error::DomainError;
use super::uf::Uf;

/// Axis types that may appear in a segment code.
const AXIS_TYPES: [char; 6] = ['A', 'B', 'C', 'N', 'U', 'V'];

/// A ten-character SNV segment code: road, axis type, UF and a four-digit
/// segment number (`"153BGO0010"`).
///
/// # Examples
///
/// ```
/// use snv_server::domain::{SnvCode, Uf};
///
/// let code = SnvCode::parse("153BGO0010").unwrap();
/// assert_eq!(code.br().as_number(), 153);
/// assert_eq!(code.axis(), 'B');
/// assert_eq!(code.uf(), Uf::GO);
/// assert_eq!(code.number(), 10);
///
/// assert_eq!(SnvCode::sanitize("153 b-go 0010").unwrap(), code);
/// assert!(SnvCode::parse("153XGO0010").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnvCode {
    br: Br,
    axis: char,
    uf: Uf,
    number: u16,
}

impl SnvCode {
    /// Parse an exact code. Letters must be uppercase.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidSnv(s.to_string());

        if s.len() != 10 || !s.is_ascii() {
            return Err(invalid());
        }

        let br = Br::parse(&s[0..3]).map_err(|_| invalid())?;

        let axis = s[3..4].chars().next().ok_or_else(invalid)?;
        if !AXIS_TYPES.contains(&axis) {
            return Err(invalid());
        }

        let uf = Uf::parse(&s[4..6]).map_err(|_| invalid())?;

        let digits = &s[6..10];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;

        Ok(Self {
            br,
            axis,
            uf,
            number,
        })
    }

    /// Extract a code from free text: accents are folded, letters
    /// uppercased and anything other than letters and digits dropped.
    pub fn sanitize(input: &str) -> Result<Self, DomainError> {
        let cleaned: String = input
            .chars()
            .map(fold_accent)
            .map(|c| c.to_ascii_uppercase())
            .filter(char::is_ascii_alphanumeric)
            .collect();

        Self::parse(&cleaned).map_err(|_| DomainError::InvalidSnv(input.to_string()))
    }

    pub fn br(&self) -> Br {
        self.br
    }

    pub fn axis(&self) -> char {
        self.axis
    }

    pub fn uf(&self) -> Uf {
        self.uf
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for SnvCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{:04}", self.br, self.axis, self.uf.as_str(), self.number)
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        let code = SnvCode::parse("010AAC0005").unwrap();
        assert_eq!(code.br().as_number(), 10);
        assert_eq!(code.axis(), 'A');
        assert_eq!(code.uf(), Uf::AC);
        assert_eq!(code.number(), 5);

        for axis in AXIS_TYPES {
            let raw = format!("116{axis}SP0100");
            assert!(SnvCode::parse(&raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        for raw in [
            "",
            "153BGO001",
            "153BGO00100",
            "999BGO0010",
            "153XGO0010",
            "153BXX0010",
            "153bgo0010",
            "153BGO00A0",
            "153BGO-010",
        ] {
            assert_eq!(
                SnvCode::parse(raw),
                Err(DomainError::InvalidSnv(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn sanitize_cleans_free_text() {
        let expected = SnvCode::parse("153BGO0010").unwrap();

        assert_eq!(SnvCode::sanitize(" 153bgo0010 ").unwrap(), expected);
        assert_eq!(SnvCode::sanitize("153-B-GO-0010").unwrap(), expected);
        assert_eq!(
            SnvCode::sanitize("040ÚDF0250").unwrap(),
            SnvCode::parse("040UDF0250").unwrap()
        );
    }

    #[test]
    fn sanitize_reports_original_input() {
        assert_eq!(
            SnvCode::sanitize("BR-153"),
            Err(DomainError::InvalidSnv("BR-153".to_string()))
        );
        assert!(SnvCode::sanitize("   ").is_err());
    }

    #[test]
    fn display_round_trips() {
        for raw in ["153BGO0010", "010NAC0000", "499VRS9999"] {
            assert_eq!(SnvCode::parse(raw).unwrap().to_string(), raw);
        }
    }
}
