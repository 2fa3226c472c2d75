//! Federative unit (UF) codes.

use std::fmt;

use super::error::DomainError;

/// Geographic region of a UF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Norte,
    Nordeste,
    Sudeste,
    Sul,
    CentroOeste,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Nordeste => "Nordeste",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
            Region::CentroOeste => "Centro-Oeste",
        }
    }
}

/// One of the 27 Brazilian federative units.
///
/// # Examples
///
/// ```
/// use snv_server::domain::{Region, Uf};
///
/// let go = Uf::parse("GO").unwrap();
/// assert_eq!(go.ibge_code(), 52);
/// assert_eq!(go.region(), Region::CentroOeste);
///
/// // Lowercase is only accepted by the normalizing parser
/// assert!(Uf::parse("go").is_err());
/// assert_eq!(Uf::parse_normalized(" go ").unwrap(), go);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uf {
    RO,
    AC,
    AM,
    RR,
    PA,
    AP,
    TO,
    MA,
    PI,
    CE,
    RN,
    PB,
    PE,
    AL,
    SE,
    BA,
    MG,
    ES,
    RJ,
    SP,
    PR,
    SC,
    RS,
    MS,
    MT,
    GO,
    DF,
}

impl Uf {
    /// All units in IBGE code order.
    pub const ALL: [Uf; 27] = [
        Uf::RO,
        Uf::AC,
        Uf::AM,
        Uf::RR,
        Uf::PA,
        Uf::AP,
        Uf::TO,
        Uf::MA,
        Uf::PI,
        Uf::CE,
        Uf::RN,
        Uf::PB,
        Uf::PE,
        Uf::AL,
        Uf::SE,
        Uf::BA,
        Uf::MG,
        Uf::ES,
        Uf::RJ,
        Uf::SP,
        Uf::PR,
        Uf::SC,
        Uf::RS,
        Uf::MS,
        Uf::MT,
        Uf::GO,
        Uf::DF,
    ];

    /// Parse an exact two-letter uppercase abbreviation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .copied()
            .find(|uf| uf.as_str() == s)
            .ok_or_else(|| DomainError::InvalidUf(s.to_string()))
    }

    /// Parse after trimming and uppercasing (for user input).
    pub fn parse_normalized(s: &str) -> Result<Self, DomainError> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// Look up a unit by its IBGE code.
    pub fn from_ibge_code(code: u8) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .copied()
            .find(|uf| uf.ibge_code() == code)
            .ok_or_else(|| DomainError::InvalidUf(code.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Uf::RO => "RO",
            Uf::AC => "AC",
            Uf::AM => "AM",
            Uf::RR => "RR",
            Uf::PA => "PA",
            Uf::AP => "AP",
            Uf::TO => "TO",
            Uf::MA => "MA",
            Uf::PI => "PI",
            Uf::CE => "CE",
            Uf::RN => "RN",
            Uf::PB => "PB",
            Uf::PE => "PE",
            Uf::AL => "AL",
            Uf::SE => "SE",
            Uf::BA => "BA",
            Uf::MG => "MG",
            Uf::ES => "ES",
            Uf::RJ => "RJ",
            Uf::SP => "SP",
            Uf::PR => "PR",
            Uf::SC => "SC",
            Uf::RS => "RS",
            Uf::MS => "MS",
            Uf::MT => "MT",
            Uf::GO => "GO",
            Uf::DF => "DF",
        }
    }

    pub fn ibge_code(&self) -> u8 {
        match self {
            Uf::RO => 11,
            Uf::AC => 12,
            Uf::AM => 13,
            Uf::RR => 14,
            Uf::PA => 15,
            Uf::AP => 16,
            Uf::TO => 17,
            Uf::MA => 21,
            Uf::PI => 22,
            Uf::CE => 23,
            Uf::RN => 24,
            Uf::PB => 25,
            Uf::PE => 26,
            Uf::AL => 27,
            Uf::SE => 28,
            Uf::BA => 29,
            Uf::MG => 31,
            Uf::ES => 32,
            Uf::RJ => 33,
            Uf::SP => 35,
            Uf::PR => 41,
            Uf::SC => 42,
            Uf::RS => 43,
            Uf::MS => 50,
            Uf::MT => 51,
            Uf::GO => 52,
            Uf::DF => 53,
        }
    }

    pub fn region(&self) -> Region {
        match self.ibge_code() / 10 {
            1 => Region::Norte,
            2 => Region::Nordeste,
            3 => Region::Sudeste,
            4 => Region::Sul,
            _ => Region::CentroOeste,
        }
    }

    /// Full name of the unit.
    pub fn name(&self) -> &'static str {
        match self {
            Uf::RO => "Rondônia",
            Uf::AC => "Acre",
            Uf::AM => "Amazonas",
            Uf::RR => "Roraima",
            Uf::PA => "Pará",
            Uf::AP => "Amapá",
            Uf::TO => "Tocantins",
            Uf::MA => "Maranhão",
            Uf::PI => "Piauí",
            Uf::CE => "Ceará",
            Uf::RN => "Rio Grande do Norte",
            Uf::PB => "Paraíba",
            Uf::PE => "Pernambuco",
            Uf::AL => "Alagoas",
            Uf::SE => "Sergipe",
            Uf::BA => "Bahia",
            Uf::MG => "Minas Gerais",
            Uf::ES => "Espírito Santo",
            Uf::RJ => "Rio de Janeiro",
            Uf::SP => "São Paulo",
            Uf::PR => "Paraná",
            Uf::SC => "Santa Catarina",
            Uf::RS => "Rio Grande do Sul",
            Uf::MS => "Mato Grosso do Sul",
            Uf::MT => "Mato Grosso",
            Uf::GO => "Goiás",
            Uf::DF => "Distrito Federal",
        }
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_uf() {
        assert_eq!(Uf::parse("SP").unwrap(), Uf::SP);
        assert_eq!(Uf::parse("DF").unwrap(), Uf::DF);
    }

    #[test]
    fn reject_unknown_or_lowercase() {
        assert!(Uf::parse("XX").is_err());
        assert!(Uf::parse("sp").is_err());
        assert!(Uf::parse("").is_err());
        assert!(Uf::parse("SPX").is_err());
    }

    #[test]
    fn normalized_parse_accepts_user_input() {
        assert_eq!(Uf::parse_normalized(" mg").unwrap(), Uf::MG);
        assert!(Uf::parse_normalized("m g").is_err());
    }

    #[test]
    fn ibge_codes_roundtrip() {
        for uf in Uf::ALL {
            assert_eq!(Uf::from_ibge_code(uf.ibge_code()).unwrap(), uf);
        }
        assert!(Uf::from_ibge_code(34).is_err());
        assert!(Uf::from_ibge_code(0).is_err());
    }

    #[test]
    fn regions() {
        assert_eq!(Uf::AM.region(), Region::Norte);
        assert_eq!(Uf::BA.region(), Region::Nordeste);
        assert_eq!(Uf::RJ.region(), Region::Sudeste);
        assert_eq!(Uf::RS.region(), Region::Sul);
        assert_eq!(Uf::DF.region(), Region::CentroOeste);
        assert_eq!(Region::CentroOeste.name(), "Centro-Oeste");
    }

    #[test]
    fn display_and_name() {
        assert_eq!(Uf::SP.to_string(), "SP");
        assert_eq!(Uf::SP.name(), "São Paulo");
    }
}
