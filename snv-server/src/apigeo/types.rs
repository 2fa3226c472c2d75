//! APIGEO response DTOs.
//!
//! These types map directly to the APIGEO JSON responses. Every field is
//! optional and scalar fields accept either a JSON number or a string,
//! because the service is inconsistent about both (a route's `km` may come
//! back as `12.3` or `"12.3"`, and fields are omitted rather than nulled).

use std::fmt;

use serde::Deserialize;

/// A JSON scalar that may arrive as a number, a string or a boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Scalar {
    /// Numeric value; strings are parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Flag(_) => None,
        }
    }

    /// Text value. Whole numbers render without a fractional part, so a
    /// road sent as `116` reads back as `"116"`.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// One route from `rotas/localizarkm`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDto {
    pub id: Option<Scalar>,

    /// Segment the point falls on, when the service knows it.
    #[serde(rename = "idTrecho")]
    pub segment_id: Option<Scalar>,

    pub br: Option<Scalar>,

    pub uf: Option<Scalar>,

    /// Offset of the queried point along the route, in km.
    pub km: Option<Scalar>,

    pub lat: Option<Scalar>,

    pub lng: Option<Scalar>,

    /// SNV dataset version, e.g. `"202401A"`.
    #[serde(rename = "versao")]
    pub version: Option<Scalar>,

    /// Segment type code (`"B"` for the main alignment).
    #[serde(rename = "sg_tp_trecho")]
    pub segment_type: Option<Scalar>,
}

/// The route endpoint answers with either an array or a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoutesResponse {
    Many(Vec<RouteDto>),
    One(RouteDto),
}

/// Response from `snv/trechos`: the ordered segment list of one road.
///
/// Only `trechos` is consumed; the route metadata that comes with it is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentListDto {
    #[serde(rename = "trechos")]
    pub segments: Option<Vec<SegmentDto>>,
}

/// One entry of a segment list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentDto {
    /// SNV segment code, e.g. `"153BGO0010"`.
    #[serde(rename = "trecho")]
    pub segment_id: Option<Scalar>,

    /// Length in km.
    #[serde(rename = "extensao")]
    pub length: Option<Scalar>,

    /// Code of the segment this one coincides with, if any.
    #[serde(rename = "coincidencia")]
    pub overlap: Option<Scalar>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_route_array() {
        let json = r#"[
            {"id": 7, "idTrecho": "153BGO0010", "br": "153", "uf": "GO",
             "km": 12.5, "lat": "-16.6", "lng": "-49.2", "versao": "202401A",
             "sg_tp_trecho": "B"},
            {"br": "060", "uf": "GO", "km": "3.25"}
        ]"#;

        let RoutesResponse::Many(routes) = serde_json::from_str(json).unwrap() else {
            panic!("expected an array");
        };

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].id.as_ref().unwrap().as_text(), "7");
        assert_eq!(routes[0].km.as_ref().unwrap().as_f64(), Some(12.5));
        assert_eq!(routes[0].lat.as_ref().unwrap().as_f64(), Some(-16.6));
        assert_eq!(routes[0].segment_type.as_ref().unwrap().as_text(), "B");
        assert_eq!(routes[1].km.as_ref().unwrap().as_f64(), Some(3.25));
        assert!(routes[1].version.is_none());
    }

    #[test]
    fn deserialize_single_route_object() {
        let json = r#"{"br": "116", "uf": "SP", "km": 100}"#;

        let RoutesResponse::One(route) = serde_json::from_str(json).unwrap() else {
            panic!("expected a single object");
        };

        assert_eq!(route.br.unwrap().as_text(), "116");
        assert_eq!(route.km.unwrap().as_f64(), Some(100.0));
    }

    #[test]
    fn deserialize_segment_list() {
        let json = r#"{
            "rota": {"br": "153", "uf": "GO"},
            "trechos": [
                {"trecho": "153BGO0010", "extensao": 10.2, "coincidencia": null},
                {"trecho": "153BGO0030", "extensao": "5.5", "coincidencia": "060BGO0090"}
            ]
        }"#;

        let dto: SegmentListDto = serde_json::from_str(json).unwrap();
        let segments = dto.segments.unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments[0].overlap.is_none());
        assert_eq!(segments[1].length.as_ref().unwrap().as_f64(), Some(5.5));
        assert_eq!(segments[1].overlap.as_ref().unwrap().as_text(), "060BGO0090");
    }

    #[test]
    fn scalar_text_rendering() {
        assert_eq!(Scalar::Number(40.0).as_text(), "40");
        assert_eq!(Scalar::Number(1.5).as_text(), "1.5");
        assert_eq!(Scalar::Flag(true).as_text(), "true");
        assert_eq!(Scalar::Text(" 2.5 ".into()).as_f64(), Some(2.5));
        assert_eq!(Scalar::Text("n/a".into()).as_f64(), None);
        assert_eq!(Scalar::Flag(false).as_f64(), None);
    }
}
