//! Route, segment and resolution records.

use super::snv::SnvCode;

/// A candidate road alignment returned by the geolocation service for a
/// coordinate.
///
/// `km` is the linear-referencing offset of the queried point along the
/// route. Routes live only for the duration of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: Option<String>,
    pub segment_id: Option<String>,
    /// Road code, e.g. `"116"`.
    pub br: String,
    /// State code, e.g. `"SP"`.
    pub uf: String,
    /// Segment category code, e.g. `"B"`.
    pub segment_type: String,
    pub km: f64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Dataset version the route was taken from.
    pub version: Option<String>,
}

/// One element of a route's ordered segment list.
///
/// Lengths accumulate in list order to give each segment's start and end
/// offset along the route.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniSegment {
    pub segment_id: String,
    /// Length in kilometres.
    pub length: f64,
    /// Set when the segment coincides with another one.
    pub overlap: Option<String>,
}

impl MiniSegment {
    pub fn new(segment_id: impl Into<String>, length: f64) -> Self {
        Self {
            segment_id: segment_id.into(),
            length,
            overlap: None,
        }
    }

    pub fn with_overlap(mut self, overlap: impl Into<String>) -> Self {
        self.overlap = Some(overlap.into());
        self
    }
}

/// Final answer for one route of a query.
///
/// A `None` segment id means the route was found but no segment could be
/// identified for its km mark. Such results are still returned because they
/// carry the route's location data.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSegment {
    pub segment_id: Option<String>,
    pub version: Option<String>,
    pub overlap: Option<String>,
    pub uf: String,
    pub br: String,
    pub segment_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub km: f64,
}

impl ResolvedSegment {
    /// A result for `route` landing on `segment`.
    pub(crate) fn matched(route: &Route, segment: &MiniSegment, lat: f64, lng: f64) -> Self {
        Self {
            segment_id: Some(segment.segment_id.clone()),
            version: route.version.clone(),
            overlap: segment.overlap.clone(),
            uf: route.uf.clone(),
            br: route.br.clone(),
            segment_type: route.segment_type.clone(),
            latitude: lat,
            longitude: lng,
            km: route.km,
        }
    }

    /// A result for `route` with no identifiable segment.
    pub(crate) fn unresolved(route: &Route, lat: f64, lng: f64) -> Self {
        Self {
            segment_id: None,
            version: route.version.clone(),
            overlap: None,
            uf: route.uf.clone(),
            br: route.br.clone(),
            segment_type: route.segment_type.clone(),
            latitude: lat,
            longitude: lng,
            km: route.km,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.segment_id.is_some()
    }

    /// The segment id as a validated SNV code, if it is one.
    pub fn snv_code(&self) -> Option<SnvCode> {
        self.segment_id
            .as_deref()
            .and_then(|id| SnvCode::parse(id).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route {
            id: Some("1".into()),
            segment_id: None,
            br: "153".into(),
            uf: "GO".into(),
            segment_type: "B".into(),
            km: 42.5,
            lat: Some(-16.6),
            lng: Some(-49.2),
            version: Some("202401A".into()),
        }
    }

    #[test]
    fn matched_copies_route_and_segment_fields() {
        let segment = MiniSegment::new("153BGO0010", 12.0).with_overlap("060BGO0010");
        let result = ResolvedSegment::matched(&route(), &segment, -16.0, -49.0);

        assert_eq!(result.segment_id.as_deref(), Some("153BGO0010"));
        assert_eq!(result.overlap.as_deref(), Some("060BGO0010"));
        assert_eq!(result.version.as_deref(), Some("202401A"));
        assert_eq!(result.uf, "GO");
        assert_eq!(result.br, "153");
        assert_eq!(result.segment_type, "B");
        assert_eq!(result.latitude, -16.0);
        assert_eq!(result.longitude, -49.0);
        assert_eq!(result.km, 42.5);
        assert!(result.is_resolved());
        assert_eq!(
            result.snv_code().map(|code| code.to_string()).as_deref(),
            Some("153BGO0010")
        );
    }

    #[test]
    fn snv_code_requires_a_well_formed_id() {
        let segment = MiniSegment::new("SEG-1", 1.0);
        let result = ResolvedSegment::matched(&route(), &segment, 0.0, 0.0);
        assert!(result.snv_code().is_none());

        let result = ResolvedSegment::unresolved(&route(), 0.0, 0.0);
        assert!(result.snv_code().is_none());
    }

    #[test]
    fn unresolved_keeps_location_data() {
        let result = ResolvedSegment::unresolved(&route(), -16.0, -49.0);

        assert!(!result.is_resolved());
        assert!(result.overlap.is_none());
        assert_eq!(result.version.as_deref(), Some("202401A"));
        assert_eq!(result.km, 42.5);
    }
}
