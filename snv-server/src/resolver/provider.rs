//! Upstream data source abstraction.

use std::future::Future;

use crate::apigeo::ApiGeoError;
use crate::domain::{MiniSegment, ReferenceDate, Route};

/// Trait for providing routes and segment lists.
///
/// This abstraction allows the resolver to run against the live APIGEO, a
/// fixture directory, or scripted test doubles. A "not found" answer is an
/// empty list, never an error.
pub trait GeoProvider: Send + Sync {
    /// Routes passing within `radius_m` metres of a coordinate.
    fn fetch_routes(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        date: ReferenceDate,
    ) -> impl Future<Output = Result<Vec<Route>, ApiGeoError>> + Send;

    /// Ordered segment list of one road.
    fn fetch_segments(
        &self,
        uf: &str,
        br: &str,
        segment_type: &str,
        date: ReferenceDate,
    ) -> impl Future<Output = Result<Vec<MiniSegment>, ApiGeoError>> + Send;
}
