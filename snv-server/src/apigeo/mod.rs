//! APIGEO (DNIT geolocation service) client.
//!
//! This module provides an HTTP client for the two APIGEO endpoints the
//! resolver needs, plus a fixture-backed mock with the same interface.
//!
//! Key characteristics of APIGEO:
//! - A 404 means "nothing here" and is reported as an empty list
//! - The route endpoint answers with an array or a single object
//! - Numbers are sometimes sent as strings
//! - Every query is pinned to a reference date (`yyyy-MM-dd`)

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{ApiGeoClient, ApiGeoConfig, DEFAULT_ROUTES_URL, DEFAULT_SEGMENTS_URL};
pub use convert::{
    DEFAULT_SEGMENT_TYPE, MISSING_KM, convert_route, convert_routes, convert_segment_list,
};
pub use error::ApiGeoError;
pub use mock::MockApiGeo;
pub use types::{RouteDto, RoutesResponse, Scalar, SegmentDto, SegmentListDto};
