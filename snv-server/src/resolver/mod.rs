//! SNV route resolution.
//!
//! This module implements the core of the service: given a coordinate and
//! a reference date, find the SNV segment(s) the point lies on.
//!
//! Resolution runs in three steps: an adaptive-radius route search, a
//! km-to-segment match per route over cached segment lists, and a
//! deterministic ranking of the combined results.

mod config;
mod orchestrator;
mod provider;
mod rank;
mod routes;
mod segments;


pub use config::{
    DEFAULT_MAX_BUFFER_M, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, DEFAULT_START_BUFFER_M,
    DEFAULT_TAIL_TOLERANCE_KM, MAX_RETRY_COUNT, MAX_RETRY_DELAY, PRIMARY_SEGMENT_TYPE,
    ResolverConfig, SearchParams, SnvQuery,
};
pub use orchestrator::{
    ResolveError, SnvResolver, VERSION_PROBE_LAT, VERSION_PROBE_LNG, VERSION_PROBE_RADIUS_M,
};
pub use provider::GeoProvider;
pub use rank::rank_results;
pub use routes::{RouteResolver, RouteSearch, buffer_sequence};
pub use segments::{SegmentMatcher, match_segments};
