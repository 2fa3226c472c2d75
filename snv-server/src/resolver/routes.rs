//! Adaptive-radius route search.
//!
//! A point is first looked up with a tight radius, which avoids picking up
//! parallel roads, and the radius is widened step by step until some route
//! answers or the maximum is reached.

use tracing::{debug, info};

use crate::domain::{ReferenceDate, Route};

use super::config::SearchParams;
use super::orchestrator::ResolveError;
use super::provider::GeoProvider;

/// Radii to try, in order, computed as they are consumed.
///
/// - `retry_count <= 1`: just `start`
/// - `start == max`: `retry_count` copies of `start`
/// - otherwise `retry_count` values evenly spaced from `start` to `max`
///   inclusive
pub fn buffer_sequence(start: f64, max: f64, retry_count: u32) -> impl Iterator<Item = f64> {
    let count = retry_count.max(1);
    let steps = f64::from((count - 1).max(1));

    (0..count).map(move |i| start + (max - start) * f64::from(i) / steps)
}

/// Outcome of a route search.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearch {
    /// Radius (metres) of the last attempt: the one that found routes, or
    /// the largest tried if none did.
    pub buffer_m: f64,
    pub routes: Vec<Route>,
}

/// Finds the routes near a coordinate with a widening radius.
pub struct RouteResolver<'a, P: GeoProvider> {
    provider: &'a P,
}

impl<'a, P: GeoProvider> RouteResolver<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Try each radius of [`buffer_sequence`] in order and stop at the first
    /// that returns any route.
    ///
    /// Each lookup is retried per `params`; a lookup that keeps failing
    /// counts as "no routes at this radius".
    pub async fn resolve_routes(
        &self,
        lat: f64,
        lng: f64,
        date: ReferenceDate,
        params: &SearchParams,
    ) -> Result<RouteSearch, ResolveError> {
        params.validate()?;

        let policy = params.retry_policy();
        let radii = buffer_sequence(
            params.start_buffer_m,
            params.max_buffer_m,
            params.retry_count,
        );
        let mut buffer_m = params.start_buffer_m;

        for radius in radii {
            buffer_m = radius;

            let routes = policy
                .run_with_default(
                    || self.provider.fetch_routes(lat, lng, radius, date),
                    Vec::new(),
                )
                .await;

            if !routes.is_empty() {
                info!(lat, lng, radius, count = routes.len(), "found routes");
                return Ok(RouteSearch { buffer_m, routes });
            }

            debug!(lat, lng, radius, "no routes within radius");
        }

        info!(lat, lng, buffer_m, "no routes within any radius");
        Ok(RouteSearch {
            buffer_m,
            routes: Vec::new(),
        })
    }
}
