//! Mapping a route's km mark onto its road's segments.
//!
//! Segment lengths accumulate in list order, so segment `i` spans
//! `[sum(len[..i]), sum(len[..=i])]` along the road. A route matches every
//! segment whose span, widened by the search tolerance, contains its km.

use tracing::debug;

use crate::cache::{SegmentList, SegmentListCache, SegmentListKey};
use crate::domain::{MiniSegment, ReferenceDate, ResolvedSegment, Route};
use crate::retry::RetryPolicy;

use super::provider::GeoProvider;

/// Match `route.km` against an ordered segment list.
///
/// Fallbacks, in order:
/// 1. every segment whose span widened by `tolerance_km` on each side
///    contains the km (bounds inclusive)
/// 2. the last segment, if the km lies no more than `tail_tolerance_km`
///    past the end of the road
/// 3. a single result with no segment id
pub fn match_segments(
    route: &Route,
    segments: &[MiniSegment],
    lat: f64,
    lng: f64,
    tolerance_km: f64,
    tail_tolerance_km: f64,
) -> Vec<ResolvedSegment> {
    let mut accumulated = 0.0;
    let mut matches = Vec::new();

    for segment in segments {
        let start = accumulated;
        accumulated += segment.length;

        if route.km >= start - tolerance_km && route.km <= accumulated + tolerance_km {
            matches.push(ResolvedSegment::matched(route, segment, lat, lng));
        }
    }

    if !matches.is_empty() {
        return matches;
    }

    if let Some(last) = segments.last() {
        if accumulated + tail_tolerance_km >= route.km {
            debug!(
                br = %route.br,
                uf = %route.uf,
                km = route.km,
                road_end = accumulated,
                "using last segment"
            );
            return vec![ResolvedSegment::matched(route, last, lat, lng)];
        }
    }

    debug!(br = %route.br, uf = %route.uf, km = route.km, "no segment for km");
    vec![ResolvedSegment::unresolved(route, lat, lng)]
}

/// Resolves routes to segments, fetching segment lists through the cache.
pub struct SegmentMatcher<'a, P: GeoProvider> {
    provider: &'a P,
    cache: &'a SegmentListCache,
    primary_segment_type: &'a str,
    tail_tolerance_km: f64,
}

impl<'a, P: GeoProvider> SegmentMatcher<'a, P> {
    pub fn new(
        provider: &'a P,
        cache: &'a SegmentListCache,
        primary_segment_type: &'a str,
        tail_tolerance_km: f64,
    ) -> Self {
        Self {
            provider,
            cache,
            primary_segment_type,
            tail_tolerance_km,
        }
    }

    /// Segment list of `route`'s road, from the cache or upstream.
    ///
    /// Only the primary segment type is fetched; other types get an empty
    /// list without a request. Failed fetches yield an empty list, and
    /// empty lists are cached like any other.
    pub async fn segments_for(
        &self,
        route: &Route,
        date: ReferenceDate,
        policy: RetryPolicy,
    ) -> SegmentList {
        let key = SegmentListKey::new(&route.uf, &route.br, &route.segment_type, date);

        self.cache
            .get_or_fetch(&key, || async {
                if route.segment_type != self.primary_segment_type {
                    debug!(
                        segment_type = %route.segment_type,
                        "not a primary segment type, skipping fetch"
                    );
                    return Vec::new();
                }

                policy
                    .run_with_default(
                        || {
                            self.provider.fetch_segments(
                                &route.uf,
                                &route.br,
                                &route.segment_type,
                                date,
                            )
                        },
                        Vec::new(),
                    )
                    .await
            })
            .await
    }

    /// Resolve one route. Never empty: see [`match_segments`].
    pub async fn match_route(
        &self,
        route: &Route,
        lat: f64,
        lng: f64,
        tolerance_km: f64,
        date: ReferenceDate,
        policy: RetryPolicy,
    ) -> Vec<ResolvedSegment> {
        let segments = self.segments_for(route, date, policy).await;
        match_segments(route, &segments, lat, lng, tolerance_km, self.tail_tolerance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(km: f64) -> Route {
        Route {
            id: None,
            segment_id: None,
            br: "153".into(),
            uf: "GO".into(),
            segment_type: "B".into(),
            km,
            lat: None,
            lng: None,
            version: Some("202401A".into()),
        }
    }

    fn road() -> Vec<MiniSegment> {
        vec![MiniSegment::new("A", 10.0), MiniSegment::new("B", 10.0)]
    }

    fn ids(results: &[ResolvedSegment]) -> Vec<Option<&str>> {
        results.iter().map(|r| r.segment_id.as_deref()).collect()
    }

    #[test]
    fn boundary_km_matches_both_segments() {
        let results = match_segments(&route(10.0), &road(), -16.0, -49.0, 0.0, 10.0);
        assert_eq!(ids(&results), vec![Some("A"), Some("B")]);
    }

    #[test]
    fn interior_km_matches_one_segment() {
        let results = match_segments(&route(15.0), &road(), -16.0, -49.0, 0.0, 10.0);
        assert_eq!(ids(&results), vec![Some("B")]);
        assert_eq!(results[0].latitude, -16.0);
        assert_eq!(results[0].longitude, -49.0);
        assert_eq!(results[0].km, 15.0);
    }

    #[test]
    fn tolerance_widens_spans() {
        let results = match_segments(&route(10.5), &road(), 0.0, 0.0, 0.6, 10.0);
        assert_eq!(ids(&results), vec![Some("A"), Some("B")]);
    }

    #[test]
    fn km_past_end_within_tail_uses_last_segment() {
        let results = match_segments(&route(25.0), &road(), 0.0, 0.0, 0.0, 10.0);
        assert_eq!(ids(&results), vec![Some("B")]);

        let results = match_segments(&route(30.0), &road(), 0.0, 0.0, 0.0, 10.0);
        assert_eq!(ids(&results), vec![Some("B")]);
    }

    #[test]
    fn km_beyond_tail_is_unresolved() {
        let results = match_segments(&route(35.0), &road(), 0.0, 0.0, 0.0, 10.0);

        assert_eq!(results.len(), 1);
        assert!(!results[0].is_resolved());
        assert_eq!(results[0].version.as_deref(), Some("202401A"));
        assert_eq!(results[0].km, 35.0);
    }

    #[test]
    fn empty_segment_list_is_unresolved() {
        let results = match_segments(&route(5.0), &[], 0.0, 0.0, 0.0, 10.0);
        assert_eq!(ids(&results), vec![None]);
    }

    #[test]
    fn overlap_is_carried() {
        let segments = vec![MiniSegment::new("A", 10.0).with_overlap("060BGO0090")];
        let results = match_segments(&route(5.0), &segments, 0.0, 0.0, 0.0, 10.0);
        assert_eq!(results[0].overlap.as_deref(), Some("060BGO0090"));
    }
}
