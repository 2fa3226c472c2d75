//! End-to-end resolution of a coordinate to SNV segments.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::cache::{SegmentListCache, VersionCache};
use crate::domain::{DomainError, ReferenceDate, ResolvedSegment, is_valid_coordinate};

use super::config::{ResolverConfig, SnvQuery};
use super::provider::GeoProvider;
use super::rank::rank_results;
use super::routes::RouteResolver;
use super::segments::SegmentMatcher;

/// Point used to read the dataset version, on BR-153 near Goiânia.
pub const VERSION_PROBE_LAT: f64 = -16.621117;
pub const VERSION_PROBE_LNG: f64 = -49.207783;

/// Search radius of the version probe (metres).
pub const VERSION_PROBE_RADIUS_M: f64 = 10_000.0;

/// Error from resolving a query.
///
/// Upstream failures are not errors: they degrade to "no routes" or "no
/// segment". Only malformed input is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// Buffer or coordinate out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reference date is malformed
    #[error(transparent)]
    InvalidDate(#[from] DomainError),
}

/// Resolves coordinates to SNV segments.
///
/// Owns the provider and the caches, so one instance should be shared by
/// all queries of a process.
pub struct SnvResolver<P: GeoProvider> {
    provider: P,
    config: ResolverConfig,
    segment_cache: SegmentListCache,
    versions: VersionCache,
}

impl<P: GeoProvider> SnvResolver<P> {
    pub fn new(provider: P, config: ResolverConfig) -> Self {
        let segment_cache = SegmentListCache::new(config.segment_cache_capacity);
        let versions = VersionCache::new(config.version_ttl);

        Self {
            provider,
            config,
            segment_cache,
            versions,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn segment_cache(&self) -> &SegmentListCache {
        &self.segment_cache
    }

    /// Reference date of a query, using the local calendar for "today".
    pub fn reference_date(&self, input: Option<&str>) -> Result<ReferenceDate, ResolveError> {
        self.reference_date_on(input, Local::now().date_naive())
    }

    pub fn reference_date_on(
        &self,
        input: Option<&str>,
        today: NaiveDate,
    ) -> Result<ReferenceDate, ResolveError> {
        Ok(ReferenceDate::resolve(input, today, self.config.cluster_skew_days)?)
    }

    /// Resolve a query against today's date when it carries none.
    pub async fn resolve(&self, query: &SnvQuery) -> Result<Vec<ResolvedSegment>, ResolveError> {
        self.resolve_on(query, Local::now().date_naive()).await
    }

    /// Resolve a query, with `today` standing in for the current date.
    ///
    /// Routes are searched with a widening radius; each route found is
    /// matched against its road's segments with a tolerance of the
    /// successful radius in km. Every route yields at least one result, so
    /// the output is empty only when no route was found.
    pub async fn resolve_on(
        &self,
        query: &SnvQuery,
        today: NaiveDate,
    ) -> Result<Vec<ResolvedSegment>, ResolveError> {
        if !is_valid_coordinate(query.lat, query.lng) {
            return Err(ResolveError::InvalidParameter(format!(
                "invalid coordinate: {}, {}",
                query.lat, query.lng
            )));
        }

        let date = self.reference_date_on(query.date.as_deref(), today)?;
        let params = &query.params;

        let search = RouteResolver::new(&self.provider)
            .resolve_routes(query.lat, query.lng, date, params)
            .await?;

        let tolerance_km = search.buffer_m / 1000.0;
        let matcher = SegmentMatcher::new(
            &self.provider,
            &self.segment_cache,
            &self.config.primary_segment_type,
            self.config.tail_tolerance_km,
        );

        let mut results = Vec::new();
        for route in &search.routes {
            let matched = matcher
                .match_route(
                    route,
                    query.lat,
                    query.lng,
                    tolerance_km,
                    date,
                    params.retry_policy(),
                )
                .await;
            results.extend(matched);
        }

        let results = rank_results(results, query.uf.as_deref(), query.br.as_deref());
        info!(
            lat = query.lat,
            lng = query.lng,
            %date,
            routes = search.routes.len(),
            results = results.len(),
            "resolved query"
        );
        Ok(results)
    }

    /// SNV dataset version in force on `date`, if the service reports one.
    ///
    /// Looked up by probing a fixed point known to lie on a road. Found
    /// versions are cached; misses are retried on the next call.
    pub async fn version_for(&self, date: ReferenceDate) -> Option<String> {
        if let Some(version) = self.versions.get(&date).await {
            debug!(%date, %version, "version cache hit");
            return Some(version);
        }

        let routes = self
            .config
            .version_retry
            .run_with_default(
                || {
                    self.provider.fetch_routes(
                        VERSION_PROBE_LAT,
                        VERSION_PROBE_LNG,
                        VERSION_PROBE_RADIUS_M,
                        date,
                    )
                },
                Vec::new(),
            )
            .await;

        let version = routes.into_iter().next().and_then(|route| route.version)?;
        self.versions.insert(date, version.clone()).await;
        Some(version)
    }

    /// Dataset version in force today.
    pub async fn current_version(&self) -> Option<String> {
        self.current_version_on(Local::now().date_naive()).await
    }

    pub async fn current_version_on(&self, today: NaiveDate) -> Option<String> {
        let date = ReferenceDate::resolve(None, today, self.config.cluster_skew_days).ok()?;
        self.version_for(date).await
    }
}
