//! Resolver configuration and per-query parameters.

use std::time::Duration;

use crate::cache::{DEFAULT_SEGMENT_CAPACITY, DEFAULT_VERSION_TTL};
use crate::retry::RetryPolicy;

use super::orchestrator::ResolveError;

/// Initial search radius (metres).
pub const DEFAULT_START_BUFFER_M: f64 = 150.0;

/// Largest search radius (metres).
pub const DEFAULT_MAX_BUFFER_M: f64 = 1500.0;

/// Number of radii tried, and attempts per upstream call.
pub const DEFAULT_RETRY_COUNT: u32 = 4;

/// Pause between attempts of one upstream call.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Largest accepted `retry_count`.
pub const MAX_RETRY_COUNT: u32 = 20;

/// Largest accepted pause between attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// How far past the end of a road (km) a route may lie and still be
/// assigned the road's last segment.
pub const DEFAULT_TAIL_TOLERANCE_KM: f64 = 10.0;

/// Segment type whose segment lists are fetched; other types resolve to
/// no segment.
pub const PRIMARY_SEGMENT_TYPE: &str = "B";

/// Process-wide resolver settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Days subtracted from today when a query has no date, to make up for
    /// the upstream cluster's clock running behind.
    pub cluster_skew_days: u32,

    pub primary_segment_type: String,

    pub tail_tolerance_km: f64,

    /// Number of segment lists kept in memory.
    pub segment_cache_capacity: usize,

    /// How long a dataset version lookup is reused.
    pub version_ttl: Duration,

    /// Retry policy of dataset version lookups.
    pub version_retry: RetryPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cluster_skew_days: 0,
            primary_segment_type: PRIMARY_SEGMENT_TYPE.to_string(),
            tail_tolerance_km: DEFAULT_TAIL_TOLERANCE_KM,
            segment_cache_capacity: DEFAULT_SEGMENT_CAPACITY,
            version_ttl: DEFAULT_VERSION_TTL,
            version_retry: RetryPolicy::new(3, Duration::from_secs(1)),
        }
    }
}

impl ResolverConfig {
    pub fn with_cluster_skew_days(mut self, days: u32) -> Self {
        self.cluster_skew_days = days;
        self
    }

    pub fn with_segment_cache_capacity(mut self, capacity: usize) -> Self {
        self.segment_cache_capacity = capacity;
        self
    }

    pub fn with_version_ttl(mut self, ttl: Duration) -> Self {
        self.version_ttl = ttl;
        self
    }

    pub fn with_version_retry(mut self, policy: RetryPolicy) -> Self {
        self.version_retry = policy;
        self
    }
}

/// Search radius and retry settings of one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub start_buffer_m: f64,
    pub max_buffer_m: f64,
    /// Number of radii to try; also the attempts per upstream call.
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            start_buffer_m: DEFAULT_START_BUFFER_M,
            max_buffer_m: DEFAULT_MAX_BUFFER_M,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl SearchParams {
    pub fn new(
        start_buffer_m: f64,
        max_buffer_m: f64,
        retry_count: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            start_buffer_m,
            max_buffer_m,
            retry_count,
            retry_delay,
        }
    }

    /// Check the buffer bounds and the retry limits.
    pub fn validate(&self) -> Result<(), ResolveError> {
        if !(self.start_buffer_m.is_finite() && self.start_buffer_m > 0.0) {
            return Err(ResolveError::InvalidParameter(
                "start buffer must be positive".to_string(),
            ));
        }

        if !(self.max_buffer_m.is_finite() && self.start_buffer_m <= self.max_buffer_m) {
            return Err(ResolveError::InvalidParameter(
                "max buffer must be greater than or equal to the start buffer".to_string(),
            ));
        }

        if self.retry_count > MAX_RETRY_COUNT {
            return Err(ResolveError::InvalidParameter(format!(
                "retry count must be at most {MAX_RETRY_COUNT}"
            )));
        }

        if self.retry_delay > MAX_RETRY_DELAY {
            return Err(ResolveError::InvalidParameter(format!(
                "retry delay must be at most {} ms",
                MAX_RETRY_DELAY.as_millis()
            )));
        }

        Ok(())
    }

    /// Retry policy applied to each upstream call of the query.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, self.retry_delay)
    }
}

/// One resolution request.
#[derive(Debug, Clone, PartialEq)]
pub struct SnvQuery {
    pub lat: f64,
    pub lng: f64,
    /// State to rank first.
    pub uf: Option<String>,
    /// Road to rank first.
    pub br: Option<String>,
    /// Reference date (`yyyy-MM-dd`); today when absent.
    pub date: Option<String>,
    pub params: SearchParams,
}

impl SnvQuery {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            uf: None,
            br: None,
            date: None,
            params: SearchParams::default(),
        }
    }

    pub fn with_uf(mut self, uf: impl Into<String>) -> Self {
        self.uf = Some(uf.into());
        self
    }

    pub fn with_br(mut self, br: impl Into<String>) -> Self {
        self.br = Some(br.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }
}
