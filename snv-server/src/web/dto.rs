//! Data transfer objects for web requests and responses.
//!
//! Field names follow the ones DNIT clients already use (`snv`, `versao`,
//! `coincidencia`, `tipo`, `data`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Br, ResolvedSegment, Uf, is_in_brazil};
use crate::resolver::{MAX_RETRY_COUNT, MAX_RETRY_DELAY, SearchParams, SnvQuery};

/// Request to resolve a coordinate.
#[derive(Debug, Default, Deserialize)]
pub struct SnvRequest {
    pub lat: f64,
    pub lng: f64,

    /// State to rank first (e.g. "GO")
    pub uf: Option<String>,

    /// Road to rank first; free text like "BR-153" is accepted
    pub br: Option<String>,

    /// Reference date in yyyy-MM-dd (defaults to today)
    pub data: Option<String>,

    /// Initial search radius in metres
    pub start_buffer: Option<f64>,

    /// Largest search radius in metres
    pub max_buffer: Option<f64>,

    /// Radii to try, and attempts per upstream call
    pub retry_count: Option<i64>,

    /// Pause between attempts in milliseconds
    pub retry_delay_ms: Option<i64>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SnvRequest {
    /// Validate the request and turn it into a resolver query.
    ///
    /// `uf` and `br` are normalized (`"go"` -> `"GO"`, `"BR-40"` ->
    /// `"040"`); the date is passed through for the resolver to check.
    pub fn into_query(self) -> Result<SnvQuery, String> {
        if !is_in_brazil(self.lat, self.lng) {
            return Err(format!(
                "coordinate {}, {} is outside Brazil",
                self.lat, self.lng
            ));
        }

        let defaults = SearchParams::default();

        let retry_count = match self.retry_count {
            None => defaults.retry_count,
            Some(n) => u32::try_from(n)
                .map_err(|_| "retry_count must be greater than or equal to zero".to_string())?,
        };
        if retry_count > MAX_RETRY_COUNT {
            return Err(format!("retry_count must be at most {MAX_RETRY_COUNT}"));
        }

        let retry_delay = match self.retry_delay_ms {
            None => defaults.retry_delay,
            Some(ms) => u64::try_from(ms)
                .map(Duration::from_millis)
                .map_err(|_| "retry_delay_ms must be greater than or equal to zero".to_string())?,
        };
        if retry_delay > MAX_RETRY_DELAY {
            return Err(format!(
                "retry_delay_ms must be at most {}",
                MAX_RETRY_DELAY.as_millis()
            ));
        }

        let params = SearchParams::new(
            self.start_buffer.unwrap_or(defaults.start_buffer_m),
            self.max_buffer.unwrap_or(defaults.max_buffer_m),
            retry_count,
            retry_delay,
        );

        let mut query = SnvQuery::new(self.lat, self.lng).with_params(params);

        if let Some(uf) = non_blank(&self.uf) {
            let uf = Uf::parse_normalized(uf).map_err(|e| e.to_string())?;
            query = query.with_uf(uf.as_str());
        }

        if let Some(br) = non_blank(&self.br) {
            let br = Br::sanitize(br).map_err(|e| e.to_string())?;
            query = query.with_br(br.to_string());
        }

        if let Some(date) = non_blank(&self.data) {
            query = query.with_date(date);
        }

        Ok(query)
    }
}

/// One resolved segment.
#[derive(Debug, Serialize)]
pub struct SnvResult {
    /// SNV segment code; null when the route has no identifiable segment
    pub snv: Option<String>,
    pub versao: Option<String>,
    pub coincidencia: Option<String>,
    pub uf: String,
    pub br: String,
    pub tipo: String,
    pub latitude: f64,
    pub longitude: f64,
    pub km: f64,
}

impl SnvResult {
    pub fn from_segment(segment: &ResolvedSegment) -> Self {
        Self {
            snv: segment.segment_id.clone(),
            versao: segment.version.clone(),
            coincidencia: segment.overlap.clone(),
            uf: segment.uf.clone(),
            br: segment.br.clone(),
            tipo: segment.segment_type.clone(),
            latitude: segment.latitude,
            longitude: segment.longitude,
            km: segment.km,
        }
    }
}

/// Request for the dataset version.
#[derive(Debug, Default, Deserialize)]
pub struct VersionRequest {
    /// Reference date in yyyy-MM-dd (defaults to today)
    pub data: Option<String>,
}

/// Dataset version in force on a date.
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub data: String,
    pub versao: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
