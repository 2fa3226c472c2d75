//! APIGEO HTTP client.
//!
//! Two endpoints are used: `rotas/localizarkm` locates the routes passing
//! within a radius of a coordinate, and `snv/trechos` lists the segments of
//! one road in physical order. A 404 from either is an empty answer, not an
//! error.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{MiniSegment, ReferenceDate, Route};
use crate::resolver::GeoProvider;

use super::convert::{convert_routes, convert_segment_list};
use super::error::ApiGeoError;
use super::types::{RoutesResponse, SegmentListDto};

/// Default URL of the route location endpoint.
pub const DEFAULT_ROUTES_URL: &str =
    "https://servicos.dnit.gov.br/sgplan/apigeo/rotas/localizarkm";

/// Default URL of the segment list endpoint.
pub const DEFAULT_SEGMENTS_URL: &str = "https://servicos.dnit.gov.br/sgplan/apigeo/snv/trechos";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the APIGEO client.
#[derive(Debug, Clone)]
pub struct ApiGeoConfig {
    /// Route location endpoint
    pub routes_url: String,
    /// Segment list endpoint
    pub segments_url: String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for the whole request
    pub read_timeout: Duration,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl Default for ApiGeoConfig {
    fn default() -> Self {
        Self {
            routes_url: DEFAULT_ROUTES_URL.to_string(),
            segments_url: DEFAULT_SEGMENTS_URL.to_string(),
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(30),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl ApiGeoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom route endpoint (for testing or a staging deployment).
    pub fn with_routes_url(mut self, url: impl Into<String>) -> Self {
        self.routes_url = url.into();
        self
    }

    /// Set a custom segment endpoint.
    pub fn with_segments_url(mut self, url: impl Into<String>) -> Self {
        self.segments_url = url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// APIGEO client.
///
/// Uses a semaphore to bound the number of requests in flight.
#[derive(Debug, Clone)]
pub struct ApiGeoClient {
    http: reqwest::Client,
    routes_url: String,
    segments_url: String,
    semaphore: Arc<Semaphore>,
}

impl ApiGeoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiGeoConfig) -> Result<Self, ApiGeoError> {
        if config.max_concurrent == 0 {
            return Err(ApiGeoError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;

        Ok(Self {
            http,
            routes_url: config.routes_url,
            segments_url: config.segments_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Routes passing within `radius_m` metres of a coordinate.
    pub async fn get_routes(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        date: ReferenceDate,
    ) -> Result<Vec<Route>, ApiGeoError> {
        let query = [
            ("lng", lng.to_string()),
            ("lat", lat.to_string()),
            ("r", radius_m.to_string()),
            ("data", date.to_string()),
        ];

        let Some(body) = self.get_body(&self.routes_url, &query).await? else {
            return Ok(Vec::new());
        };

        let response: RoutesResponse =
            serde_json::from_str(&body).map_err(|e| ApiGeoError::json(&e, &body))?;

        let routes = convert_routes(&response);
        debug!(lat, lng, radius_m, count = routes.len(), "fetched routes");
        Ok(routes)
    }

    /// Ordered segment list of one road.
    pub async fn get_segments(
        &self,
        uf: &str,
        br: &str,
        segment_type: &str,
        date: ReferenceDate,
    ) -> Result<Vec<MiniSegment>, ApiGeoError> {
        let query = [
            ("uf", uf.to_string()),
            ("br", br.to_string()),
            ("tipo", segment_type.to_string()),
            ("data", date.to_string()),
        ];

        let Some(body) = self.get_body(&self.segments_url, &query).await? else {
            return Ok(Vec::new());
        };

        let list: SegmentListDto =
            serde_json::from_str(&body).map_err(|e| ApiGeoError::json(&e, &body))?;

        let segments = convert_segment_list(&list);
        debug!(uf, br, segment_type, count = segments.len(), "fetched segments");
        Ok(segments)
    }

    /// GET `url` and return the body, or `None` for a 404 or an empty body.
    async fn get_body(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<String>, ApiGeoError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiGeoError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(url, "not found, treating as empty");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiGeoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        Ok(Some(body))
    }
}

impl GeoProvider for ApiGeoClient {
    async fn fetch_routes(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        date: ReferenceDate,
    ) -> Result<Vec<Route>, ApiGeoError> {
        self.get_routes(lat, lng, radius_m, date).await
    }

    async fn fetch_segments(
        &self,
        uf: &str,
        br: &str,
        segment_type: &str,
        date: ReferenceDate,
    ) -> Result<Vec<MiniSegment>, ApiGeoError> {
        self.get_segments(uf, br, segment_type, date).await
    }
}
