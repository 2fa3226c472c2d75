//! Fixture-backed APIGEO for running without network access.
//!
//! Loads APIGEO-format JSON from a directory laid out as
//!
//! ```text
//! <dir>/rotas.json                  route response (array or single object)
//! <dir>/trechos/{UF}-{BR}-{TYPE}.json   segment list response per road
//! ```
//!
//! and serves it as if it were live. Every coordinate gets the same routes;
//! a road without a fixture behaves like a 404 (empty list).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{MiniSegment, ReferenceDate, Route};
use crate::resolver::GeoProvider;

use super::convert::{convert_routes, convert_segment_list};
use super::error::ApiGeoError;
use super::types::{RoutesResponse, SegmentListDto};

/// Name of the route fixture.
pub const ROUTES_FILE: &str = "rotas.json";

/// Directory holding segment list fixtures.
pub const SEGMENTS_DIR: &str = "trechos";

/// Mock APIGEO serving data from JSON files.
#[derive(Debug, Clone)]
pub struct MockApiGeo {
    routes: Arc<Vec<Route>>,
    /// Segment lists keyed by `UF-BR-TYPE`, uppercased.
    segments: Arc<HashMap<String, Vec<MiniSegment>>>,
}

fn segment_key(uf: &str, br: &str, segment_type: &str) -> String {
    format!("{uf}-{br}-{segment_type}").to_uppercase()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ApiGeoError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ApiGeoError::Mock(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&json)
        .map_err(|e| ApiGeoError::Mock(format!("failed to parse {}: {e}", path.display())))
}

impl MockApiGeo {
    /// Build a mock from in-memory data.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: Arc::new(routes),
            segments: Arc::new(HashMap::new()),
        }
    }

    /// Add the segment list served for one road.
    pub fn with_segments(
        mut self,
        uf: &str,
        br: &str,
        segment_type: &str,
        segments: Vec<MiniSegment>,
    ) -> Self {
        Arc::make_mut(&mut self.segments).insert(segment_key(uf, br, segment_type), segments);
        self
    }

    /// Load fixtures from `data_dir`.
    ///
    /// `rotas.json` is required; the `trechos` directory is optional.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, ApiGeoError> {
        let data_dir = data_dir.as_ref();

        let routes_path = data_dir.join(ROUTES_FILE);
        let response: RoutesResponse = read_json(&routes_path)?;
        let routes = convert_routes(&response);

        let mut segments = HashMap::new();
        let segments_dir = data_dir.join(SEGMENTS_DIR);

        if segments_dir.is_dir() {
            let entries = std::fs::read_dir(&segments_dir).map_err(|e| {
                ApiGeoError::Mock(format!("failed to read {}: {e}", segments_dir.display()))
            })?;

            for entry in entries {
                let path = entry
                    .map_err(|e| ApiGeoError::Mock(format!("failed to read directory entry: {e}")))?
                    .path();

                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }

                // "GO-153-B.json" -> "GO-153-B"
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| {
                        ApiGeoError::Mock(format!("invalid filename: {}", path.display()))
                    })?;

                if stem.split('-').count() != 3 {
                    return Err(ApiGeoError::Mock(format!(
                        "segment fixture {stem} is not named UF-BR-TYPE"
                    )));
                }

                let list: SegmentListDto = read_json(&path)?;
                segments.insert(stem.to_uppercase(), convert_segment_list(&list));
            }
        }

        Ok(Self {
            routes: Arc::new(routes),
            segments: Arc::new(segments),
        })
    }

    /// Roads with a segment fixture, as `UF-BR-TYPE`.
    pub fn available_roads(&self) -> Vec<String> {
        let mut roads: Vec<String> = self.segments.keys().cloned().collect();
        roads.sort();
        roads
    }
}

impl GeoProvider for MockApiGeo {
    async fn fetch_routes(
        &self,
        _lat: f64,
        _lng: f64,
        _radius_m: f64,
        _date: ReferenceDate,
    ) -> Result<Vec<Route>, ApiGeoError> {
        Ok(self.routes.as_ref().clone())
    }

    async fn fetch_segments(
        &self,
        uf: &str,
        br: &str,
        segment_type: &str,
        _date: ReferenceDate,
    ) -> Result<Vec<MiniSegment>, ApiGeoError> {
        Ok(self
            .segments
            .get(&segment_key(uf, br, segment_type))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> ReferenceDate {
        ReferenceDate::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn write_fixtures(dir: &Path) {
        std::fs::write(
            dir.join(ROUTES_FILE),
            r#"[{"br": "153", "uf": "GO", "km": 12.5, "versao": "202401A", "sg_tp_trecho": "B"}]"#,
        )
        .unwrap();

        std::fs::create_dir(dir.join(SEGMENTS_DIR)).unwrap();
        std::fs::write(
            dir.join(SEGMENTS_DIR).join("GO-153-B.json"),
            r#"{"trechos": [{"trecho": "153BGO0010", "extensao": 10.0},
                            {"trecho": "153BGO0030", "extensao": 8.0}]}"#,
        )
        .unwrap();
        std::fs::write(dir.join(SEGMENTS_DIR).join("notes.txt"), "ignored").unwrap();
    }

    #[tokio::test]
    async fn load_fixture_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());

        let mock = MockApiGeo::from_dir(dir.path()).unwrap();
        assert_eq!(mock.available_roads(), vec!["GO-153-B".to_string()]);

        let routes = mock.fetch_routes(-16.6, -49.2, 150.0, date()).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].km, 12.5);
        assert_eq!(routes[0].version.as_deref(), Some("202401A"));

        let segments = mock.fetch_segments("go", "153", "b", date()).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].segment_id, "153BGO0030");
    }

    #[tokio::test]
    async fn unknown_road_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let mock = MockApiGeo::from_dir(dir.path()).unwrap();

        let segments = mock.fetch_segments("SP", "116", "B", date()).await.unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn missing_routes_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MockApiGeo::from_dir(dir.path());
        assert!(matches!(result, Err(ApiGeoError::Mock(_))));
    }

    #[test]
    fn badly_named_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        std::fs::write(dir.path().join(SEGMENTS_DIR).join("GO153.json"), "{}").unwrap();

        let result = MockApiGeo::from_dir(dir.path());
        assert!(matches!(result, Err(ApiGeoError::Mock(_))));
    }

    #[tokio::test]
    async fn in_memory_builder() {
        let mock = MockApiGeo::new(Vec::new())
            .with_segments("GO", "153", "B", vec![MiniSegment::new("A", 1.0)]);

        assert!(mock.fetch_routes(0.0, 0.0, 1.0, date()).await.unwrap().is_empty());
        assert_eq!(
            mock.fetch_segments("GO", "153", "B", date()).await.unwrap().len(),
            1
        );
    }
}
