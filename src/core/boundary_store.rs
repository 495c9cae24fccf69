use crate::core::{BoundaryCollection, BoundarySource, Result};
use crate::domain::model::{BoundaryFeature, BoundaryGeometry, Position, Ring};
use crate::utils::error::MapError;
use async_trait::async_trait;
use geojson::GeoJson;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_BOUNDARY_URL: &str = "https://raw.githubusercontent.com/datta07/INDIAN-SHAPEFILES/master/STATES/RAJASTHAN/RAJASTHAN_DISTRICTS.geojson";
pub const DEFAULT_NAME_PROPERTY: &str = "dtname";

#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    client: Client,
}

impl HttpBoundarySource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpBoundarySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoundarySource for HttpBoundarySource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Making boundary request to: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MapError::FetchError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Boundary response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MapError::FetchError {
                url: url.to_string(),
                message: format!("server responded with status {}", response.status()),
            });
        }

        let body = response.bytes().await.map_err(|e| MapError::FetchError {
            url: url.to_string(),
            message: format!("failed to read response body: {}", e),
        })?;
        Ok(body.to_vec())
    }
}

/// Fetch-once cache of boundary collections, keyed by URL.
///
/// Build one per process and hand it to whatever needs boundaries. Failed
/// fetches are not cached, so the next render cycle tries again.
pub struct BoundaryStore<B: BoundarySource> {
    source: B,
    name_property: String,
    cache: Mutex<HashMap<String, Arc<BoundaryCollection>>>,
}

impl<B: BoundarySource> BoundaryStore<B> {
    pub fn new(source: B) -> Self {
        Self::with_name_property(source, DEFAULT_NAME_PROPERTY)
    }

    pub fn with_name_property(source: B, name_property: impl Into<String>) -> Self {
        Self {
            source,
            name_property: name_property.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn load(&self, url: &str) -> Result<Arc<BoundaryCollection>> {
        if let Some(cached) = self.cache.lock().await.get(url) {
            tracing::debug!("Boundary cache hit for {}", url);
            return Ok(Arc::clone(cached));
        }

        tracing::info!("🌐 Fetching district boundaries from {}", url);
        let body = self.source.fetch(url).await?;
        let collection = parse_boundaries(&body, &self.name_property).map_err(|e| {
            MapError::FetchError {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;
        tracing::info!("Loaded {} district boundaries", collection.len());

        // 鎖不跨越網路請求；若同時有兩次載入，以先寫入者為準
        let mut cache = self.cache.lock().await;
        let entry = cache
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(collection));
        Ok(Arc::clone(entry))
    }

    pub async fn is_cached(&self, url: &str) -> bool {
        self.cache.lock().await.contains_key(url)
    }
}

/// Convert a GeoJSON FeatureCollection into district boundaries.
///
/// Features without a usable name or a Polygon/MultiPolygon geometry are
/// skipped with a warning.
pub fn parse_boundaries(body: &[u8], name_property: &str) -> Result<BoundaryCollection> {
    let text = std::str::from_utf8(body).map_err(|e| MapError::InvalidGeoJson {
        message: format!("body is not UTF-8: {}", e),
    })?;
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| MapError::InvalidGeoJson {
        message: e.to_string(),
    })?;

    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(MapError::InvalidGeoJson {
                message: "expected a FeatureCollection".to_string(),
            })
        }
    };

    let mut features = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;

    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = match feature.property(name_property).and_then(|v| v.as_str()) {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => {
                tracing::warn!(
                    "Skipping feature {}: missing string property '{}'",
                    index,
                    name_property
                );
                skipped += 1;
                continue;
            }
        };

        let geometry = match feature.geometry {
            Some(geometry) => geometry,
            None => {
                tracing::warn!("Skipping district {}: feature has no geometry", name);
                skipped += 1;
                continue;
            }
        };

        let geometry = match geometry.value {
            geojson::Value::Polygon(rings) => BoundaryGeometry::Polygon(convert_rings(rings)?),
            geojson::Value::MultiPolygon(polygons) => BoundaryGeometry::MultiPolygon(
                polygons
                    .into_iter()
                    .map(convert_rings)
                    .collect::<Result<Vec<_>>>()?,
            ),
            other => {
                tracing::warn!(
                    "Skipping district {}: unsupported geometry type {}",
                    name,
                    geometry_type_name(&other)
                );
                skipped += 1;
                continue;
            }
        };

        if geometry.is_empty() {
            tracing::warn!("Skipping district {}: geometry has no vertices", name);
            skipped += 1;
            continue;
        }

        features.push(BoundaryFeature {
            district_name: name,
            geometry,
        });
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} boundary features", skipped);
    }

    BoundaryCollection::new(features)
}

fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn convert_rings(rings: Vec<Vec<Vec<f64>>>) -> Result<Vec<Ring>> {
    rings
        .into_iter()
        .map(|ring| ring.into_iter().map(convert_position).collect())
        .collect()
}

fn convert_position(position: Vec<f64>) -> Result<Position> {
    match position.as_slice() {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(MapError::InvalidGeoJson {
            message: format!("position needs two coordinates, got {:?}", position),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TWO_DISTRICTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"dtname": "Ajmer", "stname": "RAJASTHAN"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[74.0, 25.5], [75.0, 25.5], [75.0, 26.5], [74.0, 25.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"dtname": "Jaisalmer"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[69.5, 26.0, 120.0], [70.5, 26.0, 130.0], [70.0, 27.5, 90.0], [69.5, 26.0, 120.0]]],
                        [[[71.0, 28.0], [71.5, 28.0], [71.5, 28.2], [71.0, 28.0]]]
                    ]
                }
            }
        ]
    }"#;

    struct CountingSource {
        body: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BoundarySource for CountingSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Some(body) => Ok(body.as_bytes().to_vec()),
                None => Err(MapError::FetchError {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_parse_polygon_and_multipolygon() {
        let collection = parse_boundaries(TWO_DISTRICTS.as_bytes(), "dtname").unwrap();

        assert_eq!(collection.len(), 2);
        let names: Vec<&str> = collection.district_names().collect();
        assert_eq!(names, vec!["Ajmer", "Jaisalmer"]);

        match &collection.features()[1].geometry {
            BoundaryGeometry::MultiPolygon(parts) => {
                assert_eq!(parts.len(), 2);
                // 高度座標會被捨棄
                assert_eq!(parts[0][0][0], [69.5, 26.0]);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_skips_unusable_features() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"dtname": "Bikaner"},
                 "geometry": {"type": "Point", "coordinates": [73.3, 28.0]}},
                {"type": "Feature", "properties": {"district": "Churu"},
                 "geometry": {"type": "Polygon", "coordinates": [[[74.0, 28.0], [75.0, 28.0], [74.0, 28.0]]]}},
                {"type": "Feature", "properties": {"dtname": "Alwar"}, "geometry": null},
                {"type": "Feature", "properties": {"dtname": "Sikar"},
                 "geometry": {"type": "Polygon", "coordinates": [[[75.0, 27.5], [75.5, 27.5], [75.0, 27.5]]]}}
            ]
        }"#;

        let collection = parse_boundaries(body.as_bytes(), "dtname").unwrap();
        let names: Vec<&str> = collection.district_names().collect();
        assert_eq!(names, vec!["Sikar"]);
    }

    #[test]
    fn test_parse_custom_name_property() {
        let collection = parse_boundaries(TWO_DISTRICTS.as_bytes(), "stname").unwrap();
        let names: Vec<&str> = collection.district_names().collect();
        assert_eq!(names, vec!["RAJASTHAN"]);
    }

    #[test]
    fn test_parse_rejects_non_collection() {
        let body = r#"{"type": "Point", "coordinates": [74.0, 27.0]}"#;
        assert!(matches!(
            parse_boundaries(body.as_bytes(), "dtname"),
            Err(MapError::InvalidGeoJson { .. })
        ));
        assert!(matches!(
            parse_boundaries(b"<html>not json</html>", "dtname"),
            Err(MapError::InvalidGeoJson { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_fetches_once_per_url() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = BoundaryStore::new(CountingSource {
            body: Some(TWO_DISTRICTS.to_string()),
            calls: calls.clone(),
        });

        let first = store.load("https://example.com/a.geojson").await.unwrap();
        let second = store.load("https://example.com/a.geojson").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.is_cached("https://example.com/a.geojson").await);

        store.load("https://example.com/b.geojson").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_does_not_cache_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = BoundaryStore::new(CountingSource {
            body: None,
            calls: calls.clone(),
        });

        assert!(store.load("https://example.com/a.geojson").await.is_err());
        assert!(store.load("https://example.com/a.geojson").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!store.is_cached("https://example.com/a.geojson").await);
    }

    #[tokio::test]
    async fn test_load_wraps_invalid_documents_as_fetch_error() {
        let store = BoundaryStore::new(CountingSource {
            body: Some("[]".to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        });

        let err = store.load("https://example.com/a.geojson").await.unwrap_err();
        assert!(matches!(err, MapError::FetchError { .. }));
    }

    #[tokio::test]
    async fn test_http_source_reports_status_errors() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.geojson");
            then.status(404);
        });

        let source = HttpBoundarySource::new();
        let err = source
            .fetch(&server.url("/missing.geojson"))
            .await
            .unwrap_err();

        api_mock.assert();
        match err {
            MapError::FetchError { message, .. } => assert!(message.contains("404")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_reports_truncated_body_as_fetch_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/districts.geojson", listener.local_addr().unwrap());

        // 回應標頭宣告的長度大於實際送出的內容，然後直接關閉連線
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"type\"")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let err = HttpBoundarySource::new().fetch(&url).await.unwrap_err();
        server.await.unwrap();

        match err {
            MapError::FetchError { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
