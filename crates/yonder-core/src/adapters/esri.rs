use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{EsriConfig, DEFAULT_TIMEOUT_MS};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{decode_record, first_in_array, ErrorMarker, GeocodeOutcome, Provider};
use crate::{Coordinate, NormalizedResult, ProviderDescriptor, ProviderId, Quality};

/// ArcGIS World Geocoding Service `find` adapter.
///
/// Coordinates live on `feature.geometry` as `x` (longitude) and `y`
/// (latitude); the match score is `feature.attributes.Score`.
#[derive(Clone)]
pub struct EsriAdapter {
    descriptor: ProviderDescriptor,
    http_client: Arc<dyn HttpClient>,
    config: EsriConfig,
    timeout_ms: u64,
}

impl EsriAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: EsriConfig) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: ProviderId::Esri,
                display_name: String::from("Esri"),
                color: String::from("#444"),
            },
            http_client,
            config,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Provider for EsriAdapter {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_request(&self, address: &str) -> HttpRequest {
        HttpRequest::get(&self.config.base_url)
            .with_query("text", address)
            .with_query("f", "json")
            .with_timeout_ms(self.timeout_ms)
    }

    fn first_match<'a>(&self, body: &'a Value) -> Result<Option<&'a Value>, ErrorMarker> {
        first_in_array(body.get("locations"), "locations")
    }

    fn parse(&self, record: &Value) -> GeocodeOutcome {
        let location: EsriLocation = decode_record(record)?;
        let geometry = location.feature.geometry;
        let latitude = geometry.y.to_f64("feature.geometry.y")?;
        let longitude = geometry.x.to_f64("feature.geometry.x")?;

        NormalizedResult::new(
            location.name,
            latitude,
            longitude,
            Quality::from(location.feature.attributes.score),
            record.clone(),
        )
        .map_err(ErrorMarker::from)
    }

    fn http_client(&self) -> &dyn HttpClient {
        self.http_client.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct EsriLocation {
    name: String,
    feature: EsriFeature,
}

#[derive(Debug, Deserialize)]
struct EsriFeature {
    geometry: EsriGeometry,
    #[serde(default)]
    attributes: EsriAttributes,
}

#[derive(Debug, Deserialize)]
struct EsriGeometry {
    x: Coordinate,
    y: Coordinate,
}

#[derive(Debug, Default, Deserialize)]
struct EsriAttributes {
    #[serde(rename = "Score", default)]
    score: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{block_on, RecordingHttpClient};
    use crate::provider::ErrorKind;
    use serde_json::json;

    fn adapter(client: Arc<RecordingHttpClient>) -> EsriAdapter {
        EsriAdapter::new(client, EsriConfig::default())
    }

    #[test]
    fn x_is_longitude_and_y_is_latitude() {
        let client = Arc::new(RecordingHttpClient::json(json!({
            "locations": [
                {
                    "name": "X",
                    "feature": {
                        "geometry": {"x": -122.0, "y": 37.0},
                        "attributes": {"Score": 100}
                    }
                }
            ]
        })));

        let result = block_on(adapter(client).geocode("X")).expect("location should parse");

        assert_eq!(result.address, "X");
        assert_eq!(result.latitude, 37.0);
        assert_eq!(result.longitude, -122.0);
        assert_eq!(result.quality.as_f64(), Some(100.0));
    }

    #[test]
    fn request_uses_text_param() {
        let client = Arc::new(RecordingHttpClient::json(json!({"locations": []})));
        let _ = block_on(adapter(client.clone()).geocode("380 New York St"));

        let request = &client.recorded_requests()[0];
        assert_eq!(request.query_value("text"), Some("380 New York St"));
        assert_eq!(request.query_value("f"), Some("json"));
    }

    #[test]
    fn empty_locations_yield_no_results() {
        let client = Arc::new(RecordingHttpClient::json(json!({
            "spatialReference": {"wkid": 4326},
            "locations": []
        })));
        let error = block_on(adapter(client).geocode("X")).expect_err("no results");
        assert_eq!(error, ErrorMarker::no_results());
    }

    #[test]
    fn error_payload_without_locations_is_a_parse_failure() {
        let client = Arc::new(RecordingHttpClient::json(json!({
            "error": {"code": 498, "message": "Invalid token."}
        })));
        let error = block_on(adapter(client).geocode("X")).expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::ParseFailed);
        assert_eq!(error.reason(), ErrorMarker::PARSE_ERROR);
    }

    #[test]
    fn missing_attributes_leave_quality_empty() {
        let client = Arc::new(RecordingHttpClient::json(json!({
            "locations": [{"name": "X", "feature": {"geometry": {"x": 1.5, "y": 2.5}}}]
        })));
        let result = block_on(adapter(client).geocode("X")).expect("geometry suffices");
        assert!(result.quality.is_missing());
    }
}
