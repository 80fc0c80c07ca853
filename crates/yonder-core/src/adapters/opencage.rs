use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{OpenCageConfig, DEFAULT_TIMEOUT_MS};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{decode_record, first_in_array, ErrorMarker, GeocodeOutcome, Provider};
use crate::{Coordinate, NormalizedResult, ProviderDescriptor, ProviderId, Quality};

/// OpenCage forward geocoding adapter.
///
/// `GET /geocode/v1/json?q=<address>&key=<key>`, results under `results`.
#[derive(Clone)]
pub struct OpenCageAdapter {
    descriptor: ProviderDescriptor,
    http_client: Arc<dyn HttpClient>,
    config: OpenCageConfig,
    timeout_ms: u64,
}

impl OpenCageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: OpenCageConfig) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: ProviderId::OpenCage,
                display_name: String::from("OpenCage"),
                color: String::from("#e0c74d"),
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

impl Provider for OpenCageAdapter {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_request(&self, address: &str) -> HttpRequest {
        let mut request = HttpRequest::get(&self.config.base_url)
            .with_query("q", address)
            .with_timeout_ms(self.timeout_ms);
        if let Some(key) = &self.config.api_key {
            request = request.with_query("key", key);
        }
        request
    }

    fn first_match<'a>(&self, body: &'a Value) -> Result<Option<&'a Value>, ErrorMarker> {
        first_in_array(body.get("results"), "results")
    }

    fn parse(&self, record: &Value) -> GeocodeOutcome {
        let location: OpenCageLocation = decode_record(record)?;
        let latitude = location.geometry.lat.to_f64("geometry.lat")?;
        let longitude = location.geometry.lng.to_f64("geometry.lng")?;

        NormalizedResult::new(
            location.formatted,
            latitude,
            longitude,
            Quality::from(location.confidence),
            record.clone(),
        )
        .map_err(ErrorMarker::from)
    }

    fn http_client(&self) -> &dyn HttpClient {
        self.http_client.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct OpenCageLocation {
    formatted: String,
    geometry: OpenCageGeometry,
    #[serde(default)]
    confidence: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: Coordinate,
    lng: Coordinate,
}
