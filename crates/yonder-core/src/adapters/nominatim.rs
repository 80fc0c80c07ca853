use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{NominatimConfig, DEFAULT_TIMEOUT_MS};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{decode_record, ErrorMarker, GeocodeOutcome, Provider};
use crate::{Coordinate, NormalizedResult, ProviderDescriptor, ProviderId, Quality};

/// OpenStreetMap Nominatim search adapter.
///
/// The response body is a bare JSON array of places.
#[derive(Clone)]
pub struct NominatimAdapter {
    descriptor: ProviderDescriptor,
    http_client: Arc<dyn HttpClient>,
    config: NominatimConfig,
    timeout_ms: u64,
}

impl NominatimAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: NominatimConfig) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: ProviderId::Nominatim,
                display_name: String::from("Nominatim"),
                color: String::from("#fd8d3c"),
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

impl Provider for NominatimAdapter {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_request(&self, address: &str) -> HttpRequest {
        let mut request = HttpRequest::get(&self.config.base_url)
            .with_query("q", address)
            .with_query("format", "json")
            .with_timeout_ms(self.timeout_ms);
        if self.config.address_details {
            request = request.with_query("addressdetails", "1");
        }
        request
    }

    fn first_match<'a>(&self, body: &'a Value) -> Result<Option<&'a Value>, ErrorMarker> {
        match body {
            Value::Array(places) => Ok(places.first()),
            _ => Err(ErrorMarker::parse_failed(
                "nominatim response is not an array of places",
            )),
        }
    }

    fn parse(&self, record: &Value) -> GeocodeOutcome {
        let place: NominatimPlace = decode_record(record)?;
        let latitude = place.lat.to_f64("lat")?;
        let longitude = place.lon.to_f64("lon")?;

        NormalizedResult::new(
            place.display_name,
            latitude,
            longitude,
            Quality::from(place.importance),
            record.clone(),
        )
        .map_err(ErrorMarker::from)
    }

    fn http_client(&self) -> &dyn HttpClient {
        self.http_client.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: Coordinate,
    lon: Coordinate,
    #[serde(default)]
    importance: Option<Value>,
}
