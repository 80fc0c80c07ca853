use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{GisgraphyConfig, DEFAULT_TIMEOUT_MS};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{decode_record, first_in_array, ErrorMarker, GeocodeOutcome, Provider};
use crate::{Coordinate, NormalizedResult, ProviderDescriptor, ProviderId, Quality};

/// Gisgraphy geocoding adapter.
///
/// Gisgraphy reports the match count in `numFound`; a missing or zero count
/// means no results even when `result` is present.
#[derive(Clone)]
pub struct GisgraphyAdapter {
    descriptor: ProviderDescriptor,
    http_client: Arc<dyn HttpClient>,
    config: GisgraphyConfig,
    timeout_ms: u64,
}

impl GisgraphyAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: GisgraphyConfig) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: ProviderId::Gisgraphy,
                display_name: String::from("Gisgraphy"),
                color: String::from("#984EA3"),
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

impl Provider for GisgraphyAdapter {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn build_request(&self, address: &str) -> HttpRequest {
        let mut request = HttpRequest::get(&self.config.base_url)
            .with_query("address", address)
            .with_query("format", "json")
            .with_timeout_ms(self.timeout_ms);
        if let Some(country) = &self.config.country {
            request = request.with_query("country", country);
        }
        request
    }

    fn first_match<'a>(&self, body: &'a Value) -> Result<Option<&'a Value>, ErrorMarker> {
        if match_count(body.get("numFound")) <= 0.0 {
            return Ok(None);
        }
        first_in_array(body.get("result"), "result")
    }

    fn parse(&self, record: &Value) -> GeocodeOutcome {
        let address: GisgraphyAddress = decode_record(record)?;
        let latitude = address.lat.to_f64("lat")?;
        let longitude = address.lng.to_f64("lng")?;

        NormalizedResult::new(
            collapse_whitespace(&address.formated_full),
            latitude,
            longitude,
            Quality::from(address.geocoding_level),
            record.clone(),
        )
        .map_err(ErrorMarker::from)
    }

    fn http_client(&self) -> &dyn HttpClient {
        self.http_client.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct GisgraphyAddress {
    // Gisgraphy spells it this way.
    #[serde(rename = "formatedFull")]
    formated_full: String,
    lat: Coordinate,
    lng: Coordinate,
    #[serde(rename = "geocodingLevel", default)]
    geocoding_level: Option<Value>,
}

/// `numFound` as a number; numeric strings count too, anything else is zero.
fn match_count(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(count)) => count.as_f64().unwrap_or(0.0),
        Some(Value::String(count)) => count.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
