use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use serde_json::{json, Value};
use yonder_core::{
    CannedHttpClient, ErrorKind, ErrorMarker, GeocoderConfig, HttpClient, HttpError,
    HttpResponse, NormalizedResult, Provider, ProviderId, RegistryBuilder,
};

const OPENCAGE: &str = "https://api.opencagedata.com/";
const NOMINATIM: &str = "https://nominatim.openstreetmap.org/";
const ESRI: &str = "https://geocode.arcgis.com/";
const GISGRAPHY: &str = "https://services.gisgraphy.com/";

struct ProviderCase {
    id: ProviderId,
    url_prefix: &'static str,
    matched: Value,
    empty: Value,
    non_numeric: Value,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            id: ProviderId::OpenCage,
            url_prefix: OPENCAGE,
            matched: json!({
                "results": [{
                    "formatted": "1600 Amphitheatre Parkway, Mountain View, CA",
                    "geometry": { "lat": 37.42, "lng": -122.08 },
                    "confidence": 9
                }]
            }),
            empty: json!({ "results": [] }),
            non_numeric: json!({
                "results": [{
                    "formatted": "Nowhere",
                    "geometry": { "lat": "north", "lng": -122.08 },
                    "confidence": 1
                }]
            }),
        },
        ProviderCase {
            id: ProviderId::Nominatim,
            url_prefix: NOMINATIM,
            matched: json!([{
                "display_name": "Amphitheatre Parkway, Mountain View",
                "lat": "37.4224",
                "lon": "-122.0842",
                "importance": 0.62
            }]),
            empty: json!([]),
            non_numeric: json!([{
                "display_name": "Nowhere",
                "lat": "37.4224",
                "lon": "west",
                "importance": 0.1
            }]),
        },
        ProviderCase {
            id: ProviderId::Esri,
            url_prefix: ESRI,
            matched: json!({
                "locations": [{
                    "name": "X",
                    "feature": {
                        "geometry": { "x": -122.0, "y": 37.0 },
                        "attributes": { "Score": 100 }
                    }
                }]
            }),
            empty: json!({ "locations": [] }),
            non_numeric: json!({
                "locations": [{
                    "name": "X",
                    "feature": {
                        "geometry": { "x": "far", "y": 37.0 },
                        "attributes": { "Score": 10 }
                    }
                }]
            }),
        },
        ProviderCase {
            id: ProviderId::Gisgraphy,
            url_prefix: GISGRAPHY,
            matched: json!({
                "numFound": 1,
                "result": [{
                    "formatedFull": "123   Main   St",
                    "lat": 40.0,
                    "lng": -75.0,
                    "geocodingLevel": "HOUSE_NUMBER"
                }]
            }),
            empty: json!({ "numFound": 0, "result": [] }),
            non_numeric: json!({
                "numFound": 1,
                "result": [{
                    "formatedFull": "Main St",
                    "lat": "",
                    "lng": -75.0,
                    "geocodingLevel": "STREET"
                }]
            }),
        },
    ]
}

fn provider_for(id: ProviderId, client: CannedHttpClient) -> Arc<dyn Provider> {
    let http_client: Arc<dyn HttpClient> = Arc::new(client);
    let registry = RegistryBuilder::new(GeocoderConfig::default().with_opencage_key("test-key"))
        .with_http_client(http_client)
        .build()
        .expect("valid registry");
    registry
        .get(id)
        .cloned()
        .unwrap_or_else(|| panic!("provider '{id}' should be registered"))
}

fn geocode_with(
    case: &ProviderCase,
    response: Result<HttpResponse, HttpError>,
) -> Result<NormalizedResult, ErrorMarker> {
    let provider = provider_for(
        case.id,
        CannedHttpClient::new().with_response(case.url_prefix, response),
    );
    block_on(provider.geocode("1600 Amphitheatre Pkwy"))
}

#[test]
fn matched_responses_normalize_to_finite_coordinates() {
    for case in provider_cases() {
        let result = geocode_with(&case, Ok(HttpResponse::ok_json(case.matched.to_string())))
            .unwrap_or_else(|error| panic!("provider '{}' geocode failed: {error}", case.id));

        assert!(
            !result.address.is_empty(),
            "provider '{}': address",
            case.id
        );
        assert!(
            result.latitude.is_finite() && result.longitude.is_finite(),
            "provider '{}': coordinates must be finite",
            case.id
        );
        assert!(!result.raw.is_null(), "provider '{}': raw record", case.id);
    }
}

#[test]
fn empty_responses_settle_to_no_results() {
    for case in provider_cases() {
        let error = geocode_with(&case, Ok(HttpResponse::ok_json(case.empty.to_string())))
            .expect_err("empty response should not produce a result");

        assert_eq!(error.kind(), ErrorKind::NoResults, "provider '{}'", case.id);
        assert_eq!(error.reason(), "No results.", "provider '{}'", case.id);
    }
}

#[test]
fn non_numeric_coordinates_never_become_nan() {
    for case in provider_cases() {
        let error = geocode_with(
            &case,
            Ok(HttpResponse::ok_json(case.non_numeric.to_string())),
        )
        .expect_err("non-numeric coordinate should be rejected");

        assert_eq!(error.kind(), ErrorKind::ParseFailed, "provider '{}'", case.id);
        assert_eq!(
            error.reason(),
            "Error parsing results.",
            "provider '{}'",
            case.id
        );
    }
}

#[test]
fn transport_and_status_failures_share_the_parse_error_reason() {
    for case in provider_cases() {
        let transport = geocode_with(&case, Err(HttpError::new("connection reset")))
            .expect_err("transport failure");
        assert_eq!(transport.kind(), ErrorKind::RequestFailed, "provider '{}'", case.id);
        assert_eq!(transport.reason(), "Error parsing results.");
        assert_eq!(transport.cause(), Some("connection reset"));

        let status = geocode_with(&case, Ok(HttpResponse::with_status(503, "{}")))
            .expect_err("non-2xx status");
        assert_eq!(status.kind(), ErrorKind::RequestFailed, "provider '{}'", case.id);
        assert!(
            status.cause().is_some_and(|cause| cause.contains("503")),
            "provider '{}': status cause",
            case.id
        );
    }
}

#[test]
fn malformed_bodies_are_parse_failures() {
    for case in provider_cases() {
        let error = geocode_with(&case, Ok(HttpResponse::ok_json("<html>busy</html>")))
            .expect_err("non-json body");

        assert_eq!(error.kind(), ErrorKind::ParseFailed, "provider '{}'", case.id);
    }
}

#[test]
fn documented_scenarios_normalize_exactly() {
    let cases = provider_cases();

    let esri = geocode_with(&cases[2], Ok(HttpResponse::ok_json(cases[2].matched.to_string())))
        .expect("esri result");
    assert_eq!(esri.address, "X");
    assert_eq!(esri.lat_lng(), [37.0, -122.0]);
    assert_eq!(esri.quality.as_f64(), Some(100.0));

    let gisgraphy =
        geocode_with(&cases[3], Ok(HttpResponse::ok_json(cases[3].matched.to_string())))
            .expect("gisgraphy result");
    assert_eq!(gisgraphy.address, "123 Main St");
    assert_eq!(gisgraphy.lat_lng(), [40.0, -75.0]);
    assert_eq!(gisgraphy.quality.as_value(), &json!("HOUSE_NUMBER"));

    let nominatim =
        geocode_with(&cases[1], Ok(HttpResponse::ok_json(cases[1].matched.to_string())))
            .expect("nominatim result");
    assert_eq!(nominatim.lat_lng(), [37.4224, -122.0842]);
}

fn block_on<F: Future>(future: F) -> F::Output {
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = Box::pin(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
