//! Provider contract and outcome types.
//!
//! This module defines the adapter contract (`Provider`) that every geocoding
//! service implementation follows, the per-provider outcome
//! ([`GeocodeOutcome`]), and the shared lookup pipeline adapters run through.
//!
//! # Lookup pipeline
//!
//! | Step | Failure |
//! |------|---------|
//! | One outbound request | [`ErrorKind::RequestFailed`] |
//! | 2xx status check | [`ErrorKind::RequestFailed`] |
//! | Body decode | [`ErrorKind::ParseFailed`] |
//! | First-match selection | [`ErrorKind::NoResults`] / [`ErrorKind::ParseFailed`] |
//! | Provider parse step | [`ErrorKind::ParseFailed`] |
//!
//! Every failure is returned as an [`ErrorMarker`]; nothing panics or escapes
//! the lookup of a single provider.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::{NormalizedResult, ProviderId, ValidationError};

/// Error classification kept distinct internally.
///
/// Users only ever see two strings: "No results." and
/// "Error parsing results.".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoResults,
    RequestFailed,
    ParseFailed,
}

/// Failed provider outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMarker {
    kind: ErrorKind,
    reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

impl ErrorMarker {
    pub const NO_RESULTS: &'static str = "No results.";
    pub const PARSE_ERROR: &'static str = "Error parsing results.";

    pub fn no_results() -> Self {
        Self {
            kind: ErrorKind::NoResults,
            reason: String::from(Self::NO_RESULTS),
            cause: None,
        }
    }

    pub fn request_failed(cause: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RequestFailed,
            reason: String::from(Self::PARSE_ERROR),
            cause: Some(cause.into()),
        }
    }

    pub fn parse_failed(cause: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseFailed,
            reason: String::from(Self::PARSE_ERROR),
            cause: Some(cause.into()),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable reason shown in the provider's slot.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::NoResults => "geocode.no_results",
            ErrorKind::RequestFailed => "geocode.request_failed",
            ErrorKind::ParseFailed => "geocode.parse_failed",
        }
    }
}

impl Display for ErrorMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ErrorMarker {}

impl From<HttpError> for ErrorMarker {
    fn from(error: HttpError) -> Self {
        Self::request_failed(error.message())
    }
}

impl From<ValidationError> for ErrorMarker {
    fn from(error: ValidationError) -> Self {
        Self::parse_failed(error.to_string())
    }
}

impl From<serde_json::Error> for ErrorMarker {
    fn from(error: serde_json::Error) -> Self {
        Self::parse_failed(error.to_string())
    }
}

/// Result of one provider lookup. Atomic: fully normalized or fully an error.
pub type GeocodeOutcome = Result<NormalizedResult, ErrorMarker>;

/// Display metadata attached to a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: String,
    /// Display hint only; never interpreted by the core.
    pub color: String,
}

impl ProviderDescriptor {
    pub fn new(
        id: ProviderId,
        display_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }

        Ok(Self {
            id,
            display_name,
            color: color.into(),
        })
    }
}

/// Geocoding provider contract.
///
/// All adapters implement this trait to be placed in a
/// [`ProviderRegistry`](crate::ProviderRegistry).
///
/// # Required Methods
///
/// | Method | Description |
/// |--------|-------------|
/// | [`descriptor`](Provider::descriptor) | Id, display name, color |
/// | [`build_request`](Provider::build_request) | Outbound request for an address |
/// | [`first_match`](Provider::first_match) | Selects the first record from a decoded body |
/// | [`parse`](Provider::parse) | Maps one record to a [`NormalizedResult`] |
/// | [`http_client`](Provider::http_client) | Injected transport |
///
/// [`geocode`](Provider::geocode) is provided and runs the shared pipeline;
/// adapters only supply the service-specific pieces.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared across lookups.
pub trait Provider: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    fn id(&self) -> ProviderId {
        self.descriptor().id
    }

    fn display_name(&self) -> &str {
        &self.descriptor().display_name
    }

    fn color(&self) -> &str {
        &self.descriptor().color
    }

    /// The address is passed through unvalidated.
    fn build_request(&self, address: &str) -> HttpRequest;

    /// Returns `Ok(None)` when the service matched nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorMarker`] when the body does not have the service's
    /// documented result container.
    fn first_match<'a>(&self, body: &'a Value) -> Result<Option<&'a Value>, ErrorMarker>;

    /// # Errors
    ///
    /// Returns [`ErrorMarker`] with [`ErrorKind::ParseFailed`] when a field is
    /// missing or a coordinate is not numeric.
    fn parse(&self, record: &Value) -> GeocodeOutcome;

    fn http_client(&self) -> &dyn HttpClient;

    /// Issues exactly one request and normalizes the first match.
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = GeocodeOutcome> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(address);
            let format = request.response_format.clone();
            let host = request.host().to_owned();
            tracing::debug!(provider = %self.id(), %host, "issuing geocode request");

            let response = self.http_client().execute(request).await?;
            if !response.is_success() {
                return Err(ErrorMarker::request_failed(format!(
                    "{host} returned status {}",
                    response.status
                )));
            }

            let body = format.decode(&response.body)?;
            match self.first_match(&body)? {
                Some(record) => self.parse(record),
                None => Err(ErrorMarker::no_results()),
            }
        })
    }
}

/// First element of a JSON array, or a parse failure when `value` is not one.
pub(crate) fn first_in_array<'a>(
    value: Option<&'a Value>,
    container: &str,
) -> Result<Option<&'a Value>, ErrorMarker> {
    match value {
        Some(Value::Array(items)) => Ok(items.first()),
        Some(_) => Err(ErrorMarker::parse_failed(format!(
            "'{container}' is not an array"
        ))),
        None => Err(ErrorMarker::parse_failed(format!(
            "response has no '{container}' field"
        ))),
    }
}

/// Deserialize a matched record into a provider's wire type.
pub(crate) fn decode_record<T>(record: &Value) -> Result<T, ErrorMarker>
where
    T: serde::de::DeserializeOwned,
{
    T::deserialize(record).map_err(ErrorMarker::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_and_parse_failures_share_one_reason_but_keep_kind() {
        let transport = ErrorMarker::from(HttpError::new("connection failed"));
        let parse = ErrorMarker::parse_failed("missing field `lat`");

        assert_eq!(transport.reason(), ErrorMarker::PARSE_ERROR);
        assert_eq!(parse.reason(), ErrorMarker::PARSE_ERROR);
        assert_eq!(transport.kind(), ErrorKind::RequestFailed);
        assert_eq!(parse.kind(), ErrorKind::ParseFailed);
        assert_eq!(transport.cause(), Some("connection failed"));
        assert_eq!(transport.code(), "geocode.request_failed");
    }

    #[test]
    fn no_results_has_no_cause() {
        let marker = ErrorMarker::no_results();
        assert_eq!(marker.to_string(), "No results.");
        assert_eq!(marker.cause(), None);
        assert_eq!(marker.code(), "geocode.no_results");
    }

    #[test]
    fn first_in_array_distinguishes_empty_from_malformed() {
        let body = json!({"results": [], "other": 1});
        assert_eq!(first_in_array(body.get("results"), "results"), Ok(None));

        let error = first_in_array(body.get("other"), "other").expect_err("not an array");
        assert_eq!(error.kind(), ErrorKind::ParseFailed);

        let error = first_in_array(body.get("missing"), "missing").expect_err("absent");
        assert_eq!(error.kind(), ErrorKind::ParseFailed);
    }

    #[test]
    fn descriptor_requires_display_name() {
        let error = ProviderDescriptor::new(ProviderId::Esri, "  ", "#444")
            .expect_err("blank name rejected");
        assert_eq!(error, ValidationError::EmptyDisplayName);
    }
}
