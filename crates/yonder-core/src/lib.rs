//! # Yonder Core
//!
//! Side-by-side geocoding across several third-party services.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **A uniform provider contract** ([`Provider`]) every geocoding service implements
//! - **Adapters** mapping each service's wire format into one [`NormalizedResult`]
//! - **An immutable registry** of configured providers
//! - **Fan-out dispatch** issuing one lookup per provider and collecting the
//!   independently arriving, independently failing outcomes into a [`ResultSet`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | OpenCage, Nominatim, Esri and Gisgraphy adapters |
//! | [`config`] | Explicit adapter configuration |
//! | [`dispatcher`] | Fan-out and completion handling |
//! | [`domain`] | Normalized result model |
//! | [`error`] | Validation errors |
//! | [`http_client`] | Injected HTTP capability |
//! | [`provider`] | Provider trait and outcome types |
//! | [`registry`] | Provider registry and builder |
//! | [`result_set`] | Per-request slots and update notification |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yonder_core::{Dispatcher, GeocoderConfig, ProviderId, RegistryBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = RegistryBuilder::new(GeocoderConfig::from_env()).build()?;
//!     let mut dispatcher = Dispatcher::new(Arc::new(registry));
//!
//!     dispatcher.dispatch("1600 Amphitheatre Pkwy, Mountain View", &ProviderId::ALL);
//!     while let Some(slot) = dispatcher.next_update().await {
//!         println!("{}: {:?}", slot.display_name, slot.status());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Caller / CLI   │
//! └────────┬────────┘
//!          │ dispatch(address, active ids)
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Dispatcher    │────▶│    ResultSet     │
//! │ (generation n)  │     │ (one slot / id)  │
//! └────────┬────────┘     └──────────────────┘
//!          │ one task per provider
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │    Provider     │────▶│   HTTP Client    │
//! │ (adapter trait) │     │ (reqwest/canned) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! A lookup never fails the dispatch. Each provider's slot settles either to
//! a [`NormalizedResult`] or an [`ErrorMarker`]:
//!
//! ```rust
//! use yonder_core::{ErrorKind, ErrorMarker};
//!
//! fn describe(marker: &ErrorMarker) -> &'static str {
//!     match marker.kind() {
//!         ErrorKind::NoResults => "service matched nothing",
//!         ErrorKind::RequestFailed => "transport or status failure",
//!         ErrorKind::ParseFailed => "unexpected response shape",
//!     }
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod registry;
pub mod result_set;
pub mod source;

// Adapter implementations
pub use adapters::{EsriAdapter, GisgraphyAdapter, NominatimAdapter, OpenCageAdapter};

// Configuration
pub use config::{
    EsriConfig, GeocoderConfig, GisgraphyConfig, NominatimConfig, OpenCageConfig,
    DEFAULT_TIMEOUT_MS,
};

// Dispatch
pub use dispatcher::Dispatcher;

// Domain models
pub use domain::{Coordinate, NormalizedResult, Quality};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    CannedHttpClient, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient, ResponseFormat,
};

// Provider contract
pub use provider::{ErrorKind, ErrorMarker, GeocodeOutcome, Provider, ProviderDescriptor};

// Registry
pub use registry::{ProviderRegistry, RegistryBuilder};

// Result set
pub use result_set::{
    Generation, RecordError, ResultSet, ResultSummary, Slot, SlotState, SlotStatus, SlotUpdate,
};

// Provider identifiers
pub use source::ProviderId;
