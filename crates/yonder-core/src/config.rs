//! Explicit configuration for provider adapters.
//!
//! Nothing here is global: a [`GeocoderConfig`] is built by the caller and
//! handed to [`RegistryBuilder`](crate::RegistryBuilder).
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var |
//! |---------|-----------------|------------------|
//! | OpenCage key | `YONDER_OPENCAGE_API_KEY` | `OPENCAGE_API_KEY` |
//! | Gisgraphy country | `YONDER_GISGRAPHY_COUNTRY` | - |
//!
//! Keys are forwarded as-is; they are never validated or logged.

use std::env;

pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCageConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for OpenCageConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.opencagedata.com/geocode/v1/json"),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    pub address_details: bool,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://nominatim.openstreetmap.org/search"),
            address_details: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsriConfig {
    pub base_url: String,
}

impl Default for EsriConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(
                "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/find",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GisgraphyConfig {
    pub base_url: String,
    /// ISO country code narrowing the search, e.g. `US`.
    pub country: Option<String>,
}

impl Default for GisgraphyConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://services.gisgraphy.com/geocoding/geocode"),
            country: None,
        }
    }
}

/// Settings for every built-in adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    pub opencage: OpenCageConfig,
    pub nominatim: NominatimConfig,
    pub esri: EsriConfig,
    pub gisgraphy: GisgraphyConfig,
    /// Per-request transport timeout handed to the HTTP client.
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            opencage: OpenCageConfig::default(),
            nominatim: NominatimConfig::default(),
            esri: EsriConfig::default(),
            gisgraphy: GisgraphyConfig::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GeocoderConfig {
    /// Defaults plus whatever the environment provides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.opencage.api_key = env::var("YONDER_OPENCAGE_API_KEY")
            .or_else(|_| env::var("OPENCAGE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        config.gisgraphy.country = env::var("YONDER_GISGRAPHY_COUNTRY")
            .ok()
            .filter(|country| !country.trim().is_empty());
        config
    }

    pub fn with_opencage_key(mut self, key: impl Into<String>) -> Self {
        self.opencage.api_key = Some(key.into());
        self
    }

    pub fn with_gisgraphy_country(mut self, country: impl Into<String>) -> Self {
        self.gisgraphy.country = Some(country.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
