use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ValidationError;

/// Provider-specific confidence value.
///
/// OpenCage reports 0-10, Esri 0-100, Nominatim a fractional importance and
/// Gisgraphy a textual level. Kept as the provider sent it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(Value);

impl Quality {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Option<Value>> for Quality {
    fn from(value: Option<Value>) -> Self {
        Self(value.unwrap_or(Value::Null))
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::Null => f.write_str("-"),
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

/// Common result shape produced by every provider adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub quality: Quality,
    /// Matched record exactly as the provider returned it.
    pub raw: Value,
}

impl NormalizedResult {
    pub fn new(
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        quality: Quality,
        raw: Value,
    ) -> Result<Self, ValidationError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        validate_finite("latitude", latitude)?;
        validate_finite("longitude", longitude)?;

        Ok(Self {
            address,
            latitude,
            longitude,
            quality,
            raw,
        })
    }

    pub const fn lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    /// Raw record rendered for inspection.
    pub fn raw_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}
