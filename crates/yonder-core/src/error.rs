use thiserror::Error;

/// Validation and configuration errors exposed by `yonder-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid provider '{value}', expected one of opencage, nominatim, esri, gisgraphy")]
    InvalidProvider { value: String },
    #[error("provider '{id}' is registered more than once")]
    DuplicateProvider { id: String },

    #[error("field '{field}' must be a finite number")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be numeric, got '{value}'")]
    NonNumericValue { field: &'static str, value: String },

    #[error("address cannot be empty")]
    EmptyAddress,

    #[error("display name cannot be empty")]
    EmptyDisplayName,
}
