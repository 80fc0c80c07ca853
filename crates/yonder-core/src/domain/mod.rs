//! # Domain Models
//!
//! The normalized shape every geocoding provider is mapped into.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NormalizedResult`] | Address, coordinates, opaque quality, raw record |
//! | [`Quality`] | Provider-specific score, not comparable across providers |
//! | [`Coordinate`] | Wire coordinate accepted as a JSON number or numeric string |
//!
//! Construction validates that the address is not blank and both
//! coordinates are finite, so a `NormalizedResult` can never carry `NaN` or
//! an infinity.

mod coordinate;
mod models;

pub use coordinate::Coordinate;
pub use models::{NormalizedResult, Quality};
