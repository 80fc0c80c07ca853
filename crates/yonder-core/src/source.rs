use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical geocoding provider identifiers.
///
/// The set is closed: every registry entry is keyed by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenCage,
    Nominatim,
    Esri,
    Gisgraphy,
}

impl ProviderId {
    pub const ALL: [Self; 4] = [Self::OpenCage, Self::Nominatim, Self::Esri, Self::Gisgraphy];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenCage => "opencage",
            Self::Nominatim => "nominatim",
            Self::Esri => "esri",
            Self::Gisgraphy => "gisgraphy",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "opencage" => Ok(Self::OpenCage),
            "nominatim" => Ok(Self::Nominatim),
            "esri" => Ok(Self::Esri),
            "gisgraphy" => Ok(Self::Gisgraphy),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
