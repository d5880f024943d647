//! Spatial reference value object
//!
//! Identifies the coordinate system a [`Point`](super::Point) is expressed in.
//! Only two systems are registered: geographic WGS84 longitude/latitude and
//! spherical Web Mercator.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::SpatialReference;
//!
//! let srs: SpatialReference = "EPSG:3857".parse().expect("registered");
//! assert_eq!(srs, SpatialReference::WebMercator);
//! assert!("EPSG:9999".parse::<SpatialReference>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A registered coordinate reference system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpatialReference {
    /// EPSG:4326, longitude/latitude in degrees on WGS84
    Wgs84,
    /// EPSG:3857, spherical Mercator in meters (radius 6378137, no false offsets)
    WebMercator,
}

impl SpatialReference {
    /// All registered systems
    pub const ALL: [Self; 2] = [Self::Wgs84, Self::WebMercator];

    /// Canonical EPSG code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
            Self::WebMercator => "EPSG:3857",
        }
    }

    /// Whether coordinates are angular degrees rather than meters
    #[must_use]
    pub const fn is_geographic(&self) -> bool {
        matches!(self, Self::Wgs84)
    }

    /// Unit label for the coordinates of this system
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Wgs84 => "degrees",
            Self::WebMercator => "m",
        }
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SpatialReference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EPSG:4326" | "WGS84" | "CRS:84" => Ok(Self::Wgs84),
            "EPSG:3857" | "EPSG:900913" | "EPSG:102100" | "EPSG:102113" | "GOOGLE" => {
                Ok(Self::WebMercator)
            },
            _ => Err(DomainError::UnknownReference(s.to_string())),
        }
    }
}

impl TryFrom<String> for SpatialReference {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpatialReference> for String {
    fn from(value: SpatialReference) -> Self {
        value.code().to_string()
    }
}
