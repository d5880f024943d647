//! Point value objects
//!
//! [`Point`] is a bare `(x, y)` pair. It has no meaning without a reference
//! frame, so anything that crosses a module boundary should travel as a
//! [`ReferencedPoint`] instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SpatialReference;
use crate::errors::DomainError;
use crate::projection;

/// An ordered coordinate pair
///
/// Fields are public; finiteness is checked by the fallible constructors and
/// again by [`projection::transform`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Point {
    /// Easting or longitude
    pub x: f64,
    /// Northing or latitude
    pub y: f64,
}

impl Point {
    /// Create a point without validation
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a point, rejecting NaN and infinite coordinates
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPoint` if either coordinate is not finite.
    pub fn finite(x: f64, y: f64) -> Result<Self, DomainError> {
        let point = Self::new(x, y);
        point.validate()?;
        Ok(point)
    }

    /// Check that both coordinates are finite
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPoint` naming the offending coordinate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.x.is_finite() {
            return Err(DomainError::invalid_point(format!(
                "x coordinate {} is not finite",
                self.x
            )));
        }
        if !self.y.is_finite() {
            return Err(DomainError::invalid_point(format!(
                "y coordinate {} is not finite",
                self.y
            )));
        }
        Ok(())
    }

    /// Coordinates as a `[x, y]` array
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Attach a reference frame
    #[must_use]
    pub const fn in_reference(self, reference: SpatialReference) -> ReferencedPoint {
        ReferencedPoint::new(reference, self)
    }
}

impl TryFrom<&[f64]> for Point {
    type Error = DomainError;

    fn try_from(coords: &[f64]) -> Result<Self, Self::Error> {
        match *coords {
            [x, y] => Self::finite(x, y),
            _ => Err(DomainError::invalid_point(format!(
                "expected 2 coordinates, got {}",
                coords.len()
            ))),
        }
    }
}

impl TryFrom<Vec<f64>> for Point {
    type Error = DomainError;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(coords.as_slice())
    }
}

impl TryFrom<[f64; 2]> for Point {
    type Error = DomainError;

    fn try_from([x, y]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::finite(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        point.to_array()
    }
}

/// Parses `"x,y"` (whitespace around either value is ignored)
impl FromStr for Point {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| DomainError::invalid_point(format!("not a number: {part:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(coords)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A point together with the reference frame it is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencedPoint {
    /// Coordinate system of `point`
    pub reference: SpatialReference,
    /// The coordinates
    pub point: Point,
}

impl ReferencedPoint {
    /// Pair a point with its reference frame
    #[must_use]
    pub const fn new(reference: SpatialReference, point: Point) -> Self {
        Self { reference, point }
    }

    /// Longitude/latitude point in EPSG:4326
    #[must_use]
    pub const fn wgs84(lon: f64, lat: f64) -> Self {
        Self::new(SpatialReference::Wgs84, Point::new(lon, lat))
    }

    /// Web Mercator point in EPSG:3857
    #[must_use]
    pub const fn web_mercator(x: f64, y: f64) -> Self {
        Self::new(SpatialReference::WebMercator, Point::new(x, y))
    }

    /// Reproject into another reference frame
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPoint` if the coordinates cannot be
    /// projected.
    pub fn to(self, target: SpatialReference) -> Result<Self, DomainError> {
        let point = projection::transform(self.reference, target, self.point)?;
        Ok(Self::new(target, point))
    }
}

impl fmt::Display for ReferencedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.point, self.reference)
    }
}
