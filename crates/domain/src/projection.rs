//! Coordinate reprojection between the registered reference systems
//!
//! Implements the spherical Mercator forward and inverse formulas for
//! EPSG:3857 (sphere of radius 6378137 m, no false easting/northing, unit
//! scale) against geographic EPSG:4326 longitude/latitude.
//!
//! # Examples
//!
//! ```
//! use domain::projection::transform;
//! use domain::value_objects::{Point, SpatialReference};
//!
//! let merc = transform(
//!     SpatialReference::Wgs84,
//!     SpatialReference::WebMercator,
//!     Point::new(180.0, 0.0),
//! )
//! .expect("valid point");
//! assert!((merc.x - 20_037_508.342_789_244).abs() < 1e-6);
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::errors::DomainError;
use crate::value_objects::{Point, SpatialReference};

/// Sphere radius used by EPSG:3857, in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half the width of the Web Mercator world square, in meters
pub const WORLD_HALF_EXTENT_M: f64 = PI * EARTH_RADIUS_M;

// Longitudes within this many radians of the antimeridian are not wrapped.
const LON_WRAP_LIMIT: f64 = PI + 1e-11;

/// Transform `point` from one reference system into another
///
/// Returns the input unchanged when `from == to`.
///
/// # Errors
///
/// Returns `DomainError::InvalidPoint` if a coordinate is not finite, if a
/// geographic point lies on or beyond a pole (outside the Mercator domain), or
/// if a Mercator northing is so far out (about 2.3e8 m) that its latitude
/// rounds to a pole.
pub fn transform(
    from: SpatialReference,
    to: SpatialReference,
    point: Point,
) -> Result<Point, DomainError> {
    point.validate()?;

    match (from, to) {
        (SpatialReference::Wgs84, SpatialReference::Wgs84)
        | (SpatialReference::WebMercator, SpatialReference::WebMercator) => Ok(point),
        (SpatialReference::Wgs84, SpatialReference::WebMercator) => lonlat_to_mercator(point),
        (SpatialReference::WebMercator, SpatialReference::Wgs84) => mercator_to_lonlat(point),
    }
}

/// Transform a sequence of points, stopping at the first invalid one
///
/// # Errors
///
/// Returns the error of the first point that fails to transform.
pub fn transform_all(
    from: SpatialReference,
    to: SpatialReference,
    points: &[Point],
) -> Result<Vec<Point>, DomainError> {
    points.iter().map(|p| transform(from, to, *p)).collect()
}

/// Transform raw coordinates between reference systems named by code
///
/// # Errors
///
/// Returns `DomainError::UnknownReference` if either code is not registered
/// and `DomainError::InvalidPoint` if `coords` is not a finite pair.
pub fn reproject(from_code: &str, to_code: &str, coords: &[f64]) -> Result<Point, DomainError> {
    let from: SpatialReference = from_code.parse()?;
    let to: SpatialReference = to_code.parse()?;
    let point = Point::try_from(coords)?;
    transform(from, to, point)
}

fn lonlat_to_mercator(point: Point) -> Result<Point, DomainError> {
    let Point { x: lon, y: lat } = point;
    if lat.abs() >= 90.0 {
        return Err(DomainError::invalid_point(format!(
            "latitude {lat} is outside the Mercator domain"
        )));
    }

    let lambda = wrap_longitude(lon.to_radians());
    let phi = lat.to_radians();

    let x = EARTH_RADIUS_M * lambda;
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + 0.5 * phi).tan().ln();

    let projected = Point::new(x, y);
    projected.validate()?;
    Ok(projected)
}

fn mercator_to_lonlat(point: Point) -> Result<Point, DomainError> {
    let Point { x, y } = point;

    let phi = FRAC_PI_2 - 2.0 * (-y / EARTH_RADIUS_M).exp().atan();
    let lat = phi.to_degrees();
    // Past this the result could not be projected back.
    if lat.abs() >= 90.0 {
        return Err(DomainError::invalid_point(format!(
            "northing {y} maps onto a pole"
        )));
    }

    let lambda = wrap_longitude(x / EARTH_RADIUS_M);
    Ok(Point::new(lambda.to_degrees(), lat))
}

/// Fold a longitude (radians) lying past the antimeridian back by one turn
fn wrap_longitude(lambda: f64) -> f64 {
    if lambda.abs() <= LON_WRAP_LIMIT {
        lambda
    } else {
        lambda - lambda.signum() * TAU
    }
}
