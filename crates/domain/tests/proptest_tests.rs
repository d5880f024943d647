//! Property-based tests for the geo adapter core
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::projection::{WORLD_HALF_EXTENT_M, transform};
use domain::value_objects::{Point, SpatialReference};
use domain::{DomainError, minutes_from_seconds};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

// ============================================================================
// Transform Property Tests
// ============================================================================

mod transform_tests {
    use super::*;

    proptest! {
        #[test]
        fn geographic_round_trip(
            lon in -180.0f64..=180.0f64,
            lat in -85.0f64..=85.0f64
        ) {
            let p = Point::new(lon, lat);
            let merc = transform(SpatialReference::Wgs84, SpatialReference::WebMercator, p).unwrap();
            let back = transform(SpatialReference::WebMercator, SpatialReference::Wgs84, merc).unwrap();
            prop_assert!((back.x - lon).abs() < TOLERANCE);
            prop_assert!((back.y - lat).abs() < TOLERANCE);
        }

        #[test]
        fn mercator_round_trip(
            x in -WORLD_HALF_EXTENT_M..=WORLD_HALF_EXTENT_M,
            y in -WORLD_HALF_EXTENT_M..=WORLD_HALF_EXTENT_M
        ) {
            let p = Point::new(x, y);
            let lonlat = transform(SpatialReference::WebMercator, SpatialReference::Wgs84, p).unwrap();
            let back = transform(SpatialReference::Wgs84, SpatialReference::WebMercator, lonlat).unwrap();
            prop_assert!((back.x - x).abs() < TOLERANCE);
            prop_assert!((back.y - y).abs() < TOLERANCE);
        }

        #[test]
        fn geographic_output_projects_back(
            x in -1.0e9f64..1.0e9f64,
            y in -1.0e9f64..1.0e9f64
        ) {
            let p = Point::new(x, y);
            if let Ok(lonlat) = transform(SpatialReference::WebMercator, SpatialReference::Wgs84, p) {
                prop_assert!(lonlat.y.abs() < 90.0);
                prop_assert!(
                    transform(SpatialReference::Wgs84, SpatialReference::WebMercator, lonlat).is_ok()
                );
            }
        }

        #[test]
        fn identity_is_exact(
            x in -1.0e8f64..1.0e8f64,
            y in -1.0e8f64..1.0e8f64
        ) {
            let p = Point::new(x, y);
            for srs in SpatialReference::ALL {
                prop_assert_eq!(transform(srs, srs, p).unwrap(), p);
            }
        }

        #[test]
        fn mercator_output_stays_in_world_square(
            lon in -180.0f64..=180.0f64,
            lat in -85.0f64..=85.0f64
        ) {
            let merc = transform(
                SpatialReference::Wgs84,
                SpatialReference::WebMercator,
                Point::new(lon, lat),
            )
            .unwrap();
            prop_assert!(merc.x.abs() <= WORLD_HALF_EXTENT_M + TOLERANCE);
            prop_assert!(merc.y.abs() <= WORLD_HALF_EXTENT_M + TOLERANCE);
        }

        #[test]
        fn non_finite_input_rejected(
            finite in -180.0f64..=180.0f64,
            bad in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
            swap in any::<bool>()
        ) {
            let p = if swap { Point::new(bad, finite) } else { Point::new(finite, bad) };
            for from in SpatialReference::ALL {
                for to in SpatialReference::ALL {
                    let result = transform(from, to, p);
                    prop_assert!(matches!(result, Err(DomainError::InvalidPoint(_))));
                }
            }
        }
    }
}

// ============================================================================
// Duration Rounding Property Tests
// ============================================================================

mod duration_tests {
    use super::*;

    proptest! {
        #[test]
        fn rounding_is_within_half_a_minute(seconds in 0u32..1_000_000u32) {
            let seconds = f64::from(seconds);
            let minutes = minutes_from_seconds(seconds);
            #[allow(clippy::cast_precision_loss)]
            let diff = (minutes as f64).mul_add(60.0, -seconds);
            prop_assert!(diff > -30.0 && diff <= 30.0);
        }

        #[test]
        fn rounding_is_monotonic(a in 0u32..1_000_000u32, b in 0u32..1_000_000u32) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(minutes_from_seconds(f64::from(lo)) <= minutes_from_seconds(f64::from(hi)));
        }
    }
}
