//! Human-readable formatting of distances, durations and areas

/// Format a distance in meters, switching to kilometers from 1000 m
///
/// ```
/// use domain::format::format_distance;
///
/// assert_eq!(format_distance(1234.0), "1.23 km");
/// assert_eq!(format_distance(512.4), "512 m");
/// ```
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.0} m", meters.round())
    }
}

/// Format a duration in seconds as minutes and seconds
///
/// ```
/// use domain::format::format_duration;
///
/// assert_eq!(format_duration(125), "2 min 5 s");
/// assert_eq!(format_duration(120), "2 min");
/// assert_eq!(format_duration(42), "42 s");
/// ```
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    match (minutes, rest) {
        (0, s) => format!("{s} s"),
        (m, 0) => format!("{m} min"),
        (m, s) => format!("{m} min {s} s"),
    }
}

/// Format an area in square meters, switching to hectares and square kilometers
#[must_use]
pub fn format_area(square_meters: f64) -> String {
    if square_meters >= 1_000_000.0 {
        format!("{:.2} km²", square_meters / 1_000_000.0)
    } else if square_meters >= 10_000.0 {
        format!("{:.2} ha", square_meters / 10_000.0)
    } else {
        format!("{:.0} m²", square_meters.round())
    }
}
