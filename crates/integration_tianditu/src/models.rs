//! Tianditu response models
//!
//! Raw, per-endpoint shapes as decoded from the API, plus the typed search
//! and geocoding results handed to callers. Tianditu is inconsistent about
//! numbers (sometimes JSON numbers, sometimes numeric strings) and about
//! locations (`"lon,lat"` strings, arrays or objects), so the raw types
//! accept every variant and reject anything non-finite.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use domain::{Point, ReferencedPoint, Route, RouteMode, RouteStep, SpatialReference};

// --- Lenient scalar decoding ---

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_finite<E: de::Error>(self) -> Result<f64, E> {
        let value = match self {
            Self::Number(n) => n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {s:?}")))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(E::custom(format!("expected a finite number, got {value}")))
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_finite()
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrString::Number(n)) => Some(n.to_string()),
            Some(NumberOrString::Text(s)) if s.is_empty() => None,
            Some(NumberOrString::Text(s)) => Some(s),
        },
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocation {
    Text(String),
    Pair(Vec<f64>),
    Object {
        #[serde(deserialize_with = "lenient_f64")]
        lon: f64,
        #[serde(deserialize_with = "lenient_f64")]
        lat: f64,
    },
}

/// Decode an optional lon/lat location; empty strings count as absent
pub(crate) fn optional_location<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ReferencedPoint>, D::Error> {
    let point = match Option::<RawLocation>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawLocation::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(RawLocation::Text(s)) => s.parse::<Point>(),
        Some(RawLocation::Pair(coords)) => Point::try_from(coords),
        Some(RawLocation::Object { lon, lat }) => Point::finite(lon, lat),
    }
    .map_err(de::Error::custom)?;

    Ok(Some(point.in_reference(SpatialReference::Wgs84)))
}

// --- Route planning responses ---

/// Mode-specific route planning response body
///
/// Bus responses nest routes one level deeper than drive and walk responses;
/// [`RawRouteResponse::into_routes`] flattens every variant into the same
/// list of raw routes.
#[derive(Debug)]
pub enum RawRouteResponse {
    /// `results[].routes[0].steps[]`
    Bus(BusResponse),
    /// `results[].steps[]`
    Drive(DirectResponse),
    /// `results[0].steps[]`
    Walk(WalkResponse),
}

/// Transit planning body
#[derive(Debug, Deserialize)]
pub struct BusResponse {
    results: Vec<BusPlan>,
}

// Only `routes[0]` is decoded; alternatives stay opaque.
#[derive(Debug, Deserialize)]
struct BusPlan {
    routes: Vec<Value>,
}

/// Drive planning body
#[derive(Debug, Deserialize)]
pub struct DirectResponse {
    results: Vec<RawRoute>,
}

/// Walking planning body; only the first result is decoded
#[derive(Debug, Deserialize)]
pub struct WalkResponse {
    results: Vec<Value>,
}

/// One route as returned by any planning endpoint
#[derive(Debug, Deserialize)]
pub struct RawRoute {
    #[serde(deserialize_with = "lenient_f64")]
    distance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    duration: f64,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(alias = "instruction")]
    instructions: String,
    #[serde(deserialize_with = "lenient_f64")]
    distance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    duration: f64,
    #[serde(default, deserialize_with = "optional_text")]
    road_name: Option<String>,
    #[serde(default, deserialize_with = "optional_location")]
    start_location: Option<ReferencedPoint>,
    #[serde(default, deserialize_with = "optional_location")]
    end_location: Option<ReferencedPoint>,
    #[serde(default, deserialize_with = "optional_text")]
    action: Option<String>,
}

impl RawRouteResponse {
    /// Decode a body into the shape expected for `mode`
    ///
    /// # Errors
    ///
    /// Returns the decoding error if the body does not match the mode's shape.
    pub fn from_value(mode: RouteMode, raw: &Value) -> Result<Self, serde_json::Error> {
        Ok(match mode {
            RouteMode::Bus => Self::Bus(BusResponse::deserialize(raw)?),
            RouteMode::Drive => Self::Drive(DirectResponse::deserialize(raw)?),
            RouteMode::Walk => Self::Walk(WalkResponse::deserialize(raw)?),
        })
    }

    /// Flatten into the list of routes to normalize
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a bus plan carries no route
    /// or a route that is used does not decode.
    pub fn into_routes(self) -> Result<Vec<RawRoute>, String> {
        match self {
            Self::Bus(response) => response
                .results
                .iter()
                .enumerate()
                .map(|(index, plan)| {
                    plan.routes
                        .first()
                        .ok_or_else(|| format!("bus plan {index} has no routes"))
                        .and_then(RawRoute::from_json)
                })
                .collect(),
            Self::Drive(response) => Ok(response.results),
            Self::Walk(response) => response
                .results
                .first()
                .map(RawRoute::from_json)
                .into_iter()
                .collect(),
        }
    }
}

impl RawRoute {
    fn from_json(value: &Value) -> Result<Self, String> {
        Self::deserialize(value).map_err(|e| e.to_string())
    }

    /// Convert into the uniform route shape
    #[must_use]
    pub fn into_route(self) -> Route {
        let steps = self.steps.into_iter().map(RawStep::into_step).collect();
        Route::new(self.distance, self.duration, steps)
    }
}

impl RawStep {
    fn into_step(self) -> RouteStep {
        RouteStep::new(self.instructions, self.distance, self.duration)
            .with_road_name(self.road_name)
            .with_locations(self.start_location, self.end_location)
            .with_action(self.action)
    }
}

// --- Search and geocoding results ---

/// A place suggestion returned by POI search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiSuggestion {
    /// Place name
    pub name: String,
    /// Street address, if known
    #[serde(default, deserialize_with = "optional_text")]
    pub address: Option<String>,
    /// National administrative division code
    #[serde(default, alias = "gbCode", deserialize_with = "optional_text")]
    pub admin_code: Option<String>,
    /// Place location in EPSG:4326, if provided
    #[serde(default, alias = "lonlat", deserialize_with = "optional_location")]
    pub location: Option<ReferencedPoint>,
}

/// Address components of a reverse geocoding result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    /// Nation
    #[serde(default, deserialize_with = "optional_text")]
    pub nation: Option<String>,
    /// Province
    #[serde(default, deserialize_with = "optional_text")]
    pub province: Option<String>,
    /// City
    #[serde(default, deserialize_with = "optional_text")]
    pub city: Option<String>,
    /// County or district
    #[serde(default, deserialize_with = "optional_text")]
    pub county: Option<String>,
    /// Nearest road
    #[serde(default, deserialize_with = "optional_text")]
    pub road: Option<String>,
    /// Nearest point of interest
    #[serde(default, deserialize_with = "optional_text")]
    pub poi: Option<String>,
}

/// Result of a reverse geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseGeocode {
    /// Full formatted address
    pub formatted_address: String,
    /// The queried location in EPSG:4326
    pub location: ReferencedPoint,
    /// Structured address parts, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResult {
    pub(crate) lonlat: RawLonLat,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLonLat {
    #[serde(deserialize_with = "lenient_f64")]
    pub(crate) lon: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub(crate) lat: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReverseResult {
    pub(crate) formatted_address: String,
    #[serde(default, rename = "addressComponent")]
    pub(crate) address_component: Option<AddressComponent>,
}
