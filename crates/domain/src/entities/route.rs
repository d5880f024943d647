//! Normalized route entities
//!
//! Uniform shape for route-planning results regardless of which endpoint
//! produced them.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::value_objects::ReferencedPoint;

/// Failure reason for a successful query that returned no routes
pub const NO_ROUTE_FOUND: &str = "no route found";

/// Convert a duration in seconds to whole minutes, rounding halves up
///
/// Matches the rounding of `Math.round`: `90 s -> 2`, `45 s -> 1`, `29 s -> 0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // saturating cast; minutes never approach i64 limits
pub fn minutes_from_seconds(seconds: f64) -> i64 {
    (seconds / 60.0 + 0.5).floor() as i64
}

/// A single instruction within a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Human-readable instruction
    pub instruction: String,
    /// Length of the step in meters
    pub distance_meters: f64,
    /// Duration rounded to whole minutes, the value to display
    pub duration_minutes: i64,
    /// Unrounded duration as reported upstream, in seconds (not minutes)
    pub raw_duration_seconds: f64,
    /// Road the step follows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
    /// Where the step starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_location: Option<ReferencedPoint>,
    /// Where the step ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_location: Option<ReferencedPoint>,
    /// Upstream action code (transit steps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl RouteStep {
    /// Create a step from a raw duration in seconds
    #[must_use]
    pub fn new(
        instruction: impl Into<String>,
        distance_meters: f64,
        raw_duration_seconds: f64,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            distance_meters,
            duration_minutes: minutes_from_seconds(raw_duration_seconds),
            raw_duration_seconds,
            road_name: None,
            start_location: None,
            end_location: None,
            action: None,
        }
    }

    /// Set the road name
    #[must_use]
    pub fn with_road_name(mut self, road_name: Option<String>) -> Self {
        self.road_name = road_name;
        self
    }

    /// Set the start and end locations
    #[must_use]
    pub const fn with_locations(
        mut self,
        start: Option<ReferencedPoint>,
        end: Option<ReferencedPoint>,
    ) -> Self {
        self.start_location = start;
        self.end_location = end;
        self
    }

    /// Set the upstream action code
    #[must_use]
    pub fn with_action(mut self, action: Option<String>) -> Self {
        self.action = action;
        self
    }
}

/// A complete route from origin to destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total length in meters
    pub distance_meters: f64,
    /// Total duration rounded to whole minutes, the value to display
    pub duration_minutes: i64,
    /// Unrounded total duration as reported upstream, in seconds (not minutes)
    pub raw_duration_seconds: f64,
    /// Ordered steps
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Create a route from a raw duration in seconds
    #[must_use]
    pub fn new(distance_meters: f64, raw_duration_seconds: f64, steps: Vec<RouteStep>) -> Self {
        Self {
            distance_meters,
            duration_minutes: minutes_from_seconds(raw_duration_seconds),
            raw_duration_seconds,
            steps,
        }
    }
}

/// Outcome of a route search
///
/// Failures are expected, recoverable values rather than errors. Serializes as
/// `{"ok": true, "routes": [...]}` or `{"ok": false, "reason": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSearchResult {
    /// At least one route was found
    Success {
        /// Found routes, in upstream order
        routes: Vec<Route>,
    },
    /// The search failed
    Failure {
        /// Why it failed
        reason: String,
    },
}

impl RouteSearchResult {
    /// Successful result
    #[must_use]
    pub const fn success(routes: Vec<Route>) -> Self {
        Self::Success { routes }
    }

    /// Failed result
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Failed result for an empty result set
    #[must_use]
    pub fn no_route_found() -> Self {
        Self::failure(NO_ROUTE_FOUND)
    }

    /// Whether routes were found
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Found routes (empty on failure)
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        match self {
            Self::Success { routes } => routes,
            Self::Failure { .. } => &[],
        }
    }

    /// Failure reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    /// Convert into a standard `Result`
    ///
    /// # Errors
    ///
    /// Returns the failure reason.
    pub fn into_result(self) -> Result<Vec<Route>, String> {
        match self {
            Self::Success { routes } => Ok(routes),
            Self::Failure { reason } => Err(reason),
        }
    }
}

impl Serialize for RouteSearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RouteSearchResult", 2)?;
        match self {
            Self::Success { routes } => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("routes", routes)?;
            },
            Self::Failure { reason } => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("reason", reason)?;
            },
        }
        state.end()
    }
}
