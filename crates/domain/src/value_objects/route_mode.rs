//! Route planning mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Route planning mode
///
/// Each mode is served by a different upstream endpoint with its own
/// response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Public transit (bus / metro) planning
    Bus,
    /// Car route planning
    Drive,
    /// Pedestrian route planning
    Walk,
}

impl RouteMode {
    /// All modes
    pub const ALL: [Self; 3] = [Self::Bus, Self::Drive, Self::Walk];

    /// Failure reason used when the upstream response carries no message
    #[must_use]
    pub const fn fallback_message(&self) -> &'static str {
        match self {
            Self::Bus => "bus route planning failed",
            Self::Drive => "drive route planning failed",
            Self::Walk => "walking route planning failed",
        }
    }

    /// Lowercase identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Drive => "drive",
            Self::Walk => "walk",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bus" | "transit" => Ok(Self::Bus),
            "drive" | "driving" | "car" => Ok(Self::Drive),
            "walk" | "walking" => Ok(Self::Walk),
            _ => Err(DomainError::UnknownRouteMode(s.to_string())),
        }
    }
}
