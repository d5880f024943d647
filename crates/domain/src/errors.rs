//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Spatial reference identifier is not registered
    #[error("Unknown spatial reference: {0}")]
    UnknownReference(String),

    /// Point is not a finite coordinate pair, or lies outside the projection domain
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    /// Route planning mode is not one of bus, drive or walk
    #[error("Unknown route mode: {0}")]
    UnknownRouteMode(String),
}

impl DomainError {
    /// Create an invalid point error
    pub fn invalid_point(reason: impl Into<String>) -> Self {
        Self::InvalidPoint(reason.into())
    }
}
