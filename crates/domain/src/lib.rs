//! Domain layer for GeoView
//!
//! Contains the geo adapter core: spatial reference systems, coordinate
//! transformation, and the uniform route shape that every route-planning
//! mode is normalized into. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod format;
pub mod projection;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use projection::{reproject, transform, transform_all};
pub use value_objects::*;
