//! Value Objects - Immutable, identity-less domain primitives

mod point;
mod route_mode;
mod spatial_reference;

pub use point::{Point, ReferencedPoint};
pub use route_mode::RouteMode;
pub use spatial_reference::SpatialReference;
