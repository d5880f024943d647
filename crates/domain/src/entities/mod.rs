//! Domain entities - Normalized results handed to the view layer

mod route;

pub use route::{NO_ROUTE_FOUND, Route, RouteSearchResult, RouteStep, minutes_from_seconds};
