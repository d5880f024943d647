//! Tianditu integration for GeoView
//!
//! Route planning (bus, drive, walk), POI search and geocoding via the
//! [Tianditu](https://lbs.tianditu.gov.cn) web services, plus the WMTS tile
//! layer catalog and the map view model.
//!
//! # Architecture
//!
//! Every upstream body passes through a pure normalizer before it reaches the
//! caller. [`normalize`] maps the three route planning shapes onto one
//! [`RouteSearchResult`](domain::RouteSearchResult) and never fails; search
//! and geocoding bodies go through [`normalize_poi`], [`normalize_geocode`]
//! and [`normalize_reverse`]. [`RouteClient`] and [`GeocodingClient`] wrap the
//! HTTP calls, implemented by [`TiandituRouteClient`] and
//! [`TiandituGeocodingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{ReferencedPoint, RouteMode};
//! use integration_tianditu::{RouteClient, TiandituConfig, TiandituRouteClient};
//!
//! let config = TiandituConfig { api_key: key, ..TiandituConfig::default() };
//! let client = TiandituRouteClient::new(&config)?;
//!
//! let result = client.search_route(
//!     RouteMode::Drive,
//!     ReferencedPoint::wgs84(114.36, 30.54),
//!     ReferencedPoint::web_mercator(12_758_612.97, 3_562_849.02),
//!     &[],
//! ).await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod map;
mod models;
mod normalize;

pub use client::{RouteClient, TiandituRouteClient};
pub use config::{PoiSearchOptions, TiandituConfig};
pub use error::TiandituError;
pub use geocoding::{
    GeocodingClient, GeocodingError, TiandituGeocodingClient, normalize_geocode, normalize_poi,
    normalize_reverse,
};
pub use map::{
    LayerState, MapControl, MapView, MapViewConfig, TileLayer, all_layers, base_layers,
};
pub use models::{
    AddressComponent, BusResponse, DirectResponse, PoiSuggestion, RawRoute, RawRouteResponse,
    ReverseGeocode, WalkResponse,
};
pub use normalize::normalize;
