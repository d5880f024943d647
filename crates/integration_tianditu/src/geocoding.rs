//! Tianditu POI search and geocoding
//!
//! Forward geocoding resolves an address to a lon/lat point, reverse
//! geocoding resolves a point (in any registered reference system) to a
//! formatted address. Forward results are cached to avoid repeated lookups
//! of the same address.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, instrument};

use domain::{DomainError, ReferencedPoint, SpatialReference};

use crate::client::{build_http_client, get_json};
use crate::config::{PoiSearchOptions, TiandituConfig};
use crate::error::TiandituError;
use crate::models::{PoiSuggestion, RawGeocodeResult, RawReverseResult, ReverseGeocode};

/// Errors that can occur during search and geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The request itself failed
    #[error(transparent)]
    Transport(#[from] TiandituError),

    /// The service rejected the search
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Failed to interpret the response body
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Address or location could not be resolved
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Query location is not a valid point
    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] DomainError),
}

/// Trait for search and geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Search places by keyword
    async fn search_poi(
        &self,
        keyword: &str,
        options: &PoiSearchOptions,
    ) -> Result<Vec<PoiSuggestion>, GeocodingError>;

    /// Convert a free-form address to a lon/lat point
    async fn geocode(&self, address: &str) -> Result<ReferencedPoint, GeocodingError>;

    /// Convert a point to a human-readable address
    async fn reverse_geocode(&self, point: ReferencedPoint)
    -> Result<ReverseGeocode, GeocodingError>;
}

/// Tianditu search and geocoding client with a forward-geocode cache
#[derive(Debug)]
pub struct TiandituGeocodingClient {
    client: Client,
    config: TiandituConfig,
    cache: Option<Cache<String, ReferencedPoint>>,
}

impl TiandituGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TiandituConfig) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(TiandituError::ConfigurationError)?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.geocode_cache_ttl_minutes * 60))
                .build()
        });

        Ok(Self {
            client: build_http_client(config)?,
            config: config.clone(),
            cache,
        })
    }
}

#[async_trait]
impl GeocodingClient for TiandituGeocodingClient {
    #[instrument(skip(self, options))]
    async fn search_poi(
        &self,
        keyword: &str,
        options: &PoiSearchOptions,
    ) -> Result<Vec<PoiSuggestion>, GeocodingError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Search keyword must not be empty".to_string(),
            ));
        }

        let post_str = json!({
            "keyWord": keyword,
            "level": options.level,
            "mapBound": options.map_bound,
            "queryType": options.query_type,
            "start": options.start,
            "count": options.count,
        });
        let params = [
            ("postStr", post_str.to_string()),
            ("type", "query".to_string()),
            ("tk", self.config.api_key.clone()),
        ];

        debug!(%keyword, "Searching places");
        let body = get_json(
            &self.client,
            &self.config.search_url,
            &params,
            self.config.timeout_secs,
        )
        .await?;

        let suggestions = normalize_poi(&body)?;
        debug!(count = suggestions.len(), "Places found");
        Ok(suggestions)
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<ReferencedPoint, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        let cache_key = address.to_lowercase();
        if let Some(cache) = &self.cache {
            if let Some(point) = cache.get(&cache_key).await {
                debug!(%address, "Geocoding cache hit");
                return Ok(point);
            }
        }

        let params = [
            ("ds", json!({ "keyWord": address }).to_string()),
            ("type", "geocode".to_string()),
            ("tk", self.config.api_key.clone()),
        ];

        debug!(%address, "Geocoding address");
        let body = get_json(
            &self.client,
            &self.config.geocoder_url,
            &params,
            self.config.timeout_secs,
        )
        .await?;

        let point = normalize_geocode(&body, address)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, point).await;
        }
        debug!(%address, %point, "Geocoded address");
        Ok(point)
    }

    #[instrument(skip(self), fields(point = %point))]
    async fn reverse_geocode(
        &self,
        point: ReferencedPoint,
    ) -> Result<ReverseGeocode, GeocodingError> {
        let location = point.to(SpatialReference::Wgs84)?;

        let post_str = json!({
            "lon": location.point.x,
            "lat": location.point.y,
            "ver": 1,
        });
        let params = [
            ("postStr", post_str.to_string()),
            ("type", "geocode".to_string()),
            ("tk", self.config.api_key.clone()),
        ];

        debug!(%location, "Reverse geocoding");
        let body = get_json(
            &self.client,
            &self.config.geocoder_url,
            &params,
            self.config.timeout_secs,
        )
        .await?;

        normalize_reverse(&body, location)
    }
}

/// Interpret a POI search body
///
/// # Errors
///
/// `SearchFailed` when the body carries no status, `AddressNotFound` when it
/// carries a status but no suggestions, `ParseError` for unreadable entries.
pub fn normalize_poi(raw: &Value) -> Result<Vec<PoiSuggestion>, GeocodingError> {
    if raw.get("status").is_none_or(Value::is_null) {
        let reason = raw
            .get("msg")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("search failed");
        return Err(GeocodingError::SearchFailed(reason.to_string()));
    }

    match raw.get("suggests") {
        Some(suggests @ Value::Array(_)) => Vec::<PoiSuggestion>::deserialize(suggests)
            .map_err(|e| GeocodingError::ParseError(e.to_string())),
        _ => Err(GeocodingError::AddressNotFound(
            "no matching place".to_string(),
        )),
    }
}

/// Interpret a forward geocoding body
///
/// # Errors
///
/// `AddressNotFound` unless `msg` is `"ok"` and at least one result is
/// present; `ParseError` if the first result has no usable `lonlat`.
pub fn normalize_geocode(raw: &Value, address: &str) -> Result<ReferencedPoint, GeocodingError> {
    if !msg_is_ok(raw) {
        return Err(GeocodingError::AddressNotFound(address.to_string()));
    }

    let first = match raw.get("result") {
        Some(Value::Array(results)) => results.first(),
        _ => None,
    }
    .ok_or_else(|| GeocodingError::AddressNotFound(address.to_string()))?;

    let result = RawGeocodeResult::deserialize(first)
        .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

    Ok(ReferencedPoint::wgs84(result.lonlat.lon, result.lonlat.lat))
}

/// Interpret a reverse geocoding body for the queried EPSG:4326 `location`
///
/// # Errors
///
/// `AddressNotFound` unless `msg` is `"ok"`; `ParseError` if the result has
/// no formatted address.
pub fn normalize_reverse(
    raw: &Value,
    location: ReferencedPoint,
) -> Result<ReverseGeocode, GeocodingError> {
    if !msg_is_ok(raw) {
        return Err(GeocodingError::AddressNotFound(location.point.to_string()));
    }

    let result = raw
        .get("result")
        .ok_or_else(|| GeocodingError::ParseError("missing result".to_string()))
        .and_then(|r| {
            RawReverseResult::deserialize(r).map_err(|e| GeocodingError::ParseError(e.to_string()))
        })?;

    Ok(ReverseGeocode {
        formatted_address: result.formatted_address,
        location,
        components: result.address_component,
    })
}

fn msg_is_ok(raw: &Value) -> bool {
    raw.get("msg").and_then(Value::as_str) == Some("ok")
}
