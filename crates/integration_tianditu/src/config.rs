//! Tianditu service configuration

use serde::{Deserialize, Serialize};

use domain::RouteMode;

/// Configuration for the Tianditu web services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiandituConfig {
    /// API key (`tk` parameter) issued by the Tianditu console
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// POI search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Geocoder endpoint (forward and reverse)
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// Drive route planning endpoint
    #[serde(default = "default_drive_url")]
    pub drive_url: String,

    /// Transit (bus) route planning endpoint
    #[serde(default = "default_transit_url")]
    pub transit_url: String,

    /// Walking route planning endpoint
    #[serde(default = "default_walking_url")]
    pub walking_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Geocode cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_geocode_cache_ttl_minutes")]
    pub geocode_cache_ttl_minutes: u64,

    /// Default POI search parameters
    #[serde(default)]
    pub poi: PoiSearchOptions,
}

/// Parameters of a POI search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiSearchOptions {
    /// Map zoom level the search is scoped to
    #[serde(default = "default_poi_level")]
    pub level: u8,

    /// Bounding box `"minLon,minLat,maxLon,maxLat"`
    #[serde(default = "default_map_bound")]
    pub map_bound: String,

    /// Tianditu query type (4 = suggestion search)
    #[serde(default = "default_query_type")]
    pub query_type: u8,

    /// Offset of the first result
    #[serde(default)]
    pub start: u32,

    /// Maximum number of results
    #[serde(default = "default_poi_count")]
    pub count: u32,
}

fn default_search_url() -> String {
    "https://api.tianditu.gov.cn/v2/search".to_string()
}

fn default_geocoder_url() -> String {
    "http://api.tianditu.gov.cn/geocoder".to_string()
}

fn default_drive_url() -> String {
    "https://api.tianditu.gov.cn/drive".to_string()
}

fn default_transit_url() -> String {
    "https://api.tianditu.gov.cn/transit".to_string()
}

fn default_walking_url() -> String {
    "https://api.tianditu.gov.cn/walking".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_geocode_cache_ttl_minutes() -> u64 {
    60
}

const fn default_poi_level() -> u8 {
    12
}

fn default_map_bound() -> String {
    "113.39,29.58,115.10,31.22".to_string()
}

const fn default_query_type() -> u8 {
    4
}

const fn default_poi_count() -> u32 {
    100
}

impl Default for PoiSearchOptions {
    fn default() -> Self {
        Self {
            level: default_poi_level(),
            map_bound: default_map_bound(),
            query_type: default_query_type(),
            start: 0,
            count: default_poi_count(),
        }
    }
}

impl Default for TiandituConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            search_url: default_search_url(),
            geocoder_url: default_geocoder_url(),
            drive_url: default_drive_url(),
            transit_url: default_transit_url(),
            walking_url: default_walking_url(),
            timeout_secs: default_timeout_secs(),
            geocode_cache_ttl_minutes: default_geocode_cache_ttl_minutes(),
            poi: PoiSearchOptions::default(),
        }
    }
}

impl TiandituConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            geocode_cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Point every endpoint at one host, keeping the upstream path layout
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.search_url = format!("{base}/v2/search");
        self.geocoder_url = format!("{base}/geocoder");
        self.drive_url = format!("{base}/drive");
        self.transit_url = format!("{base}/transit");
        self.walking_url = format!("{base}/walking");
        self
    }

    /// Endpoint serving the given route planning mode
    #[must_use]
    pub fn route_url(&self, mode: RouteMode) -> &str {
        match mode {
            RouteMode::Bus => &self.transit_url,
            RouteMode::Drive => &self.drive_url,
            RouteMode::Walk => &self.walking_url,
        }
    }

    /// Check if geocode caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.geocode_cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        let urls = [
            ("search_url", &self.search_url),
            ("geocoder_url", &self.geocoder_url),
            ("drive_url", &self.drive_url),
            ("transit_url", &self.transit_url),
            ("walking_url", &self.walking_url),
        ];
        for (name, url) in urls {
            if url.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.poi.count == 0 {
            return Err("poi.count must be greater than 0".to_string());
        }

        Ok(())
    }
}
