//! Tianditu route planning client
//!
//! Issues bus, drive and walking route planning requests and normalizes the
//! decoded bodies into [`RouteSearchResult`]s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use domain::{ReferencedPoint, RouteMode, RouteSearchResult, SpatialReference};

use crate::config::TiandituConfig;
use crate::error::TiandituError;
use crate::normalize::normalize;

/// Trait for route planning clients
#[async_trait]
pub trait RouteClient: Send + Sync {
    /// Plan routes between two locations
    ///
    /// Transport problems are returned as `Err`; an upstream refusal or an
    /// empty result set is `Ok(RouteSearchResult::Failure { .. })`.
    async fn search_route(
        &self,
        mode: RouteMode,
        origin: ReferencedPoint,
        destination: ReferencedPoint,
        waypoints: &[ReferencedPoint],
    ) -> Result<RouteSearchResult, TiandituError>;

    /// Check if the route planning service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Route planning client for the Tianditu HTTP API
#[derive(Debug)]
pub struct TiandituRouteClient {
    client: Client,
    config: TiandituConfig,
}

impl TiandituRouteClient {
    /// Create a new route planning client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TiandituConfig) -> Result<Self, TiandituError> {
        config
            .validate()
            .map_err(TiandituError::ConfigurationError)?;

        Ok(Self {
            client: build_http_client(config)?,
            config: config.clone(),
        })
    }

    /// Build the `postStr` payload for a route request
    fn post_str(
        mode: RouteMode,
        origin: &ReferencedPoint,
        destination: &ReferencedPoint,
        waypoints: &[ReferencedPoint],
    ) -> Value {
        let orig = origin.point.to_string();
        let dest = destination.point.to_string();
        match mode {
            RouteMode::Bus => json!({ "orig": orig, "dest": dest, "mid": [], "style": 0 }),
            RouteMode::Drive => {
                let mid: Vec<String> = waypoints.iter().map(|w| w.point.to_string()).collect();
                json!({ "orig": orig, "dest": dest, "mid": mid, "style": 0 })
            },
            RouteMode::Walk => json!({ "orig": orig, "dest": dest }),
        }
    }
}

#[async_trait]
impl RouteClient for TiandituRouteClient {
    #[instrument(skip(self, waypoints), fields(from = %origin, to = %destination))]
    async fn search_route(
        &self,
        mode: RouteMode,
        origin: ReferencedPoint,
        destination: ReferencedPoint,
        waypoints: &[ReferencedPoint],
    ) -> Result<RouteSearchResult, TiandituError> {
        let origin = origin.to(SpatialReference::Wgs84)?;
        let destination = destination.to(SpatialReference::Wgs84)?;
        let waypoints = waypoints
            .iter()
            .map(|w| w.to(SpatialReference::Wgs84))
            .collect::<Result<Vec<_>, _>>()?;

        if !waypoints.is_empty() && mode != RouteMode::Drive {
            debug!(%mode, count = waypoints.len(), "Waypoints ignored for this mode");
        }

        let post_str = Self::post_str(mode, &origin, &destination, &waypoints);
        let params = [
            ("postStr", post_str.to_string()),
            ("type", "search".to_string()),
            ("tk", self.config.api_key.clone()),
        ];

        let url = self.config.route_url(mode);
        debug!(%url, %mode, "Planning route");

        let body = get_json(&self.client, url, &params, self.config.timeout_secs).await?;
        let result = normalize(mode, &body);

        match &result {
            RouteSearchResult::Success { routes } => debug!(count = routes.len(), "Routes found"),
            RouteSearchResult::Failure { reason } => warn!(%reason, "Route planning failed"),
        }

        Ok(result)
    }

    async fn is_healthy(&self) -> bool {
        self.client.get(&self.config.drive_url).send().await.is_ok()
    }
}

/// Build the shared HTTP client
pub(crate) fn build_http_client(config: &TiandituConfig) -> Result<Client, TiandituError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent("GeoView/1.0")
        .build()
        .map_err(|e| TiandituError::ConnectionFailed(e.to_string()))
}

/// Issue a GET request and decode the JSON body
pub(crate) async fn get_json(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout_secs: u64,
) -> Result<Value, TiandituError> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                TiandituError::Timeout { timeout_secs }
            } else {
                TiandituError::ConnectionFailed(e.to_string())
            }
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TiandituError::RateLimitExceeded {
            retry_after_secs: response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok()),
        });
    }

    if !status.is_success() {
        return Err(TiandituError::RequestFailed(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| TiandituError::ParseError(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| TiandituError::ParseError(e.to_string()))
}
