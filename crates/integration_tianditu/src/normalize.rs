//! Route response normalization
//!
//! Turns a decoded route planning body of any mode into a
//! [`RouteSearchResult`]. Normalization never fails: every problem with the
//! body, from an upstream error status to a missing field, becomes a
//! `Failure` carrying a reason.

use serde_json::Value;
use tracing::{debug, warn};

use domain::{RouteMode, RouteSearchResult};

use crate::models::RawRouteResponse;

/// Normalize a raw route planning response
///
/// Durations are converted from seconds to rounded minutes. A successful
/// status with no results is reported as `Failure { reason: "no route found" }`.
#[must_use]
pub fn normalize(mode: RouteMode, raw: &Value) -> RouteSearchResult {
    if !raw.is_object() {
        warn!(%mode, "Route response is not a JSON object");
        return RouteSearchResult::failure(format!(
            "malformed {mode} response: expected a JSON object"
        ));
    }

    if !is_success_status(raw.get("status")) {
        let reason = upstream_message(raw).unwrap_or_else(|| mode.fallback_message());
        debug!(%mode, status = ?raw.get("status"), %reason, "Route planning failed upstream");
        return RouteSearchResult::failure(reason);
    }

    let routes = match RawRouteResponse::from_value(mode, raw)
        .map_err(|e| e.to_string())
        .and_then(RawRouteResponse::into_routes)
    {
        Ok(routes) => routes,
        Err(e) => {
            warn!(%mode, error = %e, "Malformed route response");
            return RouteSearchResult::failure(format!("malformed {mode} response: {e}"));
        },
    };

    if routes.is_empty() {
        debug!(%mode, "Route planning returned no results");
        return RouteSearchResult::no_route_found();
    }

    debug!(%mode, count = routes.len(), "Routes normalized");
    RouteSearchResult::success(routes.into_iter().map(|r| r.into_route()).collect())
}

/// `status` is `0`, either as a number or a numeric string
fn is_success_status(status: Option<&Value>) -> bool {
    match status {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>() == Ok(0.0),
        _ => false,
    }
}

/// Non-empty `message` (or `msg`) field of the response
fn upstream_message(raw: &Value) -> Option<&str> {
    ["message", "msg"]
        .into_iter()
        .filter_map(|key| raw.get(key).and_then(Value::as_str))
        .find(|m| !m.trim().is_empty())
}
