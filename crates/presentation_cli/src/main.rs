//! GeoView CLI
//!
//! Command-line interface for coordinate transforms, route planning, place
//! search and the tile layer catalog.

#![allow(clippy::print_stdout)]

mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use domain::format::{format_distance, format_duration};
use domain::{Point, ReferencedPoint, Route, RouteSearchResult, SpatialReference, transform};
use integration_tianditu::{
    GeocodingClient, MapView, RouteClient, TiandituGeocodingClient, TiandituRouteClient,
    all_layers, base_layers,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, log_filter_from_verbosity};
use crate::config::AppConfig;

/// Whole seconds for display
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn display_seconds(seconds: f64) -> u64 {
    seconds.max(0.0).round() as u64
}

fn print_route(index: usize, route: &Route) {
    println!(
        "🗺️  Route {}: {}, {}",
        index + 1,
        format_distance(route.distance_meters),
        format_duration(display_seconds(route.raw_duration_seconds))
    );
    for (n, step) in route.steps.iter().enumerate() {
        let road = step
            .road_name
            .as_deref()
            .map(|r| format!(" [{r}]"))
            .unwrap_or_default();
        println!(
            "   {:>2}. {}{road} ({}, {} min)",
            n + 1,
            step.instruction,
            format_distance(step.distance_meters),
            step.duration_minutes
        );
    }
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut app_config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(api_key) = cli.api_key {
        app_config.tianditu.api_key = api_key;
    }
    tracing::debug!(
        timeout_secs = app_config.tianditu.timeout_secs,
        has_api_key = !app_config.tianditu.api_key.is_empty(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Transform { x, y, from, to } => {
            let point = Point::finite(x, y)?;
            let result = transform(from, to, point)?;
            println!("{} -> {}", point.in_reference(from), result.in_reference(to));
        },

        Commands::Route {
            mode,
            from,
            to,
            via,
            srs,
            json,
        } => {
            let client = TiandituRouteClient::new(&app_config.tianditu)?;
            let waypoints: Vec<ReferencedPoint> =
                via.into_iter().map(|p| p.in_reference(srs)).collect();

            let result = client
                .search_route(mode, from.in_reference(srs), to.in_reference(srs), &waypoints)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                match &result {
                    RouteSearchResult::Success { routes } => {
                        for (index, route) in routes.iter().enumerate() {
                            print_route(index, route);
                        }
                    },
                    RouteSearchResult::Failure { reason } => {
                        println!("❌ {mode} route planning: {reason}");
                    },
                }
            }

            if !result.is_ok() {
                std::process::exit(1);
            }
        },

        Commands::Poi { keyword, count } => {
            let client = TiandituGeocodingClient::new(&app_config.tianditu)?;
            let mut options = app_config.tianditu.poi.clone();
            if let Some(count) = count {
                options.count = count;
            }

            let places = client.search_poi(&keyword, &options).await?;
            println!("📍 {} place(s) for \"{keyword}\":", places.len());
            for place in &places {
                let address = place.address.as_deref().unwrap_or("-");
                match place.location {
                    Some(location) => println!("   {} | {address} | {}", place.name, location.point),
                    None => println!("   {} | {address}", place.name),
                }
            }
        },

        Commands::Geocode { address } => {
            let client = TiandituGeocodingClient::new(&app_config.tianditu)?;
            let location = client.geocode(&address).await?;
            let mercator = location.to(SpatialReference::WebMercator)?;
            println!("📍 {address}");
            println!("   {location}");
            println!("   {mercator}");
        },

        Commands::Reverse { x, y, srs } => {
            let client = TiandituGeocodingClient::new(&app_config.tianditu)?;
            let point = Point::finite(x, y)?.in_reference(srs);
            let reverse = client.reverse_geocode(point).await?;
            println!("🏠 {}", reverse.formatted_address);
            println!("   {}", reverse.location);
            if let Some(components) = &reverse.components {
                println!("{}", serde_json::to_string_pretty(components)?);
            }
        },

        Commands::Layers => {
            let api_key = &app_config.tianditu.api_key;

            println!("🧱 Tile layers:");
            for layer in all_layers(api_key) {
                println!("   {:<6} {} ({})", layer.key, layer.title, layer.projection);
            }

            let mut view = MapView::new(app_config.view.clone(), base_layers(api_key));
            view.add_scale_line();
            view.add_overview();

            println!();
            println!("🗂️  Default stack (* = visible):");
            for state in view.layers() {
                let marker = if state.visible { "*" } else { " " };
                println!("   {marker} {}", state.layer);
            }

            println!();
            println!("🔭 Default view:");
            println!("   center: {}", view.center());
            println!("   center: {}", view.center_in(SpatialReference::Wgs84)?);
            println!(
                "   zoom:   {} (min {}, max {})",
                view.zoom(),
                app_config.view.min_zoom,
                app_config.view.max_zoom
            );
            println!("   controls: {}", serde_json::to_string(view.controls())?);
        },
    }

    Ok(())
}
