//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::{Point, RouteMode, SpatialReference};

/// GeoView CLI
#[derive(Debug, Parser)]
#[command(name = "geoview-cli")]
#[command(author, version, about = "GeoView map and route planning CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./geoview.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Tianditu API key, overrides the configured one
    #[arg(long, env = "TIANDITU_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a point between spatial reference systems
    ///
    /// Example: geoview-cli transform 114.61 30.4 --to EPSG:3857
    #[command(allow_negative_numbers = true)]
    Transform {
        /// X coordinate (longitude for EPSG:4326)
        x: f64,

        /// Y coordinate (latitude for EPSG:4326)
        y: f64,

        /// Source reference system
        #[arg(long, default_value = "EPSG:4326")]
        from: SpatialReference,

        /// Target reference system
        #[arg(long, default_value = "EPSG:3857")]
        to: SpatialReference,
    },

    /// Plan a bus, drive or walking route
    ///
    /// Example: geoview-cli route drive --from 114.36,30.54 --to 114.40,30.50
    Route {
        /// Travel mode (bus, drive, walk)
        mode: RouteMode,

        /// Origin as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        from: Point,

        /// Destination as "x,y"
        #[arg(long, allow_hyphen_values = true)]
        to: Point,

        /// Intermediate point as "x,y" (drive only, repeatable)
        #[arg(long, allow_hyphen_values = true)]
        via: Vec<Point>,

        /// Reference system of all given points
        #[arg(long, default_value = "EPSG:4326")]
        srs: SpatialReference,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search places by keyword
    Poi {
        /// Search keyword
        keyword: String,

        /// Maximum number of results
        #[arg(long)]
        count: Option<u32>,
    },

    /// Resolve an address to a point
    Geocode {
        /// Free-form address
        address: String,
    },

    /// Resolve a point to an address
    #[command(allow_negative_numbers = true)]
    Reverse {
        /// X coordinate
        x: f64,

        /// Y coordinate
        y: f64,

        /// Reference system of the point
        #[arg(long, default_value = "EPSG:4326")]
        srs: SpatialReference,
    },

    /// List tile layers and the default map view
    Layers,
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
