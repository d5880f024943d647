//! Application configuration

use std::path::Path;

use config::{ConfigBuilder, ConfigError, builder::DefaultState};
use integration_tianditu::{MapViewConfig, TiandituConfig};
use serde::{Deserialize, Serialize};

/// Configuration for the CLI
///
/// Sources, later ones winning:
/// 1. built-in defaults
/// 2. `geoview.toml` in the working directory, or the file given with `--config`
/// 3. `GEOVIEW_*` environment variables, nested with `__`
///    (e.g. `GEOVIEW_TIANDITU__API_KEY`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tianditu web services
    #[serde(default)]
    pub tianditu: TiandituConfig,

    /// Initial map view
    #[serde(default)]
    pub view: MapViewConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(
            || config::File::with_name("geoview").required(false),
            |p| config::File::from(p).required(true),
        );

        Self::build(config::Config::builder().add_source(file))
    }

    /// Layer environment overrides on top of `builder` and deserialize
    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                config::Environment::with_prefix("GEOVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
