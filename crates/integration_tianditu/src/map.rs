//! Tianditu tile layers and the map view model
//!
//! [`MapView`] is an owned handle: layer visibility, the current viewport and
//! the attached controls all live on the instance, so two maps never share
//! state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use domain::{DomainError, Point, ReferencedPoint, SpatialReference};

const TILE_HOST_PLACEHOLDER: &str = "t{0-7}";
const TILE_SUBDOMAINS: u8 = 8;

/// A WMTS tile layer served by Tianditu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Layer key, e.g. `vec_c`
    pub key: String,
    /// Display title
    pub title: String,
    /// Tile matrix reference system
    pub projection: SpatialReference,
    /// URL template with `t{0-7}`, `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
}

impl TileLayer {
    fn wmts(key: &str, layer: &str, title: &str, api_key: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            projection: SpatialReference::Wgs84,
            url_template: format!(
                "http://{TILE_HOST_PLACEHOLDER}.tianditu.gov.cn/{key}/wmts?SERVICE=WMTS&REQUEST=GetTile\
                 &VERSION=1.0.0&LAYER={layer}&STYLE=default&TILEMATRIXSET=c&FORMAT=tiles\
                 &TILEMATRIX={{z}}&TILEROW={{y}}&TILECOL={{x}}&tk={api_key}"
            ),
        }
    }

    /// Expand the template for one tile; `subdomain` is taken modulo 8
    #[must_use]
    pub fn tile_url(&self, z: u32, x: u32, y: u32, subdomain: u8) -> String {
        self.url_template
            .replace(
                TILE_HOST_PLACEHOLDER,
                &format!("t{}", subdomain % TILE_SUBDOMAINS),
            )
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Every Tianditu layer: vector, imagery and terrain with their annotations
#[must_use]
pub fn all_layers(api_key: &str) -> Vec<TileLayer> {
    vec![
        TileLayer::wmts("vec_c", "vec", "Tianditu vector", api_key),
        TileLayer::wmts("cva_c", "cva", "Tianditu vector annotation", api_key),
        TileLayer::wmts("img_c", "img", "Tianditu imagery", api_key),
        TileLayer::wmts("cia_c", "cia", "Tianditu imagery annotation", api_key),
        TileLayer::wmts("ter_c", "ter", "Tianditu terrain", api_key),
        TileLayer::wmts("cta_c", "cta", "Tianditu terrain annotation", api_key),
    ]
}

/// Layers stacked on a new map, bottom to top
#[must_use]
pub fn base_layers(api_key: &str) -> Vec<TileLayer> {
    vec![
        TileLayer::wmts("img_c", "img", "Tianditu imagery", api_key),
        TileLayer::wmts("vec_c", "vec", "Tianditu vector", api_key),
        TileLayer::wmts("cva_c", "cva", "Tianditu vector annotation", api_key),
    ]
}

/// Initial viewport of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewConfig {
    /// Reference system of the view (and of `center`)
    #[serde(default = "default_projection")]
    pub projection: SpatialReference,
    /// Initial center
    #[serde(default = "default_center")]
    pub center: Point,
    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Maximum zoom level
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Minimum zoom level
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
}

const fn default_projection() -> SpatialReference {
    SpatialReference::WebMercator
}

const fn default_center() -> Point {
    Point::new(12_758_612.973_162_018, 3_562_849.021_661_167_5)
}

const fn default_zoom() -> f64 {
    17.5
}

const fn default_max_zoom() -> f64 {
    18.5
}

const fn default_min_zoom() -> f64 {
    3.0
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            projection: default_projection(),
            center: default_center(),
            zoom: default_zoom(),
            max_zoom: default_max_zoom(),
            min_zoom: default_min_zoom(),
        }
    }
}

impl MapViewConfig {
    /// Limit a zoom level to `[min_zoom, max_zoom]`
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// A control attached to a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapControl {
    /// Scale indicator
    ScaleLine {
        /// Render as a bar
        bar: bool,
        /// Render the numeric scale
        text: bool,
    },
    /// Overview (inset) map mirroring one layer
    Overview {
        /// Whether the inset starts collapsed
        collapsed: bool,
        /// Key of the layer the inset shows
        source_layer: String,
    },
}

impl MapControl {
    const fn kind(&self) -> &'static str {
        match self {
            Self::ScaleLine { .. } => "scale_line",
            Self::Overview { .. } => "overview",
        }
    }
}

/// A layer and whether it is currently drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerState {
    /// The layer
    pub layer: TileLayer,
    /// Visibility
    pub visible: bool,
}

/// Caller-owned map state
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    config: MapViewConfig,
    center: Point,
    zoom: f64,
    layers: Vec<LayerState>,
    controls: Vec<MapControl>,
}

impl MapView {
    /// Create a view over `layers`; `img_c` starts hidden, everything else visible
    #[must_use]
    pub fn new(config: MapViewConfig, layers: Vec<TileLayer>) -> Self {
        let layers = layers
            .into_iter()
            .map(|layer| LayerState {
                visible: layer.key != "img_c",
                layer,
            })
            .collect();

        Self {
            center: config.center,
            zoom: config.clamp_zoom(config.zoom),
            config,
            layers,
            controls: Vec::new(),
        }
    }

    /// Current center, in the view projection
    #[must_use]
    pub const fn center(&self) -> ReferencedPoint {
        ReferencedPoint::new(self.config.projection, self.center)
    }

    /// Current center expressed in `reference`
    ///
    /// # Errors
    ///
    /// Returns an error if the center cannot be reprojected.
    pub fn center_in(&self, reference: SpatialReference) -> Result<ReferencedPoint, DomainError> {
        self.center().to(reference)
    }

    /// Current zoom level
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Look up a layer by key
    #[must_use]
    pub fn layer(&self, key: &str) -> Option<&LayerState> {
        self.layers.iter().find(|l| l.layer.key == key)
    }

    /// All layers, bottom to top
    #[must_use]
    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    /// Layers currently drawn
    pub fn visible_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter(|l| l.visible).map(|l| &l.layer)
    }

    /// Apply visibility flags by layer key; unknown keys are ignored
    pub fn set_visibility<'a>(&mut self, visibility: impl IntoIterator<Item = (&'a str, bool)>) {
        for (key, visible) in visibility {
            match self.layers.iter_mut().find(|l| l.layer.key == key) {
                Some(state) => state.visible = visible,
                None => debug!(%key, "Ignoring visibility for unknown layer"),
            }
        }
    }

    /// Move the viewport; `None` restores the configured default
    ///
    /// # Errors
    ///
    /// Returns an error if `center` cannot be reprojected into the view
    /// projection.
    pub fn reset(
        &mut self,
        center: Option<ReferencedPoint>,
        zoom: Option<f64>,
    ) -> Result<(), DomainError> {
        self.center = match center {
            Some(c) => c.to(self.config.projection)?.point,
            None => self.config.center,
        };
        self.zoom = self.config.clamp_zoom(zoom.unwrap_or(self.config.zoom));
        Ok(())
    }

    /// Attach a control, replacing any existing control of the same kind
    pub fn add_control(&mut self, control: MapControl) {
        self.controls.retain(|c| c.kind() != control.kind());
        self.controls.push(control);
    }

    /// Attach a scale line rendered as a bar with text
    pub fn add_scale_line(&mut self) {
        self.add_control(MapControl::ScaleLine {
            bar: true,
            text: true,
        });
    }

    /// Attach an expanded overview map mirroring the bottom layer
    ///
    /// Does nothing when the view has no layers.
    pub fn add_overview(&mut self) {
        if let Some(bottom) = self.layers.first() {
            let source_layer = bottom.layer.key.clone();
            self.add_control(MapControl::Overview {
                collapsed: false,
                source_layer,
            });
        }
    }

    /// Attached controls
    #[must_use]
    pub fn controls(&self) -> &[MapControl] {
        &self.controls
    }
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.key)
    }
}
