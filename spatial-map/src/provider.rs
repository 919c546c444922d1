//! Tile providers the common map can use for its base layer.

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::error::MapConfigError;
use crate::layer::descriptor::LayerDescriptor;
use crate::layer::parser::parse_layers;
use crate::layer::tile_layer::{
    TileLayerBuilder, TileLayerOptions, TileLayerSpec, DEFAULT_MAX_ZOOM, MAX_ZOOM, TMS,
};

/// Tile URL template of the default Stamen terrain layer.
pub const STAMEN_URL: &str = "https://stamen-tiles-{s}.a.ssl.fastly.net/terrain/{z}/{x}/{y}.png";

/// Attribution of the Stamen layer.
pub const STAMEN_ATTRIBUTION: &str = "Map tiles by <a href=\"http://stamen.com\">Stamen Design</a> (<a href=\"http://creativecommons.org/licenses/by/3.0\">CC BY 3.0</a>). Data by <a href=\"http://openstreetmap.org\">OpenStreetMap</a> (<a href=\"http://creativecommons.org/licenses/by-sa/3.0\">CC BY SA</a>)";

/// Attribution of MapBox layers.
pub const MAPBOX_ATTRIBUTION: &str = "Data: <a href=\"http://osm.org/copyright\" target=\"_blank\">OpenStreetMap</a>, Design: <a href=\"http://mapbox.com/about/maps\" target=\"_blank\">MapBox</a>";

/// Subdomains of the hosted tile services.
pub const HOSTED_SUBDOMAINS: &str = "abcd";

const MAPBOX_MAP_ID: &str = "mapbox.map_id";
const MAPBOX_ACCESS_TOKEN: &str = "mapbox.access_token";
const CUSTOM_URL: &str = "custom.url";

/// Source of the map tiles, selected by the `type` configuration key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileProvider {
    /// Stamen terrain tiles. Used when no other provider is configured.
    Stamen,
    /// Hosted MapBox map.
    Mapbox {
        /// Map id in the `account.handle` form.
        map_id: String,
        /// API access token.
        access_token: String,
    },
    /// Custom XYZ tile service.
    Custom {
        /// Tile URL template.
        url: String,
    },
    /// Several tile services the user can switch between.
    Multilayer {
        /// Layers in the order they are shown in the layer switcher.
        layers: Vec<LayerDescriptor>,
    },
}

impl TileProvider {
    /// Selects the provider described by the configuration.
    pub fn from_config(config: &MapConfig) -> Result<Self, MapConfigError> {
        let provider = match config.map_type() {
            "mapbox" => {
                let (Some(map_id), Some(access_token)) = (
                    config.get_str(MAPBOX_MAP_ID),
                    config.get_str(MAPBOX_ACCESS_TOKEN),
                ) else {
                    let setting = if config.get_str(MAPBOX_MAP_ID).is_none() {
                        MAPBOX_MAP_ID
                    } else {
                        MAPBOX_ACCESS_TOKEN
                    };
                    return Err(MapConfigError::MissingSetting {
                        provider: "mapbox",
                        setting,
                    });
                };

                Self::Mapbox {
                    map_id,
                    access_token,
                }
            }
            "custom" => {
                let url = config
                    .get_str(CUSTOM_URL)
                    .ok_or(MapConfigError::MissingSetting {
                        provider: "custom",
                        setting: CUSTOM_URL,
                    })?;
                Self::Custom { url }
            }
            "multilayer" => {
                let layers = parse_layers(config.values())?;
                if layers.is_empty() {
                    return Err(MapConfigError::EmptyMultilayer);
                }
                Self::Multilayer { layers }
            }
            "stamen" => Self::Stamen,
            other => {
                log::warn!("Unknown map type `{other}`, falling back to the Stamen tiles");
                Self::Stamen
            }
        };

        log::debug!("Selected {} tile provider", provider.name());
        Ok(provider)
    }

    /// Short name of the provider, as used in the `type` configuration key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stamen => "stamen",
            Self::Mapbox { .. } => "mapbox",
            Self::Custom { .. } => "custom",
            Self::Multilayer { .. } => "multilayer",
        }
    }

    /// Layers offered in the layer switcher. Empty for single layer providers.
    pub fn switchable_layers(&self) -> &[LayerDescriptor] {
        match self {
            Self::Multilayer { layers } => layers,
            _ => &[],
        }
    }

    /// Base layer added to the map.
    ///
    /// `base_options` are the caller supplied options of the base layer. The maximum zoom level
    /// is always forced to [`DEFAULT_MAX_ZOOM`]. For multilayer maps the first layer is used as
    /// is and `base_options` are ignored.
    pub fn base_layer(
        &self,
        config: &MapConfig,
        base_options: &TileLayerOptions,
    ) -> Result<TileLayerSpec, MapConfigError> {
        let defaults = || {
            let mut options = base_options.clone();
            options.insert(MAX_ZOOM.into(), DEFAULT_MAX_ZOOM.into());
            options
        };

        match self {
            Self::Stamen => with_configured(TileLayerBuilder::new_stamen(), config)
                .with_fallback_options(defaults())
                .build(),
            Self::Mapbox {
                map_id,
                access_token,
            } => with_configured(TileLayerBuilder::new_mapbox(map_id, access_token), config)
                .with_fallback_options(defaults())
                .build(),
            Self::Custom { url } => {
                let mut builder = with_configured(TileLayerBuilder::new(url.as_str()), config);
                if config.get_flag(TMS) {
                    builder = builder.with_tms(true);
                }
                builder.with_fallback_options(defaults()).build()
            }
            Self::Multilayer { layers } => layers
                .first()
                .ok_or(MapConfigError::EmptyMultilayer)?
                .tile_layer(),
        }
    }
}

/// Applies the subdomains and attribution overrides of the configuration.
fn with_configured(mut builder: TileLayerBuilder, config: &MapConfig) -> TileLayerBuilder {
    if let Some(subdomains) = config.subdomains() {
        builder = builder.with_subdomains(subdomains.clone());
    }
    if let Some(attribution) = config.attribution() {
        builder = builder.with_attribution(attribution.clone());
    }
    builder
}

/// Tile URL template of a MapBox map.
pub fn mapbox_url(map_id: &str, access_token: &str) -> String {
    format!("//{{s}}.tiles.mapbox.com/v4/{map_id}/{{z}}/{{x}}/{{y}}.png?access_token={access_token}")
}
