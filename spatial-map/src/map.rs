//! Construction of the common map widget.
//!
//! All spatial widgets create their maps through [`CommonMapBuilder`] so that they share the same
//! look and base layers. The builder first resolves the configuration into a [`MapPlan`], which
//! is plain data, and then hands the plan to a [`MapBackend`] that talks to the actual rendering
//! library.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigMap, MapConfig};
use crate::error::MapConfigError;
use crate::layer::tile_layer::{TileLayerOptions, TileLayerSpec};
use crate::provider::TileProvider;

/// Position of the layer switcher control on the map.
pub const LAYER_SWITCHER_POSITION: &str = "bottomright";

/// Scheme of the page that shows the map. Used to resolve protocol-relative tile URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Plain http.
    #[default]
    Http,
    /// https.
    Https,
}

impl Transport {
    /// Detects the transport from the URL of the page.
    pub fn from_page_url(url: &str) -> Self {
        let is_https = url
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https"));
        if is_https {
            Self::Https
        } else {
            Self::Http
        }
    }

    /// URL scheme without the trailing colon.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Prepends the scheme to a protocol-relative URL. Other URLs are returned unchanged.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("//") {
            format!("{}:{url}", self.scheme())
        } else {
            url.to_string()
        }
    }
}

/// The rendering library the map is created with.
///
/// The map factory calls [`MapBackend::create_map`] exactly once per map and
/// [`MapBackend::create_tile_layer`] once per tile layer it needs.
pub trait MapBackend {
    /// Map object of the library.
    type Map;
    /// Tile layer object of the library.
    type Layer;

    /// Creates a map in the given container.
    fn create_map(&mut self, container: &str, options: &ConfigMap) -> Self::Map;

    /// Creates a tile layer.
    fn create_tile_layer(&mut self, url_template: &str, options: &TileLayerOptions) -> Self::Layer;

    /// Adds a layer to the map.
    fn add_layer(&mut self, map: &mut Self::Map, layer: Self::Layer);

    /// Adds a control that lets the user switch between the given labelled layers.
    fn add_layer_switcher(
        &mut self,
        map: &mut Self::Map,
        layers: Vec<(String, Self::Layer)>,
        position: &str,
    );
}

/// Layer switcher control of a multilayer map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSwitcher {
    /// Position of the control.
    pub position: String,
    /// Labelled layers in display order.
    pub layers: Vec<(String, TileLayerSpec)>,
}

/// Fully resolved description of a map, ready to be built by a [`MapBackend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPlan {
    /// Id of the HTML element that hosts the map.
    pub container: String,
    /// Name of the selected tile provider.
    pub provider: String,
    /// Options of the map object.
    pub map_options: ConfigMap,
    /// Layer added to the map directly.
    pub base_layer: TileLayerSpec,
    /// Layer switcher control, for multilayer maps.
    pub layer_switcher: Option<LayerSwitcher>,
}

impl MapPlan {
    /// Creates the map with the given backend.
    pub fn build<B: MapBackend>(&self, backend: &mut B) -> B::Map {
        let mut map = backend.create_map(&self.container, &self.map_options);

        if let Some(switcher) = &self.layer_switcher {
            let layers = switcher
                .layers
                .iter()
                .map(|(label, spec)| {
                    let layer = backend.create_tile_layer(&spec.url_template, &spec.options);
                    (label.clone(), layer)
                })
                .collect();
            backend.add_layer_switcher(&mut map, layers, &switcher.position);
        }

        let base_layer =
            backend.create_tile_layer(&self.base_layer.url_template, &self.base_layer.options);
        backend.add_layer(&mut map, base_layer);

        map
    }
}

/// Creates the common map.
///
/// ```
/// use spatial_map::{CommonMapBuilder, MapConfig};
///
/// let config = MapConfig::from_pairs([("type", "custom"), ("custom.url", "https://t/{z}/{x}/{y}.png")]);
/// let plan = CommonMapBuilder::new("dataset-map")
///     .with_map_config(config)
///     .plan()
///     .expect("valid configuration");
/// assert_eq!(plan.base_layer.url_template, "https://t/{z}/{x}/{y}.png");
/// ```
#[derive(Debug, Clone)]
pub struct CommonMapBuilder {
    container: String,
    map_config: MapConfig,
    map_options: ConfigMap,
    base_layer_options: TileLayerOptions,
    transport: Transport,
}

impl CommonMapBuilder {
    /// Starts a map that will be shown in the given container.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            map_config: MapConfig::default(),
            map_options: ConfigMap::new(),
            base_layer_options: TileLayerOptions::new(),
            transport: Transport::default(),
        }
    }

    /// Sets the configuration of the hosting application.
    pub fn with_map_config(mut self, map_config: MapConfig) -> Self {
        self.map_config = map_config;
        self
    }

    /// Sets options passed to the map object, e.g. `attributionControl: false` for small maps
    /// that show the attribution outside of the map.
    pub fn with_map_options(mut self, map_options: ConfigMap) -> Self {
        self.map_options = map_options;
        self
    }

    /// Sets options of the base layer.
    pub fn with_base_layer_options(mut self, options: TileLayerOptions) -> Self {
        self.base_layer_options = options;
        self
    }

    /// Sets the transport of the page showing the map.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Resolves the configuration without creating anything.
    pub fn plan(&self) -> Result<MapPlan, MapConfigError> {
        let provider = TileProvider::from_config(&self.map_config)?;

        let layer_switcher = match provider.switchable_layers() {
            [] => None,
            layers => {
                let layers = layers
                    .iter()
                    .map(|descriptor| -> Result<_, MapConfigError> {
                        let spec = descriptor.tile_layer()?.with_transport(self.transport);
                        Ok((descriptor.label.clone(), spec))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Some(LayerSwitcher {
                    position: LAYER_SWITCHER_POSITION.to_string(),
                    layers,
                })
            }
        };

        let base_layer = provider
            .base_layer(&self.map_config, &self.base_layer_options)?
            .with_transport(self.transport);

        Ok(MapPlan {
            container: self.container.clone(),
            provider: provider.name().to_string(),
            map_options: self.map_options.clone(),
            base_layer,
            layer_switcher,
        })
    }

    /// Creates the map with the given backend.
    ///
    /// The configuration is fully resolved before the backend is used, so an invalid
    /// configuration never results in a partially constructed map.
    pub fn build<B: MapBackend>(&self, backend: &mut B) -> Result<B::Map, MapConfigError> {
        let plan = self.plan()?;
        log::debug!(
            "Building {} map in container {}",
            plan.provider,
            plan.container
        );
        Ok(plan.build(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_detection() {
        assert_eq!(Transport::from_page_url("https://example.com/dataset"), Transport::Https);
        assert_eq!(Transport::from_page_url("HTTPS://example.com"), Transport::Https);
        assert_eq!(Transport::from_page_url("http://example.com"), Transport::Http);
        assert_eq!(Transport::from_page_url("file:///tmp/map.html"), Transport::Http);
        assert_eq!(Transport::from_page_url("http"), Transport::Http);
        assert_eq!(Transport::from_page_url("ht"), Transport::Http);
    }

    #[test]
    fn resolve_only_touches_protocol_relative_urls() {
        assert_eq!(Transport::Https.resolve("//a.t/1"), "https://a.t/1");
        assert_eq!(Transport::Https.resolve("http://a.t/1"), "http://a.t/1");
        assert_eq!(Transport::Http.resolve("/local/tiles"), "/local/tiles");
    }

    #[test]
    fn default_plan_uses_stamen() {
        let plan = CommonMapBuilder::new("map").plan().expect("valid");
        assert_eq!(plan.provider, "stamen");
        assert_eq!(plan.container, "map");
        assert!(plan.layer_switcher.is_none());
        assert!(plan.map_options.is_empty());
    }

    #[test]
    fn mapbox_plan_resolves_transport() {
        let config = MapConfig::from_pairs([
            ("type", "mapbox"),
            ("mapbox.map_id", "acme.streets"),
            ("mapbox.access_token", "tk"),
        ]);
        let plan = CommonMapBuilder::new("map")
            .with_map_config(config)
            .with_transport(Transport::Https)
            .plan()
            .expect("valid");

        assert!(plan
            .base_layer
            .url_template
            .starts_with("https://{s}.tiles.mapbox.com/v4/acme.streets/"));
    }
}
