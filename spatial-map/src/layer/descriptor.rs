//! Layers of a multilayer map as parsed from the configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{is_truthy, scalar_to_string};
use crate::error::MapConfigError;
use crate::layer::tile_layer::{TileLayerBuilder, TileLayerOptions, TileLayerSpec};

/// One tile layer of a multilayer map, parsed from the `layer_<index>.*` configuration keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Numeric index of the layer in the configuration keys.
    pub index: u32,
    /// Tile URL template.
    pub url: String,
    /// Name of the layer shown in the layer switcher.
    pub label: String,
    /// All other properties of the layer, passed to the tile layer as is.
    pub options: TileLayerOptions,
}

impl LayerDescriptor {
    /// Builds a descriptor from the properties collected for the layer with the given index.
    ///
    /// `url` and `label` are taken out of the properties, the rest become the layer options.
    pub(crate) fn from_properties(
        index: u32,
        mut properties: TileLayerOptions,
    ) -> Result<Self, MapConfigError> {
        let url = properties
            .remove("url")
            .and_then(|url| match url {
                Value::String(url) if !url.is_empty() => Some(url),
                _ => None,
            })
            .ok_or(MapConfigError::MalformedLayerConfig(index))?;

        let label = properties
            .remove("label")
            .filter(is_truthy)
            .and_then(|label| scalar_to_string(&label))
            .unwrap_or_else(|| default_label(index));

        Ok(Self {
            index,
            url,
            label,
            options: properties,
        })
    }

    /// Tile layer described by this descriptor.
    pub fn tile_layer(&self) -> Result<TileLayerSpec, MapConfigError> {
        TileLayerBuilder::new(self.url.clone())
            .with_options(self.options.clone())
            .build()
    }
}

/// Label of a layer that does not specify one.
pub fn default_label(index: u32) -> String {
    format!("layer_{index}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn properties(value: Value) -> TileLayerOptions {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn url_and_label_are_taken_out_of_options() {
        let descriptor = LayerDescriptor::from_properties(
            4,
            properties(json!({"url": "http://t/{z}/{x}/{y}", "label": "Topo", "opacity": 0.5})),
        )
        .expect("valid layer");

        assert_eq!(descriptor.index, 4);
        assert_eq!(descriptor.url, "http://t/{z}/{x}/{y}");
        assert_eq!(descriptor.label, "Topo");
        assert_eq!(descriptor.options, properties(json!({"opacity": 0.5})));
    }

    #[test]
    fn empty_label_is_replaced_with_default() {
        let descriptor = LayerDescriptor::from_properties(
            2,
            properties(json!({"url": "http://t/{z}/{x}/{y}", "label": ""})),
        )
        .expect("valid layer");
        assert_eq!(descriptor.label, "layer_2");
        assert!(descriptor.options.is_empty());
    }

    #[test]
    fn numeric_label_is_rendered() {
        let descriptor = LayerDescriptor::from_properties(
            0,
            properties(json!({"url": "http://t/{z}/{x}/{y}", "label": 1990})),
        )
        .expect("valid layer");
        assert_eq!(descriptor.label, "1990");
    }

    #[test]
    fn url_must_be_a_non_empty_string() {
        for url in [json!(""), json!(null), json!(12), json!(["http://t"])] {
            let result = LayerDescriptor::from_properties(7, properties(json!({"url": url})));
            assert_eq!(result, Err(MapConfigError::MalformedLayerConfig(7)));
        }
    }

    #[test]
    fn descriptor_converts_to_tile_layer() {
        let descriptor = LayerDescriptor::from_properties(
            1,
            properties(json!({"url": "http://{s}.t/{z}/{x}/{y}", "subdomains": "ab"})),
        )
        .expect("valid layer");

        let layer = descriptor.tile_layer().expect("valid template");
        assert_eq!(layer.url_template, "http://{s}.t/{z}/{x}/{y}");
        assert_eq!(layer.options, properties(json!({"subdomains": "ab"})));
    }
}
