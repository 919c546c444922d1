//! Parser of the multilayer map configuration.
//!
//! Each layer of a multilayer map is configured by a group of keys sharing the same numeric
//! index:
//!
//! ```ini
//! layer_0.url = https://tile.openstreetmap.org/{z}/{x}/{y}.png
//! layer_0.label = OpenStreetMap
//! layer_1.url = https://tiles.example.com/{z}/{x}/{y}.png
//! layer_1.tms = true
//! ```
//!
//! `url` is required, `label` defaults to `layer_<index>` and every other property is passed to
//! the tile layer as an option. Layers are ordered by their numeric index, so `layer_10` comes
//! after `layer_9`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ConfigMap;
use crate::error::MapConfigError;
use crate::layer::descriptor::LayerDescriptor;
use crate::layer::tile_layer::TileLayerOptions;

static LAYER_KEY: OnceLock<Regex> = OnceLock::new();

fn layer_key_pattern() -> &'static Regex {
    LAYER_KEY.get_or_init(|| {
        Regex::new(r"^layer_([0-9]+)\.(.+)$").expect("layer key pattern is a valid regex")
    })
}

/// Splits a `layer_<index>.<property>` key into its parts.
///
/// Returns `Ok(None)` for keys that do not describe a layer.
pub fn parse_layer_key(key: &str) -> Result<Option<(u32, &str)>, MapConfigError> {
    let Some(captures) = layer_key_pattern().captures(key) else {
        return Ok(None);
    };

    let (Some(raw_index), Some(property)) = (captures.get(1), captures.get(2)) else {
        return Ok(None);
    };

    let index = raw_index
        .as_str()
        .parse::<u32>()
        .map_err(|_| MapConfigError::InvalidLayerIndex(raw_index.as_str().to_string()))?;

    Ok(Some((index, property.as_str())))
}

/// Extracts the layers described by the `layer_<index>.<property>` keys of the configuration.
///
/// The configuration itself is left untouched. Keys that do not follow the pattern are ignored,
/// so a configuration without layer keys results in an empty list.
///
/// Fails with [`MapConfigError::MalformedLayerConfig`] for the first (lowest index) layer that
/// has no `url`. No partial result is returned in that case.
pub fn parse_layers(config: &ConfigMap) -> Result<Vec<LayerDescriptor>, MapConfigError> {
    let mut layers: BTreeMap<u32, TileLayerOptions> = BTreeMap::new();

    for (key, value) in config {
        let Some((index, property)) = parse_layer_key(key)? else {
            continue;
        };

        layers
            .entry(index)
            .or_default()
            .insert(property.to_string(), value.clone());
    }

    let descriptors = layers
        .into_iter()
        .map(|(index, properties)| LayerDescriptor::from_properties(index, properties))
        .collect::<Result<Vec<_>, _>>()?;

    for descriptor in &descriptors {
        log::trace!(
            "Parsed layer {} ({}) with url {}",
            descriptor.index,
            descriptor.label,
            descriptor.url
        );
    }

    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn config(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn layer_keys() {
        assert_eq!(parse_layer_key("layer_0.url"), Ok(Some((0, "url"))));
        assert_eq!(parse_layer_key("layer_12.max.zoom"), Ok(Some((12, "max.zoom"))));
        assert_eq!(parse_layer_key("layer_007.tms"), Ok(Some((7, "tms"))));
        assert_eq!(parse_layer_key("layer_.url"), Ok(None));
        assert_eq!(parse_layer_key("layer_1."), Ok(None));
        assert_eq!(parse_layer_key("layer_1url"), Ok(None));
        assert_eq!(parse_layer_key("xlayer_1.url"), Ok(None));
        assert_eq!(parse_layer_key("layer_-1.url"), Ok(None));
        assert_eq!(parse_layer_key("layer_١.url"), Ok(None));
        assert_eq!(
            parse_layer_key("layer_99999999999.url"),
            Err(MapConfigError::InvalidLayerIndex("99999999999".into()))
        );
    }

    #[test]
    fn no_layer_keys() {
        let layers = parse_layers(&config(json!({
            "type": "multilayer",
            "custom.url": "http://t/{z}/{x}/{y}",
        })))
        .expect("no layers is not an error");
        assert!(layers.is_empty());

        assert!(parse_layers(&ConfigMap::new()).expect("empty").is_empty());
    }

    #[test]
    fn layers_are_ordered_numerically() {
        let layers = parse_layers(&config(json!({
            "layer_2.url": "http://two",
            "layer_10.url": "http://ten",
            "layer_1.url": "http://one",
            "layer_9.url": "http://nine",
        })))
        .expect("valid layers");

        let indices: Vec<u32> = layers.iter().map(|layer| layer.index).collect();
        assert_eq!(indices, [1, 2, 9, 10]);
        assert_eq!(layers[3].url, "http://ten");
    }

    #[test]
    fn properties_are_grouped_by_index() {
        let layers = parse_layers(&config(json!({
            "layer_5.url": "http://five/{z}/{x}/{y}",
            "layer_5.label": "Five",
            "layer_5.opacity": 0.7,
            "layer_1.url": "http://one/{z}/{x}/{y}",
            "layer_1.tms": true,
        })))
        .expect("valid layers");

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].label, "layer_1");
        assert_eq!(layers[0].options, config(json!({"tms": true})));
        assert_eq!(layers[1].label, "Five");
        assert_eq!(layers[1].options, config(json!({"opacity": 0.7})));
    }

    #[test]
    fn structured_values_pass_through() {
        let layers = parse_layers(&config(json!({
            "layer_0.url": "http://{s}.t/{z}/{x}/{y}",
            "layer_0.subdomains": ["a", "b"],
            "layer_0.bounds": {"south": 1, "north": 2},
        })))
        .expect("valid layers");

        assert_eq!(layers[0].options["subdomains"], json!(["a", "b"]));
        assert_eq!(layers[0].options["bounds"], json!({"south": 1, "north": 2}));
    }

    #[test]
    fn first_malformed_layer_is_reported() {
        let result = parse_layers(&config(json!({
            "layer_8.label": "No url",
            "layer_3.label": "No url either",
            "layer_1.url": "http://one",
        })));
        assert_eq!(result, Err(MapConfigError::MalformedLayerConfig(3)));
    }

    #[test]
    fn zero_padded_indices_share_a_layer() {
        let layers = parse_layers(&config(json!({
            "layer_01.url": "http://padded",
            "layer_1.label": "One",
        })))
        .expect("valid layers");

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].url, "http://padded");
        assert_eq!(layers[0].label, "One");
    }
}
