//! Loading of the map configuration from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use spatial_map::{ConfigMap, MapConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// JSON file with the flat map configuration
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// set a single configuration value, e.g. `--set layer_0.url=https://t/{z}/{x}/{y}.png`
    /// values are parsed as JSON if possible and used as strings otherwise
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, verbatim_doc_comment)]
    pub values: Vec<(String, Value)>,

    /// only use the keys starting with this prefix, e.g. `ckanext.spatial.common_map.`
    #[arg(long, short)]
    pub prefix: Option<String>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<MapConfig> {
        let mut values = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<ConfigMap>(&text)
                    .with_context(|| format!("{} is not a flat JSON object", path.display()))?
            }
            None => ConfigMap::new(),
        };

        values.extend(self.values.iter().cloned());
        log::debug!("Loaded {} configuration values", values.len());

        let config = match &self.prefix {
            Some(prefix) => MapConfig::from_prefixed(values, prefix),
            None => MapConfig::new(values),
        };

        if config.is_empty() {
            log::info!("No map configuration given, using the default map");
            return Ok(MapConfig::default());
        }

        Ok(config)
    }
}

fn parse_key_value(arg: &str) -> Result<(String, Value), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("`{arg}` is not in the KEY=VALUE form"))?;

    if key.is_empty() {
        return Err(format!("`{arg}` has an empty key"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn key_values() {
        assert_eq!(
            parse_key_value("layer_0.tms=true"),
            Ok(("layer_0.tms".to_string(), json!(true)))
        );
        assert_eq!(
            parse_key_value("layer_0.url=http://t/{z}/{x}/{y}.png"),
            Ok(("layer_0.url".to_string(), json!("http://t/{z}/{x}/{y}.png")))
        );
        assert_eq!(
            parse_key_value("layer_0.subdomains=[\"a\",\"b\"]"),
            Ok(("layer_0.subdomains".to_string(), json!(["a", "b"])))
        );
        assert_eq!(parse_key_value("type="), Ok(("type".to_string(), json!(""))));
        assert!(parse_key_value("type").is_err());
        assert!(parse_key_value("=custom").is_err());
    }

    #[test]
    fn empty_input_is_the_default_map() {
        let args = ConfigArgs {
            config: None,
            values: vec![],
            prefix: None,
        };
        assert_eq!(args.load().unwrap(), MapConfig::default());
    }

    #[test]
    fn prefix_applies_to_file_and_overrides() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("testdata/multilayer.json")),
            values: vec![(
                "ckanext.spatial.common_map.layer_1.label".to_string(),
                json!("Terrain"),
            )],
            prefix: Some("ckanext.spatial.common_map.".to_string()),
        };

        let config = args.load().unwrap();
        assert_eq!(config.map_type(), "multilayer");
        assert_eq!(config.get_str("layer_1.label").as_deref(), Some("Terrain"));
        assert!(config.get("ckan.site_url").is_none());
    }
}
