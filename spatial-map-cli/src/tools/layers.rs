use anyhow::{Context, Result};
use clap::Args;
use spatial_map::layer::parse_layers;

use crate::input::ConfigArgs;

#[derive(Args, Debug)]
pub struct Subcommand {
    #[command(flatten)]
    input: ConfigArgs,
}

pub fn run(arguments: &Subcommand) -> Result<String> {
    let config = arguments.input.load()?;
    let layers = parse_layers(config.values()).context("invalid multilayer configuration")?;
    log::info!("Found {} layers", layers.len());

    Ok(serde_json::to_string_pretty(&layers)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::tests::run_command;

    #[test]
    fn layers_from_file() {
        let output = run_command(vec![
            "spatial-map",
            "layers",
            "--config",
            "testdata/multilayer.json",
            "--prefix",
            "ckanext.spatial.common_map.",
        ])
        .unwrap();

        let layers: Value = serde_json::from_str(&output).unwrap();
        let labels: Vec<&str> = layers
            .as_array()
            .unwrap()
            .iter()
            .map(|layer| layer["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, ["layer_1", "Streets", "Satellite"]);
    }

    #[test]
    fn layer_without_url() {
        let err = run_command(vec!["spatial-map", "layers", "--set", "layer_3.label=Streets"])
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid multilayer configuration");
        assert_eq!(
            err.root_cause().to_string(),
            "layer 3 is malformed: it has no `url` property"
        );
    }
}
