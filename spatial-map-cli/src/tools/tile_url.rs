use anyhow::{Context, Result};
use clap::Args;
use spatial_map::layer::TileIndex;
use spatial_map::{CommonMapBuilder, Transport};

use crate::input::ConfigArgs;

#[derive(Args, Debug)]
pub struct Subcommand {
    #[command(flatten)]
    input: ConfigArgs,

    /// zoom level
    z: u32,

    /// tile column
    x: u32,

    /// tile row, counted from the top
    y: u32,

    /// selects the subdomain used for `{s}`
    #[arg(long, default_value_t = 0)]
    subdomain: u32,

    /// URL of the page showing the map, used to resolve protocol-relative tile URLs
    #[arg(long)]
    page_url: Option<String>,
}

pub fn run(arguments: &Subcommand) -> Result<String> {
    let transport = arguments
        .page_url
        .as_deref()
        .map(Transport::from_page_url)
        .unwrap_or_default();

    let plan = CommonMapBuilder::new("map")
        .with_map_config(arguments.input.load()?)
        .with_transport(transport)
        .plan()
        .context("cannot create the map")?;

    let index = TileIndex::new(arguments.z, arguments.x, arguments.y);
    let url = plan.base_layer.tile_url(index, arguments.subdomain)?;
    log::debug!("Tile {index:?} of the {} base layer: {url}", plan.provider);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use crate::tests::run_command;

    #[test]
    fn stamen_tile() {
        let output = run_command(vec!["spatial-map", "tile-url", "4", "8", "5", "--subdomain", "3"])
            .unwrap();
        assert_eq!(
            output,
            "https://stamen-tiles-d.a.ssl.fastly.net/terrain/4/8/5.png"
        );
    }

    #[test]
    fn tms_tile() {
        let output = run_command(vec![
            "spatial-map",
            "tile-url",
            "--set",
            "type=custom",
            "--set",
            "custom.url=//t.example.com/{z}/{x}/{y}.png",
            "--set",
            "tms=yes",
            "--page-url",
            "http://localhost:5000/dataset",
            "2",
            "1",
            "0",
        ])
        .unwrap();
        assert_eq!(output, "http://t.example.com/2/1/3.png");
    }
}
