use anyhow::{Context, Result};
use clap::Args;
use spatial_map::{CommonMapBuilder, Transport};

use crate::input::ConfigArgs;

#[derive(Args, Debug)]
pub struct Subcommand {
    #[command(flatten)]
    input: ConfigArgs,

    /// id of the HTML element that hosts the map
    #[arg(long, default_value = "map")]
    container: String,

    /// URL of the page showing the map, used to resolve protocol-relative tile URLs
    #[arg(long)]
    page_url: Option<String>,
}

pub fn run(arguments: &Subcommand) -> Result<String> {
    let config = arguments.input.load()?;
    let transport = arguments
        .page_url
        .as_deref()
        .map(Transport::from_page_url)
        .unwrap_or_default();

    let plan = CommonMapBuilder::new(arguments.container.as_str())
        .with_map_config(config)
        .with_transport(transport)
        .plan()
        .context("cannot create the map")?;

    Ok(serde_json::to_string_pretty(&plan)?)
}
