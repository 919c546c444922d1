//! Tile layers of the common map.

pub mod descriptor;
pub mod parser;
pub mod tile_layer;

pub use descriptor::LayerDescriptor;
pub use parser::parse_layers;
pub use tile_layer::{TileIndex, TileLayerBuilder, TileLayerOptions, TileLayerSpec};
