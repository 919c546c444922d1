pub mod layers;
pub mod plan;
pub mod tile_url;
