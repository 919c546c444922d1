//! Configuration core of the spatial common map widget.
//!
//! Every spatial widget of the portal shows its data on top of the same base map. This crate
//! turns the portal configuration into that map:
//!
//! * [`MapConfig`] holds the flat configuration of the hosting application,
//! * [`TileProvider`] selects the tile service from it (Stamen, MapBox, a custom XYZ service or
//!   several layers the user can switch between),
//! * [`parse_layers`](layer::parse_layers) turns the `layer_<N>.<property>` keys of a multilayer
//!   configuration into an ordered list of [`LayerDescriptor`]s,
//! * [`CommonMapBuilder`] resolves everything into a [`MapPlan`] and builds it with a
//!   [`MapBackend`], the adapter of the actual rendering library.
//!
//! ```
//! use spatial_map::{CommonMapBuilder, MapConfig};
//!
//! let config = MapConfig::from_pairs([
//!     ("type", "multilayer"),
//!     ("layer_0.url", "https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
//!     ("layer_0.label", "OpenStreetMap"),
//!     ("layer_1.url", "https://tiles.example.com/{z}/{x}/{y}.png"),
//! ]);
//!
//! let plan = CommonMapBuilder::new("dataset-map")
//!     .with_map_config(config)
//!     .plan()
//!     .expect("valid configuration");
//!
//! let switcher = plan.layer_switcher.expect("multilayer map has a layer switcher");
//! assert_eq!(switcher.layers[0].0, "OpenStreetMap");
//! assert_eq!(switcher.layers[1].0, "layer_1");
//! ```
//!
//! Nothing here fetches or renders tiles.

pub mod config;
pub mod error;
pub mod layer;
pub mod map;
pub mod provider;

pub use config::{ConfigMap, MapConfig};
pub use error::MapConfigError;
pub use layer::LayerDescriptor;
pub use map::{CommonMapBuilder, LayerSwitcher, MapBackend, MapPlan, Transport};
pub use provider::TileProvider;
