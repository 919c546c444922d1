//! Error type of the crate.

use thiserror::Error;

/// Error that can occur while resolving a map configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapConfigError {
    /// A `layer_<N>.*` group has no usable `url` property.
    #[error("layer {0} is malformed: it has no `url` property")]
    MalformedLayerConfig(u32),

    /// The index part of a `layer_<N>.*` key does not fit into a layer index.
    #[error("layer index `{0}` is out of range")]
    InvalidLayerIndex(String),

    /// Multilayer map was requested, but the configuration defines no layers.
    #[error("multilayer map requires at least one `layer_<N>.url` setting")]
    EmptyMultilayer,

    /// A setting required by the selected tile provider is missing.
    #[error("`{setting}` setting is required for the {provider} tile provider")]
    MissingSetting {
        /// Name of the provider that was selected.
        provider: &'static str,
        /// Configuration key that was not set.
        setting: &'static str,
    },

    /// Tile URL template cannot be used to construct a tile layer.
    #[error("invalid tile url template `{template}`: {reason}")]
    InvalidUrlTemplate {
        /// The offending template.
        template: String,
        /// Human readable description of the problem.
        reason: String,
    },
}
