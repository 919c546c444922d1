//! Tile layer definitions handed to the map rendering library.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{scalar_to_string, value_as_flag, ConfigMap};
use crate::error::MapConfigError;
use crate::map::Transport;
use crate::provider::{
    mapbox_url, HOSTED_SUBDOMAINS, MAPBOX_ATTRIBUTION, STAMEN_ATTRIBUTION, STAMEN_URL,
};

/// Options of a tile layer, using the option names of the rendering library (`maxZoom`,
/// `subdomains`, `attribution`, `tms` etc.).
pub type TileLayerOptions = ConfigMap;

/// Option key for the maximum zoom level.
pub const MAX_ZOOM: &str = "maxZoom";
/// Option key for the tile server subdomains.
pub const SUBDOMAINS: &str = "subdomains";
/// Option key for the attribution text.
pub const ATTRIBUTION: &str = "attribution";
/// Option key for the inverted y axis flag.
pub const TMS: &str = "tms";
/// Option key for the hosted map handle.
pub const HANDLE: &str = "handle";

/// Maximum zoom level set on every base layer.
pub const DEFAULT_MAX_ZOOM: u32 = 18;

/// Subdomains used by the rendering library when a layer does not configure any.
const LIBRARY_SUBDOMAINS: &str = "abc";

/// Placeholders the rendering library substitutes by itself. Names are matched without the
/// surrounding spaces, so `{ z }` is the same as `{z}`.
const BUILTIN_PLACEHOLDERS: [&str; 6] = ["s", "z", "x", "y", "-y", "r"];

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is a valid regex"))
}

/// Index of a tile in the XYZ tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// Zoom level.
    pub z: u32,
    /// Column.
    pub x: u32,
    /// Row, counted from the top.
    pub y: u32,
}

impl TileIndex {
    /// Creates a new index.
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Row counted from the bottom, as used by TMS services.
    pub fn flipped_y(&self) -> u64 {
        let rows = 1u64.checked_shl(self.z).unwrap_or(u64::MAX);
        rows.saturating_sub(1).saturating_sub(self.y as u64)
    }
}

/// Tile layer constructor arguments: URL template and layer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerSpec {
    /// Tile URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Options of the layer.
    pub options: TileLayerOptions,
}

impl TileLayerSpec {
    /// Returns the layer with a protocol-relative template (`//host/...`) resolved to an absolute
    /// one using the given transport.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.url_template = transport.resolve(&self.url_template);
        self
    }

    /// Subdomains the `{s}` placeholder rotates through.
    pub fn subdomains(&self) -> Vec<String> {
        let subdomains: Vec<String> = match self.options.get(SUBDOMAINS) {
            Some(Value::String(s)) => s.chars().map(String::from).collect(),
            Some(Value::Array(values)) => values.iter().filter_map(scalar_to_string).collect(),
            _ => vec![],
        };

        if subdomains.is_empty() {
            LIBRARY_SUBDOMAINS.chars().map(String::from).collect()
        } else {
            subdomains
        }
    }

    /// True if the layer is served with the inverted y axis.
    pub fn is_tms(&self) -> bool {
        self.options.get(TMS).is_some_and(value_as_flag)
    }

    /// Expands the URL template for the given tile.
    ///
    /// `subdomain_hint` selects the subdomain substituted into `{s}`. Options of the layer are
    /// available as placeholders too.
    pub fn tile_url(&self, index: TileIndex, subdomain_hint: u32) -> Result<String, MapConfigError> {
        let mut vars: HashMap<String, String> = self
            .options
            .iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|value| (key.clone(), value)))
            .collect();

        let subdomains = self.subdomains();
        let subdomain = subdomains[subdomain_hint as usize % subdomains.len()].clone();
        let y = if self.is_tms() {
            index.flipped_y()
        } else {
            index.y as u64
        };

        vars.insert("s".into(), subdomain);
        vars.insert("z".into(), index.z.to_string());
        vars.insert("x".into(), index.x.to_string());
        vars.insert("y".into(), y.to_string());
        vars.insert("-y".into(), index.flipped_y().to_string());
        vars.insert("r".into(), String::new());

        strfmt::strfmt(&self.url_template, &vars).map_err(|err| {
            MapConfigError::InvalidUrlTemplate {
                template: self.url_template.clone(),
                reason: err.to_string(),
            }
        })
    }
}

/// Builder for [`TileLayerSpec`].
///
/// ```
/// use spatial_map::layer::tile_layer::TileLayerBuilder;
///
/// let layer = TileLayerBuilder::new("https://{s}.tile.example.com/{z}/{x}/{y}.png")
///     .with_subdomains("abc")
///     .with_attribution("Example")
///     .with_max_zoom(18)
///     .build()
///     .expect("valid layer");
/// ```
#[derive(Debug, Clone)]
pub struct TileLayerBuilder {
    url_template: String,
    options: TileLayerOptions,
}

impl TileLayerBuilder {
    /// Starts a layer with the given URL template.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            options: TileLayerOptions::new(),
        }
    }

    /// Starts the Stamen terrain layer with its hosted subdomains and attribution.
    pub fn new_stamen() -> Self {
        Self::new(STAMEN_URL)
            .with_subdomains(HOSTED_SUBDOMAINS)
            .with_attribution(STAMEN_ATTRIBUTION)
    }

    /// Starts a hosted MapBox layer for the given map id (`account.handle`).
    pub fn new_mapbox(map_id: &str, access_token: &str) -> Self {
        Self::new(mapbox_url(map_id, access_token))
            .with_option(HANDLE, map_id)
            .with_subdomains(HOSTED_SUBDOMAINS)
            .with_attribution(MAPBOX_ATTRIBUTION)
    }

    /// Sets a single option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Adds all the given options, replacing the ones already set.
    pub fn with_options(mut self, options: TileLayerOptions) -> Self {
        self.options.extend(options);
        self
    }

    /// Adds the given options for the keys that are not set yet.
    pub fn with_fallback_options(mut self, options: TileLayerOptions) -> Self {
        for (key, value) in options {
            self.options.entry(key).or_insert(value);
        }
        self
    }

    /// Sets the tile server subdomains.
    pub fn with_subdomains(self, subdomains: impl Into<Value>) -> Self {
        self.with_option(SUBDOMAINS, subdomains)
    }

    /// Sets the attribution text.
    pub fn with_attribution(self, attribution: impl Into<Value>) -> Self {
        self.with_option(ATTRIBUTION, attribution)
    }

    /// Marks the layer as using the TMS (inverted y) tile scheme.
    pub fn with_tms(self, tms: bool) -> Self {
        self.with_option(TMS, tms)
    }

    /// Sets the maximum zoom level.
    pub fn with_max_zoom(self, max_zoom: u32) -> Self {
        self.with_option(MAX_ZOOM, max_zoom)
    }

    /// Validates the template and creates the layer definition. Spaces around placeholder names
    /// are removed from the template.
    pub fn build(self) -> Result<TileLayerSpec, MapConfigError> {
        validate_template(&self.url_template, &self.options)?;
        Ok(TileLayerSpec {
            url_template: normalize_template(&self.url_template),
            options: self.options,
        })
    }
}

fn validate_template(template: &str, options: &TileLayerOptions) -> Result<(), MapConfigError> {
    let invalid = |reason: String| MapConfigError::InvalidUrlTemplate {
        template: template.to_string(),
        reason,
    };

    if template.trim().is_empty() {
        return Err(invalid("template is empty".into()));
    }

    for captures in placeholder_pattern().captures_iter(template) {
        let name = captures[1].trim();
        if !BUILTIN_PLACEHOLDERS.contains(&name) && !options.contains_key(name) {
            return Err(invalid(format!("unknown placeholder `{{{name}}}`")));
        }
    }

    let stripped = placeholder_pattern().replace_all(template, "");
    if stripped.contains(['{', '}']) {
        return Err(invalid("unbalanced braces".into()));
    }

    Ok(())
}

fn normalize_template(template: &str) -> String {
    placeholder_pattern()
        .replace_all(template, |captures: &regex::Captures| {
            format!("{{{}}}", captures[1].trim())
        })
        .into_owned()
}
