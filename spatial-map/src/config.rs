//! Flat configuration of the common map widget.
//!
//! The hosting application exposes its map settings as a flat mapping from string keys to
//! values. Typically these come from the `ckanext.spatial.common_map.*` entries of an ini file,
//! with the prefix stripped:
//!
//! ```ini
//! ckanext.spatial.common_map.type = multilayer
//! ckanext.spatial.common_map.layer_0.url = https://tile.openstreetmap.org/{z}/{x}/{y}.png
//! ckanext.spatial.common_map.layer_0.label = OpenStreetMap
//! ```
//!
//! [`MapConfig`] keeps the mapping as is and provides typed accessors for the keys the map
//! factory understands. Unknown keys are preserved and ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat mapping from a configuration key to its value.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Key that selects the tile provider.
pub const MAP_TYPE_KEY: &str = "type";

/// Map type used when the configuration does not specify one.
pub const DEFAULT_MAP_TYPE: &str = "stamen";

/// Configuration of the common map, as supplied by the hosting application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapConfig {
    values: ConfigMap,
}

impl Default for MapConfig {
    fn default() -> Self {
        let mut values = ConfigMap::new();
        values.insert(MAP_TYPE_KEY.into(), DEFAULT_MAP_TYPE.into());
        Self { values }
    }
}

impl From<ConfigMap> for MapConfig {
    fn from(values: ConfigMap) -> Self {
        Self::new(values)
    }
}

impl MapConfig {
    /// Creates a configuration from the given mapping.
    pub fn new(values: ConfigMap) -> Self {
        Self { values }
    }

    /// Creates a configuration from key-value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Creates a configuration from the pairs whose key starts with `prefix`. The prefix is
    /// stripped from the resulting keys, other pairs are skipped.
    ///
    /// ```
    /// use spatial_map::MapConfig;
    ///
    /// let config = MapConfig::from_prefixed(
    ///     [
    ///         ("ckanext.spatial.common_map.type", "custom"),
    ///         ("ckan.site_url", "http://localhost:5000"),
    ///     ],
    ///     "ckanext.spatial.common_map.",
    /// );
    /// assert_eq!(config.map_type(), "custom");
    /// assert_eq!(config.len(), 1);
    /// ```
    pub fn from_prefixed<I, K, V>(pairs: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut values = ConfigMap::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            match key.strip_prefix(prefix) {
                Some(stripped) if !stripped.is_empty() => {
                    values.insert(stripped.to_string(), value.into());
                }
                _ => log::trace!("Skipping configuration key {key} without prefix {prefix}"),
            }
        }

        Self { values }
    }

    /// Underlying flat mapping.
    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// Number of keys in the configuration.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the configuration has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Sets the value of the key, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Value of the key, if it is set to something other than `null`, `false`, `0` or an empty
    /// string.
    pub fn get_set(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| is_truthy(value))
    }

    /// Value of the key rendered as a string. Empty and `null` values are treated as not set.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get_set(key).and_then(scalar_to_string)
    }

    /// Interprets the value of the key as a boolean flag.
    ///
    /// Strings follow the ini conventions: `true`, `yes`, `on` and `1` are true, `false`, `no`,
    /// `off`, `0` and an empty string are false (case insensitive). Other values are true when
    /// they are set.
    pub fn get_flag(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(value_as_flag)
    }

    /// Tile provider type. Defaults to `stamen` if not set.
    pub fn map_type(&self) -> &str {
        self.values
            .get(MAP_TYPE_KEY)
            .and_then(Value::as_str)
            .filter(|map_type| !map_type.is_empty())
            .unwrap_or(DEFAULT_MAP_TYPE)
    }

    /// Configured tile subdomains, either a string of single-letter subdomains or an array.
    pub fn subdomains(&self) -> Option<&Value> {
        self.get_set("subdomains")
    }

    /// Configured attribution override.
    pub fn attribution(&self) -> Option<&Value> {
        self.get_set("attribution")
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn value_as_flag(value: &Value) -> bool {
    match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" | "" => false,
            _ => true,
        },
        other => is_truthy(other),
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
