//! Configuration type definitions.

use serde::Deserialize;

/// Default template for an output.
pub const DEFAULT_TEMPLATE: &str = "[$time] $(-b)<$user>$(-) $message";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    pub filters: Option<FiltersConfig>,
}

/// The stdin connection and where its lines go.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Connection name, exposed to templates as `$($relay.name)`.
    #[serde(default = "default_name")]
    pub name: String,
    /// Value bound to `$user`.
    #[serde(default = "default_user")]
    pub user: String,
    /// Value bound to `$channel`.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Formatter used to decode incoming lines.
    #[serde(default = "default_input_format")]
    pub input_format: String,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            user: default_user(),
            channel: default_channel(),
            input_format: default_input_format(),
            outputs: default_outputs(),
        }
    }
}

/// One rendering of every relayed line.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub name: String,
    /// Formatter name, e.g. "ansi-utf8" or "irc".
    pub format: String,
    /// Template in config syntax.
    #[serde(default = "default_template")]
    pub template: String,
}

/// Lines whose plain text matches any of these are not relayed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersConfig {
    pub patterns: Option<Vec<String>>,
}

fn default_name() -> String {
    "stdin".to_string()
}

fn default_user() -> String {
    "stdin".to_string()
}

fn default_channel() -> String {
    "stdin".to_string()
}

fn default_input_format() -> String {
    "utf8".to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_outputs() -> Vec<OutputConfig> {
    vec![OutputConfig {
        name: "stdout".to_string(),
        format: "ansi-utf8".to_string(),
        template: default_template(),
    }]
}
