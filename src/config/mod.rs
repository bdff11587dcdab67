//! Configuration parsing, overrides and validation.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use tracing::warn;

use crate::common::error::ConfigResult;
use crate::string::FormatterRegistry;

pub use parser::load_config;
pub use types::*;

/// Load the config file, apply environment overrides and validate.
///
/// A missing file is not an error: the built-in defaults are used instead.
pub fn load_and_validate(path: &str, formatters: &FormatterRegistry) -> ConfigResult<Config> {
    let config = if Path::new(path).exists() {
        load_config(path)?
    } else {
        warn!(path = %path, "Config file not found, using defaults");
        Config::default()
    };

    let config = env::apply_env_overrides(config);
    validate::validate_config(&config, formatters)?;
    Ok(config)
}
