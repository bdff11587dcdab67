//! Configuration validation.
//!
//! Every problem is collected so a broken config can be fixed in one go.

use std::collections::HashSet;

use fancy_regex::Regex;

use crate::common::error::{ConfigError, ConfigResult};
use crate::config::types::Config;
use crate::string::FormatterRegistry;

/// Validate a configuration against the available formatters.
pub fn validate_config(config: &Config, formatters: &FormatterRegistry) -> ConfigResult<()> {
    let mut errors = Vec::new();
    let relay = &config.relay;

    if relay.name.is_empty() {
        errors.push("relay.name is required".to_string());
    }
    if !formatters.contains(&relay.input_format) {
        errors.push(format!(
            "relay.input_format '{}' is not a known formatter (use one of: {})",
            relay.input_format,
            formatters.names().join(", ")
        ));
    }

    if relay.outputs.is_empty() {
        errors.push("relay.outputs is empty - nothing would be relayed".to_string());
    }

    let mut names = HashSet::new();
    for (i, output) in relay.outputs.iter().enumerate() {
        if output.name.is_empty() {
            errors.push(format!("relay.outputs[{}].name is required", i));
        } else if !names.insert(output.name.as_str()) {
            errors.push(format!(
                "relay.outputs[{}].name '{}' is used more than once",
                i, output.name
            ));
        }
        if !formatters.contains(&output.format) {
            errors.push(format!(
                "relay.outputs[{}].format '{}' is not a known formatter",
                i, output.format
            ));
        }
        if output.template.trim().is_empty() {
            errors.push(format!("relay.outputs[{}].template is empty", i));
        }
    }

    if let Some(patterns) = config.filters.as_ref().and_then(|f| f.patterns.as_ref()) {
        for (i, pattern) in patterns.iter().enumerate() {
            if Regex::new(pattern).is_err() {
                errors.push(format!(
                    "filters.patterns[{}] is not a valid regex: '{}'",
                    i, pattern
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
