//! Environment variable overrides for configuration.
//!
//! - `CHATRELAY_CONFIG` - path of the config file
//! - `CHATRELAY_NAME` - connection name
//! - `CHATRELAY_USER` - value bound to `$user`
//! - `CHATRELAY_CHANNEL` - value bound to `$channel`
//! - `CHATRELAY_INPUT_FORMAT` - formatter used to decode input

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "CHATRELAY";

/// Apply environment variable overrides to a config.
///
/// Empty variables are ignored.
pub fn apply_env_overrides(mut config: Config) -> Config {
    let var = |suffix: &str| {
        env::var(format!("{}_{}", ENV_PREFIX, suffix))
            .ok()
            .filter(|value| !value.is_empty())
    };

    if let Some(name) = var("NAME") {
        config.relay.name = name;
    }
    if let Some(user) = var("USER") {
        config.relay.user = user;
    }
    if let Some(channel) = var("CHANNEL") {
        config.relay.channel = channel;
    }
    if let Some(format) = var("INPUT_FORMAT") {
        config.relay.input_format = format;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `CHATRELAY_CONFIG`, otherwise returns "chatrelay.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "chatrelay.conf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_prefix() {
        assert_eq!(ENV_PREFIX, "CHATRELAY");
    }

    #[test]
    fn test_get_config_path_default() {
        env::remove_var("CHATRELAY_CONFIG");
        assert_eq!(get_config_path(), "chatrelay.conf");
    }

    #[test]
    fn test_apply_env_overrides() {
        env::remove_var("CHATRELAY_NAME");
        env::set_var("CHATRELAY_USER", "carol");
        env::set_var("CHATRELAY_CHANNEL", "");

        let config = apply_env_overrides(Config::default());
        assert_eq!(config.relay.user, "carol");
        assert_eq!(config.relay.channel, "stdin");
        assert_eq!(config.relay.name, "stdin");

        env::remove_var("CHATRELAY_USER");
        env::remove_var("CHATRELAY_CHANNEL");
    }
}
