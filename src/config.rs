//! Bot configuration.
//!
//! Loaded from a YAML file:
//!
//! ```yaml
//! token: "bot-token"
//! ping-prefix: "🏓"
//! pong-prefix: "🏸"
//! channel-whitelist:
//!   - "123456789"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::command::TriggerGrammar;

pub const DEFAULT_PING_PREFIX: &str = "🏓";
pub const DEFAULT_PONG_PREFIX: &str = "🏸";

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} doesn't exist")]
    NotFound { path: String },
    #[error("error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing 'token' parameter in config")]
    MissingToken,
    #[error("'{0}' must not be empty")]
    EmptyPrefix(&'static str),
    #[error("'ping-prefix' and 'pong-prefix' must differ")]
    SamePrefixes,
    #[error("invalid trigger pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_ping_prefix")]
    pub ping_prefix: String,

    #[serde(default = "default_pong_prefix")]
    pub pong_prefix: String,

    /// Channels the bot answers in; empty means all
    #[serde(default)]
    pub channel_whitelist: Vec<String>,
}

fn default_ping_prefix() -> String {
    DEFAULT_PING_PREFIX.to_string()
}

fn default_pong_prefix() -> String {
    DEFAULT_PONG_PREFIX.to_string()
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Io(e),
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.ping_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("ping-prefix"));
        }
        if self.pong_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("pong-prefix"));
        }
        if self.ping_prefix == self.pong_prefix {
            return Err(ConfigError::SamePrefixes);
        }
        Ok(())
    }

    pub fn grammar(&self) -> Result<TriggerGrammar, ConfigError> {
        Ok(TriggerGrammar::new(&self.ping_prefix, &self.pong_prefix)?)
    }
}

/// An empty whitelist allows every channel.
pub fn channel_allowed(whitelist: &[String], channel_id: &str) -> bool {
    whitelist.is_empty() || whitelist.iter().any(|c| c == channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full() {
        let config = Config::from_yaml_str(
            "token: abc\nping-prefix: \"!ping\"\npong-prefix: \"!pong\"\nchannel-whitelist: [\"1\", \"2\"]\n",
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                token: "abc".to_string(),
                ping_prefix: "!ping".to_string(),
                pong_prefix: "!pong".to_string(),
                channel_whitelist: vec!["1".to_string(), "2".to_string()],
            }
        );
        assert!(channel_allowed(&config.channel_whitelist, "1"));
        assert!(!channel_allowed(&config.channel_whitelist, "3"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml_str("token: abc\n").unwrap();
        assert_eq!(config.ping_prefix, DEFAULT_PING_PREFIX);
        assert_eq!(config.pong_prefix, DEFAULT_PONG_PREFIX);
        assert!(channel_allowed(&config.channel_whitelist, "anything"));

        let grammar = config.grammar().unwrap();
        assert_eq!(grammar.ping_token(), DEFAULT_PING_PREFIX);
    }

    #[test]
    fn test_missing_token() {
        let result = Config::from_yaml_str("ping-prefix: a\npong-prefix: b\n");
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_invalid_prefixes() {
        let result = Config::from_yaml_str("token: abc\nping-prefix: x\npong-prefix: x\n");
        assert!(matches!(result, Err(ConfigError::SamePrefixes)));

        let result = Config::from_yaml_str("token: abc\nping-prefix: \"\"\n");
        assert!(matches!(result, Err(ConfigError::EmptyPrefix("ping-prefix"))));
    }

    #[test]
    fn test_bad_yaml() {
        let result = Config::from_yaml_str("token: [unclosed");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/pingpong/config.yaml");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
