use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Model used when neither the config file nor `--model` names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Character budget for the document context sent with each question.
pub const MAX_CONTEXT_LENGTH: usize = 100_000;

/// Environment variables consulted, in order, when the config file has no key.
pub const API_KEY_ENV_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_context_length() -> usize {
    MAX_CONTEXT_LENGTH
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_context_length: default_max_context_length(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("medibot");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults when the file
    /// does not exist. The API key is resolved afterwards.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file at {}", config_path.display())
            })?;
            toml::from_str::<Config>(&content).with_context(|| {
                format!("Failed to parse config file at {}", config_path.display())
            })?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Config::default()
        };

        config.gemini.api_key =
            resolve_api_key(&config.gemini.api_key, |name| std::env::var(name).ok());

        Ok(config)
    }

    /// The resolved credential, if any.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.gemini.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

/// Pick the credential: an explicit (possibly `${VAR}`-style) config value
/// wins, otherwise the first non-empty variable of [`API_KEY_ENV_VARS`].
fn resolve_api_key(configured: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let expanded = expand_env_var(configured, &lookup);
    if !expanded.trim().is_empty() {
        return expanded;
    }

    API_KEY_ENV_VARS
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        lookup(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        lookup(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_expand_env_var_braces() {
        let lookup = env(&[("TEST_VAR_A", "value_a")]);
        assert_eq!(expand_env_var("${TEST_VAR_A}", &lookup), "value_a");
    }

    #[test]
    fn test_expand_env_var_dollar() {
        let lookup = env(&[("TEST_VAR_B", "value_b")]);
        assert_eq!(expand_env_var("$TEST_VAR_B", &lookup), "value_b");
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("literal_value", env(&[])), "literal_value");
    }

    #[test]
    fn test_expand_env_var_missing_returns_empty() {
        assert_eq!(expand_env_var("${NOT_SET_XYZ_123}", env(&[])), "");
    }

    #[test]
    fn test_resolve_prefers_configured_key() {
        let lookup = env(&[("API_KEY", "from-env")]);
        assert_eq!(resolve_api_key("from-config", lookup), "from-config");
    }

    #[test]
    fn test_resolve_falls_back_in_order() {
        let lookup = env(&[("GEMINI_API_KEY", "gemini"), ("GOOGLE_API_KEY", "google")]);
        assert_eq!(resolve_api_key("", &lookup), "gemini");

        let lookup = env(&[("API_KEY", "  "), ("GOOGLE_API_KEY", "google")]);
        assert_eq!(resolve_api_key("", &lookup), "google");
    }

    #[test]
    fn test_resolve_unset_placeholder_uses_fallback() {
        let lookup = env(&[("API_KEY", "plain")]);
        assert_eq!(resolve_api_key("${MEDIBOT_UNSET}", lookup), "plain");
    }

    #[test]
    fn test_resolve_nothing_configured() {
        assert_eq!(resolve_api_key("", env(&[])), "");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            model = "gemini-2.0-flash"
            max_context_length = 5000

            [gemini]
            api_key = "abc"
            base_url = "http://localhost:8080"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_context_length, 5000);
        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.gemini.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_config_default_values() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_context_length, MAX_CONTEXT_LENGTH);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_blank_key_is_absent() {
        let mut config = Config::default();
        config.gemini.api_key = "   ".into();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let mut config = Config::default();
        config.gemini.api_key = "${GEMINI_API_KEY}".into();

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.gemini.api_key, "${GEMINI_API_KEY}");
        assert_eq!(deserialized.max_context_length, MAX_CONTEXT_LENGTH);
    }
}
