use crate::global;
use crate::llm::GenerationConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub const PORT_ENV: &str = "SENTISCOPE_PORT";

const DEFAULT_SECRET_KEY: &str = "sentiment-analysis-secret-key";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Key used to sign session cookies
    pub secret_key: String,
    pub session_lifetime_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_endpoint: Option<String>,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Replaces the built-in sentiment instructions when set
    pub system: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            session_lifetime_hours: 2,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            api_key: None,
            model: Some("gemini-1.5-flash".to_string()),
            api_endpoint: None,
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
        }
    }
}

impl GeminiConfig {
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!(
                    "No Gemini API key found. Set {} or gemini.api_key in the config file.",
                    API_KEY_ENV
                )
            })
    }
}

impl Config {
    /// Load the config file, creating it with defaults when missing, then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            config
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }

    /// Environment values win over the file. Takes a lookup so tests do not
    /// touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(secret) = lookup(SECRET_KEY_ENV).filter(|v| !v.is_empty()) {
            self.server.secret_key = secret;
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {} value: {}", PORT_ENV, port),
            }
        }
    }

    /// Copy with the API key hidden, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.gemini.api_key.is_some() {
            config.gemini.api_key = Some("********".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n\n[gemini]\ntemperature = 0.2\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.session_lifetime_hours, 2);
        assert_eq!(config.gemini.temperature, 0.2);
        assert_eq!(config.gemini.top_k, 40);
        assert!(config.prompt.system.is_none());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.prompt.system = Some("Only answer in French.".to_string());

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.prompt.system.as_deref(), Some("Only answer in French."));
        assert_eq!(loaded.gemini.model.as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, "abc123"),
            (SECRET_KEY_ENV, "s3cret"),
            (PORT_ENV, "not-a-port"),
        ]);
        let mut config = Config::default();

        config.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.gemini.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.server.secret_key, "s3cret");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let mut gemini = GeminiConfig::default();
        assert!(gemini.require_api_key().is_err());

        gemini.api_key = Some("  ".to_string());
        assert!(gemini.require_api_key().is_err());

        gemini.api_key = Some("key".to_string());
        assert_eq!(gemini.require_api_key().unwrap(), "key");
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = Config::default();
        config.gemini.api_key = Some("real-key".to_string());

        assert_eq!(config.redacted().gemini.api_key.as_deref(), Some("********"));
    }
}
