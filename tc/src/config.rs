//! Chat client configuration

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ChatError;

/// Default chat-completions endpoint
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "glm-4-flash";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default max output length in tokens
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default environment variable holding the API credential
pub const DEFAULT_API_KEY_ENV: &str = "ZHIPU_API_KEY";

/// Chat client configuration
///
/// Deployment-time constants, not per-call parameters. The credential itself
/// is not stored here; it is resolved from the environment at call time so a
/// missing key surfaces as a recoverable error, not a startup crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Chat-completions endpoint URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: 120_000,
        }
    }
}

impl ChatConfig {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config from {}", config_path.display()))?;
            let config: ChatConfig = serde_yaml::from_str(&content).context("Failed to parse config file")?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("tutorchat").join("config.yml")),
            Some(PathBuf::from("tutorchat.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: ChatConfig = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(ChatConfig::default())
    }

    /// Resolve the API credential from the environment
    ///
    /// Called per request rather than at construction so configuration errors
    /// fail fast at call time without any network I/O.
    pub fn api_key(&self) -> Result<String, ChatError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ChatError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "glm-4-flash");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_missing_key_fails_without_io() {
        let config = ChatConfig {
            api_key_env: "TUTORCHAT_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let err = config.api_key().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model: glm-4-plus\nmax-tokens: 2048").unwrap();

        let config = ChatConfig::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.model, "glm-4-plus");
        assert_eq!(config.max_tokens, 2048);
        // Unspecified fields keep defaults
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
