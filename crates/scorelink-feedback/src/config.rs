//! Tool configuration and provider factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scorelink_core::traits::FeedbackProvider;

use crate::gemini::GeminiProvider;

/// Configuration for the feedback provider.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for FeedbackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Top-level scorelink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScorelinkConfig {
    /// Base URL that share fragments are appended to.
    #[serde(default)]
    pub share_base_url: Option<String>,
    /// Feedback provider, if one is configured.
    #[serde(default)]
    pub feedback: Option<FeedbackConfig>,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `scorelink.toml` in the current directory
/// 2. `~/.config/scorelink/config.toml`
///
/// Environment variable override: `SCORELINK_GEMINI_KEY`.
pub fn load_config() -> Result<ScorelinkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ScorelinkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("scorelink.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ScorelinkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ScorelinkConfig::default(),
    };

    // Apply the env var override, then resolve ${VAR} references
    if let Ok(key) = std::env::var("SCORELINK_GEMINI_KEY") {
        match config.feedback.as_mut() {
            Some(feedback) => feedback.api_key = key,
            None => {
                config.feedback = Some(FeedbackConfig {
                    api_key: key,
                    model: None,
                    base_url: None,
                });
            }
        }
    }
    if let Some(feedback) = config.feedback.as_mut() {
        feedback.api_key = resolve_env_vars(&feedback.api_key);
        feedback.base_url = feedback.base_url.as_ref().map(|u| resolve_env_vars(u));
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scorelink"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &FeedbackConfig) -> Result<Box<dyn FeedbackProvider>> {
    Ok(Box::new(GeminiProvider::new(
        &config.api_key,
        config.model.clone(),
        config.base_url.clone(),
    )))
}
