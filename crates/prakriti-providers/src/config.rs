//! Configuration loading and backend factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use prakriti_core::assessor::{AssessorConfig, DEFAULT_MODEL};
use prakriti_core::model::Language;
use prakriti_core::retry::RetryPolicy;
use prakriti_core::traits::GenerationBackend;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;

/// Configuration for a single generation backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Mock {
        /// Fixed reply text; canned replies when unset.
        #[serde(default)]
        response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { response } => {
                f.debug_struct("Mock").field("response", response).finish()
            }
        }
    }
}

/// Retry budget as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub max_jitter_ms: u64,
    /// Ceiling on the doubling delay; unbounded when absent.
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

fn default_jitter_ms() -> u64 {
    RetryPolicy::DEFAULT_JITTER.as_millis() as u64
}

impl RetrySettings {
    fn from_policy(policy: RetryPolicy) -> Self {
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_jitter_ms: policy.max_jitter.as_millis() as u64,
            max_delay_ms: policy.max_delay.map(|d| d.as_millis() as u64),
        }
    }

    pub fn synthesis() -> Self {
        Self::from_policy(RetryPolicy::synthesis())
    }

    pub fn validation() -> Self {
        Self::from_policy(RetryPolicy::validation())
    }

    pub fn to_policy(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
            max_delay: self.max_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Top-level prakriti configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrakritiConfig {
    /// Backend configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Backend to use when none is named.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used for every call.
    #[serde(default = "default_model")]
    pub model: String,
    /// Language used when `--language` is not given.
    #[serde(default)]
    pub default_language: Language,
    /// Directory for cached translations.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Sampling temperature; backend default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Budget for synthesis and translation calls.
    #[serde(default = "RetrySettings::synthesis")]
    pub retry: RetrySettings,
    /// Budget for the photo check.
    #[serde(default = "RetrySettings::validation")]
    pub validation_retry: RetrySettings,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for PrakritiConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            model: default_model(),
            default_language: Language::default(),
            cache_dir: None,
            temperature: None,
            retry: RetrySettings::synthesis(),
            validation_retry: RetrySettings::validation(),
        }
    }
}

impl PrakritiConfig {
    /// Settings for the assessor built from this config.
    pub fn assessor_config(&self) -> AssessorConfig {
        AssessorConfig {
            model: self.model.clone(),
            retry: self.retry.to_policy(),
            validation_retry: self.validation_retry.to_policy(),
            temperature: self.temperature,
        }
    }

    /// Configured cache directory, else `~/.cache/prakriti`.
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".cache").join("prakriti"))
        })
    }

    /// Look up a backend by name, or the default one.
    pub fn provider(&self, name: Option<&str>) -> Result<(&str, &ProviderConfig)> {
        let name = name.unwrap_or(self.default_provider.as_str());
        self.providers
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .with_context(|| {
                format!("provider '{name}' is not configured. Run `prakriti init` or set PRAKRITI_GEMINI_KEY")
            })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `prakriti.toml` in the current directory
/// 2. `~/.config/prakriti/config.toml`
///
/// Environment variable overrides: `PRAKRITI_GEMINI_KEY`, then `API_KEY`.
pub fn load_config() -> Result<PrakritiConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PrakritiConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("prakriti.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PrakritiConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PrakritiConfig::default(),
    };

    // Apply env var overrides
    let key = std::env::var("PRAKRITI_GEMINI_KEY").or_else(|_| std::env::var("API_KEY"));
    if let Ok(key) = key {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("prakriti"))
}

/// Create a backend instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Arc<dyn GenerationBackend>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            if api_key.trim().is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key; set PRAKRITI_GEMINI_KEY or api_key in prakriti.toml"
                );
            }
            Ok(Arc::new(GeminiProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::Mock { response } => {
            let mock = match response {
                Some(text) => MockProvider::with_fixed_response(text),
                None => MockProvider::canned(),
            };
            Ok(Arc::new(mock))
        }
    }
}
