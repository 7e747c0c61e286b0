//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{LlmConfigResponse, LlmConfigUpdate, LlmProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Per-provider settings: an optional API key and the model to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
}

impl ProviderSettings {
    fn with_model(model: &str) -> Self {
        Self {
            api_key: None,
            model: model.into(),
        }
    }
}

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default = "default_openai")]
    pub openai: ProviderSettings,
    #[serde(default = "default_anthropic")]
    pub anthropic: ProviderSettings,
    #[serde(default = "default_groq")]
    pub groq: ProviderSettings,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai() -> ProviderSettings {
    ProviderSettings::with_model(DEFAULT_OPENAI_MODEL)
}
fn default_anthropic() -> ProviderSettings {
    ProviderSettings::with_model(DEFAULT_ANTHROPIC_MODEL)
}
fn default_groq() -> ProviderSettings {
    ProviderSettings::with_model(DEFAULT_GROQ_MODEL)
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai: default_openai(),
            anthropic: default_anthropic(),
            groq: default_groq(),
            config_path: PathBuf::new(),
        }
    }
}

impl LlmConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LlmConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        // Env vars as fallback for API keys
        if config.openai.api_key.is_none() {
            config.openai.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.anthropic.api_key.is_none() {
            config.anthropic.api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if config.groq.api_key.is_none() {
            config.groq.api_key = std::env::var("GROQ_API_KEY").ok();
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config.
    pub fn apply_update(&mut self, update: &LlmConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.clone();
        }
        if let Some(k) = &update.openai_api_key {
            self.openai.api_key = Some(k.clone());
        }
        if let Some(k) = &update.anthropic_api_key {
            self.anthropic.api_key = Some(k.clone());
        }
        if let Some(k) = &update.groq_api_key {
            self.groq.api_key = Some(k.clone());
        }
        if let Some(m) = &update.openai_model {
            self.openai.model = m.clone();
        }
        if let Some(m) = &update.anthropic_model {
            self.anthropic.model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq.model = m.clone();
        }
    }

    fn settings(&self, provider: LlmProvider) -> &ProviderSettings {
        match provider {
            LlmProvider::OpenAi => &self.openai,
            LlmProvider::Anthropic => &self.anthropic,
            LlmProvider::Groq => &self.groq,
        }
    }

    /// Resolve which provider, model, and key to use.
    pub fn resolve_provider(&self) -> Option<(LlmProvider, String, String)> {
        let pick = |provider: LlmProvider| {
            let settings = self.settings(provider);
            settings
                .api_key
                .as_ref()
                .map(|k| (provider, settings.model.clone(), k.clone()))
        };

        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => pick(LlmProvider::OpenAi),
                "anthropic" => pick(LlmProvider::Anthropic),
                "groq" => pick(LlmProvider::Groq),
                _ => None,
            };
        }

        // Auto mode: cheapest adequate first
        pick(LlmProvider::Groq)
            .or_else(|| pick(LlmProvider::Anthropic))
            .or_else(|| pick(LlmProvider::OpenAi))
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LlmConfigResponse {
        let resolved = self.resolve_provider();
        LlmConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_configured: self.openai.api_key.is_some(),
            anthropic_configured: self.anthropic.api_key.is_some(),
            groq_configured: self.groq.api_key.is_some(),
            openai_model: self.openai.model.clone(),
            anthropic_model: self.anthropic.model.clone(),
            groq_model: self.groq.model.clone(),
            active_provider: resolved.map(|(p, _, _)| p.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_preference() {
        let mut config = LlmConfig::default();
        config.preferred_provider = "anthropic".into();
        config.anthropic.api_key = Some("key-a".into());
        config.groq.api_key = Some("key-g".into());

        let (provider, model, key) = config.resolve_provider().unwrap();
        assert_eq!(provider, LlmProvider::Anthropic);
        assert_eq!(model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(key, "key-a");
    }

    #[test]
    fn test_auto_prefers_groq() {
        let mut config = LlmConfig::default();
        config.groq.api_key = Some("key-g".into());
        config.openai.api_key = Some("key-o".into());

        let (provider, _, _) = config.resolve_provider().unwrap();
        assert_eq!(provider, LlmProvider::Groq);
    }

    #[test]
    fn test_no_keys_resolves_none() {
        let config = LlmConfig::default();
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_response_masks_keys() {
        let mut config = LlmConfig::default();
        config.openai.api_key = Some("sk-secret".into());
        let response = config.to_response();
        assert!(response.openai_configured);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");

        let mut config = LlmConfig::default();
        config.config_path = path.clone();
        config.preferred_provider = "groq".into();
        config.groq.api_key = Some("key-g".into());
        config.save().unwrap();

        let loaded = LlmConfig::load(&path);
        assert_eq!(loaded.preferred_provider, "groq");
        assert_eq!(loaded.groq.api_key.as_deref(), Some("key-g"));
    }
}
