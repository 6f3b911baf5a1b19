//! Provider discovery: build the set of usable models from config + env.

use std::{collections::HashMap, sync::Arc};

use {secrecy::ExposeSecret, yumi_config::ProvidersConfig};

use crate::{GeminiProvider, LlmProvider, OpenAiProvider};

/// Info about an available model.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub display_name: String,
}

/// Known OpenAI models (model_id, display_name).
const OPENAI_MODELS: &[(&str, &str)] = &[
    ("gpt-4o", "GPT-4o"),
    ("gpt-4o-mini", "GPT-4o Mini"),
];

/// Known Gemini models.
const GEMINI_MODELS: &[(&str, &str)] = &[
    ("gemini-2.0-flash", "Gemini 2.0 Flash"),
    ("gemini-1.5-pro", "Gemini 1.5 Pro"),
];

/// Known Mistral models.
const MISTRAL_MODELS: &[(&str, &str)] = &[
    ("mistral-large-latest", "Mistral Large"),
    ("mistral-small-latest", "Mistral Small"),
];

/// Resolve an API key from config (Secret) or environment variables,
/// keeping the value wrapped in `Secret<String>` to avoid leaking it.
fn resolve_api_key(
    config: &ProvidersConfig,
    provider: &str,
    env_keys: &[&str],
) -> Option<secrecy::Secret<String>> {
    config
        .get(provider)
        .and_then(|e| e.api_key.clone())
        .or_else(|| {
            env_keys
                .iter()
                .find_map(|k| std::env::var(k).ok().filter(|v| !v.is_empty()))
                .map(secrecy::Secret::new)
        })
        .filter(|s| !s.expose_secret().is_empty())
}

fn resolve_base_url(config: &ProvidersConfig, provider: &str, env_key: &str, default: &str) -> String {
    config
        .get(provider)
        .and_then(|e| e.base_url.clone())
        .or_else(|| std::env::var(env_key).ok())
        .unwrap_or_else(|| default.into())
}

/// Registry of available LLM providers, keyed by model ID.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    models: Vec<ModelInfo>,
}

impl ProviderRegistry {
    /// Register a provider manually.
    pub fn register(&mut self, info: ModelInfo, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(info.id.clone(), provider);
        self.models.push(info);
    }

    /// Auto-discover providers from config and environment variables.
    ///
    /// A provider is registered when it is enabled and an API key is
    /// resolvable. If the config names a specific model, only that model
    /// is registered; otherwise the provider's known model list is.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let mut reg = Self {
            providers: HashMap::new(),
            models: Vec::new(),
        };

        reg.register_openai(config);
        reg.register_gemini(config);
        reg.register_mistral(config);

        reg
    }

    fn register_openai(&mut self, config: &ProvidersConfig) {
        if !config.is_enabled("openai") {
            return;
        }
        let Some(key) = resolve_api_key(config, "openai", &["OPENAI_API_KEY"]) else {
            return;
        };
        let base_url = resolve_base_url(
            config,
            "openai",
            "OPENAI_BASE_URL",
            "https://api.openai.com/v1",
        );

        for (model_id, display_name) in
            selected_models(config, "openai", OPENAI_MODELS)
        {
            if self.providers.contains_key(&model_id) {
                continue;
            }
            let provider = Arc::new(OpenAiProvider::new(
                key.clone(),
                model_id.clone(),
                base_url.clone(),
            ));
            self.register(
                ModelInfo {
                    id: model_id,
                    provider: "openai".into(),
                    display_name,
                },
                provider,
            );
        }
    }

    fn register_gemini(&mut self, config: &ProvidersConfig) {
        if !config.is_enabled("gemini") {
            return;
        }
        // GOOGLE_API_KEY is the legacy env name, still honored.
        let Some(key) = resolve_api_key(config, "gemini", &["GEMINI_API_KEY", "GOOGLE_API_KEY"])
        else {
            return;
        };
        let base_url = resolve_base_url(
            config,
            "gemini",
            "GEMINI_BASE_URL",
            "https://generativelanguage.googleapis.com",
        );

        for (model_id, display_name) in
            selected_models(config, "gemini", GEMINI_MODELS)
        {
            if self.providers.contains_key(&model_id) {
                continue;
            }
            let provider = Arc::new(GeminiProvider::new(
                key.clone(),
                model_id.clone(),
                base_url.clone(),
            ));
            self.register(
                ModelInfo {
                    id: model_id,
                    provider: "gemini".into(),
                    display_name,
                },
                provider,
            );
        }
    }

    fn register_mistral(&mut self, config: &ProvidersConfig) {
        if !config.is_enabled("mistral") {
            return;
        }
        let Some(key) = resolve_api_key(config, "mistral", &["MISTRAL_API_KEY"]) else {
            return;
        };
        let base_url = resolve_base_url(
            config,
            "mistral",
            "MISTRAL_BASE_URL",
            "https://api.mistral.ai/v1",
        );

        for (model_id, display_name) in
            selected_models(config, "mistral", MISTRAL_MODELS)
        {
            if self.providers.contains_key(&model_id) {
                continue;
            }
            let provider = Arc::new(OpenAiProvider::new_with_name(
                key.clone(),
                model_id.clone(),
                base_url.clone(),
                "mistral".into(),
            ));
            self.register(
                ModelInfo {
                    id: model_id,
                    provider: "mistral".into(),
                    display_name,
                },
                provider,
            );
        }
    }

    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(model_id).cloned()
    }

    pub fn first(&self) -> Option<Arc<dyn LlmProvider>> {
        self.models
            .first()
            .and_then(|m| self.providers.get(&m.id))
            .cloned()
    }

    pub fn list_models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_summary(&self) -> String {
        if self.providers.is_empty() {
            return "no LLM providers configured".into();
        }
        let provider_count = self
            .models
            .iter()
            .map(|m| m.provider.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();
        let model_count = self.models.len();
        format!(
            "{} provider{}, {} model{}",
            provider_count,
            if provider_count == 1 { "" } else { "s" },
            model_count,
            if model_count == 1 { "" } else { "s" },
        )
    }
}

/// Either the single configured model, or the provider's known list.
fn selected_models(
    config: &ProvidersConfig,
    provider: &str,
    known: &[(&str, &str)],
) -> Vec<(String, String)> {
    if let Some(model_id) = config.get(provider).and_then(|e| e.model.as_deref()) {
        let display = known
            .iter()
            .find(|(id, _)| *id == model_id)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| model_id.to_string());
        return vec![(model_id.to_string(), display)];
    }
    known
        .iter()
        .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
        .collect()
}
