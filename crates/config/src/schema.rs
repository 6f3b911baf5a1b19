//! Config schema: one struct per section, all fields defaulted so a partial
//! (or empty) file deserializes cleanly.

use std::collections::HashMap;

use {secrecy::Secret, serde::Deserialize};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct YumiConfig {
    pub discord: DiscordConfig,
    pub chat: ChatConfig,
    pub providers: ProvidersConfig,
    pub weather: WeatherConfig,
}

/// Discord transport settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. Falls back to `DISCORD_BOT_TOKEN` / `BOT_TOKEN` env vars.
    pub token: Option<Secret<String>>,
    /// Outbound message size limit in characters.
    pub max_message_len: usize,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            max_message_len: 2000,
        }
    }
}

/// Conversation engine tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model used for answer generation.
    pub model: String,
    /// Model used for history summarization.
    pub summary_model: String,
    /// Estimated-token ceiling above which a session history is summarized.
    pub token_budget: usize,
    /// Turn count below which the token budget is never even computed.
    pub summarize_watermark: usize,
    /// Upper bound on concurrently retained sessions.
    pub max_sessions: usize,
    /// Sessions idle longer than this are eligible for eviction.
    pub session_max_idle_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            summary_model: "gemini-2.0-flash".into(),
            token_budget: 500,
            summarize_watermark: 6,
            max_sessions: 1024,
            session_max_idle_secs: 3600,
        }
    }
}

/// Per-provider settings, keyed by provider name (`openai`, `gemini`,
/// `mistral`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    #[serde(flatten)]
    pub providers: HashMap<String, ProviderEntry>,
}

impl ProvidersConfig {
    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.get(name)
    }

    /// Providers are enabled unless explicitly turned off.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_none_or(|e| e.enabled)
    }
}

/// One provider's configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderEntry {
    pub api_key: Option<Secret<String>>,
    pub base_url: Option<String>,
    /// Register only this model instead of the provider's default list.
    pub model: Option<String>,
    pub enabled: bool,
}

impl Default for ProviderEntry {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            enabled: true,
        }
    }
}

/// OpenWeatherMap lookup settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// API key. Falls back to the `WEATHER_API_KEY` env var.
    pub api_key: Option<Secret<String>>,
    /// Default units when the user doesn't ask for specific ones.
    pub units: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            units: "imperial".into(),
        }
    }
}
