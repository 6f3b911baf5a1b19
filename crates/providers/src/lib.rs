//! LLM provider capability: a typed message model, a completion trait, and
//! concrete backends for OpenAI-compatible APIs (OpenAI, Mistral) and Gemini.
//!
//! The rest of the workspace only ever sees `Arc<dyn LlmProvider>`; which
//! hosted model actually answers is decided once, at registry construction.

pub mod classify;
pub mod gemini;
pub mod message;
pub mod openai;
pub mod registry;

use async_trait::async_trait;

pub use {
    classify::{CompletionErrorKind, classify_error},
    gemini::GeminiProvider,
    message::ChatMessage,
    openai::OpenAiProvider,
    registry::{ModelInfo, ProviderRegistry},
};

/// A hosted text-completion backend.
///
/// One awaited request, one text result. Streaming is deliberately absent:
/// responses are relayed whole (then chunked for the transport).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "openai", "gemini", "mistral").
    fn name(&self) -> &str;

    /// Model identifier (e.g. "gpt-4o", "gemini-2.0-flash").
    fn id(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<CompletionResponse>;
}

/// Response from a completion call.
#[derive(Debug)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: Usage,
}

/// Token usage reported by the provider (zero when not reported).
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
