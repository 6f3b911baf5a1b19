//! The conversation dispatcher.
//!
//! `respond` drives one full request/response cycle for a session: resolve
//! and lock the session, compact the history when it is over budget, call
//! the completion provider, and append the finished exchange. The session
//! mutex is held across the whole cycle, so concurrent messages for the same
//! session serialize and a failed call can never leave a half-appended turn.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use {
    crate::{
        error::{Error, Result},
        prompt::PERSONA_PROMPT,
    },
    yumi_providers::{ChatMessage, LlmProvider, classify_error},
    yumi_sessions::{History, Role, SessionStore, Summarizer, TokenBudget, Turn},
};

/// Tuning knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Estimated-token ceiling before a history is summarized.
    pub token_budget: usize,
    /// Turn count that must be exceeded before the budget is checked.
    pub summarize_watermark: usize,
    /// Retries after a transient completion failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_base_delay: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            token_budget: yumi_sessions::budget::DEFAULT_TOKEN_BUDGET,
            summarize_watermark: yumi_sessions::budget::DEFAULT_SUMMARIZE_WATERMARK,
            max_retries: 2,
            retry_base_delay: Duration::from_millis(250),
        }
    }
}

/// Session-aware conversation engine.
pub struct ChatEngine {
    provider: Arc<dyn LlmProvider>,
    summarizer: Summarizer,
    store: Arc<SessionStore>,
    budget: TokenBudget,
    settings: EngineSettings,
}

impl ChatEngine {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        summary_provider: Arc<dyn LlmProvider>,
        store: Arc<SessionStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            provider,
            summarizer: Summarizer::new(summary_provider),
            store,
            budget: TokenBudget::new(settings.token_budget),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Answer `query` within the session identified by `session_key`.
    ///
    /// The history is compacted (when over budget) before the new exchange
    /// is built, so a compacted cycle ends with summary + user + assistant.
    /// On any completion failure the session is left exactly as it was.
    pub async fn respond(&self, session_key: &str, query: &str) -> Result<String> {
        let session = self.store.get_or_create(session_key);
        let mut session = session.lock().await;
        session.touch();

        self.compact_if_over_budget(session_key, &mut session.history)
            .await;

        let mut messages = Vec::with_capacity(session.history.len() + 2);
        messages.push(ChatMessage::system(PERSONA_PROMPT));
        messages.extend(session.history.turns().into_iter().map(turn_to_message));
        messages.push(ChatMessage::user(query));

        let text = self.complete_with_retry(&messages).await?;

        session.history.push(Turn::user(query));
        session.history.push(Turn::assistant(text.clone()));

        info!(
            session_key,
            model = %self.provider.id(),
            turns = session.history.len(),
            "conversation turn complete"
        );
        Ok(text)
    }

    /// Collapse the history into a summary turn when it has outgrown the
    /// token budget. A failed summarization is logged and skipped; the next
    /// respond cycle will try again.
    async fn compact_if_over_budget(&self, session_key: &str, history: &mut History) {
        if history.len() <= self.settings.summarize_watermark {
            return;
        }
        if !self.budget.exceeds(history.turns()) {
            return;
        }

        match self.summarizer.summarize(&history.turns()).await {
            Ok(summary) => {
                info!(session_key, "history over budget, collapsed to summary");
                history.collapse(summary);
            },
            Err(e) => {
                warn!(session_key, error = %e, "summarization failed, keeping raw history");
            },
        }
    }

    /// One completion call, retried with doubling backoff for transient
    /// failures (rate limits, 5xx, connection errors). Everything else
    /// propagates immediately.
    pub(crate) async fn complete_with_retry(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut delay = self.settings.retry_base_delay;
        let mut attempt = 0;

        loop {
            match self.provider.complete(messages).await {
                Ok(response) => return Ok(response.text),
                Err(e) => {
                    let kind = classify_error(&e);
                    if attempt >= self.settings.max_retries || !kind.is_transient() {
                        return Err(Error::Completion(e));
                    }
                    attempt += 1;
                    warn!(
                        attempt,
                        kind = ?kind,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient completion failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                },
            }
        }
    }
}

fn turn_to_message(turn: &Turn) -> ChatMessage {
    match turn.role {
        Role::System => ChatMessage::system(&turn.content),
        Role::User => ChatMessage::user(&turn.content),
        Role::Assistant => ChatMessage::assistant(&turn.content),
    }
}
