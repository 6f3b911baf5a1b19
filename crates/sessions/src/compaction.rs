//! Destructive history compaction: collapse an over-budget turn sequence
//! into one synthetic summary turn via a delegated summarization call.

use std::sync::Arc;

use tracing::info;

use {
    crate::{
        error::{Error, Result},
        history::Turn,
    },
    yumi_providers::{ChatMessage, LlmProvider},
};

const SUMMARY_INSTRUCTION: &str = "\
Condense the following conversation into a single short paragraph. \
Preserve the user's intents, stated preferences, and any decisions or \
conclusions; drop greetings and filler. Write in the third person and \
output only the summary itself.";

/// Summarizes a session history through an LLM provider.
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Produce the single turn that replaces the entire given history.
    ///
    /// The call is remote and may fail; on failure the caller keeps the
    /// history it already has.
    pub async fn summarize(&self, turns: &[&Turn]) -> Result<Turn> {
        let transcript = format_transcript(turns);
        let messages = [
            ChatMessage::system(SUMMARY_INSTRUCTION),
            ChatMessage::user(transcript),
        ];

        let response = self
            .provider
            .complete(&messages)
            .await
            .map_err(Error::Summarize)?;

        let text = response.text.trim();
        if text.is_empty() {
            return Err(Error::EmptySummary);
        }

        info!(
            model = %self.provider.id(),
            turns = turns.len(),
            "history summarization complete"
        );
        Ok(Turn::system(text))
    }
}

/// Render turns as a role-labelled transcript for the summarization prompt.
fn format_transcript(turns: &[&Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str(), t.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
