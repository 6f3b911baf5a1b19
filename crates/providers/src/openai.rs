use {secrecy::ExposeSecret, tracing::{debug, trace, warn}};

use {
    crate::{CompletionResponse, LlmProvider, Usage, message::ChatMessage},
    async_trait::async_trait,
};

/// Provider for the OpenAI Chat Completions API and everything that speaks
/// it (Mistral's endpoint is wire-compatible and registered through
/// [`OpenAiProvider::new_with_name`]).
pub struct OpenAiProvider {
    api_key: secrecy::Secret<String>,
    model: String,
    base_url: String,
    provider_name: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: secrecy::Secret<String>, model: String, base_url: String) -> Self {
        Self::new_with_name(api_key, model, base_url, "openai".into())
    }

    /// Same wire protocol, different provider label (e.g. "mistral").
    pub fn new_with_name(
        api_key: secrecy::Secret<String>,
        model: String,
        base_url: String,
        provider_name: String,
    ) -> Self {
        Self {
            api_key,
            model,
            base_url,
            provider_name,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<CompletionResponse> {
        let wire_messages: Vec<serde_json::Value> =
            messages.iter().map(ChatMessage::to_openai_value).collect();
        let body = serde_json::json!({
            "model": self.model,
            "messages": wire_messages,
        });

        debug!(
            model = %self.model,
            provider = %self.provider_name,
            messages_count = messages.len(),
            "chat completion request"
        );
        trace!(body = %serde_json::to_string(&body).unwrap_or_default(), "request body");

        let http_resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            warn!(
                status = %status,
                model = %self.model,
                provider = %self.provider_name,
                body = %body_text,
                "completion API error"
            );
            anyhow::bail!(
                "{} API error HTTP {status}: {body_text}",
                self.provider_name
            );
        }

        let resp = http_resp.json::<serde_json::Value>().await?;
        trace!(response = %resp, "raw response");

        let text = resp["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|t| !t.is_empty());
        let Some(text) = text else {
            anyhow::bail!("{} returned an empty completion", self.provider_name);
        };

        let usage = Usage {
            input_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok(CompletionResponse { text, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> secrecy::Secret<String> {
        secrecy::Secret::new(s.into())
    }

    #[test]
    fn default_provider_name_is_openai() {
        let p = OpenAiProvider::new(secret("k"), "gpt-4o".into(), "https://example.com".into());
        assert_eq!(p.name(), "openai");
        assert_eq!(p.id(), "gpt-4o");
    }

    #[test]
    fn named_provider_reports_alias() {
        let p = OpenAiProvider::new_with_name(
            secret("k"),
            "mistral-large-latest".into(),
            "https://api.mistral.ai/v1".into(),
            "mistral".into(),
        );
        assert_eq!(p.name(), "mistral");
        assert_eq!(p.id(), "mistral-large-latest");
    }

    #[tokio::test]
    async fn complete_parses_choice_and_usage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                r#"{
                    "choices": [{"message": {"role": "assistant", "content": "hello there"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 4}
                }"#,
            )
            .create_async()
            .await;

        let provider = OpenAiProvider::new(secret("test-key"), "gpt-4o".into(), server.url());
        let resp = provider
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap();

        assert_eq!(resp.text, "hello there");
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn complete_surfaces_http_error_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let provider = OpenAiProvider::new(secret("test-key"), "gpt-4o".into(), server.url());
        let err = provider
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("429"), "unexpected error: {msg}");
        assert!(msg.contains("rate limited"), "unexpected error: {msg}");
    }

    #[tokio::test]
    async fn complete_rejects_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": ""}}]}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(secret("test-key"), "gpt-4o".into(), server.url());
        let err = provider
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty completion"));
    }
}
