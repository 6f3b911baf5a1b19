use {secrecy::ExposeSecret, tracing::{debug, trace, warn}};

use {
    crate::{CompletionResponse, LlmProvider, Usage, message::ChatMessage},
    async_trait::async_trait,
};

/// Provider for Google's Gemini `generateContent` API.
pub struct GeminiProvider {
    api_key: secrecy::Secret<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: secrecy::Secret<String>, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

/// Split off the system instruction; Gemini takes it outside `contents`.
fn extract_system_instruction(messages: &[ChatMessage]) -> (Option<String>, Vec<&ChatMessage>) {
    let mut system_text = None;
    let mut remaining = Vec::new();

    for msg in messages {
        if let ChatMessage::System { content } = msg {
            system_text = Some(content.clone());
        } else {
            remaining.push(msg);
        }
    }

    (system_text, remaining)
}

/// Convert messages to Gemini's content format: role "user" / "model" with a
/// `parts` array of text blocks.
fn to_gemini_contents(messages: &[&ChatMessage]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg {
                ChatMessage::Assistant { .. } => "model",
                _ => "user",
            };
            serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content() }],
            })
        })
        .collect()
}

/// Join the text parts of the first candidate.
fn extract_text(parts: &[serde_json::Value]) -> Option<String> {
    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join(""))
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<CompletionResponse> {
        let (system_text, conv_messages) = extract_system_instruction(messages);
        let contents = to_gemini_contents(&conv_messages);

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": 8192,
            },
        });

        if let Some(ref sys) = system_text {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": sys }]
            });
        }

        debug!(
            model = %self.model,
            messages_count = contents.len(),
            has_system = system_text.is_some(),
            "gemini complete request"
        );
        trace!(body = %serde_json::to_string(&body).unwrap_or_default(), "gemini request body");

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let http_resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body_text, "gemini API error");
            anyhow::bail!("Gemini API error HTTP {status}: {body_text}");
        }

        let resp = http_resp.json::<serde_json::Value>().await?;
        trace!(response = %resp, "gemini raw response");

        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let Some(text) = extract_text(&parts) else {
            anyhow::bail!("Gemini returned no text parts");
        };

        let usage = Usage {
            input_tokens: resp["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0) as u32,
            output_tokens: resp["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0) as u32,
        };

        Ok(CompletionResponse { text, usage })
    }
}
