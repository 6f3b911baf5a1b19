//! The weather report chain: structured location extraction, one API
//! lookup, then a generative friendly report.

use std::sync::Arc;

use tracing::{debug, warn};

use {
    crate::{
        error::Result,
        prompt::{WEATHER_EXTRACT_PROMPT, weather_report_prompt},
    },
    yumi_providers::{ChatMessage, LlmProvider},
    yumi_weather::{WeatherClient, WeatherLookup},
};

/// Answers weather queries. Stateless: weather reports don't participate in
/// session memory.
pub struct WeatherChain {
    provider: Arc<dyn LlmProvider>,
    client: WeatherClient,
}

impl WeatherChain {
    pub fn new(provider: Arc<dyn LlmProvider>, client: WeatherClient) -> Self {
        Self { provider, client }
    }

    /// Produce a friendly report for a query like "what's it like in Lyon?".
    pub async fn report(&self, query: &str) -> Result<String> {
        let lookup = self.extract_lookup(query).await;
        debug!(city = %lookup.city, units = %lookup.units, "weather chain lookup");

        let conditions = self.client.current(&lookup.city, lookup.units).await?;
        let api_response = serde_json::to_string(&conditions).unwrap_or_default();

        let messages = [ChatMessage::user(weather_report_prompt(&api_response))];
        let response = self
            .provider
            .complete(&messages)
            .await
            .map_err(crate::error::Error::Completion)?;
        Ok(response.text)
    }

    /// Ask the model which city and units the query is about. Any failure
    /// (call or parse) falls back to treating the raw query as the city.
    async fn extract_lookup(&self, query: &str) -> WeatherLookup {
        let messages = [
            ChatMessage::system(WEATHER_EXTRACT_PROMPT),
            ChatMessage::user(query),
        ];

        let fallback = || WeatherLookup {
            city: query.trim().to_string(),
            units: Default::default(),
        };

        match self.provider.complete(&messages).await {
            Ok(response) => parse_lookup(&response.text).unwrap_or_else(|| {
                warn!(reply = %response.text, "unparseable weather extraction, using raw query");
                fallback()
            }),
            Err(e) => {
                warn!(error = %e, "weather extraction call failed, using raw query");
                fallback()
            },
        }
    }
}

/// Pull a `WeatherLookup` out of an LLM reply, tolerating code fences and
/// surrounding prose.
fn parse_lookup(text: &str) -> Option<WeatherLookup> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let lookup: WeatherLookup = serde_json::from_str(&text[start..=end]).ok()?;
    if lookup.city.trim().is_empty() {
        return None;
    }
    Some(lookup)
}

#[cfg(test)]
mod tests {
    use {
        async_trait::async_trait,
        std::sync::Mutex,
        yumi_providers::{CompletionResponse, Usage},
        yumi_weather::Units,
    };

    use super::*;

    struct ScriptedProvider {
        replies: Mutex<Vec<anyhow::Result<String>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn id(&self) -> &str {
            "scripted-model"
        }

        async fn complete(&self, _messages: &[ChatMessage]) -> anyhow::Result<CompletionResponse> {
            let mut replies = self.replies.lock().unwrap();
            assert!(!replies.is_empty(), "provider called more times than scripted");
            replies.remove(0).map(|text| CompletionResponse {
                text,
                usage: Usage::default(),
            })
        }
    }

    #[test]
    fn parse_lookup_plain_json() {
        let lookup = parse_lookup(r#"{"city": "Boston,MA,US", "units": "imperial"}"#).unwrap();
        assert_eq!(lookup.city, "Boston,MA,US");
        assert_eq!(lookup.units, Units::Imperial);
    }

    #[test]
    fn parse_lookup_fenced_json() {
        let text = "```json\n{\"city\": \"Lyon,FR\", \"units\": \"metric\"}\n```";
        let lookup = parse_lookup(text).unwrap();
        assert_eq!(lookup.city, "Lyon,FR");
        assert_eq!(lookup.units, Units::Metric);
    }

    #[test]
    fn parse_lookup_rejects_garbage() {
        assert!(parse_lookup("no json here").is_none());
        assert!(parse_lookup(r#"{"city": "  "}"#).is_none());
        assert!(parse_lookup("} backwards {").is_none());
    }

    #[tokio::test]
    async fn report_runs_extraction_lookup_and_generation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("q".into(), "Boston,MA,US".into()),
                mockito::Matcher::UrlEncoded("units".into(), "imperial".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "weather": [{"main": "Clear", "description": "clear sky"}],
                    "main": {"temp": 68.5, "humidity": 40},
                    "name": "Boston"
                }"#,
            )
            .create_async()
            .await;

        let provider = ScriptedProvider::new(vec![
            Ok(r#"{"city": "Boston,MA,US", "units": "imperial"}"#.to_string()),
            Ok("Clear skies in Boston today!".to_string()),
        ]);
        let client = WeatherClient::with_base_url(
            secrecy::Secret::new("w-key".into()),
            server.url(),
        );

        let chain = WeatherChain::new(provider, client);
        let report = chain.report("weather in boston?").await.unwrap();
        assert_eq!(report, "Clear skies in Boston today!");
    }

    #[tokio::test]
    async fn extraction_failure_falls_back_to_raw_query() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::AllOf(vec![mockito::Matcher::UrlEncoded(
                "q".into(),
                "Reykjavik".into(),
            )]))
            .with_status(200)
            .with_body(
                r#"{
                    "weather": [{"main": "Snow", "description": "light snow"}],
                    "main": {"temp": 28.0, "humidity": 80},
                    "name": "Reykjavik"
                }"#,
            )
            .create_async()
            .await;

        let provider = ScriptedProvider::new(vec![
            Err(anyhow::anyhow!("HTTP 503")),
            Ok("Bundle up, it's snowing!".to_string()),
        ]);
        let client = WeatherClient::with_base_url(
            secrecy::Secret::new("w-key".into()),
            server.url(),
        );

        let chain = WeatherChain::new(provider, client);
        let report = chain.report("Reykjavik").await.unwrap();
        assert_eq!(report, "Bundle up, it's snowing!");
    }

    #[tokio::test]
    async fn lookup_failure_propagates_weather_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body("city not found")
            .create_async()
            .await;

        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"city": "Atlantis", "units": "metric"}"#.to_string()
        )]);
        let client = WeatherClient::with_base_url(
            secrecy::Secret::new("w-key".into()),
            server.url(),
        );

        let chain = WeatherChain::new(provider, client);
        let err = chain.report("Atlantis").await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Weather(_)));
    }
}
