/// Typed chat message for the provider interface.
///
/// Only LLM-relevant fields exist here, so session metadata can never leak
/// into provider API requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
        }
    }

    /// The message text, regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::User { content } | Self::Assistant { content } => {
                content
            },
        }
    }

    /// Wire role string for OpenAI-compatible APIs.
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
        }
    }

    /// Convert to the OpenAI Chat Completions message format.
    ///
    /// Used by every provider that speaks that API: OpenAI and Mistral.
    #[must_use]
    pub fn to_openai_value(&self) -> serde_json::Value {
        serde_json::json!({ "role": self.role(), "content": self.content() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role_and_content() {
        assert!(matches!(
            ChatMessage::system("be nice"),
            ChatMessage::System { content } if content == "be nice"
        ));
        assert!(matches!(
            ChatMessage::user("hi"),
            ChatMessage::User { content } if content == "hi"
        ));
        assert!(matches!(
            ChatMessage::assistant("hello"),
            ChatMessage::Assistant { content } if content == "hello"
        ));
    }

    #[test]
    fn to_openai_value_shapes() {
        let val = ChatMessage::system("sys").to_openai_value();
        assert_eq!(val["role"], "system");
        assert_eq!(val["content"], "sys");

        let val = ChatMessage::user("question").to_openai_value();
        assert_eq!(val["role"], "user");
        assert_eq!(val["content"], "question");

        let val = ChatMessage::assistant("answer").to_openai_value();
        assert_eq!(val["role"], "assistant");
        assert_eq!(val["content"], "answer");
    }

    #[test]
    fn content_accessor_is_role_agnostic() {
        for msg in [
            ChatMessage::system("x"),
            ChatMessage::user("x"),
            ChatMessage::assistant("x"),
        ] {
            assert_eq!(msg.content(), "x");
        }
    }
}
