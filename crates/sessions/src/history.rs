//! Turn and history model.
//!
//! A history is either the raw turn sequence or a summarized one: the
//! destructive collapse required when a conversation outgrows its token
//! budget is an explicit state transition, not an in-place mutation that
//! callers have to infer. Turns appended after a collapse accumulate behind
//! the summary turn.

use serde::{Deserialize, Serialize};

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message exchanged in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A session's ordered turn sequence.
#[derive(Debug, Clone)]
pub enum History {
    /// The full turn sequence as exchanged.
    Raw(Vec<Turn>),
    /// A collapsed history: one synthetic summary turn, plus whatever has
    /// been exchanged since the collapse.
    Summarized { summary: Turn, tail: Vec<Turn> },
}

impl Default for History {
    fn default() -> Self {
        Self::Raw(Vec::new())
    }
}

impl History {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(turns) => turns.len(),
            Self::Summarized { tail, .. } => 1 + tail.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_summarized(&self) -> bool {
        matches!(self, Self::Summarized { .. })
    }

    /// Append a turn. Order is append-only and never rearranged.
    pub fn push(&mut self, turn: Turn) {
        match self {
            Self::Raw(turns) => turns.push(turn),
            Self::Summarized { tail, .. } => tail.push(turn),
        }
    }

    /// All turns in chronological order (the summary turn first when
    /// collapsed).
    pub fn turns(&self) -> Vec<&Turn> {
        match self {
            Self::Raw(turns) => turns.iter().collect(),
            Self::Summarized { summary, tail } => {
                std::iter::once(summary).chain(tail.iter()).collect()
            },
        }
    }

    /// Destructively replace the entire history with a single summary turn.
    pub fn collapse(&mut self, summary: Turn) {
        *self = Self::Summarized {
            summary,
            tail: Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut history = History::default();
        for i in 0..5 {
            history.push(Turn::user(format!("turn {i}")));
        }

        let turns = history.turns();
        assert_eq!(turns.len(), 5);
        for (i, turn) in turns.iter().enumerate() {
            assert_eq!(turn.content, format!("turn {i}"));
        }
    }

    #[test]
    fn collapse_is_total_and_destructive() {
        let mut history = History::default();
        for i in 0..12 {
            history.push(Turn::user(format!("turn {i}")));
        }
        assert_eq!(history.len(), 12);

        history.collapse(Turn::system("the gist"));

        assert!(history.is_summarized());
        assert_eq!(history.len(), 1);
        let turns = history.turns();
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].content, "the gist");
    }

    #[test]
    fn appends_after_collapse_follow_the_summary() {
        let mut history = History::default();
        history.push(Turn::user("a"));
        history.collapse(Turn::system("summary"));
        history.push(Turn::user("b"));
        history.push(Turn::assistant("c"));

        assert_eq!(history.len(), 3);
        let turns = history.turns();
        assert_eq!(turns[0].content, "summary");
        assert_eq!(turns[1].content, "b");
        assert_eq!(turns[2].content, "c");
    }

    #[test]
    fn empty_history() {
        let history = History::default();
        assert!(history.is_empty());
        assert!(!history.is_summarized());
        assert!(history.turns().is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = Turn::assistant("hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
