//! Conversation record types
//!
//! The record is owned by the hosting pipeline; the gate only reads the
//! latest entry, appends its wake-word exchange, and removes a rejected
//! utterance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// System message (instructions)
    System,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }
}

/// Ordered conversation record.
///
/// A thin wrapper over the turn sequence exposing the operations the gate
/// needs: read the latest entry, append, and remove. Everything else about
/// the record's lifecycle belongs to the hosting pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    turns: Vec<Turn>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest entry, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append a turn to the end of the record
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Remove and return the most recently appended turn
    pub fn pop_last(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    /// Remove and return the turn at `index`, shifting later turns down.
    ///
    /// Returns `None` when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<Turn> {
        if index < self.turns.len() {
            Some(self.turns.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let turn = Turn::user("hello there");
        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.content, "hello there");

        assert_eq!(Turn::assistant("hi").role, TurnRole::Assistant);
        assert_eq!(Turn::system("rules").role, TurnRole::System);
    }

    #[test]
    fn test_role_serialization() {
        let turn = Turn::assistant("ready");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"assistant\""));

        let parsed: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.role, TurnRole::Assistant);
        assert_eq!(parsed.content, "ready");
    }

    #[test]
    fn test_chat_log_append_and_last() {
        let mut log = ChatLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());

        log.append(Turn::user("first"));
        log.append(Turn::assistant("second"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().content, "second");
    }

    #[test]
    fn test_chat_log_pop_last() {
        let mut log = ChatLog::new();
        log.append(Turn::user("keep"));
        log.append(Turn::user("drop"));

        let popped = log.pop_last().unwrap();
        assert_eq!(popped.content, "drop");
        assert_eq!(log.len(), 1);

        log.pop_last();
        assert!(log.pop_last().is_none());
    }

    #[test]
    fn test_chat_log_remove_by_index() {
        let mut log = ChatLog::new();
        log.append(Turn::user("a"));
        log.append(Turn::user("b"));
        log.append(Turn::user("c"));

        let removed = log.remove(1).unwrap();
        assert_eq!(removed.content, "b");
        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[1].content, "c");

        assert!(log.remove(5).is_none());
    }
}
