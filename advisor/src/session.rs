//! Bounded, in-memory conversation history.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Maximum number of turns kept (5 exchanges).
pub const MAX_TURNS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
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

/// Reply returned by [`ConversationSession::reset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetReply {
    pub response: String,
}

/// Ordered turn history, oldest first. Evicted turns are gone for good.
#[derive(Clone, Debug, Default)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
}

/// Shared handle to one session. Hold the lock across a whole exchange.
pub type SessionHandle = Arc<Mutex<ConversationSession>>;

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session behind a shareable handle.
    pub fn handle() -> SessionHandle {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Appends user then assistant turn, then trims to [`MAX_TURNS`].
    pub fn append(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ConversationTurn::user(user));
        self.turns.push(ConversationTurn::assistant(assistant));
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }

    /// Last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn reset(&mut self) -> ResetReply {
        self.turns.clear();
        ResetReply {
            response: "Conversation has been reset.".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_ten_turns() {
        let mut s = ConversationSession::new();
        for i in 0..6 {
            s.append(format!("q{i}"), format!("a{i}"));
        }
        assert_eq!(s.len(), MAX_TURNS);
        let all = s.recent(usize::MAX);
        assert_eq!(all.first(), Some(&ConversationTurn::user("q1")));
        assert_eq!(all.last(), Some(&ConversationTurn::assistant("a5")));
    }

    #[test]
    fn recent_is_oldest_first() {
        let mut s = ConversationSession::new();
        s.append("hi", "hello");
        s.append("laptop?", "which budget?");
        let r = s.recent(3);
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], ConversationTurn::assistant("hello"));
        assert_eq!(r[2], ConversationTurn::assistant("which budget?"));
    }

    #[test]
    fn reset_clears_and_confirms() {
        let mut s = ConversationSession::new();
        s.append("a", "b");
        let reply = s.reset();
        assert!(s.is_empty());
        assert_eq!(reply.response, "Conversation has been reset.");
    }
}
