use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Turns retained per farmer unless configured otherwise
pub const DEFAULT_MAX_TURNS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRole {
    User,
    Assistant,
}

/// A single message in a farmer's transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTurn {
    pub role: SessionRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl SessionTurn {
    pub fn new(role: SessionRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded rolling transcripts keyed by farmer id.
///
/// Each transcript keeps at most `max_turns` entries; the oldest are evicted
/// first.
#[derive(Debug)]
pub struct SessionStore {
    max_turns: usize,
    sessions: DashMap<String, VecDeque<SessionTurn>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl SessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            sessions: DashMap::new(),
        }
    }

    pub fn add_user_message(&self, farmer_id: &str, content: &str) {
        self.add(farmer_id, SessionTurn::new(SessionRole::User, content));
    }

    pub fn add_assistant_message(&self, farmer_id: &str, content: &str) {
        self.add(farmer_id, SessionTurn::new(SessionRole::Assistant, content));
    }

    fn add(&self, farmer_id: &str, turn: SessionTurn) {
        let mut session = self.sessions.entry(farmer_id.to_string()).or_default();
        session.push_back(turn);
        while session.len() > self.max_turns {
            session.pop_front();
        }
    }

    /// Full retained history, oldest first.
    pub fn history(&self, farmer_id: &str) -> Vec<SessionTurn> {
        self.sessions
            .get(farmer_id)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Most recent `n` turns, oldest first.
    pub fn recent(&self, farmer_id: &str, n: usize) -> Vec<SessionTurn> {
        let history = self.history(farmer_id);
        let skip = history.len().saturating_sub(n);
        history.into_iter().skip(skip).collect()
    }

    pub fn clear_session(&self, farmer_id: &str) {
        self.sessions.remove(farmer_id);
    }

    pub fn clear_all(&self) {
        self.sessions.clear();
    }
}
