//! In-memory record of one run's requests and replies.

use crate::core::context::ContextBundle;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionLogEntry {
    Request {
        message: String,
        context: ContextBundle,
        model_id: String,
        timestamp: DateTime<Utc>,
    },
    Response {
        content: String,
        timestamp: DateTime<Utc>,
    },
}

impl SessionLogEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SessionLogEntry::Request { timestamp, .. }
            | SessionLogEntry::Response { timestamp, .. } => *timestamp,
        }
    }
}

/// Append-only, chronologically ordered log. Unbounded.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: Vec<SessionLogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: SessionLogEntry) {
        self.entries.push(entry);
    }

    /// A copy of every entry; changing it does not affect the log.
    pub fn history(&self) -> Vec<SessionLogEntry> {
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content: &str) -> SessionLogEntry {
        SessionLogEntry::Response {
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn entries_keep_append_order() {
        let mut log = SessionLog::new();
        log.append(SessionLogEntry::Request {
            message: "hi".to_string(),
            context: ContextBundle::new("/ws"),
            model_id: "gpt-4o".to_string(),
            timestamp: Utc::now(),
        });
        log.append(response("hello"));

        let history = log.history();
        assert_eq!(history.len(), 2);
        assert!(matches!(history[0], SessionLogEntry::Request { .. }));
        assert_eq!(history[1], log.history()[1]);
    }

    #[test]
    fn history_is_a_detached_copy() {
        let mut log = SessionLog::new();
        log.append(response("one"));

        let mut copy = log.history();
        copy.push(response("two"));
        copy.clear();

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = SessionLog::new();
        log.append(response("one"));
        log.clear();
        assert!(log.is_empty());
        assert!(log.history().is_empty());
    }
}
