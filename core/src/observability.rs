// Interaction log
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// One record per completed turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub farmer_id: String,
    /// User message, truncated
    pub user_message: String,
    pub total_water_m3: f64,
    pub num_scenarios: usize,
    /// Answer text, truncated
    pub answer_preview: String,
    pub generation_failed: bool,
}

/// Append-only in-memory log of turns.
#[derive(Debug, Default)]
pub struct InteractionLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, entry: LogEntry) {
        info!(
            farmer = %entry.farmer_id,
            total_water_m3 = entry.total_water_m3,
            scenarios = entry.num_scenarios,
            generation_failed = entry.generation_failed,
            "Turn completed"
        );
        self.entries.write().await.push(entry);
    }

    /// Entries filtered by farmer (if given), then the last `limit` of those.
    pub async fn entries(&self, farmer_id: Option<&str>, limit: Option<usize>) -> Vec<LogEntry> {
        let entries = self.entries.read().await;
        let filtered: Vec<&LogEntry> = entries
            .iter()
            .filter(|e| farmer_id.map_or(true, |id| e.farmer_id == id))
            .collect();
        let skip = limit.map_or(0, |n| filtered.len().saturating_sub(n));
        filtered.into_iter().skip(skip).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(farmer: &str, n: usize) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            farmer_id: farmer.to_string(),
            user_message: format!("msg {n}"),
            total_water_m3: n as f64,
            num_scenarios: 2,
            answer_preview: String::new(),
            generation_failed: false,
        }
    }

    #[tokio::test]
    async fn test_filter_then_limit() {
        let log = InteractionLog::new();
        for n in 0..5 {
            log.record(entry(if n % 2 == 0 { "a" } else { "b" }, n)).await;
        }
        assert_eq!(log.len().await, 5);

        let a = log.entries(Some("a"), None).await;
        assert_eq!(a.len(), 3);

        let last_a = log.entries(Some("a"), Some(2)).await;
        let msgs: Vec<&str> = last_a.iter().map(|e| e.user_message.as_str()).collect();
        assert_eq!(msgs, vec!["msg 2", "msg 4"]);

        let last = log.entries(None, Some(1)).await;
        assert_eq!(last[0].user_message, "msg 4");

        log.clear().await;
        assert!(log.is_empty().await);
    }

    #[test]
    fn test_truncate_chars_is_utf8_safe() {
        assert_eq!(truncate_chars("سلام دنیا", 4), "سلام");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
