use serde::{Deserialize, Serialize};

/// Append-only log of submitted queries for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryHistory {
    entries: Vec<String>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot of `query`. Repeats are kept.
    pub fn record(&mut self, query: impl Into<String>) {
        self.entries.push(query.into());
    }

    /// Up to the last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
