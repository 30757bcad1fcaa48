//! Append-only, in-memory result history owned by an optimizer or evaluator.
//! Never pruned, never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A result plus the moment it was appended.
#[derive(Debug, Clone, Serialize)]
pub struct Recorded<T> {
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<Recorded<T>>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> History<T> {
    pub fn push(&mut self, value: T) {
        self.entries.push(Recorded {
            recorded_at: Utc::now(),
            value,
        });
    }

    pub fn entries(&self) -> &[Recorded<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.last().map(|r| &r.value)
    }
}
