//! # Edit Session
//!
//! A session is the batching window between `begin_edit` and `end_edit`.
//! Raw edits recorded into it are coalesced per path: the first-seen
//! `before` and the most recent `after` are kept, in first-insertion order.

use crate::{Command, Edit};

/// Accumulated, uncommitted edits of one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct Session<V> {
    label: String,
    edits: Vec<Edit<V>>,
}

impl<V: Clone> Session<V> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Record a raw edit, coalescing with an earlier edit to the same path
    pub fn record(&mut self, path: impl Into<String>, before: V, after: V) {
        let path = path.into();

        // Sessions touch a handful of paths at most
        match self.edits.iter_mut().find(|edit| edit.path == path) {
            Some(existing) => existing.after = after,
            None => self.edits.push(Edit::new(path, before, after)),
        }
    }

    /// Coalesced edits in first-insertion order
    pub fn edits(&self) -> &[Edit<V>] {
        &self.edits
    }

    pub fn contains(&self, path: &str) -> bool {
        self.edits.iter().any(|edit| edit.path == path)
    }

    /// Number of distinct paths touched
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Consume the session into the command it commits, if any
    pub fn into_command(self) -> Option<Command<V>> {
        Command::from_edits(self.label, self.edits)
    }
}
