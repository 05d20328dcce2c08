//! # Edit Buffer
//!
//! Groups field edits into reversible commands and tracks undo/redo history.
//!
//! ## Design
//!
//! - `begin_edit` opens a session; `record` accumulates coalesced edits
//! - `end_edit` turns the session into one command, applies it, and pushes
//!   it onto the undo stack
//! - Undo reverses the top command and moves it to the redo stack
//! - Redo reapplies it and moves it back
//! - Closing a session clears the redo stack, even when nothing was recorded
//!
//! The buffer never owns the model. Each operation that touches the model
//! borrows it for the duration of the call.
//!
//! ## Example
//!
//! ```rust
//! use revise_buffer::{EditBuffer, MapModel, Model};
//!
//! let mut model = MapModel::from_fields([("name", "Alice")]);
//! let mut buffer = EditBuffer::new();
//!
//! buffer.begin_edit(&mut model, "set name")?;
//! buffer.record("name", "Alice", "Bob");
//! buffer.end_edit(&mut model)?;
//! assert_eq!(model.get_value("name"), Some("Bob"));
//!
//! buffer.undo(&mut model)?;
//! assert_eq!(model.get_value("name"), Some("Alice"));
//!
//! buffer.redo(&mut model)?;
//! assert_eq!(model.get_value("name"), Some("Bob"));
//! # Ok::<(), revise_buffer::EditError>(())
//! ```

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::{BufferConfig, Command, EditError, EditResult, Model, ReentrantPolicy, Session};

/// Labels of the current history, for UI affordances
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HistorySummary {
    /// Undo labels, most recent first
    pub undo: Vec<String>,

    /// Redo labels, next to redo first
    pub redo: Vec<String>,

    /// Label of the open session, if any
    pub editing: Option<String>,
}

/// Transactional edit buffer with linear undo/redo history
#[derive(Debug, Clone)]
pub struct EditBuffer<V> {
    /// Committed commands (most recent last)
    undo_stack: Vec<Command<V>>,

    /// Undone commands (most recent last)
    redo_stack: Vec<Command<V>>,

    /// Open batching session
    session: Option<Session<V>>,

    config: BufferConfig,
}

impl<V: Clone> EditBuffer<V> {
    /// Create a buffer with unlimited history
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            session: None,
            config,
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Open a batching session.
    ///
    /// If a session is already open the configured [`ReentrantPolicy`]
    /// decides: reject, abandon the open session, or commit it first.
    ///
    /// Under `AutoCommit`, a failed commit of the open session is returned
    /// as the error and no session is left open: the old session is gone
    /// (as after a failed `end_edit`) and the new one was never started.
    pub fn begin_edit<M>(&mut self, model: &mut M, label: impl Into<String>) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        if let Some(active) = &self.session {
            match self.config.reentrant {
                ReentrantPolicy::Reject => {
                    return Err(EditError::SessionActive {
                        label: active.label().to_string(),
                    });
                }
                ReentrantPolicy::Abandon => {
                    warn!(
                        label = active.label(),
                        edits = active.len(),
                        "Abandoning uncommitted edit session"
                    );
                }
                ReentrantPolicy::AutoCommit => {}
            }
        }

        if self.config.reentrant == ReentrantPolicy::AutoCommit {
            self.end_edit(model)?;
        }

        self.session = Some(Session::new(label));
        Ok(())
    }

    /// Record a raw edit into the open session (ignored when none is open)
    pub fn record(&mut self, path: impl Into<String>, before: V, after: V) {
        match &mut self.session {
            Some(session) => session.record(path, before, after),
            None => trace!("record outside of an edit session ignored"),
        }
    }

    /// Close the open session, committing its edits as one command.
    ///
    /// Returns `Ok(true)` if a command was committed. The session is closed
    /// in every case. If applying the command fails nothing is pushed and
    /// the redo stack is left as it was.
    #[instrument(skip_all)]
    pub fn end_edit<M>(&mut self, model: &mut M) -> EditResult<bool>
    where
        M: Model<Value = V>,
    {
        let Some(session) = self.session.take() else {
            trace!("end_edit without an edit session ignored");
            return Ok(false);
        };

        if let Some(command) = session.into_command() {
            command.apply(model)?;
            debug!(
                label = command.label(),
                leaves = command.leaf_count(),
                "Committed edit"
            );
            self.push_command(command);
            Ok(true)
        } else {
            // An empty commit still starts a new branch
            self.redo_stack.clear();
            Ok(false)
        }
    }

    /// Drop the open session without committing. Returns whether one was open.
    pub fn cancel_edit(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                debug!(
                    label = session.label(),
                    edits = session.len(),
                    "Cancelled edit session"
                );
                true
            }
            None => false,
        }
    }

    /// Run `f` inside a session and commit whatever it records
    pub fn edit<M, F>(&mut self, model: &mut M, label: impl Into<String>, f: F) -> EditResult<bool>
    where
        M: Model<Value = V>,
        F: FnOnce(&M, &mut Session<V>),
    {
        self.begin_edit(model, label)?;
        if let Some(session) = &mut self.session {
            f(&*model, session);
        }
        self.end_edit(model)
    }

    /// Push a committed command onto the undo stack
    fn push_command(&mut self, command: Command<V>) {
        self.undo_stack.push(command);

        // Trim if exceeded max levels
        if self.config.max_levels > 0 && self.undo_stack.len() > self.config.max_levels {
            self.undo_stack.remove(0);
        }

        // New commit invalidates the redone future
        self.redo_stack.clear();
    }

    /// Undo the most recent command.
    ///
    /// Returns `Ok(false)` if there is nothing to undo. On failure the
    /// command stays on the undo stack.
    #[instrument(skip_all, fields(undo_levels = self.undo_stack.len()))]
    pub fn undo<M>(&mut self, model: &mut M) -> EditResult<bool>
    where
        M: Model<Value = V>,
    {
        if let Some(command) = self.undo_stack.pop() {
            if let Err(err) = command.reverse(model) {
                self.undo_stack.push(command);
                return Err(err);
            }

            debug!(label = command.label(), "Undid edit");
            self.redo_stack.push(command);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Redo the most recently undone command.
    ///
    /// Returns `Ok(false)` if there is nothing to redo. On failure the
    /// command stays on the redo stack.
    #[instrument(skip_all, fields(redo_levels = self.redo_stack.len()))]
    pub fn redo<M>(&mut self, model: &mut M) -> EditResult<bool>
    where
        M: Model<Value = V>,
    {
        if let Some(command) = self.redo_stack.pop() {
            if let Err(err) = command.apply(model) {
                self.redo_stack.push(command);
                return Err(err);
            }

            debug!(label = command.label(), "Redid edit");
            self.undo_stack.push(command);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Command that the next undo would reverse
    pub fn peek_undo(&self) -> Option<&Command<V>> {
        self.undo_stack.last()
    }

    /// Command that the next redo would reapply
    pub fn peek_redo(&self) -> Option<&Command<V>> {
        self.redo_stack.last()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.peek_undo().map(Command::label)
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.peek_redo().map(Command::label)
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session<V>> {
        self.session.as_ref()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            undo: self.undo_stack.iter().rev().map(|c| c.label().to_string()).collect(),
            redo: self.redo_stack.iter().rev().map(|c| c.label().to_string()).collect(),
            editing: self.session.as_ref().map(|s| s.label().to_string()),
        }
    }

    /// Clear all history and any open session
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.session = None;
    }
}

impl<V: Clone> Default for EditBuffer<V> {
    fn default() -> Self {
        Self::new()
    }
}
