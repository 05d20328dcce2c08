//! # Commands
//!
//! A [`Command`] is one reversible entry in the history. It is either a
//! single-field [`LeafCommand`] or a composite of several leaves that were
//! committed together by one edit session.
//!
//! ## Ordering
//!
//! - Composite `apply` runs leaves in insertion order (index 0 first)
//! - Composite `reverse` runs leaf reversals in strict reverse order
//!
//! Later leaves may have been recorded against the post-state of earlier
//! ones, so reversal must be LIFO or recompute can observe a state that
//! never existed.
//!
//! ## Failures
//!
//! Every leaf write is followed by a recompute, even when the write is a
//! no-op. If a composite fails part-way through, the leaves it already
//! touched are rolled back before the error is returned.

use serde::Serialize;
use tracing::error;

use crate::{EditError, EditResult, Model};

/// Raw, uncommitted change to one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit<V> {
    pub path: String,
    pub before: V,
    pub after: V,
}

impl<V> Edit<V> {
    pub fn new(path: impl Into<String>, before: V, after: V) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }
}

/// Reversible single-field mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafCommand<V> {
    label: String,

    #[serde(flatten)]
    edit: Edit<V>,
}

impl<V: Clone> LeafCommand<V> {
    pub fn new(label: impl Into<String>, edit: Edit<V>) -> Self {
        Self {
            label: label.into(),
            edit,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &str {
        &self.edit.path
    }

    /// Value at the path before the session opened
    pub fn before(&self) -> &V {
        &self.edit.before
    }

    /// Value at the path when the session closed
    pub fn after(&self) -> &V {
        &self.edit.after
    }

    pub fn edit(&self) -> &Edit<V> {
        &self.edit
    }

    /// Write `after` and recompute
    pub fn apply<M>(&self, model: &mut M) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        self.write(model, &self.edit.after)
    }

    /// Write `before` and recompute
    pub fn reverse<M>(&self, model: &mut M) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        self.write(model, &self.edit.before)
    }

    fn write<M>(&self, model: &mut M, value: &V) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        model
            .set_value(&self.edit.path, value.clone())
            .map_err(|source| EditError::MutationFailed {
                path: self.edit.path.clone(),
                source,
            })?;

        model
            .commit_and_recompute()
            .map_err(|source| EditError::RecomputeFailed { source })
    }
}

/// One entry in the undo/redo history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command<V> {
    Leaf(LeafCommand<V>),

    /// Non-empty, ordered group of leaves sharing one label
    Composite {
        label: String,
        leaves: Vec<LeafCommand<V>>,
    },
}

impl<V: Clone> Command<V> {
    /// Materialize the edits of a closed session.
    ///
    /// Returns `None` for zero edits, a `Leaf` for one, and a `Composite`
    /// (in the given order) for two or more.
    pub fn from_edits(label: impl Into<String>, edits: Vec<Edit<V>>) -> Option<Self> {
        let label = label.into();

        match edits.len() {
            0 => None,
            1 => edits
                .into_iter()
                .next()
                .map(|edit| Command::Leaf(LeafCommand::new(label, edit))),
            _ => {
                let leaves = edits
                    .into_iter()
                    .map(|edit| LeafCommand::new(label.clone(), edit))
                    .collect();
                Some(Command::Composite { label, leaves })
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Command::Leaf(leaf) => leaf.label(),
            Command::Composite { label, .. } => label,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Command::Composite { .. })
    }

    /// Number of leaves (1 for a leaf command)
    pub fn leaf_count(&self) -> usize {
        match self {
            Command::Leaf(_) => 1,
            Command::Composite { leaves, .. } => leaves.len(),
        }
    }

    /// Leaves in apply order
    pub fn leaves(&self) -> impl Iterator<Item = &LeafCommand<V>> {
        match self {
            Command::Leaf(leaf) => std::slice::from_ref(leaf).iter(),
            Command::Composite { leaves, .. } => leaves.iter(),
        }
    }

    /// Touched paths in apply order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.leaves().map(LeafCommand::path)
    }

    /// Perform the forward mutation
    pub fn apply<M>(&self, model: &mut M) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        match self {
            Command::Leaf(leaf) => leaf.apply(model),
            Command::Composite { leaves, .. } => apply_leaves(leaves, model),
        }
    }

    /// Perform the inverse mutation
    pub fn reverse<M>(&self, model: &mut M) -> EditResult<()>
    where
        M: Model<Value = V>,
    {
        match self {
            Command::Leaf(leaf) => leaf.reverse(model),
            Command::Composite { leaves, .. } => reverse_leaves(leaves, model),
        }
    }
}

/// Whether the failing leaf had already written its value
fn wrote_before_failing(err: &EditError) -> bool {
    matches!(err, EditError::RecomputeFailed { .. })
}

fn apply_leaves<V, M>(leaves: &[LeafCommand<V>], model: &mut M) -> EditResult<()>
where
    V: Clone,
    M: Model<Value = V>,
{
    for (idx, leaf) in leaves.iter().enumerate() {
        if let Err(err) = leaf.apply(model) {
            let touched = if wrote_before_failing(&err) { idx + 1 } else { idx };

            for done in leaves[..touched].iter().rev() {
                if let Err(rollback) = done.reverse(model) {
                    error!(path = done.path(), error = %rollback, "Rollback of applied leaf failed");
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

fn reverse_leaves<V, M>(leaves: &[LeafCommand<V>], model: &mut M) -> EditResult<()>
where
    V: Clone,
    M: Model<Value = V>,
{
    for (idx, leaf) in leaves.iter().enumerate().rev() {
        if let Err(err) = leaf.reverse(model) {
            let first_touched = if wrote_before_failing(&err) { idx } else { idx + 1 };

            for done in &leaves[first_touched..] {
                if let Err(rollback) = done.apply(model) {
                    error!(path = done.path(), error = %rollback, "Rollback of reversed leaf failed");
                }
            }
            return Err(err);
        }
    }
    Ok(())
}
