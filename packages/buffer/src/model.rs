//! # Model Boundary
//!
//! The buffer edits fields on a model it knows nothing about. Everything it
//! needs goes through the [`Model`] trait:
//!
//! - `set_value` writes one field and must not recompute
//! - `get_value` reads one field (callers use it to capture before/after)
//! - `commit_and_recompute` derives dependent state from current fields
//!
//! [`MapModel`] is a plain in-memory implementation keyed by path.

use std::collections::BTreeMap;

use crate::ModelError;

/// Mutable object whose fields are edited through the buffer
pub trait Model {
    /// Opaque field value. The buffer clones it but never inspects it.
    type Value: Clone;

    /// Write a value to the named field
    fn set_value(&mut self, path: &str, value: Self::Value) -> Result<(), ModelError>;

    /// Read the current value of the named field
    fn get_value(&self, path: &str) -> Option<Self::Value>;

    /// Recompute derived state after one or more writes
    fn commit_and_recompute(&mut self) -> Result<(), ModelError>;
}

/// In-memory model backed by an ordered map of path → value
#[derive(Debug, Clone, PartialEq)]
pub struct MapModel<V> {
    fields: BTreeMap<String, V>,

    /// Reject writes to paths that were never seeded
    strict: bool,

    recomputes: usize,
}

impl<V: Clone> MapModel<V> {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            strict: false,
            recomputes: 0,
        }
    }

    /// Build a model from initial field values
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            strict: false,
            recomputes: 0,
        }
    }

    /// Only allow writes to paths that already exist
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Borrow a field without cloning
    pub fn get(&self, path: &str) -> Option<&V> {
        self.fields.get(path)
    }

    pub fn fields(&self) -> &BTreeMap<String, V> {
        &self.fields
    }

    /// Number of `commit_and_recompute` calls so far
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }
}

impl<V: Clone> Default for MapModel<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Model for MapModel<V> {
    type Value = V;

    fn set_value(&mut self, path: &str, value: V) -> Result<(), ModelError> {
        match self.fields.get_mut(path) {
            Some(slot) => *slot = value,
            None if self.strict => return Err(ModelError::UnknownPath(path.to_string())),
            None => {
                self.fields.insert(path.to_string(), value);
            }
        }
        Ok(())
    }

    fn get_value(&self, path: &str) -> Option<V> {
        self.fields.get(path).cloned()
    }

    fn commit_and_recompute(&mut self) -> Result<(), ModelError> {
        self.recomputes += 1;
        Ok(())
    }
}
