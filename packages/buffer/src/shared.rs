//! Thread-safe handle to an [`EditBuffer`]
//!
//! The session and both stacks sit behind a single mutex, so the
//! one-open-session rule and the coalescing scan never interleave.

use std::sync::{Arc, Mutex, PoisonError};

use crate::EditBuffer;

#[derive(Debug)]
pub struct SharedEditBuffer<V> {
    inner: Arc<Mutex<EditBuffer<V>>>,
}

impl<V: Clone> SharedEditBuffer<V> {
    pub fn new() -> Self {
        Self::from_buffer(EditBuffer::new())
    }

    pub fn from_buffer(buffer: EditBuffer<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Run `f` with exclusive access to the buffer
    pub fn with<R>(&self, f: impl FnOnce(&mut EditBuffer<V>) -> R) -> R {
        // Poisoning only means another holder panicked
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn can_undo(&self) -> bool {
        self.with(|buffer| buffer.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.with(|buffer| buffer.can_redo())
    }
}

impl<V: Clone> Default for SharedEditBuffer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for SharedEditBuffer<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
