//! # Revise Buffer
//!
//! Transactional edit buffer with undo/redo.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ caller: UI events, scripts                  │
//! │  begin_edit → record* → end_edit            │
//! │  undo / redo                                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ buffer: sessions + history                  │
//! │  - Coalesce edits per path within a session │
//! │  - Commit one Leaf or Composite per session │
//! │  - Linear undo/redo stacks                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: set_value / commit_and_recompute     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One command per session**: however many edits a session records
//! 2. **First before, last after**: repeated edits to a path collapse
//! 3. **LIFO reversal**: composites undo their leaves last-to-first
//! 4. **Linear history**: every commit clears the redo stack
//! 5. **Opaque values**: the buffer never inspects what it stores
//!
//! ## Usage
//!
//! ```rust
//! use revise_buffer::{EditBuffer, MapModel};
//!
//! let mut model = MapModel::from_fields([("a", 1), ("b", 10)]);
//! let mut buffer = EditBuffer::new();
//!
//! buffer.edit(&mut model, "batch", |_, session| {
//!     session.record("a", 1, 2);
//!     session.record("b", 10, 20);
//!     session.record("a", 2, 3);
//! })?;
//! assert_eq!(model.get("a"), Some(&3));
//!
//! buffer.undo(&mut model)?;
//! assert_eq!(model.get("a"), Some(&1));
//! assert_eq!(model.get("b"), Some(&10));
//! # Ok::<(), revise_buffer::EditError>(())
//! ```

mod command;
mod config;
mod edit_buffer;
mod errors;
mod model;
mod session;
mod shared;

pub use command::{Command, Edit, LeafCommand};
pub use config::{BufferConfig, ReentrantPolicy};
pub use edit_buffer::{EditBuffer, HistorySummary};
pub use errors::{EditError, EditResult, ModelError};
pub use model::{MapModel, Model};
pub use session::Session;
pub use shared::SharedEditBuffer;
