//! # Concurrent Linked List
//!
//! A singly linked list with one lock per node, built for many threads
//! reading and mutating different parts of the list at the same time.
//!
//! ## Core Components
//!
//! - [`ConcurrentList`]: the list and all of its operations.
//! - [`ListError`]: the out-of-range error reported by positional operations.
//!
//! ## Locking
//!
//! Every walk starts at a permanent head sentinel and uses hand-over-hand
//! locking: the next node is locked before the current one is released.
//! Node locks are taken strictly in chain order. The tail cache and the
//! element count have their own locks, which are only ever taken last and
//! never held while waiting for a node.
//!
//! ## Removal policy
//!
//! Operations addressed by an index (`get`, `insert`, `remove`) return a
//! [`Result`] and fail with [`ListError::IndexOutOfRange`]. Operations that
//! take whatever is at an end (`pop_front`, `pop_back`) return an `Option`
//! and yield `None` on an empty list.

mod coupling;
mod error;
mod list;
mod node;


pub use error::{ListError, Result};
pub use list::ConcurrentList;

pub mod prelude {
    pub use super::error::ListError;
    pub use super::list::ConcurrentList;
}
