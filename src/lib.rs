//! Concurrent collections built on fine-grained locking.
//!
//! The main entry point is [`linked_list::concurrent::ConcurrentList`], a
//! singly linked list whose nodes each carry their own lock.

pub mod linked_list;
