//! Linked lists that can be shared between threads.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use mola_sync_list::linked_list::concurrent::ConcurrentList;
//!
//! let list = Arc::new(ConcurrentList::new());
//!
//! let handles: Vec<_> = [1..=3, 4..=6]
//!     .into_iter()
//!     .map(|range| {
//!         let list = Arc::clone(&list);
//!         thread::spawn(move || {
//!             for i in range {
//!                 list.push_back(i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(list.len(), 6);
//!
//! let mut values = list.to_vec();
//! values.sort();
//! assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
//!
//! let even = list.find(|v| v % 2 == 0).unwrap();
//! assert_eq!(list.remove_if(|v| v % 2 == 0), 3);
//! // The handle outlives the node it was read from.
//! assert_eq!(*even % 2, 0);
//! ```
pub mod concurrent;
