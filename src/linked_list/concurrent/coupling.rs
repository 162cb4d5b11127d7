//! The hand-over-hand locking protocol shared by every traversal.
//!
//! A [`Cursor`] always holds the lock of the node it is positioned at. Moving
//! forward locks the successor first and only then releases the current node,
//! so at every instant the walker owns at least one lock on its path and no
//! remover can cut out the node it is about to step onto. Locks are only ever
//! taken in chain order, which is what rules out lock-order deadlocks between
//! walkers.

use core::ops::Deref;
use std::sync::Arc;

use lock_api::ArcMutexGuard;

use super::node::{Link, NodeGuard, NodeRef};

/// A locked position in the chain.
pub(crate) struct Cursor<T> {
    guard: NodeGuard<T>,
}

impl<T> Cursor<T> {
    /// Lock `node` and position the cursor on it.
    #[inline]
    pub(crate) fn at(node: &NodeRef<T>) -> Self {
        Self {
            guard: node.lock_arc(),
        }
    }

    /// The node this cursor is positioned at.
    #[inline]
    pub(crate) fn node(&self) -> &NodeRef<T> {
        ArcMutexGuard::mutex(&self.guard)
    }

    /// Lock the successor while keeping the current node locked.
    ///
    /// Returns `None` at the end of the chain.
    #[inline]
    pub(crate) fn lock_next(&self) -> Option<NodeGuard<T>> {
        self.guard.next.as_ref().map(|next| next.lock_arc())
    }

    /// Move onto `next`, which must be the locked successor obtained from
    /// [`Cursor::lock_next`]. The current node is released after the move.
    #[inline]
    pub(crate) fn step_to(&mut self, next: NodeGuard<T>) {
        self.guard = next;
    }

    /// Step onto the successor. Returns `false` at the end of the chain, in
    /// which case the cursor stays where it is.
    #[inline]
    pub(crate) fn advance(&mut self) -> bool {
        match self.lock_next() {
            Some(next) => {
                self.step_to(next);
                true
            }
            None => false,
        }
    }

    /// Advance up to `steps` times and return how many steps were taken.
    pub(crate) fn advance_by(&mut self, steps: usize) -> usize {
        let mut taken = 0;
        while taken < steps && self.advance() {
            taken += 1;
        }
        taken
    }

    /// Walk forward to the last node of the chain.
    pub(crate) fn seek_last(&mut self) {
        while self.advance() {}
    }

    /// Walk forward until the successor is the last node and return both
    /// locked, or `None` if the cursor already is the last node.
    ///
    /// At rest two locks are held. While stepping, the predecessor is
    /// released before the next successor is locked, so the walk never holds
    /// more than two.
    pub(crate) fn seek_last_pair(mut self) -> Option<(Self, NodeGuard<T>)> {
        let mut current = self.lock_next()?;
        while !current.is_last() {
            self.step_to(current);
            current = self.lock_next()?;
        }
        Some((self, current))
    }

    /// Cut the locked successor `next` out of the chain and hand back its
    /// payload.
    ///
    /// The successor's own successor is transferred to this node, so the
    /// unlinked node owns nothing and dropping it never cascades.
    pub(crate) fn unlink(&mut self, mut next: NodeGuard<T>) -> Option<Arc<T>> {
        debug_assert!(
            self.guard
                .next
                .as_ref()
                .is_some_and(|n| Arc::ptr_eq(n, ArcMutexGuard::mutex(&next))),
            "unlink target must be the locked successor"
        );
        self.guard.next = next.next.take();
        next.unlinked = true;
        next.value.take()
    }

    /// Link a new node holding `value` directly after this one and return it.
    pub(crate) fn splice(&mut self, value: T) -> NodeRef<T> {
        let node = Link::node(value, self.guard.next.take());
        self.guard.next = Some(Arc::clone(&node));
        node
    }
}

impl<T> Deref for Cursor<T> {
    type Target = Link<T>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}
