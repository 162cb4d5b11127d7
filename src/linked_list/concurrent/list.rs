use core::fmt::{self, Debug};
use std::sync::{Arc, Weak};

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::coupling::Cursor;
use super::error::{ListError, Result};
use super::node::{Link, NodeGuard, NodeRef, WeakNode};

/// A singly linked list whose nodes are individually locked.
///
/// Threads walking or mutating different parts of the list do not contend
/// with each other: every traversal uses hand-over-hand locking from a
/// permanent head sentinel, and only the nodes at the point of overlap are
/// serialized.
///
/// Besides the node locks the list keeps two leaf locks, one around a weak
/// reference to the last node (used to append in O(1)) and one around the
/// element count. Locks are always acquired in the order
/// `node locks in chain order -> tail -> count`, and no thread waits for a
/// node lock while holding the tail or the count.
///
/// Payloads are stored behind an [`Arc`], so a handle returned by
/// [`ConcurrentList::find`] or [`ConcurrentList::get`] stays valid after the
/// node is removed.
///
/// Closures passed to [`for_each`](ConcurrentList::for_each),
/// [`find`](ConcurrentList::find) and
/// [`remove_if`](ConcurrentList::remove_if) run while a node is locked and
/// must not call back into the same list.
pub struct ConcurrentList<T> {
    head: NodeRef<T>,
    tail: CachePadded<Mutex<WeakNode<T>>>,
    count: CachePadded<Mutex<usize>>,
}

impl<T> ConcurrentList<T> {
    /// Creates a new, empty list.
    pub fn new() -> Self {
        Self {
            head: Link::sentinel(),
            tail: CachePadded::new(Mutex::new(Weak::new())),
            count: CachePadded::new(Mutex::new(0)),
        }
    }

    /// Returns the number of elements.
    ///
    /// Only the count lock is taken, so this never waits on a traversal.
    pub fn len(&self) -> usize {
        *self.count.lock()
    }

    /// Returns `true` if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value` at the front of the list.
    pub fn push_front(&self, value: T) {
        let mut head = Cursor::at(&self.head);
        let was_empty = head.is_last();
        let node = head.splice(value);
        if was_empty {
            self.set_tail(&node);
        }
        self.increment();
        trace!(was_empty, "pushed front");
    }

    /// Appends `value` at the back of the list.
    ///
    /// The last node is found through the tail cache. If the cached node has
    /// been removed in the meantime the last node is found by walking from
    /// the head instead.
    pub fn push_back(&self, value: T) {
        let mut last = self.lock_last();
        let node = last.splice(value);
        self.set_tail(&node);
        self.increment();
    }

    /// Inserts `value` so that it ends up at position `index`.
    ///
    /// Index `0` always succeeds and behaves like
    /// [`push_front`](Self::push_front). Any other index must address an
    /// existing element, i.e. `index < len`; appending goes through
    /// [`push_back`](Self::push_back).
    ///
    /// # Errors
    /// [`ListError::IndexOutOfRange`] if `index >= len`, including when
    /// concurrent removals shrink the list below `index` during the walk.
    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        if index == 0 {
            self.push_front(value);
            return Ok(());
        }
        self.check_index(index)?;

        let mut pred = self.seek(index, index)?;
        let was_last = pred.is_last();
        let node = pred.splice(value);
        if was_last {
            self.set_tail(&node);
        }
        self.increment();
        trace!(index, "inserted");
        Ok(())
    }

    /// Calls `f` on every element, front to back.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        let mut cursor = Cursor::at(&self.head);
        while cursor.advance() {
            if let Some(value) = cursor.value() {
                f(value);
            }
        }
    }

    /// Returns a handle to the first element matching `predicate`.
    ///
    /// The result is a snapshot: the element may be removed right after this
    /// returns, but the handle keeps the value alive.
    pub fn find<P>(&self, mut predicate: P) -> Option<Arc<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = Cursor::at(&self.head);
        while cursor.advance() {
            if let Some(value) = cursor.value().filter(|value| predicate(value)) {
                return Some(Arc::clone(value));
            }
        }
        None
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(|candidate| candidate == value).is_some()
    }

    /// Returns a handle to the element at `index`.
    ///
    /// Looking up the last element is served from the tail cache without
    /// walking the list.
    ///
    /// # Errors
    /// [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<Arc<T>> {
        let len = self.check_index(index)?;
        if index + 1 == len {
            if let Some(value) = self.tail_value() {
                return Ok(value);
            }
        }

        let cursor = self.seek(index + 1, index)?;
        match cursor.value() {
            Some(value) => Ok(Arc::clone(value)),
            None => Err(self.shrunk(index)),
        }
    }

    /// Removes every element matching `predicate` and returns how many were
    /// removed.
    ///
    /// The predecessor stays locked while its successor is tested, and is
    /// tested again against its new successor after a removal, so runs of
    /// matching elements are removed in a single pass.
    pub fn remove_if<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut prev = Cursor::at(&self.head);
        while let Some(current) = prev.lock_next() {
            if current.value().is_some_and(|value| predicate(value)) {
                self.unlink(&mut prev, current);
                removed += 1;
            } else {
                prev.step_to(current);
            }
        }
        removed
    }

    /// Removes and returns the element at `index`.
    ///
    /// If another reader still holds a handle to the element, the returned
    /// value is a clone.
    ///
    /// # Errors
    /// [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn remove(&self, index: usize) -> Result<T>
    where
        T: Clone,
    {
        self.check_index(index)?;

        let mut pred = self.seek(index, index)?;
        let Some(target) = pred.lock_next() else {
            drop(pred);
            return Err(self.shrunk(index));
        };
        let payload = self.unlink(&mut pred, target);
        drop(pred);
        payload.map(Arc::unwrap_or_clone).ok_or_else(|| self.shrunk(index))
    }

    /// Removes and returns the first element, or `None` if the list is empty.
    pub fn pop_front(&self) -> Option<T>
    where
        T: Clone,
    {
        let mut head = Cursor::at(&self.head);
        let first = head.lock_next()?;
        let payload = self.unlink(&mut head, first);
        drop(head);
        payload.map(Arc::unwrap_or_clone)
    }

    /// Removes and returns the last element, or `None` if the list is empty.
    ///
    /// The last node and its predecessor are reached in one coupled walk and
    /// unlinked while both are locked, so the element removed is the one
    /// that was last at that moment.
    pub fn pop_back(&self) -> Option<T>
    where
        T: Clone,
    {
        let (mut pred, last) = Cursor::at(&self.head).seek_last_pair()?;
        let payload = self.unlink(&mut pred, last);
        drop(pred);
        payload.map(Arc::unwrap_or_clone)
    }

    /// Removes every element and returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut head = Cursor::at(&self.head);
        let mut removed = 0;
        while let Some(first) = head.lock_next() {
            self.unlink(&mut head, first);
            removed += 1;
        }
        debug!(removed, "cleared list");
        removed
    }

    /// Returns a snapshot of the elements, front to back.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::new();
        self.for_each(|value| values.push(value.clone()));
        values
    }

    /// Validate `index < len` and return the observed length.
    fn check_index(&self, index: usize) -> Result<usize> {
        let len = self.len();
        if index < len {
            Ok(len)
        } else {
            debug!(index, len, "index out of range");
            Err(ListError::out_of_range(index, len))
        }
    }

    /// Walk `steps` nodes past the sentinel. Fails if the chain is shorter,
    /// which can only happen when it shrank after `index` was validated.
    fn seek(&self, steps: usize, index: usize) -> Result<Cursor<T>> {
        let mut cursor = Cursor::at(&self.head);
        if cursor.advance_by(steps) < steps {
            drop(cursor);
            return Err(self.shrunk(index));
        }
        Ok(cursor)
    }

    fn shrunk(&self, index: usize) -> ListError {
        let len = self.len();
        debug!(index, len, "list shrank below index during traversal");
        ListError::out_of_range(index, len)
    }

    /// Lock the last node of the chain, starting from the tail cache when it
    /// still refers to a linked node.
    fn lock_last(&self) -> Cursor<T> {
        // The tail lock is released before any node lock is taken.
        let hint = self.tail.lock().upgrade();
        let cached = hint.map(|node| Cursor::at(&node)).filter(|cursor| {
            let usable = !cursor.is_unlinked();
            if !usable {
                trace!("tail cache refers to an unlinked node");
            }
            usable
        });
        let mut cursor = cached.unwrap_or_else(|| Cursor::at(&self.head));
        cursor.seek_last();
        cursor
    }

    /// The payload of the cached tail, if the cache is current.
    fn tail_value(&self) -> Option<Arc<T>> {
        let node = self.tail.lock().upgrade()?;
        let cursor = Cursor::at(&node);
        if cursor.is_unlinked() || !cursor.is_last() {
            return None;
        }
        cursor.value().cloned()
    }

    /// Record `last` as the last node. The caller holds the lock of the node
    /// that is last, so tail updates are ordered by the chain itself.
    fn set_tail(&self, last: &NodeRef<T>) {
        let tail = if Arc::ptr_eq(last, &self.head) {
            Weak::new()
        } else {
            Arc::downgrade(last)
        };
        *self.tail.lock() = tail;
    }

    /// Unlink `target` from `pred`, keeping the tail cache and count in step.
    fn unlink(&self, pred: &mut Cursor<T>, target: NodeGuard<T>) -> Option<Arc<T>> {
        let payload = pred.unlink(target);
        let was_last = pred.is_last();
        if was_last {
            self.set_tail(pred.node());
        }
        *self.count.lock() -= 1;
        trace!(was_last, "unlinked node");
        payload
    }

    fn increment(&self) {
        *self.count.lock() += 1;
    }
}

impl<T> Default for ConcurrentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ConcurrentList<T> {
    fn drop(&mut self) {
        // Release the chain front to back instead of recursively.
        let mut next = self.head.lock().next.take();
        while let Some(node) = next {
            next = node.lock().next.take();
        }
    }
}

impl<T: Debug> Debug for ConcurrentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.for_each(|value| {
            list.entry(value);
        });
        list.finish()
    }
}

impl<T> FromIterator<T> for ConcurrentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = Self::new();
        list.extend_back(iter);
        list
    }
}

impl<T> Extend<T> for ConcurrentList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_back(iter);
    }
}

impl<T> ConcurrentList<T> {
    fn extend_back<I: IntoIterator<Item = T>>(&self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}
