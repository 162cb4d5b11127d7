use std::sync::{Arc, Weak};

use lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

/// A node of the chain. The `Arc` is what lets a thread keep a node alive
/// while it holds (or waits for) the node's lock.
pub(crate) type NodeRef<T> = Arc<Mutex<Link<T>>>;

/// Non-owning handle to a node.
pub(crate) type WeakNode<T> = Weak<Mutex<Link<T>>>;

/// An owned lock over a node.
pub(crate) type NodeGuard<T> = ArcMutexGuard<RawMutex, Link<T>>;

/// The lock-protected part of a node.
pub(crate) struct Link<T> {
    /// `None` for the head sentinel and for nodes that were unlinked.
    pub(crate) value: Option<Arc<T>>,
    /// The only owning edge to the successor.
    pub(crate) next: Option<NodeRef<T>>,
    /// Set under this node's lock once it has been cut out of the chain.
    pub(crate) unlinked: bool,
}

impl<T> Link<T> {
    /// Allocate the payload-less head sentinel.
    pub(crate) fn sentinel() -> NodeRef<T> {
        Arc::new(Mutex::new(Link {
            value: None,
            next: None,
            unlinked: false,
        }))
    }

    /// Allocate a node holding `value` in front of `next`.
    pub(crate) fn node(value: T, next: Option<NodeRef<T>>) -> NodeRef<T> {
        Arc::new(Mutex::new(Link {
            value: Some(Arc::new(value)),
            next,
            unlinked: false,
        }))
    }

    /// The payload, `None` only for the sentinel and unlinked nodes.
    #[inline]
    pub(crate) fn value(&self) -> Option<&Arc<T>> {
        self.value.as_ref()
    }

    /// `true` if this node has no successor.
    #[inline]
    pub(crate) fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// `true` once this node has been cut out of the chain.
    #[inline]
    pub(crate) fn is_unlinked(&self) -> bool {
        self.unlinked
    }
}
