use std::{
    fmt,
    sync::{Arc, Weak},
};

/// A non-owning reference to a `T`, used to observe whether it is still alive.
///
/// The slot is bound to its target once, at construction. It never keeps
/// the target alive, and once the target has been dropped [`value`](Self::value)
/// returns `None` forever after.
pub struct WeakSlot<T: ?Sized> {
    target: Weak<T>,
}

impl<T: ?Sized> WeakSlot<T> {
    pub fn new(target: &Arc<T>) -> Self {
        Self {
            target: Arc::downgrade(target),
        }
    }

    /// Returns the referent if it is still alive.
    ///
    /// The returned `Arc` is a temporary strong reference; holding on to it
    /// keeps the referent alive for as long as it is held.
    #[inline]
    pub fn value(&self) -> Option<Arc<T>> {
        self.target.upgrade()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl<T: ?Sized> Clone for WeakSlot<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for WeakSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSlot")
            .field("alive", &self.is_alive())
            .finish()
    }
}
