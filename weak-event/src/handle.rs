use std::{any::Any, fmt, sync::Arc};

use crate::{ExecutionContext, HandleId, WeakSlot};

/// The object that raised an event, as seen by handlers.
///
/// Handlers that care about the sender downcast it:
/// `sender.downcast_ref::<MyModel>()`.
pub type Sender = Arc<dyn Any + Send + Sync>;

pub(crate) type Callback<A> = Box<dyn Fn(&Sender, &A) + Send + Sync + 'static>;

/// One subscription: a callback and the context it must run on.
///
/// Only ever owned through the `Arc` inside a [`Handle`]; the event keeps a
/// [`WeakSlot`] to it.
pub(crate) struct Subscription<A> {
    id: HandleId,
    callback: Callback<A>,
    context: ExecutionContext,
}

impl<A> Subscription<A> {
    pub(crate) fn new<F>(callback: F, context: ExecutionContext) -> Self
    where
        F: Fn(&Sender, &A) + Send + Sync + 'static,
    {
        Self {
            id: HandleId::generate(),
            callback: Box::new(callback),
            context,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> HandleId {
        self.id
    }

    #[inline]
    pub(crate) fn context(&self) -> &ExecutionContext {
        &self.context
    }

    #[inline]
    pub(crate) fn invoke(&self, sender: &Sender, argument: &A) {
        (self.callback)(sender, argument)
    }
}

/// Keeps a subscription alive.
///
/// Returned by [`Event::subscribe`](crate::Event::subscribe). The handler keeps
/// firing for as long as this value exists; dropping it is the only way to
/// unsubscribe. The event itself never holds a strong reference to it.
///
/// Two handles are equal only if they are the same subscription, regardless
/// of the closures or contexts they were created with.
///
/// # Example
///
/// ```rust
/// use weak_event::Event;
///
/// let event: Event<i32> = Event::new();
/// let handle = event.subscribe(|_, value| println!("got {value}"));
/// assert_eq!(event.handler_count(), 1);
///
/// drop(handle);
/// event.trim();
/// assert_eq!(event.handler_count(), 0);
/// ```
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct Handle<A> {
    subscription: Arc<Subscription<A>>,
}

impl<A> Handle<A> {
    pub(crate) fn new(subscription: Subscription<A>) -> Self {
        Self {
            subscription: Arc::new(subscription),
        }
    }

    pub(crate) fn slot(&self) -> WeakSlot<Subscription<A>> {
        WeakSlot::new(&self.subscription)
    }

    pub fn id(&self) -> HandleId {
        self.subscription.id()
    }

    /// The context the handler runs on.
    pub fn context(&self) -> &ExecutionContext {
        self.subscription.context()
    }
}

impl<A> PartialEq for Handle<A> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.subscription, &other.subscription)
    }
}

impl<A> Eq for Handle<A> {}

impl<A> fmt::Debug for Handle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id())
            .field("context", &self.context().name())
            .finish()
    }
}
