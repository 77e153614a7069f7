use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::oneshot;

use crate::{
    DispatchQueue, EventConfig, ExecutionContext, Handle, Sender,
    handle::Subscription,
    internal::{EventCommand, SlotRegistry},
};

/// A thread-safe event whose subscriptions expire on their own.
///
/// Subscribers attach a handler with [`subscribe`](Self::subscribe) and get a
/// [`Handle`] back. The handler fires on every [`raise`](Self::raise) for as
/// long as that handle is alive; dropping it ends the subscription without
/// any explicit unsubscribe call.
///
/// # Concurrency
///
/// Subscribing, raising, trimming and counting are submitted as jobs to the
/// event's bookkeeping worker, a serial [`DispatchQueue`], and processed one
/// at a time in the order it receives them. By default every event shares
/// the process-wide [`DispatchQueue::bookkeeping`] worker, so creating an
/// event costs no thread. Handlers never run on that worker: a raise only
/// scans the live handles and schedules each handler on its own
/// [`ExecutionContext`].
///
/// `raise` therefore returns before any handler has run, and handlers of the
/// same raise complete in no particular order relative to each other.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use weak_event::{Event, Sender};
///
/// let clicked: Event<u32> = Event::new();
/// let handle = clicked.subscribe(|_sender: &Sender, count: &u32| {
///     println!("clicked {count} times");
/// });
///
/// clicked.raise(Arc::new("button"), 3);
/// assert_eq!(clicked.handler_count(), 1);
///
/// drop(handle);
/// clicked.trim();
/// assert_eq!(clicked.handler_count(), 0);
/// ```
pub struct Event<A> {
    label: Arc<str>,
    worker: DispatchQueue,
    // Only ever locked from jobs on `worker`, so never contended.
    registry: Arc<Mutex<SlotRegistry<A>>>,
    config: EventConfig,
}

impl<A: Send + Sync + 'static> Event<A> {
    /// Creates an event with the default [`EventConfig`].
    ///
    /// # Panics
    ///
    /// Panics if the shared bookkeeping worker has to be started and the
    /// thread cannot be spawned (see [`DispatchQueue::bookkeeping`]).
    pub fn new() -> Self {
        Self::with_config(EventConfig::default())
    }

    /// # Panics
    ///
    /// Same as [`Event::new`] when no worker is configured.
    pub fn with_config(config: EventConfig) -> Self {
        let label: Arc<str> = Arc::from(config.label());
        let worker = config
            .worker()
            .cloned()
            .unwrap_or_else(|| DispatchQueue::bookkeeping().clone());

        Self {
            registry: Arc::new(Mutex::new(SlotRegistry::new(label.clone()))),
            label,
            worker,
            config,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// The serial queue this event's bookkeeping runs on.
    pub fn worker(&self) -> &DispatchQueue {
        &self.worker
    }

    /// Subscribes `handler` on the configured default context.
    ///
    /// See [`subscribe_on`](Self::subscribe_on).
    pub fn subscribe<F>(&self, handler: F) -> Handle<A>
    where
        F: Fn(&Sender, &A) + Send + Sync + 'static,
    {
        self.subscribe_on(self.config.default_context().clone(), handler)
    }

    /// Subscribes `handler` to run on `context` whenever the event is raised.
    ///
    /// The returned handle is the subscription: keep it for as long as the
    /// handler should fire. The slot is appended asynchronously, but any
    /// later call on this event from the same thread observes it.
    pub fn subscribe_on<F>(&self, context: impl Into<ExecutionContext>, handler: F) -> Handle<A>
    where
        F: Fn(&Sender, &A) + Send + Sync + 'static,
    {
        let handle = Handle::new(Subscription::new(handler, context.into()));
        self.submit(EventCommand::Subscribe(handle.slot()));
        handle
    }

    /// Raises the event, trimming first if the config says so (the default).
    pub fn raise(&self, sender: Sender, argument: A) {
        self.raise_with(sender, argument, self.config.trim_before_dispatch());
    }

    /// Raises the event.
    ///
    /// When the worker reaches this raise it optionally purges dead slots,
    /// then schedules every handler whose handle is alive at that moment on
    /// the handler's own context with `(sender, argument)`. A handle dropped
    /// before that point is never invoked; one dropped after its handler was
    /// scheduled may still fire once.
    pub fn raise_with(&self, sender: Sender, argument: A, trim_before_dispatch: bool) {
        self.submit(EventCommand::Raise {
            sender,
            argument: Arc::new(argument),
            trim: trim_before_dispatch,
        });
    }

    /// Removes the slots of dropped handles, keeping the rest in order.
    pub fn trim(&self) {
        self.submit(EventCommand::Trim { then: None });
    }

    /// Like [`trim`](Self::trim), then runs `completion` on the configured
    /// default context once the purge is done.
    pub fn trim_with(&self, completion: impl FnOnce() + Send + 'static) {
        let context = self.config.default_context().clone();
        self.submit(EventCommand::Trim {
            then: Some(Box::new(move || context.execute(completion))),
        });
    }

    /// Like [`trim`](Self::trim), resolving once the purge is done.
    pub async fn trim_async(&self) {
        let (tx, rx) = oneshot::channel();
        self.submit(EventCommand::Trim {
            then: Some(Box::new(move || {
                let _ = tx.send(());
            })),
        });
        let _ = rx.await;
    }

    /// Number of stored slots, blocking until the worker answers.
    ///
    /// Slots of dropped handles are counted until the next trim, so call
    /// [`trim`](Self::trim) first to count only live subscribers.
    ///
    /// This blocks the calling thread. Async callers should prefer
    /// [`handler_count_async`](Self::handler_count_async).
    pub fn handler_count(&self) -> usize {
        let (tx, rx) = oneshot::channel();
        self.submit(EventCommand::Count(tx));
        futures::executor::block_on(rx).unwrap_or_default()
    }

    pub async fn handler_count_async(&self) -> usize {
        let (tx, rx) = oneshot::channel();
        self.submit(EventCommand::Count(tx));
        rx.await.unwrap_or_default()
    }

    fn submit(&self, cmd: EventCommand<A>) {
        let registry = Arc::clone(&self.registry);
        let job = move || {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handle_command(cmd)
        };
        if self.worker.try_execute(job).is_err() {
            tracing::warn!(
                event = %self.label,
                worker = %self.worker.label(),
                "bookkeeping worker is gone, command dropped"
            );
        }
    }
}

impl<A: Send + Sync + 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("label", &self.label)
            .field("worker", &self.worker.label())
            .field("config", &self.config)
            .finish()
    }
}
