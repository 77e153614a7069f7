use crate::{DispatchQueue, ExecutionContext};

/// Configuration for an [`Event`](crate::Event).
///
/// Use the builder methods to customize, or [`Default`] for sensible defaults.
///
/// # Examples
///
/// ```rust
/// use weak_event::{DispatchQueue, Event, EventConfig};
///
/// let ui = DispatchQueue::new("ui");
/// let config = EventConfig::default()
///     .with_label("model.changed")      // Name used in log fields
///     .with_trim_before_dispatch(false) // Skip the purge on every raise
///     .with_default_context(ui);        // Handlers and trim completions run on `ui`
///
/// let changed: Event<u64> = Event::with_config(config);
/// ```
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Name of the event in log fields.
    /// Default: "weak-event"
    label: String,

    /// Whether [`Event::raise`](crate::Event::raise) purges dead slots
    /// before dispatching.
    /// Default: true
    trim_before_dispatch: bool,

    /// Context used by [`Event::subscribe`](crate::Event::subscribe) and for
    /// [`Event::trim_with`](crate::Event::trim_with) completions.
    /// Default: [`ExecutionContext::Main`]
    default_context: ExecutionContext,

    /// Serial queue that runs the event's bookkeeping.
    /// Default: `None`, meaning the shared [`DispatchQueue::bookkeeping`]
    worker: Option<DispatchQueue>,
}

impl Default for EventConfig {
    fn default() -> Self {
        EventConfig {
            label: String::from("weak-event"),
            trim_before_dispatch: true,
            default_context: ExecutionContext::Main,
            worker: None,
        }
    }
}

impl EventConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set whether `raise` trims dead slots before dispatching.
    ///
    /// Dispatch skips dead slots either way; disabling the trim only means
    /// they stay counted by `handler_count` until the next explicit `trim`.
    pub fn with_trim_before_dispatch(mut self, trim: bool) -> Self {
        self.trim_before_dispatch = trim;
        self
    }

    pub fn trim_before_dispatch(&self) -> bool {
        self.trim_before_dispatch
    }

    pub fn with_default_context(mut self, context: impl Into<ExecutionContext>) -> Self {
        self.default_context = context.into();
        self
    }

    pub fn default_context(&self) -> &ExecutionContext {
        &self.default_context
    }

    /// Run the event's bookkeeping on `worker` instead of the shared one.
    ///
    /// Handlers must not be subscribed on this same queue: a handler calling
    /// `handler_count` would then wait on the queue it is running on.
    pub fn with_worker(mut self, worker: DispatchQueue) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn worker(&self) -> Option<&DispatchQueue> {
        self.worker.as_ref()
    }
}
