use std::fmt;

use crate::DispatchQueue;

/// Where a subscriber's handler runs when the event is raised.
///
/// Handlers never run on the event's own bookkeeping worker. Each raise hands
/// every live handler to the context it was subscribed with, so a slow
/// handler only delays the other jobs on its own context.
///
/// | Context | Handler runs on |
/// |---------|-----------------|
/// | [`Main`](Self::Main) | the process-wide [`DispatchQueue::main`] |
/// | [`Queue`](Self::Queue) | the given serial queue |
/// | [`Runtime`](Self::Runtime) | the blocking pool of the given Tokio runtime |
#[derive(Clone, Debug, Default)]
pub enum ExecutionContext {
    #[default]
    Main,
    Queue(DispatchQueue),
    Runtime(tokio::runtime::Handle),
}

impl ExecutionContext {
    /// Returns a [`Runtime`](Self::Runtime) context for the Tokio runtime the
    /// caller is running in, if any.
    pub fn current_runtime() -> Option<Self> {
        tokio::runtime::Handle::try_current()
            .ok()
            .map(ExecutionContext::Runtime)
    }

    /// Schedules `job` on this context without waiting for it.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        match self {
            ExecutionContext::Main => DispatchQueue::main().execute(job),
            ExecutionContext::Queue(queue) => queue.execute(job),
            ExecutionContext::Runtime(handle) => {
                // Panics are contained by the join handle, which is not awaited.
                let _ = handle.spawn_blocking(job);
            }
        }
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &str {
        match self {
            ExecutionContext::Main => DispatchQueue::MAIN_LABEL,
            ExecutionContext::Queue(queue) => queue.label(),
            ExecutionContext::Runtime(_) => "tokio",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<DispatchQueue> for ExecutionContext {
    fn from(queue: DispatchQueue) -> Self {
        ExecutionContext::Queue(queue)
    }
}

impl From<tokio::runtime::Handle> for ExecutionContext {
    fn from(handle: tokio::runtime::Handle) -> Self {
        ExecutionContext::Runtime(handle)
    }
}
