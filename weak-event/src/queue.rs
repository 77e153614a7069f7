use std::{
    any::Any,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, OnceLock},
    thread::{self, ThreadId},
};

use tokio::sync::mpsc::UnboundedSender;

use crate::{Error, Result, internal::spawn_serial};

/// A unit of work submitted to a [`DispatchQueue`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A named, serial, FIFO executor backed by a dedicated OS thread.
///
/// Jobs run one at a time, in the order they were accepted. Cloning a queue
/// yields another handle to the same worker; the worker exits after the last
/// clone is dropped and the jobs already queued have run.
///
/// A job that panics is caught and logged. The queue keeps serving the jobs
/// behind it.
///
/// # Example
///
/// ```rust
/// use weak_event::DispatchQueue;
///
/// let ui = DispatchQueue::new("ui");
/// ui.execute(|| println!("runs on the ui thread"));
/// ```
#[derive(Clone)]
pub struct DispatchQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    label: Arc<str>,
    sender: UnboundedSender<Job>,
    thread: ThreadId,
}

impl DispatchQueue {
    /// The label of the process-wide queue returned by [`DispatchQueue::main`].
    pub const MAIN_LABEL: &'static str = "main";

    /// The label of the queue returned by [`DispatchQueue::bookkeeping`].
    pub const BOOKKEEPING_LABEL: &'static str = "weak-event.bookkeeping";

    /// Creates a queue and spawns its worker thread, named after `label`.
    ///
    /// # Panics
    ///
    /// Panics if the operating system fails to create the thread, like
    /// [`std::thread::spawn`]. Use [`DispatchQueue::try_new`] to handle that case.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        match Self::try_new(label) {
            Ok(queue) => queue,
            Err(e) => panic!("failed to start dispatch queue: {e}"),
        }
    }

    pub fn try_new(label: impl Into<Arc<str>>) -> Result<Self> {
        let label: Arc<str> = label.into();
        let worker_label = label.clone();
        let worker = spawn_serial(&label, move |job: Job| run_job(&worker_label, job))?;

        Ok(Self {
            inner: Arc::new(QueueInner {
                label,
                sender: worker.sender,
                thread: worker.thread,
            }),
        })
    }

    /// Returns the process-wide default queue.
    ///
    /// It is created on first use and lives until the process exits. This is
    /// the queue behind [`ExecutionContext::Main`](crate::ExecutionContext::Main).
    pub fn main() -> &'static DispatchQueue {
        static MAIN: OnceLock<DispatchQueue> = OnceLock::new();
        MAIN.get_or_init(|| DispatchQueue::new(Self::MAIN_LABEL))
    }

    /// Returns the process-wide queue that runs event bookkeeping.
    ///
    /// Every [`Event`](crate::Event) without a configured worker submits its
    /// subscribe, raise, trim and count jobs here. Handlers never run on it.
    ///
    /// # Panics
    ///
    /// Panics on first use if the worker thread cannot be spawned.
    pub fn bookkeeping() -> &'static DispatchQueue {
        static BOOKKEEPING: OnceLock<DispatchQueue> = OnceLock::new();
        BOOKKEEPING.get_or_init(|| DispatchQueue::new(Self::BOOKKEEPING_LABEL))
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Returns `true` when called from a job running on this queue.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.inner.thread
    }

    /// Enqueues `job` without waiting for it to run.
    ///
    /// If the worker is gone the job is dropped and a warning is logged.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        if self.try_execute(job).is_err() {
            tracing::warn!(queue = %self.inner.label, "dispatch queue closed, job dropped");
        }
    }

    /// Enqueues `job`, reporting [`Error::QueueClosed`] if the worker is gone.
    pub fn try_execute(&self, job: impl FnOnce() + Send + 'static) -> Result {
        self.inner
            .sender
            .send(Box::new(job))
            .map_err(|_| Error::QueueClosed)
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("label", &self.inner.label)
            .field("thread", &self.inner.thread)
            .finish()
    }
}

impl PartialEq for DispatchQueue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DispatchQueue {}

fn run_job(label: &str, job: Job) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
        tracing::error!(queue = %label, panic = %panic_message(&*panic), "job panicked");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
