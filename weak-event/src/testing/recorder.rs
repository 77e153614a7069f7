use std::{
    any::Any,
    fmt,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread,
    time::Duration,
};

use crate::{Error, Result, Sender};

/// Default timeout used by tests waiting on a [`Recorder`].
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// One recorded handler invocation.
#[derive(Clone)]
pub struct Call<A> {
    pub sender: Sender,
    pub argument: A,
}

impl<A> Call<A> {
    /// The sender, if it is a `T`.
    pub fn sender_as<T: Any>(&self) -> Option<&T> {
        self.sender.downcast_ref::<T>()
    }
}

impl<A: fmt::Debug> fmt::Debug for Call<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("argument", &self.argument)
            .finish_non_exhaustive()
    }
}

/// A thread-safe log of handler invocations.
///
/// Clones share the same log, so one clone can be moved into a handler while
/// the test keeps another to assert on.
pub struct Recorder<A> {
    inner: Arc<Shared<A>>,
}

struct Shared<A> {
    calls: Mutex<Vec<Call<A>>>,
    arrived: Condvar,
}

impl<A> Clone for Recorder<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A> Default for Recorder<A> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Shared {
                calls: Mutex::new(Vec::new()),
                arrived: Condvar::new(),
            }),
        }
    }
}

impl<A: Clone + Send + 'static> Recorder<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handler that records each call into this recorder.
    pub fn handler(&self) -> impl Fn(&Sender, &A) + Send + Sync + 'static {
        let inner = self.inner.clone();
        move |sender: &Sender, argument: &A| {
            inner.lock().push(Call {
                sender: Arc::clone(sender),
                argument: argument.clone(),
            });
            inner.arrived.notify_all();
        }
    }

    pub fn calls(&self) -> Vec<Call<A>> {
        self.inner.lock().clone()
    }

    pub fn arguments(&self) -> Vec<A> {
        self.inner
            .lock()
            .iter()
            .map(|c| c.argument.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks until at least `count` calls are recorded.
    ///
    /// Returns [`Error::SettleTimeout`] if `timeout` passes first.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Result {
        let guard = self.inner.lock();
        let (guard, result) = self
            .inner
            .arrived
            .wait_timeout_while(guard, timeout, |calls| calls.len() < count)
            .unwrap_or_else(PoisonError::into_inner);

        if result.timed_out() && guard.len() < count {
            return Err(Error::SettleTimeout(timeout, guard.len()));
        }
        Ok(())
    }

    /// Blocks until no new call has arrived for a full `window`.
    ///
    /// Used to assert that something did *not* happen.
    pub fn settle(&self, window: Duration) {
        let mut seen = self.len();
        loop {
            thread::sleep(window);
            let now = self.len();
            if now == seen {
                break;
            }
            seen = now;
        }
    }
}

impl<A> Shared<A> {
    fn lock(&self) -> MutexGuard<'_, Vec<Call<A>>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> fmt::Debug for Recorder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("calls", &self.inner.lock().len())
            .finish()
    }
}
