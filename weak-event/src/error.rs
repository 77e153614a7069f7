use std::sync::Arc;

/// The single error type for all fallible `weak-event` operations.
///
/// The event operations themselves (`subscribe`, `raise`, `trim`,
/// `handler_count`) are total. Errors only surface where the crate talks to
/// the operating system (spawning worker threads) or where a caller submits
/// work to a queue that has already shut down.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] Arc<std::io::Error>),

    #[error("Dispatch queue closed")]
    QueueClosed,

    #[cfg(any(test, feature = "test-harness"))]
    #[error("wait condition not met within {0:?}: {1} calls recorded")]
    SettleTimeout(std::time::Duration, usize),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Spawn(a), Self::Spawn(b)) => Arc::ptr_eq(a, b),
            (Self::QueueClosed, Self::QueueClosed) => true,
            #[cfg(any(test, feature = "test-harness"))]
            (Self::SettleTimeout(a1, a2), Self::SettleTimeout(b1, b2)) => a1 == b1 && a2 == b2,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Spawn(Arc::new(e))
    }
}
