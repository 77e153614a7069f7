use std::{io, thread};

use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// Sending half of a serial worker plus the id of the thread it runs on.
pub(crate) struct SerialWorker<T> {
    pub(crate) sender: UnboundedSender<T>,
    pub(crate) thread: thread::ThreadId,
}

/// Spawns a named thread that hands every message to `handle`, one at a time,
/// in the order the channel accepted them.
///
/// The thread exits once every sender is dropped and the backlog is drained.
pub(crate) fn spawn_serial<T, F>(label: &str, mut handle: F) -> io::Result<SerialWorker<T>>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let (sender, mut receiver) = unbounded_channel::<T>();
    let worker = label.to_owned();

    let join = thread::Builder::new()
        .name(label.to_owned())
        .spawn(move || {
            tracing::debug!(worker = %worker, "serial worker started");
            // A fresh OS thread has no runtime context, so blocking here is allowed.
            while let Some(msg) = receiver.blocking_recv() {
                handle(msg);
            }
            tracing::debug!(worker = %worker, "serial worker stopped");
        })?;

    Ok(SerialWorker {
        sender,
        thread: join.thread().id(),
    })
}
