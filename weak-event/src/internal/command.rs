use std::{fmt, sync::Arc};

use tokio::sync::oneshot;

use crate::{Job, Sender, WeakSlot, handle::Subscription};

/// Work item for an event's serial worker.
pub(crate) enum EventCommand<A> {
    Subscribe(WeakSlot<Subscription<A>>),
    Raise {
        sender: Sender,
        argument: Arc<A>,
        trim: bool,
    },
    /// `then` runs on the worker right after the purge.
    Trim {
        then: Option<Job>,
    },
    Count(oneshot::Sender<usize>),
}

impl<A> fmt::Debug for EventCommand<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCommand::Subscribe(slot) => f.debug_tuple("Subscribe").field(slot).finish(),
            EventCommand::Raise { trim, .. } => {
                f.debug_struct("Raise").field("trim", trim).finish_non_exhaustive()
            }
            EventCommand::Trim { then } => f
                .debug_struct("Trim")
                .field("then", &then.is_some())
                .finish(),
            EventCommand::Count(_) => f.write_str("Count"),
        }
    }
}
