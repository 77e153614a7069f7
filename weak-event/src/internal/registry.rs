use std::sync::Arc;

use crate::{Sender, WeakSlot, handle::Subscription, internal::EventCommand};

/// The ordered slot sequence of one event.
///
/// Owned by the event's serial worker; every read and write goes through
/// [`handle_command`](Self::handle_command) on that one thread.
pub(crate) struct SlotRegistry<A> {
    label: Arc<str>,
    slots: Vec<WeakSlot<Subscription<A>>>,
}

impl<A: Send + Sync + 'static> SlotRegistry<A> {
    pub fn new(label: Arc<str>) -> Self {
        Self {
            label,
            slots: Vec::new(),
        }
    }

    pub fn handle_command(&mut self, cmd: EventCommand<A>) {
        use EventCommand::*;
        match cmd {
            Subscribe(slot) => {
                self.slots.push(slot);
                tracing::trace!(event = %self.label, slots = self.len(), "slot appended");
            }
            Raise {
                sender,
                argument,
                trim,
            } => {
                if trim {
                    self.trim();
                }
                self.dispatch(&sender, &argument);
            }
            Trim { then } => {
                self.trim();
                if let Some(then) = then {
                    then();
                }
            }
            Count(reply) => {
                let _ = reply.send(self.slots.len());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Drops every slot whose handle is gone, keeping the survivors in order.
    pub fn trim(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(WeakSlot::is_alive);
        let removed = before - self.slots.len();

        tracing::debug!(
            event = %self.label,
            before,
            after = self.slots.len(),
            removed,
            "slots trimmed"
        );
        removed
    }

    /// Hands every live handler to its own context. Returns how many were scheduled.
    ///
    /// Jobs carry a weak slot, not the subscription: a handle dropped while
    /// its job is still queued is not kept alive and is skipped when the job runs.
    fn dispatch(&self, sender: &Sender, argument: &Arc<A>) -> usize {
        let mut dispatched = 0;
        let mut skipped = 0;

        for slot in &self.slots {
            let Some(subscription) = slot.value() else {
                skipped += 1;
                continue;
            };

            let context = subscription.context().clone();
            tracing::trace!(
                event = %self.label,
                handle = %subscription.id(),
                context = %context,
                "handler dispatched"
            );
            drop(subscription);

            let slot = slot.clone();
            let sender = Arc::clone(sender);
            let argument = Arc::clone(argument);
            context.execute(move || {
                if let Some(subscription) = slot.value() {
                    subscription.invoke(&sender, &argument);
                }
            });
            dispatched += 1;
        }

        tracing::debug!(event = %self.label, dispatched, skipped, "event raised");
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::{DispatchQueue, ExecutionContext, Handle, testing::Recorder};

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn registry() -> SlotRegistry<u32> {
        SlotRegistry::new(Arc::from("test-registry"))
    }

    fn subscribe(
        registry: &mut SlotRegistry<u32>,
        recorder: &Recorder<u32>,
        context: &ExecutionContext,
    ) -> Handle<u32> {
        let handle = Handle::new(Subscription::new(recorder.handler(), context.clone()));
        registry.handle_command(EventCommand::Subscribe(handle.slot()));
        handle
    }

    fn count(registry: &mut SlotRegistry<u32>) -> usize {
        let (tx, mut rx) = oneshot::channel();
        registry.handle_command(EventCommand::Count(tx));
        rx.try_recv().unwrap()
    }

    fn raise(registry: &mut SlotRegistry<u32>, value: u32, trim: bool) {
        registry.handle_command(EventCommand::Raise {
            sender: Arc::new("registry-test"),
            argument: Arc::new(value),
            trim,
        });
    }

    #[test]
    fn test_count_includes_dead_slots_until_trim() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let context = ExecutionContext::Main;

        let a = subscribe(&mut registry, &recorder, &context);
        let b = subscribe(&mut registry, &recorder, &context);
        assert_eq!(count(&mut registry), 2);

        drop(b);
        assert_eq!(count(&mut registry), 2);
        assert_eq!(registry.trim(), 1);
        assert_eq!(count(&mut registry), 1);
        drop(a);
    }

    #[test]
    fn test_trim_preserves_order_of_survivors() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let context = ExecutionContext::Main;

        let handles: Vec<_> = (0..5)
            .map(|_| subscribe(&mut registry, &recorder, &context))
            .collect();
        let ids: Vec<_> = handles.iter().map(Handle::id).collect();

        let kept: Vec<_> = handles
            .into_iter()
            .enumerate()
            .filter_map(|(i, h)| (i % 2 == 0).then_some(h))
            .collect();
        registry.trim();

        let remaining: Vec<_> = registry
            .slots
            .iter()
            .filter_map(|s| s.value().map(|s| s.id()))
            .collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
        assert_eq!(registry.len(), kept.len());
    }

    #[test]
    fn test_trim_is_idempotent() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let context = ExecutionContext::Main;

        let _a = subscribe(&mut registry, &recorder, &context);
        drop(subscribe(&mut registry, &recorder, &context));

        assert_eq!(registry.trim(), 1);
        assert_eq!(registry.trim(), 0);
        assert_eq!(count(&mut registry), 1);
    }

    #[test]
    fn test_raise_skips_dead_slots() {
        let mut registry = registry();
        let live = Recorder::new();
        let dead = Recorder::new();
        let context = ExecutionContext::Queue(DispatchQueue::new("test-registry-raise"));

        let _keep = subscribe(&mut registry, &live, &context);
        drop(subscribe(&mut registry, &dead, &context));

        let sender: Sender = Arc::new("registry-test");
        assert_eq!(registry.dispatch(&sender, &Arc::new(7)), 1);
        live.wait_for(1, TIMEOUT).unwrap();
        dead.settle(Duration::from_millis(50));

        assert_eq!(live.arguments(), vec![7]);
        assert!(dead.is_empty());
        // Without trimming the dead slot is still stored.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_queued_job_does_not_keep_handle_alive() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let queue = DispatchQueue::new("test-registry-blocked");
        let context = ExecutionContext::Queue(queue.clone());

        // Hold the queue so the dispatched job stays pending.
        let (release, gate) = std::sync::mpsc::channel::<()>();
        queue.execute(move || {
            let _ = gate.recv_timeout(TIMEOUT);
        });

        let handle = subscribe(&mut registry, &recorder, &context);
        raise(&mut registry, 3, true);
        assert_eq!(count(&mut registry), 1);

        drop(handle);
        assert_eq!(registry.trim(), 1);
        assert_eq!(count(&mut registry), 0);

        release.send(()).unwrap();
        recorder.settle(Duration::from_millis(50));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_raise_with_trim_purges_first() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let context = ExecutionContext::Queue(DispatchQueue::new("test-registry-trim"));

        let _keep = subscribe(&mut registry, &recorder, &context);
        drop(subscribe(&mut registry, &recorder, &context));

        raise(&mut registry, 1, true);
        assert_eq!(registry.len(), 1);
        recorder.wait_for(1, TIMEOUT).unwrap();
    }

    #[test]
    fn test_trim_completion_runs_after_purge() {
        let mut registry = registry();
        let recorder = Recorder::new();
        let context = ExecutionContext::Main;
        drop(subscribe(&mut registry, &recorder, &context));

        let (tx, mut rx) = oneshot::channel();
        registry.handle_command(EventCommand::Trim {
            then: Some(Box::new(move || {
                let _ = tx.send(());
            })),
        });
        assert!(rx.try_recv().is_ok());
        assert_eq!(registry.len(), 0);
    }
}
