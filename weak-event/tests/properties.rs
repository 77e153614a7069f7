use std::{sync::Arc, time::Duration};

use weak_event::{
    DispatchQueue, Event, EventConfig, Handle,
    testing::{DEFAULT_WAIT_TIMEOUT, Recorder},
};

const QUIET: Duration = Duration::from_millis(50);

fn event<A: Send + Sync + 'static>(label: &str) -> Event<A> {
    Event::with_config(
        EventConfig::default()
            .with_label(label)
            .with_default_context(DispatchQueue::new(format!("{label}-handlers"))),
    )
}

#[test]
fn count_after_trim_matches_retained_handles() {
    let event: Event<u8> = event("weak-expiry");
    let mut handles: Vec<Handle<u8>> = (0..10).map(|_| event.subscribe(|_, _| {})).collect();

    // Drop every third handle
    let mut i = 0;
    handles.retain(|_| {
        i += 1;
        i % 3 != 0
    });

    event.trim();
    assert_eq!(event.handler_count(), handles.len());
    assert_eq!(handles.len(), 7);
}

#[test]
fn raise_delivers_exact_sender_and_argument() {
    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        sensor: u16,
        value: f64,
    }

    struct Sensor;

    let event: Event<Reading> = event("value-fidelity");
    let recorder = Recorder::new();
    let _handle = event.subscribe(recorder.handler());

    let reading = Reading {
        sensor: 7,
        value: 21.25,
    };
    event.raise(Arc::new(Sensor), reading.clone());

    recorder.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();
    recorder.settle(QUIET);
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argument, reading);
    assert!(calls[0].sender_as::<Sensor>().is_some());
}

#[test]
fn every_live_handler_fires_once_per_raise() {
    const N: usize = 16;
    let event: Event<&'static str> = event("fan-out");
    let recorders: Vec<Recorder<&'static str>> = (0..N).map(|_| Recorder::new()).collect();

    // Subscribe in reverse to show order does not matter
    let _handles: Vec<_> = recorders
        .iter()
        .rev()
        .map(|r| event.subscribe(r.handler()))
        .collect();

    event.raise(Arc::new(()), "tick");
    for recorder in &recorders {
        recorder.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();
    }
    for recorder in &recorders {
        recorder.settle(QUIET);
        assert_eq!(recorder.arguments(), vec!["tick"]);
    }
}

#[test]
fn dropped_handle_is_not_invoked() {
    let event: Event<u32> = event("no-dispatch-after-drop");
    let recorder = Recorder::new();
    let handle = event.subscribe(recorder.handler());

    event.raise(Arc::new(()), 1);
    recorder.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();

    drop(handle);
    event.raise(Arc::new(()), 2);
    event.raise_with(Arc::new(()), 3, false);
    recorder.settle(QUIET);

    assert_eq!(recorder.arguments(), vec![1]);
}

#[test]
fn partial_survival() {
    let event: Event<&'static str> = event("partial-survival");
    let (r1, r2, r3) = (Recorder::new(), Recorder::new(), Recorder::new());

    let h1 = event.subscribe(r1.handler());
    let h2 = event.subscribe(r2.handler());
    let h3 = event.subscribe(r3.handler());
    assert_ne!(h1, h3);

    drop(h2);
    event.raise(Arc::new("S"), "x");

    r1.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();
    r3.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();
    r2.settle(QUIET);

    assert_eq!(r1.arguments(), vec!["x"]);
    assert_eq!(r3.arguments(), vec!["x"]);
    assert!(r2.is_empty());

    event.trim();
    assert_eq!(event.handler_count(), 2);
}

#[test]
fn trim_twice_is_stable() {
    let event: Event<()> = event("idempotent-trim");
    let _a = event.subscribe(|_, _| {});
    let _b = event.subscribe(|_, _| {});
    drop(event.subscribe(|_, _| {}));

    event.trim();
    let first = event.handler_count();
    event.trim();
    let second = event.handler_count();

    assert_eq!(first, 2);
    assert_eq!(first, second);
}

#[test]
fn single_handler_on_main_context() {
    let event: Event<&'static str> = Event::new();
    let recorder = Recorder::new();
    let _h1 = event.subscribe(recorder.handler());
    assert_eq!(event.handler_count(), 1);

    event.raise(Arc::new("S"), "hello");
    recorder.wait_for(1, DEFAULT_WAIT_TIMEOUT).unwrap();
    recorder.settle(QUIET);

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].sender_as::<&str>(), Some(&"S"));
    assert_eq!(calls[0].argument, "hello");
    assert_eq!(event.handler_count(), 1);
}

#[test]
fn unretained_handle_expires_immediately() {
    let event: Event<u8> = event("unretained");
    let recorder = Recorder::new();
    let _ = event.subscribe(recorder.handler());

    event.raise(Arc::new(()), 1);
    recorder.settle(QUIET);
    assert!(recorder.is_empty());
    assert_eq!(event.handler_count(), 0);
}
