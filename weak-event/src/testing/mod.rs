//! Test helpers for observing handler invocations.
//!
//! Enable with the `test-harness` feature:
//!
//! ```toml
//! [dev-dependencies]
//! weak-event = { version = "0.1", features = ["test-harness"] }
//! ```
//!
//! Handlers run asynchronously on their own contexts, so assertions have to
//! wait for them. [`Recorder`] collects every call and lets a test block until
//! the expected number has arrived.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use weak_event::{Event, testing::Recorder};
//!
//! let event: Event<&'static str> = Event::new();
//! let recorder = Recorder::new();
//! let _handle = event.subscribe(recorder.handler());
//!
//! event.raise(std::sync::Arc::new("S"), "hello");
//! recorder.wait_for(1, Duration::from_secs(1))?;
//! assert_eq!(recorder.arguments(), vec!["hello"]);
//! ```

mod recorder;

pub use recorder::{Call, DEFAULT_WAIT_TIMEOUT, Recorder};
