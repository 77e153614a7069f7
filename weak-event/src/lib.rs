#![cfg_attr(docsrs, feature(doc_cfg))]
//! # weak-event
//!
//! A thread-safe event whose subscriptions garbage-collect themselves.
//!
//! Observers attach handlers to an [`Event`] and receive a [`Handle`]. The
//! handle *is* the subscription: as long as it is alive the handler fires on
//! every raise, and once the last owner drops it the handler stops firing.
//! There is no unsubscribe call and the event never keeps a handle alive.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use weak_event::{Event, Sender};
//!
//! struct Thermometer {
//!     changed: Event<f32>,
//! }
//!
//! let thermometer = Arc::new(Thermometer { changed: Event::new() });
//!
//! let display = thermometer.changed.subscribe(|_sender: &Sender, celsius: &f32| {
//!     println!("now {celsius:.1} °C");
//! });
//!
//! thermometer.changed.raise(thermometer.clone(), 21.5);
//!
//! // The display goes away; its handler will not fire again.
//! drop(display);
//! thermometer.changed.trim();
//! assert_eq!(thermometer.changed.handler_count(), 0);
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Event`] | Subscribable, raisable notification primitive |
//! | [`Handle`] | Caller-owned token; its lifetime is the subscription's lifetime |
//! | [`WeakSlot`] | Non-owning reference used to track handle liveness |
//! | [`ExecutionContext`] | Where a handler runs (main queue, a named queue, a Tokio runtime) |
//! | [`DispatchQueue`] | Named serial FIFO executor backed by its own thread |
//! | [`EventConfig`] | Worker label, trim-on-raise default and default context |
//! | [`Error`] | The crate's error type |
//!
//! ## Ordering
//!
//! All bookkeeping (subscribe, raise scan, trim, count) is serialized on the
//! event's own worker, in the order the worker receives it. Handlers run
//! elsewhere, on their subscribed contexts, so `raise` returns before they
//! run and handlers of one raise finish in no guaranteed order.
//!
//! Dead slots are removed lazily, on [`Event::trim`] or on a trimming raise.
//! Until then [`Event::handler_count`] still counts them.
//!
//! ## Features
//!
//! - **`test-harness`** - [`testing::Recorder`] for waiting on and asserting handler calls

mod config;
mod context;
mod error;
mod event;
mod handle;
mod handle_id;
mod queue;
mod slot;

mod internal;

#[cfg(any(test, feature = "test-harness"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-harness")))]
pub mod testing;

pub use config::EventConfig;
pub use context::ExecutionContext;
pub use error::Error;
pub use event::Event;
pub use handle::{Handle, Sender};
pub use handle_id::HandleId;
pub use queue::{DispatchQueue, Job};
pub use slot::WeakSlot;

/// Convenience alias for `Result<T, weak_event::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
