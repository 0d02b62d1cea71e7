//! Sequential coroutines over callback-based timer hosts
//!
//! # General Principal
//! Some hosts (editor extension APIs, mostly) only give you fire-and-forget
//! primitives like "call this function after N milliseconds". `cobalt`
//! lets you write the logic in a linear style anyway: a [`Coroutine`](co::Coroutine)
//! is handed a handle to itself, and passes its own `next` as the callback.
//!
//! Common things are exported at the crate root and used as
//! `cobalt::xxx` directly. Sub-functionalities are in short submodules:
//! - [`cobalt::co`](co): the "send self" adapter, self handles and tasks
//! - [`cobalt::status`](status): animated status loops and termination flags
//! - [`cobalt::host`](host): the host capabilities (timer, status sink) and
//!   a few hosts to run on
//!
//! ```rust
//! # use pistonite_cobalt as cobalt;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use cobalt::host::{StatusTarget, Timeline, LogSink};
//! use cobalt::status::{self, TerminationFlag};
//!
//! # fn main() -> cobalt::Result<()> {
//! let timeline = Timeline::new();
//! let flag = TerminationFlag::new();
//! let status = status::animate(status::busy_frames("Updating package list"))
//!     .period(Duration::from_millis(150))
//!     .target(StatusTarget::Global)
//!     .start(&flag, Rc::new(timeline.clone()), Rc::new(LogSink::default()))?;
//!
//! timeline.advance(Duration::from_millis(450))?;
//! status.stop();
//! timeline.run_until_idle(16)?;
//! assert!(status.is_stopped());
//! # Ok(()) }
//! ```
//!
//! # Ownership
//! The self handle is weak by default, so the coroutine is only alive while
//! something else owns it (the [`Task`](co::Task) returned when starting it).
//! Dropping every owner silently stalls the coroutine: the pending timer
//! still fires, but there is nothing left to resume.
//! Use [`Ownership::Strong`](co::Ownership) to let the coroutine keep itself alive
//! until it completes.
//!
//! # `log` integration
//! Everything is logged through the `log` facade (re-exported here).
//! [`log_init`] installs a small stderr logger for tests and binaries.
//!
//! Quick Feature Reference:
//! - `coroutine` (default): tokio-backed [`LocalTimer`](host::LocalTimer) host
//! - `serde`: `Deserialize` for [`StatusConfig`]

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod co;
pub mod host;
pub mod status;

mod config;
pub use config::{ENV_STATUS_OWNERSHIP, ENV_STATUS_PERIOD_MS, StatusConfig};

mod env_var;
pub use env_var::*;

mod logging;
pub use logging::log_init;

// Atomic helpers
mod atomic;
pub use atomic::*;

mod error_handling;
pub use error_handling::*;

// re-exports from libraries
pub use log::{debug, error, info, trace, warn};

/// Prelude imports
pub mod pre {
    pub use crate::Context as _;
}
