//! # Host capabilities
//!
//! `cobalt` needs exactly two things from the host it runs in:
//! - a [`Timer`] to call a function once, some time later
//! - a [`StatusSink`] to display a line of status text somewhere
//!
//! Both are traits, so any host can be plugged in. A few are provided:
//! - [`Timeline`]: a deterministic, virtual-time event loop. Time only moves
//!   when you call [`advance`](Timeline::advance). Useful for tests, and for
//!   hosts that already have their own tick.
//! - [`LocalTimer`] (`coroutine` feature): schedules callbacks on the current
//!   tokio [`LocalSet`](tokio::task::LocalSet).
//! - [`LogSink`]: renders status text as log messages.

use std::time::Duration;

mod timeline;
pub use timeline::Timeline;

#[cfg(feature = "coroutine")]
mod local;
#[cfg(feature = "coroutine")]
pub use local::{LocalTimer, block_local};

mod log_sink;
pub use log_sink::LogSink;

/// A callback scheduled on a [`Timer`].
///
/// Errors returned by the callback are for the host's dispatcher to handle.
pub type Callback = Box<dyn FnOnce() -> crate::Result<()> + 'static>;

/// Fire-and-forget timer of the host
pub trait Timer {
    /// Run `callback` once, after at least `delay` has elapsed.
    ///
    /// Nothing is promised about the order of callbacks that become due
    /// at the same time. [`Timeline`] runs them in the order they were
    /// scheduled; [`LocalTimer`] leaves it to the tokio scheduler.
    fn schedule_after(&self, delay: Duration, callback: Callback);
}

/// Status display of the host
pub trait StatusSink {
    /// Display `text` on `target`, replacing what was displayed there before.
    fn render_status(&self, target: &StatusTarget, text: &str) -> crate::Result<()>;
}

/// Identifier of a display surface (a view, a panel, a window...) of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);
impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Where status text is rendered
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum StatusTarget {
    /// The global status area
    #[default]
    Global,
    /// A status slot on a specific surface. Different keys are
    /// independent slots on the same surface.
    Surface { surface: SurfaceId, key: String },
}
impl StatusTarget {
    /// Shorthand for `StatusTarget::Surface`
    pub fn surface(surface: SurfaceId, key: impl Into<String>) -> Self {
        Self::Surface {
            surface,
            key: key.into(),
        }
    }
}
impl std::fmt::Display for StatusTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusTarget::Global => write!(f, "global"),
            StatusTarget::Surface { surface, key } if key.is_empty() => write!(f, "{surface}"),
            StatusTarget::Surface { surface, key } => write!(f, "{surface}[{key}]"),
        }
    }
}
