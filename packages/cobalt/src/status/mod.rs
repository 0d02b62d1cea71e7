//! # Animated status loops
//!
//! A status loop is a [`Coroutine`](crate::co::Coroutine) that renders frames
//! like `.`, `..`, `...` on a [`StatusTarget`](crate::host::StatusTarget), one
//! frame every period, until its [`TerminationFlag`] is set.
//!
//! ```rust
//! # use pistonite_cobalt as cobalt;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use cobalt::host::{StatusSink, StatusTarget, SurfaceId, Timeline};
//! use cobalt::status::{self, Phase, TerminationFlag};
//!
//! #[derive(Default)]
//! struct Frames(RefCell<Vec<String>>);
//! impl StatusSink for Frames {
//!     fn render_status(&self, _: &StatusTarget, text: &str) -> cobalt::Result<()> {
//!         self.0.borrow_mut().push(text.to_string());
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> cobalt::Result<()> {
//! let timeline = Timeline::new();
//! let frames = Rc::new(Frames::default());
//! let flag = TerminationFlag::new();
//! let status = status::animate(status::BUSY_FRAMES)
//!     .period(Duration::from_millis(200))
//!     .target(StatusTarget::surface(SurfaceId(1), "build"))
//!     .start(&flag, Rc::new(timeline.clone()), frames.clone())?;
//!
//! timeline.advance(Duration::from_millis(650))?;
//! flag.stop();
//! timeline.run_until_idle(1)?;
//!
//! assert_eq!(status.phase(), Phase::Stopped);
//! assert_eq!(*frames.0.borrow(), vec![".", "..", "...", "."]);
//! # Ok(()) }
//! ```

mod animation;
pub use animation::{Phase, StatusLoop, StatusLoopBuilder, animate};

mod flag;
pub use flag::{Finalizer, StopSignal, TerminationFlag};

mod frames;
pub use frames::{BUSY_FRAMES, busy_frames};
