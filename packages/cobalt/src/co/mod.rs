//! # Self-aware coroutines
//!
//! Callback-based hosts want a function to call later. A [`Coroutine`] is a
//! state machine that wants to be resumed later. The [`SendSelf`] adapter
//! connects the two: it gives the coroutine a [`SelfHandle`] pointing at itself,
//! and the coroutine passes `handle.next_callback()` (or
//! `handle.send_callback()`) to the host as the callback.
//!
//! # Protocol
//! When the trigger is called, the coroutine is:
//! 1. constructed,
//! 2. resumed with [`Resume::Start`], and must suspend right away
//!    with [`Step::Yield`] (the handshake),
//! 3. resumed with [`Resume::Handle`], carrying its own handle. It runs until
//!    its first real suspension point (where it usually schedules a callback).
//!
//! A coroutine that completes during step 2 or 3 breaks the protocol, and the
//! trigger returns an error.
//!
//! After that, the coroutine is resumed with [`Resume::Next`] or [`Resume::Send`]
//! every time one of its callbacks runs, until it returns [`Step::Complete`]
//! or an error. Either way it is dropped at that point.
//!
//! ```rust
//! # use pistonite_cobalt as cobalt;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cobalt::co::{self, Resume, SendSelf, Step};
//!
//! # fn main() -> cobalt::Result<()> {
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let adder = {
//!     let seen = Rc::clone(&seen);
//!     SendSelf::new(move || {
//!         let seen = Rc::clone(&seen);
//!         co::from_fn(move |resume: Resume<u32>| {
//!             match resume {
//!                 Resume::Send(x) => seen.borrow_mut().push(x),
//!                 _ => {}
//!             }
//!             if seen.borrow().len() == 2 {
//!                 return Ok(Step::Complete);
//!             }
//!             Ok(Step::Yield)
//!         })
//!     })
//! };
//! let task = adder.trigger()?;
//! let handle = task.handle();
//! handle.send(1)?;
//! assert!(!task.is_finished());
//! handle.send(2)?;
//! assert!(task.is_finished());
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! # Ok(()) }
//! ```

mod coroutine;
pub use coroutine::{Coroutine, FnCoroutine, Resume, Step, from_fn};

mod handle;
pub use handle::{Ownership, SelfHandle, Task};

mod send_self;
pub use send_self::{SendSelf, Trigger, send_self};
