use std::rc::Rc;
use std::time::Duration;

use tokio::runtime::Builder;
use tokio::task::LocalSet;

use crate::pre::*;

use super::{Callback, Timer};

/// A [`Timer`] that schedules callbacks on the current tokio [`LocalSet`].
///
/// Each callback becomes a local task that sleeps for the delay, then runs.
/// Since the callbacks (and the coroutines they resume) are not `Send`,
/// they must run on a `LocalSet`, for example with [`block_local`].
///
/// Errors returned by callbacks are logged with `error!`, or passed to the
/// handler set with [`on_error`](Self::on_error).
///
/// # Panics
/// Scheduling panics if the current thread is not running a `LocalSet`
/// (same as [`tokio::task::spawn_local`]).
#[derive(Clone, Default)]
pub struct LocalTimer {
    on_error: Option<Rc<dyn Fn(crate::Error)>>,
}

impl std::fmt::Debug for LocalTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTimer")
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl LocalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle errors returned by callbacks, instead of logging them
    pub fn on_error(mut self, handler: impl Fn(crate::Error) + 'static) -> Self {
        self.on_error = Some(Rc::new(handler));
        self
    }
}

impl Timer for LocalTimer {
    fn schedule_after(&self, delay: Duration, callback: Callback) {
        let on_error = self.on_error.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = callback() {
                match on_error {
                    Some(handler) => handler(e),
                    None => crate::error!("timer callback failed: {e:?}"),
                }
            }
        });
    }
}

/// Run a future on a new current-thread runtime inside a [`LocalSet`],
/// then keep running until every local task (i.e. every pending
/// [`LocalTimer`] callback) is done.
///
/// Note that a coroutine that never stops (for example, a strong status
/// loop whose flag is never set) keeps this from returning.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use cobalt::host::{LocalTimer, LogSink, block_local};
/// use cobalt::status::{self, TerminationFlag};
///
/// # fn main() -> cobalt::Result<()> {
/// let flag = TerminationFlag::new();
/// let status = block_local(async {
///     let status = status::animate(status::BUSY_FRAMES)
///         .period(Duration::from_millis(10))
///         .start(&flag, Rc::new(LocalTimer::new()), Rc::new(LogSink::default()))?;
///     tokio::time::sleep(Duration::from_millis(35)).await;
///     status.stop();
///     cobalt::Ok(status)
/// })??;
/// assert!(status.is_stopped());
/// # Ok(()) }
/// ```
pub fn block_local<F>(future: F) -> crate::Result<F::Output>
where
    F: Future,
{
    let runtime = crate::check!(
        Builder::new_current_thread().enable_time().build(),
        "cannot create current-thread tokio runtime"
    )?;
    let local = LocalSet::new();
    let output = local.block_on(&runtime, future);
    // drain the callbacks that are still pending
    runtime.block_on(local);
    Ok(output)
}
