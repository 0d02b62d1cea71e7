use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::Atomic;

/// A hook that runs once when a status loop stops
pub type Finalizer = Box<dyn FnOnce() -> crate::Result<()> + 'static>;

/// Shared flag for telling a status loop to stop.
///
/// The flag is created by the caller and passed to the loop when starting it.
/// Anything holding a clone can set it. The loop checks it every time
/// it is resumed (once per frame), so stopping takes effect at the next
/// scheduled resumption, not immediately.
///
/// A finalize hook can be attached with [`stop_with`](Self::stop_with) or
/// [`on_finalize`](Self::on_finalize). The loop takes and runs it exactly
/// once, after its last render.
///
/// The hook belongs to the flag, not to a loop: when one flag is shared by
/// several loops, only the first loop to observe the flag runs the hook.
/// The other loops stop without running anything. Use one flag per loop
/// if every loop needs its own finalizer.
///
/// The flag itself is for the loop's thread. To stop from another thread
/// (for example, a Ctrl-C handler), use a [`StopSignal`] from [`signal`](Self::signal).
#[derive(Clone)]
pub struct TerminationFlag(Rc<FlagInner>);

struct FlagInner {
    signal: StopSignal,
    finalizer: RefCell<Option<Finalizer>>,
}

impl Default for TerminationFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminationFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_finalizer = match self.0.finalizer.try_borrow() {
            Ok(x) => x.is_some(),
            Err(_) => false,
        };
        f.debug_struct("TerminationFlag")
            .field("set", &self.is_set())
            .field("finalizer", &has_finalizer)
            .finish()
    }
}

impl TerminationFlag {
    pub fn new() -> Self {
        Self(Rc::new(FlagInner {
            signal: StopSignal::new(),
            finalizer: RefCell::new(None),
        }))
    }

    /// If stopping was requested
    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.0.signal.is_set()
    }

    /// Request the loop to stop
    #[inline(always)]
    pub fn stop(&self) {
        self.0.signal.stop()
    }

    /// Request the loop to stop, and run `finalizer` once it does.
    ///
    /// Same as [`on_finalize`](Self::on_finalize) followed by [`stop`](Self::stop).
    pub fn stop_with(&self, finalizer: impl FnOnce() -> crate::Result<()> + 'static) {
        // the flag must not be observed without the finalizer
        self.on_finalize(finalizer);
        self.stop();
    }

    /// Set the hook to run when the loop stops, without requesting it to stop.
    ///
    /// Useful when the stop comes from a [`StopSignal`] on another thread.
    /// Replaces the finalizer set previously, if it hasn't run yet.
    /// If the loop has already stopped, the finalizer will never run.
    pub fn on_finalize(&self, finalizer: impl FnOnce() -> crate::Result<()> + 'static) {
        *self.0.finalizer.borrow_mut() = Some(Box::new(finalizer));
    }

    /// Get a thread-safe handle that can only set the flag
    pub fn signal(&self) -> StopSignal {
        self.0.signal.clone()
    }

    /// Take the finalizer out, so it only runs once
    pub(crate) fn take_finalizer(&self) -> Option<Finalizer> {
        self.0.finalizer.borrow_mut().take()
    }
}

/// Thread-safe half of a [`TerminationFlag`] that can only request stopping.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// use cobalt::status::TerminationFlag;
///
/// let flag = TerminationFlag::new();
/// let signal = flag.signal();
/// std::thread::spawn(move || signal.stop()).join().unwrap();
/// assert!(flag.is_set());
/// ```
#[derive(Debug, Clone)]
pub struct StopSignal(Arc<Atomic<bool, bool>>);

impl StopSignal {
    fn new() -> Self {
        Self(Arc::new(Atomic::new_bool(false)))
    }

    /// If stopping was requested
    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Request the loop to stop
    pub fn stop(&self) {
        if !self.0.replace(true) {
            crate::debug!("status loop stop requested");
        }
    }
}
