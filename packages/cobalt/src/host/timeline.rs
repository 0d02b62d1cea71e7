use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use crate::pre::*;

use super::{Callback, Timer};

/// A deterministic, virtual-time [`Timer`].
///
/// Time starts at zero and only moves forward when [`advance`](Self::advance)
/// or [`advance_to`](Self::advance_to) is called, running every callback that
/// becomes due, in order of due time, then in the order they were scheduled.
/// Callbacks can schedule more callbacks; those also run if they become due
/// within the same advance.
///
/// The timeline is a cheap handle: clones share the same queue and clock.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use cobalt::host::{Timeline, Timer};
///
/// # fn main() -> cobalt::Result<()> {
/// let timeline = Timeline::new();
/// let fired = Rc::new(Cell::new(false));
/// let fired2 = Rc::clone(&fired);
/// timeline.schedule_after(Duration::from_millis(10), Box::new(move || {
///     fired2.set(true);
///     cobalt::Ok(())
/// }));
/// timeline.advance(Duration::from_millis(9))?;
/// assert!(!fired.get());
/// timeline.advance(Duration::from_millis(1))?;
/// assert!(fired.get());
/// # Ok(()) }
/// ```
#[derive(Clone, Default)]
pub struct Timeline(Rc<RefCell<TimelineInner>>);

#[derive(Default)]
struct TimelineInner {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

struct Entry {
    due: Duration,
    seq: u64,
    callback: Callback,
}
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, since the timeline was created
    pub fn now(&self) -> Duration {
        self.0.borrow().now
    }

    /// Number of callbacks waiting to run
    pub fn pending(&self) -> usize {
        self.0.borrow().queue.len()
    }

    /// Due time of the next callback, if any
    pub fn next_due(&self) -> Option<Duration> {
        self.0.borrow().queue.peek().map(|Reverse(e)| e.due)
    }

    /// Move the clock forward by `delta`, running every callback that becomes due.
    ///
    /// Returns the number of callbacks that ran. If a callback fails, the
    /// clock stays at that callback's due time and the error is returned;
    /// callbacks after it are left in the queue.
    pub fn advance(&self, delta: Duration) -> crate::Result<usize> {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    /// Move the clock forward to `target`, running every callback that becomes due.
    ///
    /// See [`advance`](Self::advance). Moving backwards is an error.
    /// A callback that advances the same timeline past `target` is allowed;
    /// the clock then stays where that callback left it.
    pub fn advance_to(&self, target: Duration) -> crate::Result<usize> {
        let now = self.now();
        if target < now {
            crate::bail!("cannot move the timeline back from {now:?} to {target:?}");
        }
        let mut count = 0;
        while let Some(entry) = self.pop_due(target) {
            count += 1;
            Self::run_entry(entry)?;
        }
        let mut inner = self.0.borrow_mut();
        inner.now = inner.now.max(target);
        Ok(count)
    }

    /// Keep running the next callback (jumping the clock to its due time)
    /// until nothing is pending.
    ///
    /// `limit` is the maximum number of callbacks to run, counting callbacks
    /// that share a due time one by one. An error is returned if there are
    /// still callbacks pending after that, since it's probably a loop that
    /// never stops.
    pub fn run_until_idle(&self, limit: usize) -> crate::Result<usize> {
        let mut count = 0;
        while let Some(due) = self.next_due() {
            if count >= limit {
                crate::bail!(
                    "timeline is still busy after running {count} callbacks ({} pending)",
                    self.pending()
                );
            }
            let Some(entry) = self.pop_due(due) else {
                break;
            };
            count += 1;
            Self::run_entry(entry)?;
        }
        Ok(count)
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut inner = self.0.borrow_mut();
        match inner.queue.peek() {
            Some(Reverse(e)) if e.due <= target => {}
            _ => return None,
        }
        let Reverse(entry) = inner.queue.pop()?;
        inner.now = inner.now.max(entry.due);
        Some(entry)
    }

    fn run_entry(entry: Entry) -> crate::Result<()> {
        let Entry { due, callback, .. } = entry;
        // no borrow is held here, the callback can schedule more
        crate::check!(callback(), "callback scheduled for {due:?} failed")
    }
}

impl Timer for Timeline {
    fn schedule_after(&self, delay: Duration, callback: Callback) {
        let mut inner = self.0.borrow_mut();
        let due = inner.now + delay;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        crate::trace!("timeline: scheduling callback #{seq} at {due:?}");
        inner.queue.push(Reverse(Entry { due, seq, callback }));
    }
}
