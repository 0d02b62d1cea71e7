use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use super::{Coroutine, Resume, Step};

/// Whether a [`SelfHandle`] keeps its coroutine alive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Ownership {
    /// The handle does not keep the coroutine alive. Once every [`Task`]
    /// is dropped, resuming through the handle silently does nothing.
    #[default]
    Weak,
    /// The handle keeps the coroutine alive until it completes,
    /// even if nothing else references it.
    Strong,
}
impl std::fmt::Display for Ownership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ownership::Weak => write!(f, "weak"),
            Ownership::Strong => write!(f, "strong"),
        }
    }
}
impl FromStr for Ownership {
    type Err = crate::Error;
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" => Ok(Self::Weak),
            "strong" => Ok(Self::Strong),
            other => crate::bail!("invalid ownership '{other}', expected 'weak' or 'strong'"),
        }
    }
}

/// Storage of a running coroutine. `None` once it has finished.
pub(crate) struct Slot<I> {
    pub(crate) id: usize,
    coroutine: RefCell<Option<Box<dyn Coroutine<Input = I>>>>,
}

impl<I> Slot<I> {
    pub(crate) fn is_finished(&self) -> bool {
        match self.coroutine.try_borrow() {
            Ok(co) => co.is_none(),
            // being borrowed means it's running right now
            Err(_) => false,
        }
    }
}

impl<I: 'static> Slot<I> {
    pub(crate) fn new(id: usize, coroutine: Box<dyn Coroutine<Input = I>>) -> Rc<Self> {
        Rc::new(Self {
            id,
            coroutine: RefCell::new(Some(coroutine)),
        })
    }

    /// Run the coroutine to its next suspension point.
    ///
    /// The coroutine is dropped (outside of the borrow) if it completes or errors.
    pub(crate) fn advance(&self, resume: Resume<I>) -> crate::Result<Step> {
        let Ok(mut guard) = self.coroutine.try_borrow_mut() else {
            crate::bail!("coroutine #{} was resumed while it is already running", self.id);
        };
        let Some(coroutine) = guard.as_mut() else {
            crate::bail!("coroutine #{} was resumed after it has finished", self.id);
        };
        let result = coroutine.resume(resume);
        let finished = match result {
            Ok(Step::Yield) => None,
            Ok(Step::Complete) => {
                crate::debug!("coroutine #{} completed", self.id);
                guard.take()
            }
            Err(_) => {
                crate::debug!("coroutine #{} failed", self.id);
                guard.take()
            }
        };
        drop(guard);
        // the coroutine may own a strong handle to this slot, so it must be
        // dropped after the borrow is released
        drop(finished);
        result
    }
}

enum Link<I> {
    Weak(Weak<Slot<I>>),
    Strong(Rc<Slot<I>>),
}

/// A coroutine's handle to itself, delivered by [`Resume::Handle`].
///
/// The handle is either weak or strong, depending on the [`Ownership`]
/// the [`SendSelf`](super::SendSelf) adapter was configured with. Cloning
/// preserves the ownership.
///
/// A weak handle whose coroutine is gone does nothing when resumed.
/// This is expected: it's how a coroutine nobody cares about anymore
/// stops running.
pub struct SelfHandle<I> {
    link: Link<I>,
}

impl<I> Clone for SelfHandle<I> {
    fn clone(&self) -> Self {
        let link = match &self.link {
            Link::Weak(w) => Link::Weak(Weak::clone(w)),
            Link::Strong(s) => Link::Strong(Rc::clone(s)),
        };
        Self { link }
    }
}

impl<I> std::fmt::Debug for SelfHandle<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfHandle")
            .field("ownership", &self.ownership())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<I> SelfHandle<I> {
    pub(crate) fn new(slot: &Rc<Slot<I>>, ownership: Ownership) -> Self {
        let link = match ownership {
            Ownership::Weak => Link::Weak(Rc::downgrade(slot)),
            Ownership::Strong => Link::Strong(Rc::clone(slot)),
        };
        Self { link }
    }

    /// If this handle keeps the coroutine alive
    pub fn ownership(&self) -> Ownership {
        match &self.link {
            Link::Weak(_) => Ownership::Weak,
            Link::Strong(_) => Ownership::Strong,
        }
    }

    /// If the coroutine can still be resumed (it is reachable and not finished)
    pub fn is_alive(&self) -> bool {
        match self.upgrade() {
            Some(slot) => !slot.is_finished(),
            None => false,
        }
    }

    /// Get a weak version of this handle
    pub fn downgrade(&self) -> Self {
        let weak = match &self.link {
            Link::Weak(w) => Weak::clone(w),
            Link::Strong(s) => Rc::downgrade(s),
        };
        Self {
            link: Link::Weak(weak),
        }
    }

    fn upgrade(&self) -> Option<Rc<Slot<I>>> {
        match &self.link {
            Link::Weak(w) => w.upgrade(),
            Link::Strong(s) => Some(Rc::clone(s)),
        }
    }
}

impl<I: 'static> SelfHandle<I> {
    /// Resume the coroutine without a value
    #[inline(always)]
    pub fn next(&self) -> crate::Result<()> {
        self.resume(Resume::Next)
    }

    /// Resume the coroutine with a value
    #[inline(always)]
    pub fn send(&self, value: I) -> crate::Result<()> {
        self.resume(Resume::Send(value))
    }

    /// Get a callback that resumes the coroutine without a value when called.
    ///
    /// The callback holds a clone of this handle, so it has the same ownership.
    pub fn next_callback(&self) -> impl FnOnce() -> crate::Result<()> + 'static {
        let handle = self.clone();
        move || handle.next()
    }

    /// Get a callback that resumes the coroutine with the value it's called with.
    ///
    /// The callback holds a clone of this handle, so it has the same ownership.
    pub fn send_callback(&self) -> impl FnOnce(I) -> crate::Result<()> + 'static {
        let handle = self.clone();
        move |value| handle.send(value)
    }

    fn resume(&self, resume: Resume<I>) -> crate::Result<()> {
        let Some(slot) = self.upgrade() else {
            crate::trace!("coroutine was dropped, ignoring resumption");
            return Ok(());
        };
        // a finished coroutine is unreachable through a weak handle
        // as long as nothing else keeps the slot around
        if self.ownership() == Ownership::Weak && slot.is_finished() {
            crate::trace!("coroutine #{} has finished, ignoring resumption", slot.id);
            return Ok(());
        }
        slot.advance(resume)?;
        Ok(())
    }
}

/// Owner of a coroutine started by [`SendSelf`](super::SendSelf).
///
/// With [`Ownership::Weak`] (the default), the coroutine is dropped
/// as soon as its `Task` is dropped. With [`Ownership::Strong`],
/// dropping the `Task` does not affect the coroutine.
pub struct Task<I> {
    slot: Rc<Slot<I>>,
    ownership: Ownership,
}

impl<I> std::fmt::Debug for Task<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.slot.id)
            .field("ownership", &self.ownership)
            .finish()
    }
}

impl<I> Task<I> {
    pub(crate) fn new(slot: Rc<Slot<I>>, ownership: Ownership) -> Self {
        Self { slot, ownership }
    }

    /// Id of the coroutine, as shown in log messages
    pub fn id(&self) -> usize {
        self.slot.id
    }

    /// The ownership the coroutine's self handle was created with
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// If the coroutine has completed (or failed)
    pub fn is_finished(&self) -> bool {
        self.slot.is_finished()
    }

    /// Get a weak handle to resume the coroutine from outside
    pub fn handle(&self) -> SelfHandle<I> {
        SelfHandle::new(&self.slot, Ownership::Weak)
    }
}
