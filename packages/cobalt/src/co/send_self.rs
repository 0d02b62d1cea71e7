use super::handle::Slot;
use super::{Coroutine, Ownership, Resume, SelfHandle, Step, Task};

/// A zero-argument function that starts a new instance of a coroutine
pub type Trigger<I> = Box<dyn Fn() -> crate::Result<Task<I>>>;

/// Create a [`SendSelf`] adapter with the default (weak) ownership.
///
/// Shorthand for [`SendSelf::new`].
#[inline(always)]
pub fn send_self<C, F>(constructor: F) -> SendSelf<F>
where
    C: Coroutine,
    C::Input: 'static,
    F: Fn() -> C + 'static,
{
    SendSelf::new(constructor)
}

/// Adapter that starts a [`Coroutine`] and sends it a handle to itself.
///
/// See the [module](super) documentation for the protocol the coroutine
/// has to follow.
pub struct SendSelf<F> {
    constructor: F,
    ownership: Ownership,
}

impl<C, F> SendSelf<F>
where
    C: Coroutine,
    C::Input: 'static,
    F: Fn() -> C + 'static,
{
    /// Wrap a coroutine constructor. The self handle will be weak.
    pub fn new(constructor: F) -> Self {
        Self {
            constructor,
            ownership: Ownership::Weak,
        }
    }

    /// Set the ownership of the handle sent to the coroutine
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Shorthand for `.ownership(Ownership::Strong)`
    pub fn strong(self) -> Self {
        self.ownership(Ownership::Strong)
    }

    /// Start a new instance of the coroutine.
    ///
    /// The coroutine is constructed, resumed with [`Resume::Start`], then
    /// with [`Resume::Handle`]. It must suspend both times, otherwise
    /// an error is returned. Errors returned by the coroutine itself are
    /// also returned here.
    ///
    /// With weak ownership, the coroutine is dropped when the returned
    /// [`Task`] is dropped.
    pub fn trigger(&self) -> crate::Result<Task<C::Input>> {
        let id = crate::next_atomic_usize();
        let slot = Slot::new(id, Box::new((self.constructor)()));
        crate::trace!("coroutine #{id}: handshake");
        match slot.advance(Resume::Start)? {
            Step::Yield => {}
            Step::Complete => {
                crate::bail!("coroutine #{id} completed during handshake: it must suspend without a value first");
            }
        }
        crate::trace!("coroutine #{id}: sending {} self handle", self.ownership);
        let handle = SelfHandle::new(&slot, self.ownership);
        match slot.advance(Resume::Handle(handle))? {
            Step::Yield => {}
            Step::Complete => {
                crate::bail!("coroutine #{id} completed after receiving its handle: it must suspend at least twice");
            }
        }
        crate::debug!("coroutine #{id} started");
        Ok(Task::new(slot, self.ownership))
    }

    /// Turn the adapter into a boxed trigger function
    pub fn into_trigger(self) -> Trigger<C::Input> {
        Box::new(move || self.trigger())
    }
}
