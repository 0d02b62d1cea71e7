use std::marker::PhantomData;

use super::SelfHandle;

/// What a coroutine is resumed with
pub enum Resume<I> {
    /// The handshake. The coroutine must answer with [`Step::Yield`]
    /// without doing anything else.
    Start,
    /// The coroutine's own handle, delivered once right after the handshake
    Handle(SelfHandle<I>),
    /// Resumed without a value (`handle.next()`)
    Next,
    /// Resumed with a value (`handle.send(value)`)
    Send(I),
}

impl<I> std::fmt::Debug for Resume<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resume::Start => write!(f, "Start"),
            Resume::Handle(h) => write!(f, "Handle({:?})", h.ownership()),
            Resume::Next => write!(f, "Next"),
            Resume::Send(_) => write!(f, "Send(..)"),
        }
    }
}

/// Where a coroutine stopped after being resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Suspended, waiting to be resumed by a callback
    Yield,
    /// Finished. The coroutine is dropped and never resumed again
    Complete,
}

/// A suspendable computation, written as an explicit state machine.
///
/// Each call to [`resume`](Coroutine::resume) runs the computation from its
/// current suspension point to the next one. See the [module](super)
/// documentation for the order of resumptions.
///
/// Returning an error also finishes the coroutine: it will be dropped,
/// and the error is returned to whoever resumed it.
pub trait Coroutine: 'static {
    /// The value type accepted by [`Resume::Send`]
    type Input;

    fn resume(&mut self, resume: Resume<Self::Input>) -> crate::Result<Step>;
}

/// A coroutine backed by a closure. Created with [`from_fn`].
pub struct FnCoroutine<F, I> {
    f: F,
    _input: PhantomData<fn(I)>,
}

/// Turn a closure into a [`Coroutine`]. The closure is the `resume` function,
/// and keeps its state in its captures.
pub fn from_fn<I, F>(f: F) -> FnCoroutine<F, I>
where
    I: 'static,
    F: FnMut(Resume<I>) -> crate::Result<Step> + 'static,
{
    FnCoroutine {
        f,
        _input: PhantomData,
    }
}

impl<I, F> Coroutine for FnCoroutine<F, I>
where
    I: 'static,
    F: FnMut(Resume<I>) -> crate::Result<Step> + 'static,
{
    type Input = I;

    #[inline(always)]
    fn resume(&mut self, resume: Resume<I>) -> crate::Result<Step> {
        (self.f)(resume)
    }
}
