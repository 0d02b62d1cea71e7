use std::sync::atomic::{AtomicUsize, Ordering};

/// An atomic wrapper with an underlying atomic storage and conversion to
/// a type T.
///
/// `Acquire` ordering is used for load and `Release` ordering is used for store.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// use cobalt::status::Phase;
///
/// # fn main() {
/// let value: cobalt::Atomic<u8, Phase> = cobalt::Atomic::new_u8(Phase::Idle as u8);
/// assert_eq!(Phase::Idle, value.get());
/// value.set(Phase::Running);
/// assert_eq!(Phase::Running, value.get());
/// # }
/// ```
pub struct Atomic<S, T>(S::Type, std::marker::PhantomData<T>)
where
    S: AtomicType,
    T: From<S> + Into<S>;
/// Marker type to associate primitive with their atomic versions
pub trait AtomicType {
    type Type;
}
macro_rules! impl_atomic_type {
    ($($t:ident => $Atomic:ident, $newfn:ident),* $(,)?) => { $(
    impl AtomicType for $t {
        type Type = std::sync::atomic::$Atomic;
    }
    impl<T: From<$t> + Into<$t>> Atomic<$t, T> {
        pub const fn $newfn(value: $t) -> Self {
            Self(std::sync::atomic::$Atomic::new(value), std::marker::PhantomData)
        }
        pub fn get(&self) -> T {
            self.0.load(std::sync::atomic::Ordering::Acquire).into()
        }
        pub fn set(&self, value: T) {
            self.0.store(value.into(), std::sync::atomic::Ordering::Release)
        }
        /// Store the value, returning the previous one
        pub fn replace(&self, value: T) -> T {
            self.0.swap(value.into(), std::sync::atomic::Ordering::AcqRel).into()
        }
    }
    impl<T: From<$t> + Into<$t> + std::fmt::Debug> std::fmt::Debug for Atomic<$t, T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple("Atomic").field(&self.get()).finish()
        }
    }
    )* }
}
impl_atomic_type! {
    u8 => AtomicU8, new_u8,
    bool => AtomicBool, new_bool,
}

/// Ids for telling coroutines apart in log messages
pub(crate) fn next_atomic_usize() -> usize {
    static ID: AtomicUsize = AtomicUsize::new(1);
    ID.fetch_add(1, Ordering::SeqCst)
}
