pub use anyhow::{Context, Error, Ok, Result, anyhow as fmterr, bail};

/// # Error Handling
/// Errors are `anyhow` errors, re-exported from the crate root:
/// - `anyhow::Result` is `cobalt::Result`
/// - `anyhow::bail!`  is `cobalt::bail!`
/// - `anyhow::anyhow` is `cobalt::fmterr`
///
/// Nothing in `cobalt` swallows an error. A failure inside a coroutine
/// (for example, the status sink failing to render) is returned from the
/// callback that resumed it, so it reaches whatever dispatches the host's
/// timer callbacks.
///
/// `cobalt::check!` wraps `.with_context()`:
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// use cobalt::pre::*;
///
/// fn render(frame: &str) -> cobalt::Result<()> {
///     cobalt::ensure!(!frame.is_empty(), "empty frame")?;
///     Ok(())
/// }
/// fn main() {
///     let index = 2;
///     let err = cobalt::check!(render(""), "failed to render frame {index}").unwrap_err();
///     assert_eq!(err.to_string(), "failed to render frame 2");
/// }
/// ```
#[macro_export]
macro_rules! check {
    ($result:expr, $($args:tt)*) => {{
        { $result }.with_context(|| format!($($args)*))
    }};
}

/// Rethrow an `Err`, optionally with additional context
///
/// Prelude import is required to bring in the Context trait.
#[macro_export]
macro_rules! rethrow {
    ($result:expr) => {
        return Err($result);
    };
    ($result:expr, $($args:tt)*) => {{
        return Err($result).context(format!($($args)*));
    }};
}

/// Check if an expression is `true`
///
/// Unlike `anyhow::ensure`, if the condition fail, this will generate an `Error`
/// instead of returning an error directly, so you need to add a `?`.
#[macro_export]
macro_rules! ensure {
    ($result:expr) => {{
        if !bool::from($result) {
            Err($crate::fmterr!("condition failed: `{}`", stringify!($result)))
        } else {
            Ok(())
        }
    }};
    ($result:expr, $($args:tt)*) => {{
        if !bool::from($result) {
            Err($crate::fmterr!("condition failed: `{}`: {}", stringify!($result), format_args!($($args)*)))
        } else {
            Ok(())
        }
    }};
}
