use std::env::VarError;
use std::ffi::OsStr;

use crate::pre::*;

/// Read an environment variable, treating not-set as an empty string.
///
/// This is how settings like [`ENV_STATUS_PERIOD_MS`](crate::ENV_STATUS_PERIOD_MS)
/// and [`ENV_STATUS_OWNERSHIP`](crate::ENV_STATUS_OWNERSHIP) (read by
/// [`StatusConfig::from_env`](crate::StatusConfig::from_env)) and `RUST_LOG`
/// (read by [`log_init`](crate::log_init)) are looked up, so an empty
/// value means "keep the default". A value that is not valid unicode is an error.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// # fn main() -> cobalt::Result<()> {
/// let period = cobalt::env_var(cobalt::ENV_STATUS_PERIOD_MS)?;
/// if period.is_empty() {
///     assert_eq!(cobalt::StatusConfig::from_env()?.period_ms, 150);
/// }
/// assert!(cobalt::env_var("COBALT_SURELY_NOT_SET")?.is_empty());
/// # Ok(()) }
/// ```
#[inline(always)]
pub fn env_var(var: impl AsRef<OsStr>) -> crate::Result<String> {
    env_var_impl(var.as_ref())
}
fn env_var_impl(var: &OsStr) -> crate::Result<String> {
    match std::env::var(var) {
        Ok(value) => {
            crate::trace!("env var '{}' is '{value}'", var.display());
            Ok(value)
        }
        Err(VarError::NotPresent) => {
            crate::trace!("env var '{}' is not set", var.display());
            Ok(String::new())
        }
        Err(e @ VarError::NotUnicode(_)) => {
            crate::rethrow!(e, "env var '{}' is not valid unicode", var.display());
        }
    }
}
