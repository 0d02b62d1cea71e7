use std::time::Duration;

use crate::co::Ownership;
use crate::pre::*;
use crate::status::BUSY_FRAMES;

/// Env var overriding [`StatusConfig::period_ms`]
pub const ENV_STATUS_PERIOD_MS: &str = "COBALT_STATUS_PERIOD_MS";
/// Env var overriding [`StatusConfig::ownership`] (`weak` or `strong`)
pub const ENV_STATUS_OWNERSHIP: &str = "COBALT_STATUS_OWNERSHIP";

/// Settings for a status loop, consumed by
/// [`StatusLoopBuilder::from_config`](crate::status::StatusLoopBuilder::from_config)
///
/// With the `serde` feature, this can be deserialized from a settings file.
/// Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusConfig {
    /// Frames to cycle through. Default is [`BUSY_FRAMES`]
    pub frames: Vec<String>,
    /// Time each frame is displayed, in milliseconds. Default is 150
    pub period_ms: u64,
    /// Ownership of the loop's self handle. Default is weak
    pub ownership: Ownership,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            frames: BUSY_FRAMES.iter().map(|x| x.to_string()).collect(),
            period_ms: 150,
            ownership: Ownership::Weak,
        }
    }
}

impl StatusConfig {
    /// The default config, with overrides from the environment.
    ///
    /// Reads [`ENV_STATUS_PERIOD_MS`] and [`ENV_STATUS_OWNERSHIP`]. Unset or
    /// empty variables keep the default; invalid values are errors.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();
        let period = crate::env_var(ENV_STATUS_PERIOD_MS)?;
        if !period.is_empty() {
            config.period_ms = crate::check!(
                period.trim().parse::<u64>(),
                "invalid {ENV_STATUS_PERIOD_MS}: '{period}'"
            )?;
        }
        let ownership = crate::env_var(ENV_STATUS_OWNERSHIP)?;
        if !ownership.is_empty() {
            config.ownership = crate::check!(
                ownership.parse::<Ownership>(),
                "invalid {ENV_STATUS_OWNERSHIP}"
            )?;
        }
        crate::debug!(
            "status config: period={}ms, ownership={}, {} frames",
            config.period_ms,
            config.ownership,
            config.frames.len()
        );
        Ok(config)
    }

    /// [`period_ms`](Self::period_ms) as a `Duration`
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}
