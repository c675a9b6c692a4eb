//! Scheduler error types.

use crate::tier::RateTier;

/// Errors raised while configuring the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A tier was given a zero-length interval.
    #[error("interval for the {0} tier must be non-zero")]
    ZeroInterval(RateTier),

    /// A tier name did not match any known tier.
    #[error("unknown rate tier `{0}`")]
    UnknownTier(String),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file was not valid JSON for [`SchedulerConfig`](crate::SchedulerConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised when starting the runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The async runtime backing the loop could not be built.
    #[error("failed to build async runtime: {0}")]
    Io(#[from] std::io::Error),
}
