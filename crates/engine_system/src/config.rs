//! Scheduler configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tier::RateTier;

/// Startup configuration for the runtime: one interval per tier plus the
/// render tier.
///
/// Intervals are stored in whole milliseconds. Missing JSON fields fall back
/// to [`SchedulerConfig::default`].
///
/// ```json
/// { "slow_ms": 1000, "normal_ms": 16, "fast_ms": 5, "render_tier": "normal" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval of the slow tier, in milliseconds.
    pub slow_ms: u64,
    /// Interval of the normal tier, in milliseconds.
    pub normal_ms: u64,
    /// Interval of the fast tier, in milliseconds.
    pub fast_ms: u64,
    /// The tier whose ticks are followed by a draw pass.
    pub render_tier: RateTier,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slow_ms: RateTier::Slow.default_interval().as_millis() as u64,
            normal_ms: RateTier::Normal.default_interval().as_millis() as u64,
            fast_ms: RateTier::Fast.default_interval().as_millis() as u64,
            render_tier: RateTier::Normal,
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroInterval`] for a zero interval.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SchedulerConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The interval configured for `tier`.
    #[must_use]
    pub fn interval(&self, tier: RateTier) -> Duration {
        Duration::from_millis(self.interval_ms(tier))
    }

    /// Override the interval of `tier`. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn with_interval(mut self, tier: RateTier, interval: Duration) -> Self {
        *self.interval_ms_mut(tier) = interval.as_millis() as u64;
        self
    }

    /// Override the render tier.
    #[must_use]
    pub fn with_render_tier(mut self, tier: RateTier) -> Self {
        self.render_tier = tier;
        self
    }

    /// Check that every tier has a usable interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] naming the first offending tier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match RateTier::ALL
            .into_iter()
            .find(|tier| self.interval_ms(*tier) == 0)
        {
            Some(tier) => Err(ConfigError::ZeroInterval(tier)),
            None => Ok(()),
        }
    }

    fn interval_ms(&self, tier: RateTier) -> u64 {
        match tier {
            RateTier::Slow => self.slow_ms,
            RateTier::Normal => self.normal_ms,
            RateTier::Fast => self.fast_ms,
        }
    }

    fn interval_ms_mut(&mut self, tier: RateTier) -> &mut u64 {
        match tier {
            RateTier::Slow => &mut self.slow_ms,
            RateTier::Normal => &mut self.normal_ms,
            RateTier::Fast => &mut self.fast_ms,
        }
    }
}
