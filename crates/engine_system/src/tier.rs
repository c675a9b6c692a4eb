//! Rate tiers.
//!
//! The runtime drives subsystems at a small, fixed set of cadences. Each
//! [`RateTier`] has its own clock and its own list of subsystems; one tier is
//! also the render tier.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the runtime's update cadences.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    /// Background work, about once a second.
    Slow,
    /// Frame-rate work. The default render tier.
    #[default]
    Normal,
    /// High-frequency work such as input or physics.
    Fast,
}

impl RateTier {
    /// Number of tiers.
    pub const COUNT: usize = 3;

    /// Every tier, in index order.
    pub const ALL: [RateTier; Self::COUNT] = [Self::Slow, Self::Normal, Self::Fast];

    /// Dense index of this tier, for per-tier arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Slow => 0,
            Self::Normal => 1,
            Self::Fast => 2,
        }
    }

    /// Lowercase name of this tier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }

    /// The interval used when no configuration overrides it.
    #[must_use]
    pub const fn default_interval(self) -> Duration {
        match self {
            Self::Slow => Duration::from_secs(1),
            Self::Normal => Duration::from_millis(20),
            Self::Fast => Duration::from_millis(10),
        }
    }
}

impl std::fmt::Display for RateTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RateTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTier(s.to_string()))
    }
}
