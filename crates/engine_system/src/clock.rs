//! Per-tier clocks.
//!
//! A [`TierClock`] owns a tier's period, its last-fire timestamp, and, while
//! the runtime is running, the tokio [`Interval`] that produces its fires.
//! Elapsed time is always measured between observed fire timestamps, so a
//! late or rescheduled fire yields the true elapsed time rather than the
//! nominal period.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::error::ConfigError;
use crate::tier::RateTier;

/// Counters describing a tier's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierStats {
    /// Clock fires observed, including the priming fire.
    pub fires: u64,
    /// Fires that produced an update (every fire but the priming one).
    pub updates: u64,
    /// Elapsed time passed to the most recent update.
    pub last_dt: Option<Duration>,
    /// Ticks whose update and draw took longer than the period.
    pub overruns: u64,
}

/// The clock of a single rate tier.
#[derive(Debug)]
pub struct TierClock {
    tier: RateTier,
    period: Duration,
    last_fire: Option<Instant>,
    timer: Option<Interval>,
    stats: TierStats,
}

impl TierClock {
    /// Create a stopped clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] if `period` is zero.
    pub fn new(tier: RateTier, period: Duration) -> Result<Self, ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::ZeroInterval(tier));
        }
        Ok(Self {
            tier,
            period,
            last_fire: None,
            timer: None,
            stats: TierStats::default(),
        })
    }

    /// A stopped clock running at the tier's default interval.
    #[must_use]
    pub fn with_default_period(tier: RateTier) -> Self {
        Self {
            tier,
            period: tier.default_interval(),
            last_fire: None,
            timer: None,
            stats: TierStats::default(),
        }
    }

    /// The tier this clock belongs to.
    #[must_use]
    pub fn tier(&self) -> RateTier {
        self.tier
    }

    /// The current period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// When this clock last fired, if it has fired since it was armed.
    #[must_use]
    pub fn last_fire(&self) -> Option<Instant> {
        self.last_fire
    }

    /// Returns `true` while a timer is running.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        self.stats
    }

    pub(crate) fn record_overrun(&mut self) {
        self.stats.overruns += 1;
    }

    /// Record a fire observed at `now`.
    ///
    /// The first fire after arming only records the timestamp and returns
    /// `None`: there is no previous fire to measure from. Later fires return
    /// the time since the previous one.
    pub fn fire(&mut self, now: Instant) -> Option<Duration> {
        self.stats.fires += 1;
        let previous = self.last_fire.replace(now)?;
        let dt = now.saturating_duration_since(previous);
        self.stats.updates += 1;
        self.stats.last_dt = Some(dt);
        Some(dt)
    }

    /// Start the timer. Its first fire is due at `now`. Must be called from
    /// within a tokio runtime.
    pub fn arm(&mut self, now: Instant) {
        self.timer = Some(Self::interval(now, self.period));
    }

    /// Stop the timer and forget the last fire.
    pub fn disarm(&mut self) {
        self.timer = None;
        self.last_fire = None;
    }

    /// Change the period.
    ///
    /// The last-fire timestamp is kept. If the clock is running, the old timer
    /// is dropped before the new one is created; the new timer's first fire is
    /// due one new period after the last fire (immediately if that is already
    /// past), so a pending fire is neither lost nor doubled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] if `period` is zero; the clock is
    /// left unchanged.
    pub fn set_period(&mut self, period: Duration, now: Instant) -> Result<(), ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::ZeroInterval(self.tier));
        }
        self.period = period;
        if self.timer.take().is_some() {
            let start = self.last_fire.map_or(now, |last| last + period);
            self.timer = Some(Self::interval(start, period));
        }
        Ok(())
    }

    /// Wait for the next fire. Never completes while the clock is stopped.
    ///
    /// Cancel-safe: dropping the future before it completes loses no fire.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending().await,
        }
    }

    fn interval(start: Instant, period: Duration) -> Interval {
        let mut timer = tokio::time::interval_at(start, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }
}
