use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Fall speed curve.
///
/// Level 1 falls every `base_interval_ms`. Each level above that divides the
/// interval by `growth_factor`, never going below `min_interval_ms`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use ojatris_engine::GravityConfig;
///
/// let gravity = GravityConfig::DEFAULT;
/// assert_eq!(gravity.interval(1), Duration::from_millis(500));
/// assert_eq!(gravity.interval(2), Duration::from_millis(454));
/// assert_eq!(gravity.interval(100), Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravityConfig {
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    pub growth_factor: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl GravityConfig {
    pub const DEFAULT: Self = Self {
        base_interval_ms: 500,
        min_interval_ms: 50,
        growth_factor: 1.1,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms == 0 {
            return Err(ConfigError::GravityInterval {
                value: self.min_interval_ms,
            });
        }
        if self.min_interval_ms > self.base_interval_ms {
            return Err(ConfigError::GravityBounds {
                min: self.min_interval_ms,
                base: self.base_interval_ms,
            });
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(ConfigError::GravityGrowth {
                value: self.growth_factor,
            });
        }
        Ok(())
    }

    /// Returns the time between two gravity ticks at `level`.
    #[must_use]
    pub fn interval(&self, level: u32) -> Duration {
        if level <= 1 {
            return Duration::from_millis(self.base_interval_ms);
        }
        let exponent = i32::try_from(level - 1).unwrap_or(i32::MAX);
        #[expect(clippy::cast_precision_loss)]
        let scaled = self.base_interval_ms as f64 / self.growth_factor.powi(exponent);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let millis = scaled as u64;
        Duration::from_millis(millis.max(self.min_interval_ms))
    }
}

/// Handle of the running gravity loop.
///
/// A timer accumulates elapsed time and hands out one tick per interval. The
/// generation number identifies the timer: replacing the handle (level up,
/// restart) yields a new generation, and dropping it cancels the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityTimer {
    generation: u64,
    interval: Duration,
    elapsed: Duration,
}

impl GravityTimer {
    #[must_use]
    pub fn new(generation: u64, interval: Duration) -> Self {
        Self {
            generation,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Adds `elapsed` to the timer.
    pub fn feed(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    /// Consumes one interval if a tick is due.
    pub fn take_tick(&mut self) -> bool {
        if self.interval.is_zero() || self.elapsed < self.interval {
            return false;
        }
        self.elapsed -= self.interval;
        true
    }

    /// Returns a timer with a new generation and interval, carrying over the
    /// accumulated time.
    #[must_use]
    pub fn replaced(&self, generation: u64, interval: Duration) -> Self {
        Self {
            generation,
            interval,
            elapsed: self.elapsed,
        }
    }
}
