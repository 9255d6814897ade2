//! How often, and how many times, to ask the device for a finished result.

use embassy_time::Duration;

use crate::config::Resolution;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStrategy {
    max_attempts: Option<u32>,
    interval: Option<Duration>,
}

impl PollStrategy {
    /// Read exactly once and report whatever the device says.
    pub const ONCE: Self = Self {
        max_attempts: Some(1),
        interval: None,
    };

    /// Read back-to-back until the device reports a finished conversion.
    ///
    /// Never gives up. A device that stays busy keeps the caller here forever.
    pub const UNBOUNDED: Self = Self {
        max_attempts: None,
        interval: None,
    };

    /// Read at most `n` times. `0` still reads once.
    pub const fn attempts(n: u32) -> Self {
        Self {
            max_attempts: Some(if n == 0 { 1 } else { n }),
            interval: None,
        }
    }

    /// Sleep for `interval` between reads.
    pub const fn with_interval(self, interval: Duration) -> Self {
        Self {
            max_attempts: self.max_attempts,
            interval: Some(interval),
        }
    }

    /// Poll every quarter conversion time, for up to 5/4 of a conversion.
    ///
    /// For example, at 16 bits a result is due every 66.7ms. We read six
    /// times, 16.7ms apart, covering 83.3ms.
    pub fn paced(resolution: Resolution) -> Self {
        Self::attempts(6).with_interval(resolution.quarter_conversion_time())
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub(crate) fn exhausted(&self, attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts >= max,
            None => false,
        }
    }
}

impl Default for PollStrategy {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
