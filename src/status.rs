//! The status byte that trails every result read.

use crate::config::{Config, CONVERSION_PENDING};

/// Last byte of every read response: the device's configuration register,
/// with the top bit reporting whether the result is still being converted.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    /// Reserved for "no valid status" at the [compat](crate::compat) boundary.
    pub const SENTINEL: u8 = 0xFF;

    pub fn raw(&self) -> u8 {
        self.0
    }

    /// The conversion has not finished, the data bytes are a previous result.
    pub fn is_pending(&self) -> bool {
        (self.0 & CONVERSION_PENDING) != 0
    }

    /// The data bytes hold a fresh, unread result.
    pub fn is_ready(&self) -> bool {
        !self.is_pending()
    }

    /// The configuration the device is actually running with.
    pub fn settings(&self) -> Config {
        Config::from(self.0)
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// A decoded result and the status byte it arrived with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading<T> {
    pub status: Status,
    pub value: T,
}

impl<T> Reading<T> {
    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        Reading {
            status: self.status,
            value: f(self.value),
        }
    }
}
