//! Flatten driver results into the single-byte status convention used by
//! older MCP342x libraries, where `0xFF` stands for every kind of failure.
//!
//! Only use this at the edge of code that expects that convention. The
//! sentinel is ambiguous: a device running channel 4, continuous, 18 bit,
//! gain x8 reports `0xFF` while a conversion is still pending.

use crate::status::{Reading, Status};
use crate::Error;

/// The raw status byte, or [Status::SENTINEL] for any error.
pub fn status_code<T, E>(result: &Result<Reading<T>, Error<E>>) -> u8 {
    match result {
        Ok(reading) => reading.status.raw(),
        Err(_) => Status::SENTINEL,
    }
}

/// The raw status byte and value. No value is produced on error.
pub fn into_raw<T, E>(result: Result<Reading<T>, Error<E>>) -> (u8, Option<T>) {
    match result {
        Ok(reading) => (reading.status.raw(), Some(reading.value)),
        Err(_) => (Status::SENTINEL, None),
    }
}

/// `true` if a start or connection request was acknowledged.
pub fn start_ok<E>(result: Result<(), Error<E>>) -> bool {
    result.is_ok()
}
