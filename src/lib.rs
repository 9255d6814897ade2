//! `mcp342x-async`
//!
//! A basic async driver for the MCP342x family of delta-sigma ADCs from
//! Microchip (MCP3421 through MCP3428). The parts share one register layout:
//! a single configuration byte written by the host, and a 3 or 4 byte result
//! read back, data MSB first, status byte last.
//!
//! The driver keeps a cached copy of the configuration byte. Nothing is sent
//! to the device until a conversion is started.
//!
//! The bus is any [`I2c`] implementation. To keep ownership with the caller,
//! pass `&mut bus`, or a shared-bus device when several converters sit on
//! the same bus. Serializing access between drivers is the caller's job.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod compat;
pub mod config;
pub mod poll;
pub mod status;


use config::{
    Address, Channel, Config, ConversionMode, Resolution, ResultWidth, CHANNEL_MASK,
    START_CONVERSION,
};
use embassy_time::Timer;
use embedded_hal_async::i2c::I2c;
use poll::PollStrategy;
use status::{Reading, Status};

/// Driver error type
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The result was requested with a width that doesn't match the cached
    /// resolution. Nothing was sent on the bus.
    ResolutionMismatch {
        configured: Resolution,
        requested: ResultWidth,
    },
    /// The device was still converting after the last allowed read
    Timeout,
    /// An error with the underlying I2C bus, including short reads
    I2c(E),
}

/// Async driver for the MCP342x ADC
pub struct Mcp342x<I> {
    addr: u8,
    i2c: I,
    config: u8,
}

impl<I> Mcp342x<I>
where
    I: I2c,
{
    /// Create a new [Mcp342x] with the given [Address] and [I2c] implementation
    ///
    /// No bus traffic happens here. The cached configuration starts out as
    /// [Config::default], the device's power-on state.
    pub fn new(i2c: I, addr: Address) -> Self {
        Self::with_config(i2c, addr, Config::default())
    }

    /// Create a new [Mcp342x] with a starting configuration.
    pub fn with_config(i2c: I, addr: Address, config: Config) -> Self {
        Self {
            addr: addr.into_addr(),
            i2c,
            config: config.to_value(),
        }
    }

    /// The right-aligned 7-bit bus address
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Check that something acknowledges our address.
    ///
    /// Sends an empty write. No data is exchanged and the cached
    /// configuration is untouched.
    pub async fn test_connection(&mut self) -> bool {
        let present = self.i2c.write(self.addr, &[]).await.is_ok();
        debug!("mcp342x {:#x}: present={}", self.addr, present);
        present
    }

    /// Replace the cached configuration byte.
    ///
    /// Any value is accepted and sent as-is by the next
    /// [start_conversion](Self::start_conversion). The ready bit is ignored,
    /// since starting a conversion always sets it.
    pub fn configure(&mut self, config: u8) {
        self.config = config;
    }

    /// Replace the cached configuration with typed settings.
    pub fn configure_with(&mut self, config: Config) {
        self.config = config.to_value();
    }

    /// The cached configuration byte. No bus traffic.
    pub fn config_register(&self) -> u8 {
        self.config
    }

    /// The cached configuration, decoded.
    pub fn config(&self) -> Config {
        Config::from(self.config)
    }

    /// Write the cached configuration with the start bit set.
    ///
    /// In one-shot mode this begins a single conversion. In continuous
    /// mode it (re)applies the settings.
    pub async fn start_conversion(&mut self) -> Result<(), Error<I::Error>> {
        let write = self.config | START_CONVERSION;
        trace!("mcp342x {:#x}: write {:#x}", self.addr, write);
        self.i2c.write(self.addr, &[write]).await.map_err(|e| {
            debug!("mcp342x {:#x}: start not acknowledged", self.addr);
            Error::I2c(e)
        })
    }

    /// Switch the cached configuration to `channel`, then start a conversion.
    ///
    /// Only the channel field changes, and it stays changed for later reads
    /// even if the write fails.
    pub async fn start_conversion_on(&mut self, channel: Channel) -> Result<(), Error<I::Error>> {
        self.start_conversion_on_bits(channel.to_bits()).await
    }

    /// Like [start_conversion_on](Self::start_conversion_on), with the
    /// channel given in register position (`0x00`, `0x20`, `0x40`, `0x60`),
    /// the same layout [configure](Self::configure) takes.
    ///
    /// Bits outside the channel field are dropped.
    pub async fn start_conversion_on_bits(&mut self, channel: u8) -> Result<(), Error<I::Error>> {
        self.config = (self.config & !CHANNEL_MASK) | (channel & CHANNEL_MASK);
        self.start_conversion().await
    }

    /// Wait for a 12, 14 or 16 bit result, polling as fast as the bus allows.
    pub async fn get_result_16(&mut self) -> Result<Reading<i16>, Error<I::Error>> {
        self.read_result(ResultWidth::TwoByte, PollStrategy::UNBOUNDED)
            .await
            .map(Self::narrow)
    }

    /// Read a 12, 14 or 16 bit result once, finished or not.
    ///
    /// Check [Reading::is_ready] before trusting the value.
    pub async fn check_for_result_16(&mut self) -> Result<Reading<i16>, Error<I::Error>> {
        self.read_result(ResultWidth::TwoByte, PollStrategy::ONCE)
            .await
            .map(Self::narrow)
    }

    /// Wait for an 18 bit result, polling as fast as the bus allows.
    pub async fn get_result_18(&mut self) -> Result<Reading<i32>, Error<I::Error>> {
        self.read_result(ResultWidth::ThreeByte, PollStrategy::UNBOUNDED)
            .await
    }

    /// Read an 18 bit result once, finished or not.
    pub async fn check_for_result_18(&mut self) -> Result<Reading<i32>, Error<I::Error>> {
        self.read_result(ResultWidth::ThreeByte, PollStrategy::ONCE)
            .await
    }

    /// Read results until one is ready or `strategy` runs out of attempts.
    ///
    /// Returns the last reading either way, so the status may still be
    /// pending. `width` must match the cached resolution, which is checked
    /// before touching the bus.
    pub async fn read_result(
        &mut self,
        width: ResultWidth,
        strategy: PollStrategy,
    ) -> Result<Reading<i32>, Error<I::Error>> {
        let configured = self.config().resolution;
        if configured.result_width() != width {
            warn!(
                "mcp342x {:#x}: {} read while configured for {}",
                self.addr,
                width,
                configured
            );
            return Err(Error::ResolutionMismatch {
                configured,
                requested: width,
            });
        }

        let mut raw = [0u8; 4];
        let buf = &mut raw[..width.read_len()];
        let mut attempts: u32 = 0;
        loop {
            self.i2c.read(self.addr, buf).await.map_err(|e| {
                debug!("mcp342x {:#x}: result read failed", self.addr);
                Error::I2c(e)
            })?;
            attempts = attempts.saturating_add(1);

            let (value, status) = width.decode(buf);
            let reading = Reading {
                status: Status::from(status),
                value,
            };
            if reading.is_ready() || strategy.exhausted(attempts) {
                trace!(
                    "mcp342x {:#x}: status {:#x} value {} after {} reads",
                    self.addr,
                    status,
                    value,
                    attempts
                );
                return Ok(reading);
            }
            if let Some(interval) = strategy.interval() {
                Timer::after(interval).await;
            }
        }
    }

    /// Like [read_result](Self::read_result), but a conversion still pending
    /// after the last attempt is an [Error::Timeout].
    pub async fn wait_for_result(
        &mut self,
        width: ResultWidth,
        strategy: PollStrategy,
    ) -> Result<Reading<i32>, Error<I::Error>> {
        let reading = self.read_result(width, strategy).await?;
        if reading.is_ready() {
            Ok(reading)
        } else {
            warn!("mcp342x {:#x}: conversion did not finish", self.addr);
            Err(Error::Timeout)
        }
    }

    /// Attempts to get a fresh result using the cached configuration.
    ///
    /// If the ADC is configured in one-shot mode, a conversion will be started,
    /// and this function will sleep for the expected conversion time before
    /// reading.
    ///
    /// This function will wait up to 5/4 of a conversion time to obtain a
    /// result reported as ready.
    ///
    /// | Resolution | Conversion time | Min Value  | Max Value |
    /// | ---:       | ---:            | ---:       | ---:      |
    /// | 12 bit     | 4.2ms           | -2,048     | 2,047     |
    /// | 14 bit     | 16.7ms          | -8,192     | 8,191     |
    /// | 16 bit     | 66.7ms          | -32,768    | 32,767    |
    /// | 18 bit     | 266.7ms         | -131,072   | 131,071   |
    ///
    /// This function does not consider gain, and returns only raw ADC counts.
    pub async fn measure(&mut self) -> Result<Reading<i32>, Error<I::Error>> {
        let Config {
            mode, resolution, ..
        } = self.config();
        let width = resolution.result_width();

        if let ConversionMode::OneShot = mode {
            self.start_conversion().await?;

            // Don't waste effort polling if we know it will take
            // a whole conversion to finish.
            Timer::after(resolution.conversion_time()).await;
            let strategy =
                PollStrategy::attempts(2).with_interval(resolution.quarter_conversion_time());
            return self.wait_for_result(width, strategy).await;
        }

        self.wait_for_result(width, PollStrategy::paced(resolution))
            .await
    }

    /// Give back the I2C bus
    pub fn release(self) -> I {
        self.i2c
    }

    fn narrow(reading: Reading<i32>) -> Reading<i16> {
        // Two-byte results were decoded from an i16 in the first place.
        reading.map(|value| value as i16)
    }
}
