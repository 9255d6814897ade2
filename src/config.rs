//! Configuration types read from and written to the MCP342x

use embassy_time::Duration;

/// Written by the host: begin a new conversion (one-shot mode), or has no
/// effect in continuous mode.
pub const START_CONVERSION: u8 = 0b1000_0000;

/// Read from the device: the output register does not yet hold a new result.
///
/// Same bit position as [START_CONVERSION], opposite direction.
pub const CONVERSION_PENDING: u8 = 0b1000_0000;

pub(crate) const CHANNEL_MASK: u8 = 0b0110_0000;
pub(crate) const MODE_MASK: u8 = 0b0001_0000;
pub(crate) const SIZE_MASK: u8 = 0b0000_1100;
pub(crate) const GAIN_MASK: u8 = 0b0000_0011;

/// The MCP342x family shares one 7-bit address block. Parts with address
/// pins (MCP3422/3/4/7/8) select within it by strapping; fixed-address
/// parts ship with the factory default, [Address::A0].
///
/// | Address | Address (binary) | Address (hex, right aligned) |
/// | :---    | :---             | :---                         |
/// | A0      | `0b1101_000x`    | `0x68`                       |
/// | A1      | `0b1101_001x`    | `0x69`                       |
/// | A2      | `0b1101_010x`    | `0x6A`                       |
/// | A3      | `0b1101_011x`    | `0x6B`                       |
/// | A4      | `0b1101_100x`    | `0x6C`                       |
/// | A5      | `0b1101_101x`    | `0x6D`                       |
/// | A6      | `0b1101_110x`    | `0x6E`                       |
/// | A7      | `0b1101_111x`    | `0x6F`                       |
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// Address 0, `0x68`. Factory default for fixed-address parts
    #[default]
    A0,
    /// Address 1, `0x69`
    A1,
    /// Address 2, `0x6A`
    A2,
    /// Address 3, `0x6B`
    A3,
    /// Address 4, `0x6C`
    A4,
    /// Address 5, `0x6D`
    A5,
    /// Address 6, `0x6E`
    A6,
    /// Address 7, `0x6F`
    A7,
}

impl Address {
    /// Convert into the right-aligned 7-bit address
    pub fn into_addr(&self) -> u8 {
        match self {
            Address::A0 => 0x68,
            Address::A1 => 0x69,
            Address::A2 => 0x6A,
            Address::A3 => 0x6B,
            Address::A4 => 0x6C,
            Address::A5 => 0x6D,
            Address::A6 => 0x6E,
            Address::A7 => 0x6F,
        }
    }
}

/// Input channel. Single-channel parts only have [Channel::Ch1].
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// R/W: 00
    #[default]
    Ch1,
    /// R/W: 01
    Ch2,
    /// R/W: 10
    Ch3,
    /// R/W: 11
    Ch4,
}

impl From<u8> for Channel {
    /// Zero-based channel index, not the register bits. Only the low two
    /// bits are used, so `4` selects [Channel::Ch1] again.
    fn from(index: u8) -> Self {
        match index & 0b11 {
            0 => Channel::Ch1,
            1 => Channel::Ch2,
            2 => Channel::Ch3,
            _ => Channel::Ch4,
        }
    }
}

impl Channel {
    pub(crate) fn to_bits(self) -> u8 {
        match self {
            Channel::Ch1 => 0b0000_0000,
            Channel::Ch2 => 0b0010_0000,
            Channel::Ch3 => 0b0100_0000,
            Channel::Ch4 => 0b0110_0000,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// R/W: 0
    OneShot,
    /// R/W: 1
    #[default]
    Continuous,
}

/// Sample size. Each size runs at a fixed data rate.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// R/W: 00, 240 samples per second
    #[default]
    Bits12,
    /// R/W: 01, 60 samples per second
    Bits14,
    /// R/W: 10, 15 samples per second
    Bits16,
    /// R/W: 11, 3.75 samples per second
    Bits18,
}

impl Resolution {
    pub fn bits(&self) -> u8 {
        match self {
            Resolution::Bits12 => 12,
            Resolution::Bits14 => 14,
            Resolution::Bits16 => 16,
            Resolution::Bits18 => 18,
        }
    }

    /// How many data bytes the device sends for this size.
    pub fn result_width(&self) -> ResultWidth {
        match self {
            Resolution::Bits18 => ResultWidth::ThreeByte,
            _ => ResultWidth::TwoByte,
        }
    }

    /// Time the device takes to finish one conversion at this resolution,
    /// the inverse of its data rate.
    pub fn conversion_time(&self) -> Duration {
        match self {
            Resolution::Bits12 => Duration::from_micros(4_167),
            Resolution::Bits14 => Duration::from_micros(16_667),
            Resolution::Bits16 => Duration::from_micros(66_667),
            Resolution::Bits18 => Duration::from_micros(266_667),
        }
    }

    /// A quarter of [Self::conversion_time], the spacing used when polling
    /// for a result.
    pub fn quarter_conversion_time(&self) -> Duration {
        match self {
            Resolution::Bits12 => Duration::from_micros(1_042),
            Resolution::Bits14 => Duration::from_micros(4_167),
            Resolution::Bits16 => Duration::from_micros(16_667),
            Resolution::Bits18 => Duration::from_micros(66_667),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// R/W: 00
    #[default]
    X1,
    /// R/W: 01
    X2,
    /// R/W: 10
    X4,
    /// R/W: 11
    X8,
}

/// Result layout on the wire: data bytes MSB first, then one status byte.
///
/// | Width      | Resolutions    | Bytes read | Value range                |
/// | :---       | :---           | ---:       | :---                       |
/// | `TwoByte`  | 12, 14, 16 bit | 3          | `i16`                      |
/// | `ThreeByte`| 18 bit         | 4          | sign-extended 24 bit `i32` |
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultWidth {
    TwoByte,
    ThreeByte,
}

impl ResultWidth {
    /// Number of bytes in one read transaction, status byte included.
    pub fn read_len(&self) -> usize {
        match self {
            ResultWidth::TwoByte => 3,
            ResultWidth::ThreeByte => 4,
        }
    }

    /// Split a full read response into the sample and the status byte.
    ///
    /// `buf` must be exactly [Self::read_len] bytes long.
    pub(crate) fn decode(&self, buf: &[u8]) -> (i32, u8) {
        match *self {
            ResultWidth::TwoByte => {
                let value = i16::from_be_bytes([buf[0], buf[1]]);
                (i32::from(value), buf[2])
            }
            ResultWidth::ThreeByte => {
                // Assemble into the top three bytes, then shift back down
                // so the sign bit carries through.
                let value = i32::from_be_bytes([buf[0], buf[1], buf[2], 0]) >> 8;
                (value, buf[3])
            }
        }
    }
}

/// The fields of the configuration register, without the ready bit.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub channel: Channel,
    pub mode: ConversionMode,
    pub resolution: Resolution,
    pub gain: Gain,
}

impl Config {
    pub fn to_value(&self) -> u8 {
        let mut output = self.channel.to_bits();
        output |= match self.mode {
            ConversionMode::OneShot => 0b0000_0000,
            ConversionMode::Continuous => 0b0001_0000,
        };
        output |= match self.resolution {
            Resolution::Bits12 => 0b0000_0000,
            Resolution::Bits14 => 0b0000_0100,
            Resolution::Bits16 => 0b0000_1000,
            Resolution::Bits18 => 0b0000_1100,
        };
        output |= match self.gain {
            Gain::X1 => 0b0000_0000,
            Gain::X2 => 0b0000_0001,
            Gain::X4 => 0b0000_0010,
            Gain::X8 => 0b0000_0011,
        };
        output
    }
}

impl From<u8> for Config {
    fn from(value: u8) -> Self {
        let channel = Channel::from((value & CHANNEL_MASK) >> 5);

        let mode = if (value & MODE_MASK) == 0 {
            ConversionMode::OneShot
        } else {
            ConversionMode::Continuous
        };

        let resolution = match value & SIZE_MASK {
            0b0000_0000 => Resolution::Bits12,
            0b0000_0100 => Resolution::Bits14,
            0b0000_1000 => Resolution::Bits16,
            _ => Resolution::Bits18,
        };

        let gain = match value & GAIN_MASK {
            0b0000_0000 => Gain::X1,
            0b0000_0001 => Gain::X2,
            0b0000_0010 => Gain::X4,
            _ => Gain::X8,
        };

        Self {
            channel,
            mode,
            resolution,
            gain,
        }
    }
}

impl From<Config> for u8 {
    fn from(config: Config) -> Self {
        config.to_value()
    }
}
