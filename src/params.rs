//! Strongly typed parameter enumerations for the LTC2500 driver.
//!
//! These enums map directly to the configuration word encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use ltc2500::params::{DownSamplingFactor, FilterType, Gain};
//!
//! let gain = Gain::Disabled;
//! let df = DownSamplingFactor::Df64;
//! let filter = FilterType::Averaging;
//! assert_eq!(df.sample_count(), 64);
//! let _ = (gain, filter);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::config::ConfigError;

/// Digital gain selection (`DGE`/`DGC` bits of the configuration word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Gain {
    /// No digital gain applied.
    Disabled = 0b00,
    /// Digital gain expansion enabled.
    Expansion = 0b01,
    /// Digital gain compression enabled.
    Compression = 0b10,
    /// Expansion and compression both enabled.
    ExpansionCompression = 0b11,
}

impl Gain {
    /// Returns `true` when the expansion bit is set.
    pub const fn expansion(self) -> bool {
        (self as u8) & 0b01 != 0
    }

    /// Returns `true` when the compression bit is set.
    pub const fn compression(self) -> bool {
        (self as u8) & 0b10 != 0
    }
}

impl TryFrom<u8> for Gain {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Expansion),
            2 => Ok(Self::Compression),
            3 => Ok(Self::ExpansionCompression),
            _ => Err(ConfigError::Gain),
        }
    }
}

/// Down-sampling factor selection (`DF[3:0]`), encoded as the power-of-two exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum DownSamplingFactor {
    /// 4 samples per output.
    Df4 = 2,
    /// 8 samples per output.
    Df8 = 3,
    /// 16 samples per output.
    Df16 = 4,
    /// 32 samples per output.
    Df32 = 5,
    /// 64 samples per output.
    Df64 = 6,
    /// 128 samples per output.
    Df128 = 7,
    /// 256 samples per output.
    Df256 = 8,
    /// 512 samples per output.
    Df512 = 9,
    /// 1024 samples per output.
    Df1024 = 10,
    /// 2048 samples per output.
    Df2048 = 11,
    /// 4096 samples per output.
    Df4096 = 12,
    /// 8192 samples per output.
    Df8192 = 13,
    /// 16384 samples per output.
    Df16384 = 14,
}

impl DownSamplingFactor {
    /// Returns the exponent written to the `DF` field.
    pub const fn exponent(self) -> u8 {
        self as u8
    }

    /// Number of MCLK pulses required to produce one filtered output.
    pub const fn sample_count(self) -> u16 {
        let mut count: u16 = 1;
        let mut i = 0;
        while i < self.exponent() {
            count *= 2;
            i += 1;
        }
        count
    }
}

impl TryFrom<u8> for DownSamplingFactor {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let df = match value {
            2 => Self::Df4,
            3 => Self::Df8,
            4 => Self::Df16,
            5 => Self::Df32,
            6 => Self::Df64,
            7 => Self::Df128,
            8 => Self::Df256,
            9 => Self::Df512,
            10 => Self::Df1024,
            11 => Self::Df2048,
            12 => Self::Df4096,
            13 => Self::Df8192,
            14 => Self::Df16384,
            _ => return Err(ConfigError::DownSamplingFactor),
        };
        Ok(df)
    }
}

/// Digital filter selection (`FILTER[3:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum FilterType {
    /// Sinc1 filter.
    Sinc1 = 1,
    /// Sinc2 filter.
    Sinc2 = 2,
    /// Sinc3 filter.
    Sinc3 = 3,
    /// Sinc4 filter.
    Sinc4 = 4,
    /// Spread sinc filter.
    Ssinc = 5,
    /// Flat passband filter.
    FlatPassband = 6,
    /// Averaging filter.
    Averaging = 7,
}

impl TryFrom<u8> for FilterType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sinc1),
            2 => Ok(Self::Sinc2),
            3 => Ok(Self::Sinc3),
            4 => Ok(Self::Sinc4),
            5 => Ok(Self::Ssinc),
            6 => Ok(Self::FlatPassband),
            7 => Ok(Self::Averaging),
            _ => Err(ConfigError::FilterType),
        }
    }
}

/// State of the `BUSY` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusyStatus {
    /// A conversion is in progress; configuration writes are rejected.
    Busy,
    /// The converter is idle.
    NotBusy,
}

impl BusyStatus {
    /// Maps the raw `BUSY` line level (high = busy).
    pub const fn from_level(high: bool) -> Self {
        if high { Self::Busy } else { Self::NotBusy }
    }
}

/// State of the active-low `DRL` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataStatus {
    /// A filtered result is available.
    Ready,
    /// No result is available yet.
    NotReady,
}

impl DataStatus {
    /// Maps the raw `DRL` line level (low = ready).
    pub const fn from_level(high: bool) -> Self {
        if high { Self::NotReady } else { Self::Ready }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_is_power_of_two_of_exponent() {
        for exponent in 2u8..=14 {
            let df = DownSamplingFactor::try_from(exponent).unwrap();
            assert_eq!(df.exponent(), exponent);
            assert_eq!(df.sample_count(), 1u16 << exponent);
        }
        assert_eq!(DownSamplingFactor::Df64.sample_count(), 64);
    }

    #[test]
    fn raw_values_outside_ranges_are_rejected() {
        assert_eq!(Gain::try_from(4), Err(ConfigError::Gain));
        assert_eq!(DownSamplingFactor::try_from(1), Err(ConfigError::DownSamplingFactor));
        assert_eq!(DownSamplingFactor::try_from(15), Err(ConfigError::DownSamplingFactor));
        assert_eq!(FilterType::try_from(0), Err(ConfigError::FilterType));
        assert_eq!(FilterType::try_from(8), Err(ConfigError::FilterType));
    }

    #[test]
    fn gain_bits_decode() {
        assert!(!Gain::Disabled.expansion() && !Gain::Disabled.compression());
        assert!(Gain::Expansion.expansion() && !Gain::Expansion.compression());
        assert!(!Gain::Compression.expansion() && Gain::Compression.compression());
        assert!(Gain::ExpansionCompression.expansion());
        assert!(Gain::ExpansionCompression.compression());
    }

    #[test]
    fn status_levels() {
        assert_eq!(BusyStatus::from_level(true), BusyStatus::Busy);
        assert_eq!(BusyStatus::from_level(false), BusyStatus::NotBusy);
        assert_eq!(DataStatus::from_level(true), DataStatus::NotReady);
        assert_eq!(DataStatus::from_level(false), DataStatus::Ready);
    }
}
