//! Configuration primitives for the LTC2500 driver.

use crate::params::{DownSamplingFactor, FilterType, Gain};
use crate::registers::{ConfigWord, CONFIG_WORD_LEN};

/// Conversion settings shifted into the LTC2500 configuration word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Digital gain expansion/compression selection.
    pub gain: Gain,
    /// Down-sampling factor (MCLK pulses per filtered output).
    pub down_sampling: DownSamplingFactor,
    /// Digital filter applied to the down-sampled output.
    pub filter: FilterType,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validates raw field values in the order gain, down-sampling factor, filter type.
    ///
    /// The first out-of-range field determines the returned error.
    pub fn from_raw(
        gain: u8,
        down_sampling_factor: u8,
        filter_type: u8,
    ) -> core::result::Result<Self, ConfigError> {
        let gain = Gain::try_from(gain)?;
        let down_sampling = DownSamplingFactor::try_from(down_sampling_factor)?;
        let filter = FilterType::try_from(filter_type)?;

        Ok(Self {
            gain,
            down_sampling,
            filter,
        })
    }

    /// Encodes the configuration into the two bytes written on the bus.
    pub fn encode(&self) -> [u8; CONFIG_WORD_LEN] {
        ConfigWord::from_fields(self.gain, self.down_sampling, self.filter).into()
    }

    /// Number of MCLK pulses per conversion cycle.
    pub const fn sample_count(&self) -> u16 {
        self.down_sampling.sample_count()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the digital gain selection.
    pub fn gain(mut self, gain: Gain) -> Self {
        self.config.gain = gain;
        self
    }

    /// Overrides the down-sampling factor.
    pub fn down_sampling(mut self, down_sampling: DownSamplingFactor) -> Self {
        self.config.down_sampling = down_sampling;
        self
    }

    /// Overrides the digital filter.
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.config.filter = filter;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: Gain::Disabled,
            down_sampling: DownSamplingFactor::Df4,
            filter: FilterType::Sinc1,
        }
    }
}

/// Validation errors generated while checking raw configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Gain selection outside `0..=3`.
    Gain,
    /// Down-sampling factor outside `2..=14`.
    DownSamplingFactor,
    /// Filter type outside `1..=7`.
    FilterType,
}
