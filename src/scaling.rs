//! Raw code to millivolt conversion.

use crate::params::{DownSamplingFactor, Gain};

/// Board reference voltage in millivolts (measured value of the 4.096 V reference).
pub const DEFAULT_REFERENCE_MV: f32 = 4076.0;
/// Full-scale code without digital gain expansion (`2^31 - 1`).
pub const FULL_SCALE_CODE: u32 = 2_147_483_647;
/// Full-scale code with digital gain expansion (`2^30 - 1`).
pub const EXPANDED_FULL_SCALE_CODE: u32 = 1_073_741_823;
/// Fraction of the reference spanned by the output when compression is enabled.
const COMPRESSION_RATIO: f64 = 0.8;

/// Scaling state derived from the active configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scaling {
    /// MCLK pulses per conversion cycle.
    pub sample_count: u16,
    /// Effective reference voltage in millivolts.
    pub voltage_reference: f32,
    /// Code that maps onto the full reference voltage.
    pub full_scale_code: u32,
}

impl Scaling {
    /// Derives the scaling for a gain/down-sampling pair against `reference_mv`.
    pub fn new(gain: Gain, down_sampling: DownSamplingFactor, reference_mv: f32) -> Self {
        let voltage_reference = if gain.compression() {
            (reference_mv as f64 * COMPRESSION_RATIO) as f32
        } else {
            reference_mv
        };
        let full_scale_code = if gain.expansion() {
            EXPANDED_FULL_SCALE_CODE
        } else {
            FULL_SCALE_CODE
        };

        Self {
            sample_count: down_sampling.sample_count(),
            voltage_reference,
            full_scale_code,
        }
    }

    /// Start-up scaling: 4 samples, full reference, `2^31 - 1`.
    pub fn power_on(reference_mv: f32) -> Self {
        Self::new(Gain::Disabled, DownSamplingFactor::Df4, reference_mv)
    }

    /// Converts a raw two's complement code into millivolts.
    ///
    /// The fraction is computed in `f64` and truncated toward zero.
    pub fn millivolts(&self, raw: i32) -> i16 {
        let fraction = raw as f64 / self.full_scale_code as f64;
        (fraction * self.voltage_reference as f64) as i16
    }
}

impl Default for Scaling {
    fn default() -> Self {
        Self::power_on(DEFAULT_REFERENCE_MV)
    }
}

/// Assembles a big-endian 32-bit result.
pub fn raw_code(bytes: [u8; 4]) -> i32 {
    i32::from_be_bytes(bytes)
}
