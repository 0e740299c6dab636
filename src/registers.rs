//! Configuration word layout for the LTC2500-32.
//!
//! The converter accepts a 16-bit configuration word shifted in MSB first while `BUSY`
//! is low. [`ConfigWord::into_bytes`] yields the two bytes in wire order.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{DownSamplingFactor, FilterType, Gain};

/// Length of the configuration word on the wire.
pub const CONFIG_WORD_LEN: usize = 2;
/// Length of a conversion result (32-bit two's complement, big endian).
pub const RESULT_LEN: usize = 4;
/// Largest single read the driver performs.
pub const MAX_READ_LEN: usize = 256;

/// Bitfield representation of the configuration word.
///
/// Byte 0: `1 0 DGC DGE DF[3:0]`, byte 1: `FILTER[3:0] 0 0 0 0`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWord {
    // Down-sampling factor exponent (byte 0, bits 3:0).
    pub down_sampling: DownSamplingFactor,
    // Digital gain expansion/compression bits (byte 0, bits 5:4).
    pub gain: Gain,
    #[skip]
    __: B1,
    // Configuration write marker, always set (byte 0, bit 7).
    pub write_enable: bool,
    #[skip]
    __: B4,
    // Digital filter selection (byte 1, bits 7:4).
    pub filter: FilterType,
}

impl ConfigWord {
    /// Builds a word with the write marker set.
    pub fn from_fields(gain: Gain, down_sampling: DownSamplingFactor, filter: FilterType) -> Self {
        Self::new()
            .with_down_sampling(down_sampling)
            .with_gain(gain)
            .with_write_enable(true)
            .with_filter(filter)
    }
}
