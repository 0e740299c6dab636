//! Bus interface abstraction for the LTC2500 driver.

pub mod spi;

/// Status inputs driven by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputLine {
    /// `BUSY`: high while a conversion is in progress.
    Busy,
    /// `DRL`: low while a filtered result is ready.
    DataReady,
}

/// Control outputs driven by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputLine {
    /// `MCLK`: each rising edge starts one conversion.
    Clock,
    /// `PRE`: high selects preset mode, low normal mode.
    Preset,
}

/// Abstraction over the low-level bus and pin access required by the driver.
pub trait Ltc2500Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes `data` within a single chip-select assertion.
    fn write(&mut self, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Clocks out zero bytes and captures the response into `buf` within a single
    /// chip-select assertion.
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Samples a status input, returning `true` when it is high.
    fn read_line(&mut self, line: InputLine) -> core::result::Result<bool, Self::Error>;

    /// Drives a control output.
    fn set_line(&mut self, line: OutputLine, high: bool) -> core::result::Result<(), Self::Error>;
}
