//! High-level LTC2500 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::spi::{ControlPins, SpiInterface};
use crate::interface::{InputLine, Ltc2500Interface, OutputLine};
use crate::params::{BusyStatus, DataStatus};
use crate::poll::{wait_until, PollStrategy};
use crate::registers::{MAX_READ_LEN, RESULT_LEN};
use crate::scaling::{raw_code, Scaling, DEFAULT_REFERENCE_MV};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

// Minimum MCLK high and low time used when stepping a conversion (microseconds).
const MCLK_HALF_PERIOD_US: u32 = 1;

/// High-level synchronous driver for the LTC2500-32 converter.
pub struct Ltc2500<IFACE> {
    interface: IFACE,
    config: Config,
    scaling: Scaling,
    reference_mv: f32,
}

impl<IFACE> Ltc2500<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance with the power-on scaling state.
    pub fn new(interface: IFACE) -> Self {
        Self {
            interface,
            config: Config::default(),
            scaling: Scaling::power_on(DEFAULT_REFERENCE_MV),
            reference_mv: DEFAULT_REFERENCE_MV,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the most recently committed configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the scaling state used by [`read_results`](Self::read_results).
    pub fn scaling(&self) -> &Scaling {
        &self.scaling
    }

    /// Returns the reference voltage in millivolts.
    pub fn reference_mv(&self) -> f32 {
        self.reference_mv
    }

    /// Overrides the board reference voltage (defaults to 4076 mV).
    pub fn set_reference_mv(&mut self, reference_mv: f32) {
        self.reference_mv = reference_mv;
        self.scaling = Scaling::new(self.config.gain, self.config.down_sampling, reference_mv);
    }
}

impl<SPI, BUSY, DRL, MCLK, PRE> Ltc2500<SpiInterface<SPI, BUSY, DRL, MCLK, PRE>>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DRL: InputPin,
    MCLK: OutputPin,
    PRE: OutputPin,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, pins: ControlPins<BUSY, DRL, MCLK, PRE>) -> Self {
        Self::new(SpiInterface::new(spi, pins))
    }

    /// Releases the driver, returning the SPI device and control pins.
    pub fn release_spi(self) -> (SPI, ControlPins<BUSY, DRL, MCLK, PRE>) {
        self.release().release()
    }
}

impl<IFACE, CommE> Ltc2500<IFACE>
where
    IFACE: Ltc2500Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Configuration ================================
    // ==================================================================
    /// Drives `PRE` and `MCLK` low and restores the power-on scaling state.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.interface.set_line(OutputLine::Preset, false)?;
        self.interface.set_line(OutputLine::Clock, false)?;

        self.config = Config::default();
        self.scaling = Scaling::power_on(self.reference_mv);
        Ok(())
    }

    /// Validates raw field values and writes the configuration word.
    ///
    /// Fields are checked in the order gain (`0..=3`), down-sampling factor (`2..=14`),
    /// filter type (`1..=7`); the first invalid one is reported.
    ///
    /// See [`write_config`](Self::write_config) for the busy behaviour.
    pub fn set_config(
        &mut self,
        gain: u8,
        down_sampling_factor: u8,
        filter_type: u8,
    ) -> Result<BusyStatus, CommE> {
        let config = Config::from_raw(gain, down_sampling_factor, filter_type)
            .map_err(Error::InvalidConfig)?;
        self.write_config(config)
    }

    /// Writes the configuration word for the next conversion cycles.
    ///
    /// Returns [`BusyStatus::Busy`] without touching the bus when a conversion is in
    /// progress. The scaling state is committed in either case, so after a `Busy`
    /// result the driver scales readings with a configuration the device never
    /// received; callers should wait for `BUSY` low and retry.
    pub fn write_config(&mut self, config: Config) -> Result<BusyStatus, CommE> {
        self.config = config;
        self.scaling = Scaling::new(config.gain, config.down_sampling, self.reference_mv);

        let status = self.check_busy()?;
        match status {
            BusyStatus::NotBusy => {
                self.interface.write(&config.encode())?;
                debug!("configuration written: {}", config);
            }
            BusyStatus::Busy => {
                trace!("BUSY high, configuration not sent: {}", config);
            }
        }

        Ok(status)
    }

    /// Full bring-up: normal mode, wait for idle, configure, wait for idle.
    pub fn begin<P>(&mut self, config: Config, poll: &mut P) -> Result<(), CommE>
    where
        P: PollStrategy,
    {
        self.preset_mode(false)?;
        self.wait_while_busy(poll)?;

        let written = wait_until(poll, || -> Result<bool, CommE> {
            Ok(self.write_config(config)? == BusyStatus::NotBusy)
        })?;
        if !written {
            warn!("configuration rejected until the poll strategy gave up");
            return Err(Error::Timeout);
        }

        self.wait_while_busy(poll)
    }

    // ==================================================================
    // == Status Lines ==================================================
    // ==================================================================
    /// Samples `BUSY` (high = busy).
    pub fn check_busy(&mut self) -> Result<BusyStatus, CommE> {
        let level = self.interface.read_line(InputLine::Busy)?;
        Ok(BusyStatus::from_level(level))
    }

    /// Samples `DRL` (low = data ready).
    pub fn check_data_ready(&mut self) -> Result<DataStatus, CommE> {
        let level = self.interface.read_line(InputLine::DataReady)?;
        Ok(DataStatus::from_level(level))
    }

    /// Polls `BUSY` until it reads low.
    pub fn wait_while_busy<P>(&mut self, poll: &mut P) -> Result<(), CommE>
    where
        P: PollStrategy,
    {
        let idle = wait_until(poll, || -> Result<bool, CommE> {
            Ok(self.check_busy()? == BusyStatus::NotBusy)
        })?;
        if !idle {
            warn!("timed out waiting for BUSY low");
            return Err(Error::Timeout);
        }
        Ok(())
    }

    /// Polls `DRL` until it reads low.
    pub fn wait_for_data<P>(&mut self, poll: &mut P) -> Result<(), CommE>
    where
        P: PollStrategy,
    {
        let ready = wait_until(poll, || -> Result<bool, CommE> {
            Ok(self.check_data_ready()? == DataStatus::Ready)
        })?;
        if !ready {
            warn!("timed out waiting for DRL low");
            return Err(Error::Timeout);
        }
        Ok(())
    }

    // ==================================================================
    // == Conversion Control ============================================
    // ==================================================================
    /// Drives `MCLK`; a rising edge starts one conversion.
    pub fn set_clock(&mut self, high: bool) -> Result<(), CommE> {
        self.interface
            .set_line(OutputLine::Clock, high)
            .map_err(Error::from)
    }

    /// Drives `PRE`: `true` enters preset mode, `false` returns to normal mode.
    ///
    /// Issue once, while the device is not busy, before the first configuration.
    pub fn preset_mode(&mut self, preset: bool) -> Result<(), CommE> {
        self.interface
            .set_line(OutputLine::Preset, preset)
            .map_err(Error::from)
    }

    /// Clocks one full down-sampling period.
    ///
    /// Emits `sample_count` MCLK pulses and waits for `BUSY` low after each one.
    pub fn start_conversion_cycle<D, P>(&mut self, delay: &mut D, poll: &mut P) -> Result<(), CommE>
    where
        D: DelayNs,
        P: PollStrategy,
    {
        let pulses = self.scaling.sample_count;
        trace!("conversion cycle: {=u16} pulses", pulses);

        for _ in 0..pulses {
            self.set_clock(true)?;
            delay.delay_us(MCLK_HALF_PERIOD_US);
            self.set_clock(false)?;
            delay.delay_us(MCLK_HALF_PERIOD_US);

            self.wait_while_busy(poll)?;
        }

        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads `buf.len()` bytes of conversion data when `DRL` is low.
    ///
    /// Returns [`DataStatus::NotReady`] without any bus traffic, leaving `buf` untouched,
    /// when no result is available.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<DataStatus, CommE> {
        if buf.len() > MAX_READ_LEN {
            return Err(Error::BufferTooLong);
        }

        let status = self.check_data_ready()?;
        if status == DataStatus::Ready {
            self.interface.read(buf)?;
        }

        Ok(status)
    }

    /// Reads the 32-bit two's complement conversion result, or `None` if not ready.
    pub fn read_raw(&mut self) -> Result<Option<i32>, CommE> {
        let mut raw = [0u8; RESULT_LEN];
        match self.read_bytes(&mut raw)? {
            DataStatus::Ready => Ok(Some(raw_code(raw))),
            DataStatus::NotReady => Ok(None),
        }
    }

    /// Reads the conversion result in millivolts, or `None` if not ready.
    pub fn read_results(&mut self) -> Result<Option<i16>, CommE> {
        let raw = self.read_raw()?;
        Ok(raw.map(|code| self.scaling.millivolts(code)))
    }

    /// Runs a conversion cycle, waits for `DRL` and returns the reading in millivolts.
    pub fn measure<D, P>(&mut self, delay: &mut D, poll: &mut P) -> Result<i16, CommE>
    where
        D: DelayNs,
        P: PollStrategy,
    {
        self.start_conversion_cycle(delay, poll)?;

        let mut reading = None;
        let ready = wait_until(poll, || -> Result<bool, CommE> {
            reading = self.read_results()?;
            Ok(reading.is_some())
        })?;

        match reading {
            Some(mv) if ready => Ok(mv),
            _ => {
                warn!("timed out waiting for conversion data");
                Err(Error::Timeout)
            }
        }
    }
}
