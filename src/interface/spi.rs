//! SPI interface implementation built on top of `embedded-hal` `SpiDevice` and digital pins.

use embedded_hal::digital::{self, ErrorKind as PinErrorKind, InputPin, OutputPin, PinState};
use embedded_hal::spi::{Operation, SpiDevice};

use super::{InputLine, Ltc2500Interface, OutputLine};

/// Errors reported by [`SpiInterface`].
///
/// Pin failures are reduced to their [`PinErrorKind`], so the four control lines may
/// come from different HAL pin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<SpiE> {
    /// The SPI device failed.
    Spi(SpiE),
    /// A status or control pin failed.
    Pin(#[cfg_attr(feature = "defmt", defmt(Debug2Format))] PinErrorKind),
}

fn pin_error<SpiE, E: digital::Error>(error: E) -> InterfaceError<SpiE> {
    InterfaceError::Pin(error.kind())
}

/// Status and control lines of the ADC 7 Click.
pub struct ControlPins<BUSY, DRL, MCLK, PRE> {
    /// `BUSY` input (INT on mikroBUS).
    pub busy: BUSY,
    /// `DRL` input (AN on mikroBUS).
    pub drl: DRL,
    /// `MCLK` output (PWM on mikroBUS).
    pub mclk: MCLK,
    /// `PRE` output (RST on mikroBUS).
    pub pre: PRE,
}

/// SPI-based interface implementation for the LTC2500 driver.
///
/// Chip-select is owned by the `SpiDevice`, which asserts it for the duration of each
/// transaction and releases it on every exit path.
pub struct SpiInterface<SPI, BUSY, DRL, MCLK, PRE> {
    spi: SPI,
    pins: ControlPins<BUSY, DRL, MCLK, PRE>,
}

impl<SPI, BUSY, DRL, MCLK, PRE> SpiInterface<SPI, BUSY, DRL, MCLK, PRE> {
    /// Creates a new interface from the provided SPI device and control lines.
    pub const fn new(spi: SPI, pins: ControlPins<BUSY, DRL, MCLK, PRE>) -> Self {
        Self { spi, pins }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device and pins.
    pub fn release(self) -> (SPI, ControlPins<BUSY, DRL, MCLK, PRE>) {
        (self.spi, self.pins)
    }
}

impl<SPI, BUSY, DRL, MCLK, PRE> Ltc2500Interface for SpiInterface<SPI, BUSY, DRL, MCLK, PRE>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DRL: InputPin,
    MCLK: OutputPin,
    PRE: OutputPin,
{
    type Error = InterfaceError<SPI::Error>;

    fn write(&mut self, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut operations = [Operation::Write(data)];
        self.spi
            .transaction(&mut operations)
            .map_err(InterfaceError::Spi)
    }

    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        buf.fill(0);
        let mut operations = [Operation::TransferInPlace(buf)];
        self.spi
            .transaction(&mut operations)
            .map_err(InterfaceError::Spi)
    }

    fn read_line(&mut self, line: InputLine) -> core::result::Result<bool, Self::Error> {
        match line {
            InputLine::Busy => self.pins.busy.is_high().map_err(pin_error),
            InputLine::DataReady => self.pins.drl.is_high().map_err(pin_error),
        }
    }

    fn set_line(&mut self, line: OutputLine, high: bool) -> core::result::Result<(), Self::Error> {
        let state = PinState::from(high);
        match line {
            OutputLine::Clock => self.pins.mclk.set_state(state).map_err(pin_error),
            OutputLine::Preset => self.pins.pre.set_state(state).map_err(pin_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPins, InterfaceError, SpiInterface};
    use crate::interface::{InputLine, Ltc2500Interface, OutputLine};
    use core::convert::Infallible;
    use embedded_hal::digital::{self, ErrorType as PinErrorType, InputPin, OutputPin};
    use embedded_hal::spi::{self, ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            assert_eq!(operations.len(), 1, "expected a single operation");
            match (*expected, &mut operations[0]) {
                (TransactionExpectation::Write { payload }, Operation::Write(data)) => {
                    assert_eq!(*data, payload, "payload mismatch");
                }
                (
                    TransactionExpectation::Transfer { sent, response },
                    Operation::TransferInPlace(buf),
                ) => {
                    assert_eq!(&buf[..], sent, "transmitted bytes mismatch");
                    assert_eq!(buf.len(), response.len(), "response length mismatch");
                    buf.copy_from_slice(response);
                }
                _ => panic!("operation does not match expectation"),
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation<'a> {
        Write { payload: &'a [u8] },
        Transfer { sent: &'a [u8], response: &'a [u8] },
    }

    #[derive(Default)]
    struct FakePin {
        high: bool,
    }

    impl PinErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenLine;

    impl digital::Error for BrokenLine {
        fn kind(&self) -> digital::ErrorKind {
            digital::ErrorKind::Other
        }
    }

    // Always fails, with an error type distinct from FakePin's.
    struct BrokenPin;

    impl PinErrorType for BrokenPin {
        type Error = BrokenLine;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(BrokenLine)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(BrokenLine)
        }
    }

    struct BrokenBus;

    impl ErrorType for BrokenBus {
        type Error = spi::ErrorKind;
    }

    impl SpiDevice for BrokenBus {
        fn transaction(&mut self, _: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            Err(spi::ErrorKind::ModeFault)
        }
    }

    fn pins(busy: bool, drl: bool) -> ControlPins<FakePin, FakePin, FakePin, FakePin> {
        ControlPins {
            busy: FakePin { high: busy },
            drl: FakePin { high: drl },
            mclk: FakePin::default(),
            pre: FakePin::default(),
        }
    }

    #[test]
    fn write_sends_payload_in_one_transaction() {
        let expectations = [TransactionExpectation::Write {
            payload: &[0xA6, 0x70],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock, pins(false, false));

        interface.write(&[0xA6, 0x70]).unwrap();
    }

    #[test]
    fn read_clocks_out_zeros_and_fills_buffer() {
        let expectations = [TransactionExpectation::Transfer {
            sent: &[0x00, 0x00, 0x00, 0x00],
            response: &[0x7F, 0xFF, 0xFF, 0xFF],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock, pins(false, false));

        let mut buffer = [0x55u8; 4];
        interface.read(&mut buffer).unwrap();
        assert_eq!(buffer, [0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn read_ignores_empty_buffer() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock, pins(false, false));

        interface.read(&mut []).unwrap();
    }

    #[test]
    fn write_ignores_empty_payload() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock, pins(false, false));

        interface.write(&[]).unwrap();
    }

    #[test]
    fn lines_map_to_pins() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock, pins(true, false));

        assert!(interface.read_line(InputLine::Busy).unwrap());
        assert!(!interface.read_line(InputLine::DataReady).unwrap());

        interface.set_line(OutputLine::Clock, true).unwrap();
        interface.set_line(OutputLine::Preset, false).unwrap();

        let (_spi, pins) = interface.release();
        assert!(pins.mclk.high);
        assert!(!pins.pre.high);
    }

    #[test]
    fn mixed_pin_types_report_error_kind() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let lines = ControlPins {
            busy: FakePin { high: false },
            drl: FakePin { high: true },
            mclk: BrokenPin,
            pre: FakePin::default(),
        };
        let mut interface = SpiInterface::new(mock, lines);

        assert_eq!(interface.read_line(InputLine::DataReady), Ok(true));
        assert_eq!(
            interface.set_line(OutputLine::Clock, true),
            Err(InterfaceError::Pin(digital::ErrorKind::Other))
        );
        interface.set_line(OutputLine::Preset, true).unwrap();
    }

    #[test]
    fn bus_failures_surface_as_spi_errors() {
        let mut interface = SpiInterface::new(BrokenBus, pins(false, false));

        assert_eq!(
            interface.write(&[0xA6, 0x70]),
            Err(InterfaceError::Spi(spi::ErrorKind::ModeFault))
        );
        let mut buffer = [0u8; 4];
        assert_eq!(
            interface.read(&mut buffer),
            Err(InterfaceError::Spi(spi::ErrorKind::ModeFault))
        );
    }
}
