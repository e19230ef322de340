//! Digital control lines: the conversion trigger output and the busy input.

use embedded_hal::digital::{Error as _, ErrorKind, InputPin, OutputPin};

use crate::params::Polarity;

/// Output line that starts a conversion (`CNV`/`CONVST`).
pub trait TriggerLine {
    /// Drives the line to its asserted level.
    fn assert(&mut self) -> core::result::Result<(), ErrorKind>;

    /// Drives the line to its idle level.
    fn deassert(&mut self) -> core::result::Result<(), ErrorKind>;

    /// One-time fast-slew setup, invoked from sequencer initialization.
    fn high_speed_init(&mut self) -> core::result::Result<(), ErrorKind> {
        Ok(())
    }
}

/// Input line shared by chained converters, asserted while converting.
pub trait BusyLine {
    /// Returns `true` while a conversion is in progress.
    fn is_asserted(&mut self) -> core::result::Result<bool, ErrorKind>;
}

impl<T: TriggerLine + ?Sized> TriggerLine for &mut T {
    fn assert(&mut self) -> core::result::Result<(), ErrorKind> {
        T::assert(self)
    }

    fn deassert(&mut self) -> core::result::Result<(), ErrorKind> {
        T::deassert(self)
    }

    fn high_speed_init(&mut self) -> core::result::Result<(), ErrorKind> {
        T::high_speed_init(self)
    }
}

impl<T: BusyLine + ?Sized> BusyLine for &mut T {
    fn is_asserted(&mut self) -> core::result::Result<bool, ErrorKind> {
        T::is_asserted(self)
    }
}

/// [`TriggerLine`] over an `embedded-hal` output pin.
pub struct OutputLine<P> {
    pin: P,
    polarity: Polarity,
}

impl<P> OutputLine<P> {
    /// Wraps `pin`, asserting it high.
    pub const fn active_high(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveHigh)
    }

    /// Wraps `pin`, asserting it low.
    pub const fn active_low(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveLow)
    }

    /// Wraps `pin` with an explicit polarity.
    pub const fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Consumes the line and returns the owned pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> OutputLine<P> {
    fn drive(&mut self, asserted: bool) -> core::result::Result<(), ErrorKind> {
        let high = asserted == matches!(self.polarity, Polarity::ActiveHigh);
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|err| err.kind())
    }
}

impl<P: OutputPin> TriggerLine for OutputLine<P> {
    fn assert(&mut self) -> core::result::Result<(), ErrorKind> {
        self.drive(true)
    }

    fn deassert(&mut self) -> core::result::Result<(), ErrorKind> {
        self.drive(false)
    }
}

/// [`BusyLine`] over an `embedded-hal` input pin.
pub struct InputLine<P> {
    pin: P,
    polarity: Polarity,
}

impl<P> InputLine<P> {
    /// Wraps `pin`, reading it as asserted when high.
    pub const fn active_high(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveHigh)
    }

    /// Wraps `pin`, reading it as asserted when low.
    pub const fn active_low(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveLow)
    }

    /// Wraps `pin` with an explicit polarity.
    pub const fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Consumes the line and returns the owned pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> BusyLine for InputLine<P> {
    fn is_asserted(&mut self) -> core::result::Result<bool, ErrorKind> {
        let high = self.pin.is_high().map_err(|err| err.kind())?;
        Ok(high == matches!(self.polarity, Polarity::ActiveHigh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    #[test]
    fn active_high_trigger_drives_high_on_assert() {
        let expectations = [
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ];
        let mut pin = PinMock::new(&expectations);
        let mut line = OutputLine::active_high(pin.clone());

        line.assert().unwrap();
        line.deassert().unwrap();
        pin.done();
    }

    #[test]
    fn active_low_trigger_drives_low_on_assert() {
        let expectations = [
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ];
        let mut pin = PinMock::new(&expectations);
        let mut line = OutputLine::active_low(pin.clone());

        line.assert().unwrap();
        line.deassert().unwrap();
        pin.done();
    }

    #[test]
    fn busy_line_honors_polarity() {
        let expectations = [PinTransaction::get(State::High), PinTransaction::get(State::Low)];
        let mut pin = PinMock::new(&expectations);
        let mut line = InputLine::active_high(pin.clone());
        assert!(line.is_asserted().unwrap());
        assert!(!line.is_asserted().unwrap());
        pin.done();

        let expectations = [PinTransaction::get(State::High), PinTransaction::get(State::Low)];
        let mut pin = PinMock::new(&expectations);
        let mut line = InputLine::active_low(pin.clone());
        assert!(!line.is_asserted().unwrap());
        assert!(line.is_asserted().unwrap());
        pin.done();
    }

    #[test]
    fn high_speed_init_defaults_to_no_op() {
        let mut pin = PinMock::new(&[]);
        let mut line = OutputLine::active_high(pin.clone());
        line.high_speed_init().unwrap();
        pin.done();
    }
}
