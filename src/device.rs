//! Single-converter sequencing: trigger, wait out the conversion, read.

use embedded_hal::delay::DelayNs;

use crate::config::{BusConfig, Timing};
use crate::error::{Error, Result};
use crate::interface::Transport;
use crate::interface::spi::SpiTransport;
use crate::lines::TriggerLine;
use crate::log::debug;
use crate::params::{ClockDivider, ClockPhase, ClockPolarity, FrameWidth};

/// Bus setup shared by the AD7xxx family: f_pclk / 2, clock idle high,
/// capture on the second edge, 16-bit frames.
pub const BUS_CONFIG: BusConfig = BusConfig {
    divider: ClockDivider::Div2,
    polarity: ClockPolarity::IdleHigh,
    phase: ClockPhase::SecondEdge,
    frame_width: FrameWidth::Sixteen,
};

// Transmit word clocked out while reading a sample.
const READ_FILL: u16 = 0x0000;

/// Brings the trigger line to idle and applies [`BUS_CONFIG`].
pub(crate) fn init_bus<T, CNV>(transport: &mut T, convst: &mut CNV) -> Result<(), T::Error>
where
    T: Transport,
    CNV: TriggerLine,
{
    convst.high_speed_init().map_err(Error::Line)?;
    convst.deassert().map_err(Error::Line)?;
    transport.init(&BUS_CONFIG)?;
    Ok(())
}

/// Clocks one MSB-first sample out of the next converter on the bus.
#[inline]
pub(crate) fn read_sample<T: Transport>(transport: &mut T) -> Result<u16, T::Error> {
    Ok(transport.exchange_word_be(READ_FILL)?)
}

/// Synchronous driver for a single AD7xxx converter.
///
/// The driver keeps no conversion state. [`convert`](Self::convert) must be
/// followed by [`read`](Self::read) before the next conversion is started,
/// and the caller is responsible for waiting out the conversion time between
/// the two (or for using [`convert_and_read`](Self::convert_and_read)).
pub struct Ad7xxx<T, CNV> {
    transport: T,
    convst: CNV,
    timing: Timing,
}

impl<T, CNV> Ad7xxx<T, CNV> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver using [`Timing::AD7685`].
    pub fn new(transport: T, convst: CNV) -> Self {
        Self::with_timing(transport, convst, Timing::AD7685)
    }

    /// Creates a new driver with explicit device timing.
    pub fn with_timing(transport: T, convst: CNV, timing: Timing) -> Self {
        Self {
            transport,
            convst,
            timing,
        }
    }

    /// Returns the device timing in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Provides mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the driver and returns the transport and trigger line.
    pub fn release(self) -> (T, CNV) {
        (self.transport, self.convst)
    }
}

impl<SPI, CNV> Ad7xxx<SpiTransport<SPI>, CNV> {
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI buses.
    pub fn new_spi(spi: SPI, convst: CNV) -> Self {
        Self::new(SpiTransport::new(spi), convst)
    }

    /// Releases the driver, returning the SPI bus and trigger line.
    pub fn release_spi(self) -> (SPI, CNV) {
        let (transport, convst) = self.release();
        (transport.release(), convst)
    }
}

impl<T, CNV, CommE> Ad7xxx<T, CNV>
where
    T: Transport<Error = CommE>,
    CNV: TriggerLine,
{
    // ==================================================================
    // == Initialization & Acquisition ==================================
    // ==================================================================
    /// Prepares the trigger line and applies [`BUS_CONFIG`].
    ///
    /// Must run once before the first conversion.
    pub fn init(&mut self) -> Result<(), CommE> {
        init_bus(&mut self.transport, &mut self.convst)?;
        debug!("ad7xxx: initialized");
        Ok(())
    }

    /// Starts a conversion. No bus traffic.
    pub fn convert(&mut self) -> Result<(), CommE> {
        self.convst.assert().map_err(Error::Line)
    }

    /// Releases the trigger and reads the converted sample.
    pub fn read(&mut self) -> Result<u16, CommE> {
        self.convst.deassert().map_err(Error::Line)?;
        read_sample(&mut self.transport)
    }

    /// Starts a conversion, waits the datasheet conversion time and reads the sample.
    pub fn convert_and_read(&mut self, delay: &mut impl DelayNs) -> Result<u16, CommE> {
        self.convert()?;
        delay.delay_ns(self.timing.conversion_time_ns());
        self.read()
    }
}
