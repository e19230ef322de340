//! Daisy-chained converters sharing one trigger, one busy line and one bus.
//!
//! [`ChainedAd7xxx`] polls the shared busy line with a bounded timeout before
//! bursting out one sample per device. [`AsyncChainedAd7xxx`] performs only the
//! burst read, for systems whose scheduler already guarantees the conversion
//! has finished.

use crate::config::Timing;
use crate::device::{init_bus, read_sample};
use crate::error::{Error, Result};
use crate::interface::Transport;
use crate::lines::{BusyLine, TriggerLine};
use crate::log::{debug, trace, warning};
use crate::time::Clock;

/// Reads `N` samples in device order into a scratch array.
///
/// Nothing reaches the caller's buffer unless every exchange succeeded.
fn read_chain<T: Transport, const N: usize>(transport: &mut T) -> Result<[u16; N], T::Error> {
    let mut samples = [0u16; N];
    for sample in samples.iter_mut() {
        *sample = read_sample(transport)?;
    }
    Ok(samples)
}

/// Synchronous driver for `N` daisy-chained AD7xxx converters.
pub struct ChainedAd7xxx<T, CNV, BUSY, const N: usize> {
    transport: T,
    convst: CNV,
    busy: BUSY,
    timing: Timing,
}

impl<T, CNV, BUSY, const N: usize> ChainedAd7xxx<T, CNV, BUSY, N> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new chain driver using [`Timing::AD7685`].
    pub fn new(transport: T, convst: CNV, busy: BUSY) -> Self {
        Self::with_timing(transport, convst, busy, Timing::AD7685)
    }

    /// Creates a new chain driver with explicit device timing.
    pub fn with_timing(transport: T, convst: CNV, busy: BUSY, timing: Timing) -> Self {
        Self {
            transport,
            convst,
            busy,
            timing,
        }
    }

    /// Number of converters in the chain.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` for a zero-length chain.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the device timing in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Consumes the driver and returns the transport and both lines.
    pub fn release(self) -> (T, CNV, BUSY) {
        (self.transport, self.convst, self.busy)
    }
}

impl<T, CNV, BUSY, CommE, const N: usize> ChainedAd7xxx<T, CNV, BUSY, N>
where
    T: Transport<Error = CommE>,
    CNV: TriggerLine,
    BUSY: BusyLine,
{
    // ==================================================================
    // == Initialization & Chained Acquisition ==========================
    // ==================================================================
    /// Prepares the trigger line and applies the AD7xxx bus configuration.
    pub fn init(&mut self) -> Result<(), CommE> {
        init_bus(&mut self.transport, &mut self.convst)?;
        debug!("ad7xxx chain of {}: initialized", N);
        Ok(())
    }

    /// Runs one acquisition across the whole chain.
    ///
    /// Asserts the trigger, spins on the busy line for at most the timing's
    /// busy timeout, and when the chain reports ready reads one sample per
    /// device into `buffer` in device order. The trigger is deasserted exactly
    /// once after the busy outcome is known, whatever that outcome is.
    ///
    /// Returns `Ok(false)` when the busy line is still asserted at the
    /// timeout; `buffer` is then left untouched and should be treated as "no
    /// new sample this cycle". A transport error during readout also leaves
    /// `buffer` untouched.
    pub fn convert_and_read(
        &mut self,
        clock: &mut impl Clock,
        buffer: &mut [u16; N],
    ) -> Result<bool, CommE> {
        self.convst.assert().map_err(Error::Line)?;

        let timeout = self.timing.busy_timeout_ms();
        let start = clock.now_millis32();
        let mut busy = self.poll_busy();
        while matches!(busy, Ok(true)) && clock.elapsed_millis32(start) < timeout {
            clock.relax();
            busy = self.poll_busy();
        }

        // The single busy sample taken above gates both the readout and the
        // returned outcome.
        let readout = match busy {
            Ok(false) => read_chain::<_, N>(&mut self.transport).map(Some),
            Ok(true) => Ok(None),
            Err(err) => Err(err),
        };

        self.convst.deassert().map_err(Error::Line)?;

        match readout? {
            Some(samples) => {
                trace!("ad7xxx chain: read {} samples", N);
                *buffer = samples;
                Ok(true)
            }
            None => {
                warning!("ad7xxx chain: busy timeout after {} ms", timeout);
                Ok(false)
            }
        }
    }

    fn poll_busy(&mut self) -> Result<bool, CommE> {
        self.busy.is_asserted().map_err(Error::Line)
    }
}

/// Burst reader for `N` daisy-chained converters whose conversion timing is
/// driven externally.
///
/// No trigger handling and no busy polling: the caller guarantees the chain
/// has finished converting before calling [`read`](Self::read).
pub struct AsyncChainedAd7xxx<T, const N: usize> {
    transport: T,
}

impl<T, const N: usize> AsyncChainedAd7xxx<T, N> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new burst reader.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Number of converters in the chain.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` for a zero-length chain.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Consumes the reader and returns the transport.
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T, CommE, const N: usize> AsyncChainedAd7xxx<T, N>
where
    T: Transport<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Burst Readout ================================
    // ==================================================================
    /// Applies the AD7xxx bus configuration.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.transport.init(&crate::device::BUS_CONFIG)?;
        Ok(())
    }

    /// Reads one sample per device into `buffer` in device order.
    pub fn read(&mut self, buffer: &mut [u16; N]) -> Result<(), CommE> {
        *buffer = read_chain::<_, N>(&mut self.transport)?;
        Ok(())
    }
}
