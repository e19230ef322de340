//! Transport implementation built on top of `embedded-hal` `SpiBus`.

use embedded_hal::spi::SpiBus;

use super::Transport;
use crate::config::BusConfig;
use crate::log::debug;
use crate::params::ClockPhase;

/// Platform routine that programs the peripheral from a [`BusConfig`].
pub type ApplyHook<SPI> = fn(&mut SPI, &BusConfig);

/// SPI-based transport for the AD7xxx driver.
///
/// `embedded-hal` buses carry no runtime clock configuration, so applying a
/// [`BusConfig`] is delegated to an optional platform hook. Without a hook the
/// bus is assumed to already be configured by the HAL and the configuration is
/// only recorded.
pub struct SpiTransport<SPI> {
    spi: SPI,
    apply: Option<ApplyHook<SPI>>,
    applied: Option<BusConfig>,
}

impl<SPI> SpiTransport<SPI> {
    /// Creates a new transport from the provided SPI bus.
    pub const fn new(spi: SPI) -> Self {
        Self {
            spi,
            apply: None,
            applied: None,
        }
    }

    /// Creates a transport that calls `apply` whenever a configuration is applied.
    pub const fn with_apply_hook(spi: SPI, apply: ApplyHook<SPI>) -> Self {
        Self {
            spi,
            apply: Some(apply),
            applied: None,
        }
    }

    /// Returns the last configuration applied by [`Transport::init`].
    pub fn applied_config(&self) -> Option<&BusConfig> {
        self.applied.as_ref()
    }

    /// Changes the sampling edge of the applied configuration without a full
    /// re-initialization.
    ///
    /// Returns `false`, touching nothing, when no configuration has been
    /// applied yet.
    pub fn set_clock_phase_immediate(&mut self, phase: ClockPhase) -> bool {
        let Some(mut config) = self.applied else {
            return false;
        };
        config.phase = phase;
        self.apply_config(&config);
        true
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the transport and returns the owned SPI bus.
    pub fn release(self) -> SPI {
        self.spi
    }

    fn apply_config(&mut self, config: &BusConfig) {
        if let Some(apply) = self.apply {
            apply(&mut self.spi, config);
        }
        self.applied = Some(*config);
    }
}

impl<SPI> Transport for SpiTransport<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn init(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error> {
        debug!(
            "bus config: div {}, {}, {}, {}-bit",
            config.divider.ratio(),
            config.polarity,
            config.phase,
            config.frame_width.bits()
        );
        self.apply_config(config);
        Ok(())
    }

    fn exchange_byte(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        let mut frame = [byte];
        self.spi.transfer_in_place(&mut frame)?;
        self.spi.flush()?;
        Ok(frame[0])
    }
}

#[cfg(test)]
mod tests {
    use super::SpiTransport;
    use crate::config::{BusConfig, ConfigError};
    use crate::error::Error;
    use crate::interface::Transport;
    use crate::params::{ClockPhase, ClockPolarity, FrameWidth};
    use core::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn byte(tx: u8, rx: u8) -> [SpiTransaction<u8>; 2] {
        [
            SpiTransaction::transfer_in_place(vec![tx], vec![rx]),
            SpiTransaction::flush(),
        ]
    }

    #[test]
    fn exchange_byte_transfers_and_flushes() {
        let expectations = byte(0x3C, 0xC3);
        let mut spi = SpiMock::new(&expectations);
        let mut transport = SpiTransport::new(spi.clone());

        assert_eq!(transport.exchange_byte(0x3C).unwrap(), 0xC3);
        spi.done();
    }

    #[test]
    fn exchange_word_be_sends_high_byte_first() {
        let expectations: Vec<_> = byte(0x12, 0xBE)
            .into_iter()
            .chain(byte(0x34, 0xEF))
            .collect();
        let mut spi = SpiMock::new(&expectations);
        let mut transport = SpiTransport::new(spi.clone());

        assert_eq!(transport.exchange_word_be(0x1234).unwrap(), 0xBEEF);
        spi.done();
    }

    #[test]
    fn exchange_word_le_sends_low_byte_first() {
        let expectations: Vec<_> = byte(0x34, 0xBE)
            .into_iter()
            .chain(byte(0x12, 0xEF))
            .collect();
        let mut spi = SpiMock::new(&expectations);
        let mut transport = SpiTransport::new(spi.clone());

        assert_eq!(transport.exchange_word_le(0x1234).unwrap(), 0xEFBE);
        spi.done();
    }

    #[test]
    fn init_records_applied_config_without_bus_traffic() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut transport = SpiTransport::new(spi.clone());
        assert!(transport.applied_config().is_none());

        let config = BusConfig::builder().frame_width(16).build().unwrap();
        transport.init(&config).unwrap();

        assert_eq!(transport.applied_config(), Some(&config));
        spi.done();
    }

    #[test]
    fn rejected_config_leaves_applied_config_unchanged() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut transport = SpiTransport::new(spi.clone());

        let good = BusConfig::builder().clock_rate_divider(8).build().unwrap();
        transport.init(&good).unwrap();

        let result = transport.configure(BusConfig::builder().clock_rate_divider(12).frame_width(16));
        assert!(matches!(
            result,
            Err(Error::InvalidConfig(ConfigError::UnsupportedClockDivider(12)))
        ));
        assert_eq!(transport.applied_config(), Some(&good));
        spi.done();
    }

    #[test]
    fn configure_rejects_builder_without_applying() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut transport = SpiTransport::new(spi.clone());

        let applied = transport
            .configure(BusConfig::builder().clock_rate_divider(4).frame_width(16))
            .unwrap();
        assert_eq!(transport.applied_config(), Some(&applied));

        let result = transport.configure(BusConfig::builder().clock_rate_divider(4).frame_width(12));
        assert!(matches!(
            result,
            Err(Error::InvalidConfig(ConfigError::UnsupportedFrameWidth(12)))
        ));
        assert_eq!(transport.applied_config(), Some(&applied));
        spi.done();
    }

    static LAST_CONTROL_WORD: AtomicU16 = AtomicU16::new(0);

    fn record_control_word(_spi: &mut SpiMock<u8>, config: &BusConfig) {
        LAST_CONTROL_WORD.store(config.control_word(), Ordering::SeqCst);
    }

    #[test]
    fn apply_hook_runs_on_init_and_phase_change() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut transport = SpiTransport::with_apply_hook(spi.clone(), record_control_word);

        let config = BusConfig::builder()
            .clock_polarity(ClockPolarity::IdleHigh)
            .clock_phase(ClockPhase::FirstEdge)
            .frame_width(16)
            .build()
            .unwrap();
        transport.init(&config).unwrap();
        assert_eq!(LAST_CONTROL_WORD.load(Ordering::SeqCst), config.control_word());

        assert!(transport.set_clock_phase_immediate(ClockPhase::SecondEdge));
        let applied = *transport.applied_config().unwrap();
        assert_eq!(applied.phase, ClockPhase::SecondEdge);
        assert_eq!(applied.polarity, ClockPolarity::IdleHigh);
        assert_eq!(applied.frame_width, FrameWidth::Sixteen);
        assert_eq!(LAST_CONTROL_WORD.load(Ordering::SeqCst), applied.control_word());
        spi.done();
    }

    static UNCONFIGURED_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_hook_calls(_spi: &mut SpiMock<u8>, _config: &BusConfig) {
        UNCONFIGURED_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn phase_change_before_init_does_nothing() {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut transport = SpiTransport::with_apply_hook(spi.clone(), count_hook_calls);

        assert!(!transport.set_clock_phase_immediate(ClockPhase::SecondEdge));
        assert_eq!(UNCONFIGURED_HOOK_CALLS.load(Ordering::SeqCst), 0);
        assert!(transport.applied_config().is_none());
        spi.done();
    }
}
