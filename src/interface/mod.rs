//! Serial transport abstraction for the AD7xxx driver.

pub mod spi;

use crate::config::{BusConfig, BusConfigBuilder};
use crate::error::{Error, Result};

/// Abstraction over the synchronous serial bus shared by the converters.
///
/// Every exchange returns only after both the transmit and receive halves
/// have completed. A transport represents exclusive use of one bus; callers
/// sharing a bus between sequencers must serialize access themselves.
pub trait Transport {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Applies a validated bus configuration in one step.
    fn init(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error>;

    /// Validates `builder` and applies the result.
    ///
    /// A rejected configuration returns [`Error::InvalidConfig`] without
    /// calling [`init`](Self::init), so the applied configuration is unchanged.
    fn configure(&mut self, builder: BusConfigBuilder) -> Result<BusConfig, Self::Error> {
        let config = builder.build().map_err(Error::InvalidConfig)?;
        self.init(&config)?;
        Ok(config)
    }

    /// Exchanges a single byte, returning the byte clocked in.
    fn exchange_byte(&mut self, byte: u8) -> core::result::Result<u8, Self::Error>;

    /// Exchanges a word high byte first.
    fn exchange_word_be(&mut self, word: u16) -> core::result::Result<u16, Self::Error> {
        let [high, low] = word.to_be_bytes();
        let high = self.exchange_byte(high)?;
        let low = self.exchange_byte(low)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Exchanges a word low byte first.
    fn exchange_word_le(&mut self, word: u16) -> core::result::Result<u16, Self::Error> {
        let [low, high] = word.to_le_bytes();
        let low = self.exchange_byte(low)?;
        let high = self.exchange_byte(high)?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn init(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error> {
        T::init(self, config)
    }

    fn exchange_byte(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        T::exchange_byte(self, byte)
    }

    fn exchange_word_be(&mut self, word: u16) -> core::result::Result<u16, Self::Error> {
        T::exchange_word_be(self, word)
    }

    fn exchange_word_le(&mut self, word: u16) -> core::result::Result<u16, Self::Error> {
        T::exchange_word_le(self, word)
    }
}

#[cfg(test)]
mod tests {
    use super::Transport;
    use crate::config::BusConfig;
    use core::convert::Infallible;

    /// Replays queued receive bytes and records transmitted ones.
    struct Loopback {
        rx: [u8; 4],
        tx: [u8; 4],
        index: usize,
    }

    impl Loopback {
        fn new(rx: [u8; 4]) -> Self {
            Self { rx, tx: [0; 4], index: 0 }
        }
    }

    impl Transport for Loopback {
        type Error = Infallible;

        fn init(&mut self, _config: &BusConfig) -> Result<(), Self::Error> {
            Ok(())
        }

        fn exchange_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
            let received = self.rx[self.index];
            self.tx[self.index] = byte;
            self.index += 1;
            Ok(received)
        }
    }

    #[test]
    fn big_endian_exchanges_high_byte_first() {
        let mut bus = Loopback::new([0xAB, 0xCD, 0, 0]);
        let word = bus.exchange_word_be(0x1234).unwrap();

        assert_eq!(word, 0xABCD);
        assert_eq!(&bus.tx[..2], &[0x12, 0x34]);
        assert_eq!(bus.index, 2);
    }

    #[test]
    fn little_endian_exchanges_low_byte_first() {
        let mut bus = Loopback::new([0xAB, 0xCD, 0, 0]);
        let word = bus.exchange_word_le(0x1234).unwrap();

        assert_eq!(word, 0xCDAB);
        assert_eq!(&bus.tx[..2], &[0x34, 0x12]);
    }

    #[test]
    fn little_endian_is_byte_swapped_big_endian() {
        let rx = [0x5A, 0x0F, 0, 0];
        let be = Loopback::new(rx).exchange_word_be(0).unwrap();
        let le = Loopback::new(rx).exchange_word_le(0).unwrap();

        assert_eq!(le, be.swap_bytes());
    }

    #[test]
    fn mutable_reference_forwards_exchanges() {
        fn first_word<T: Transport>(mut transport: T) -> Result<u16, T::Error> {
            transport.exchange_word_be(0)
        }

        let mut bus = Loopback::new([0x01, 0x02, 0x03, 0x04]);
        assert_eq!(first_word(&mut bus).unwrap(), 0x0102);
        assert_eq!(first_word(&mut bus).unwrap(), 0x0304);
        assert_eq!(bus.index, 4);
    }
}
