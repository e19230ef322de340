//! Error handling primitives for the AD7xxx driver.

use embedded_hal::digital::ErrorKind;

use crate::config::ConfigError;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
///
/// A conversion timeout on a chained acquisition is not an error; it is
/// reported as `Ok(false)` by [`ChainedAd7xxx::convert_and_read`](crate::ChainedAd7xxx::convert_and_read).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying serial transport.
    Transport(E),
    /// The trigger or busy line reported a failure.
    Line(ErrorKind),
    /// The provided configuration parameters are invalid.
    InvalidConfig(ConfigError),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Transport(err)
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Transport(err) => defmt::write!(f, "Transport({})", err),
            Self::Line(kind) => defmt::write!(f, "Line({})", defmt::Debug2Format(kind)),
            Self::InvalidConfig(err) => defmt::write!(f, "InvalidConfig({})", err),
        }
    }
}
