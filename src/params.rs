//! Strongly typed serial bus parameters for the AD7xxx driver.
//!
//! These enums map directly to the serial peripheral's control field encodings
//! and are used across [`BusConfig`](crate::config::BusConfig) and the
//! [`registers`](crate::registers) control word. Prefer these types over raw
//! integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use ad7xxx::params::{ClockDivider, ClockPhase, ClockPolarity, FrameWidth};
//!
//! let divider = ClockDivider::from_shift(1).unwrap();
//! assert_eq!(divider, ClockDivider::Div2);
//! assert_eq!(FrameWidth::from_bits(16), Some(FrameWidth::Sixteen));
//! let _ = (ClockPolarity::IdleHigh, ClockPhase::SecondEdge);
//! ```

use modular_bitfield::prelude::Specifier;

/// Serial clock level while the bus is idle (`CPOL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ClockPolarity {
    /// Clock rests low.
    IdleLow = 0,
    /// Clock rests high.
    IdleHigh = 1,
}

/// Clock edge on which data is captured (`CPHA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum ClockPhase {
    /// Data captured on the first clock transition.
    FirstEdge = 0,
    /// Data captured on the second clock transition.
    SecondEdge = 1,
}

/// Peripheral clock prescaler applied to the serial clock (`BR[2:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum ClockDivider {
    /// f_pclk / 2.
    Div2 = 0b000,
    /// f_pclk / 4.
    Div4 = 0b001,
    /// f_pclk / 8.
    Div8 = 0b010,
    /// f_pclk / 16.
    Div16 = 0b011,
    /// f_pclk / 32.
    Div32 = 0b100,
    /// f_pclk / 64.
    Div64 = 0b101,
    /// f_pclk / 128.
    Div128 = 0b110,
    /// f_pclk / 256.
    Div256 = 0b111,
}

impl ClockDivider {
    /// Resolves a literal divide ratio, returning `None` for unsupported values.
    pub const fn from_ratio(ratio: u16) -> Option<Self> {
        match ratio {
            2 => Some(Self::Div2),
            4 => Some(Self::Div4),
            8 => Some(Self::Div8),
            16 => Some(Self::Div16),
            32 => Some(Self::Div32),
            64 => Some(Self::Div64),
            128 => Some(Self::Div128),
            256 => Some(Self::Div256),
            _ => None,
        }
    }

    /// Resolves a right-shift count (`ratio == 1 << shift`), valid for `1..=8`.
    pub const fn from_shift(shift: u8) -> Option<Self> {
        if shift == 0 || shift > 8 {
            return None;
        }
        Self::from_ratio(1u16 << shift)
    }

    /// Returns the divide ratio as an integer value.
    pub const fn ratio(self) -> u16 {
        2u16 << (self as u8)
    }
}

/// Bits exchanged per serial frame (`DFF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum FrameWidth {
    /// 8-bit frames.
    Eight = 0,
    /// 16-bit frames.
    Sixteen = 1,
}

impl FrameWidth {
    /// Resolves a bit count, returning `None` for anything but 8 or 16.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }

    /// Returns the frame width in bits.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

/// Electrical polarity of a digital control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Asserted when the pin is driven or read high.
    ActiveHigh,
    /// Asserted when the pin is driven or read low.
    ActiveLow,
}
