//! Serial peripheral control word layout.
//!
//! The core never touches peripheral registers. Platform layers implementing
//! [`Transport`](crate::interface::Transport) for a classic master-mode serial
//! peripheral can program the control register from
//! [`BusConfig::control_word`](crate::config::BusConfig::control_word).
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{ClockDivider, ClockPhase, ClockPolarity, FrameWidth};

/// Bitfield representation of the serial peripheral control register (`CR1`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiControl {
    // Clock phase (bit 0).
    pub phase: ClockPhase,
    // Clock polarity (bit 1).
    pub polarity: ClockPolarity,
    // Master selection (bit 2).
    pub master: bool,
    // Baud rate prescaler (bits 5:3).
    pub divider: ClockDivider,
    // Peripheral enable (bit 6).
    pub enable: bool,
    // LSB transmitted first (bit 7).
    pub lsb_first: bool,
    // Internal slave select level (bit 8).
    pub internal_slave_select: bool,
    // Software slave management (bit 9).
    pub software_slave_management: bool,
    // Receive-only mode (bit 10).
    pub rx_only: bool,
    // Data frame format (bit 11).
    pub frame_width: FrameWidth,
    #[skip]
    __: B4,
}

impl From<u16> for SpiControl {
    fn from(value: u16) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<SpiControl> for u16 {
    fn from(value: SpiControl) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}
