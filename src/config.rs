//! Configuration primitives for the AD7xxx driver.

use crate::params::{ClockDivider, ClockPhase, ClockPolarity, FrameWidth};
use crate::registers::SpiControl;

/// Validated serial bus configuration, applied atomically by
/// [`Transport::init`](crate::interface::Transport::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Peripheral clock prescaler.
    pub divider: ClockDivider,
    /// Serial clock idle level.
    pub polarity: ClockPolarity,
    /// Serial clock sampling edge.
    pub phase: ClockPhase,
    /// Bits per frame.
    pub frame_width: FrameWidth,
}

impl BusConfig {
    /// Begins building a [`BusConfig`] using the builder pattern.
    pub fn builder() -> BusConfigBuilder {
        BusConfigBuilder::new()
    }

    /// Encodes this configuration as a master-mode, MSB-first, software
    /// slave-select control word with the peripheral enabled.
    pub fn control_word(&self) -> u16 {
        SpiControl::new()
            .with_phase(self.phase)
            .with_polarity(self.polarity)
            .with_master(true)
            .with_divider(self.divider)
            .with_enable(true)
            .with_internal_slave_select(true)
            .with_software_slave_management(true)
            .with_frame_width(self.frame_width)
            .into()
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            divider: ClockDivider::Div2,
            polarity: ClockPolarity::IdleLow,
            phase: ClockPhase::FirstEdge,
            frame_width: FrameWidth::Eight,
        }
    }
}

/// Builder for [`BusConfig`].
///
/// Divider and frame width are accepted as raw numbers and only checked in
/// [`build`](Self::build), so a rejected configuration never reaches a
/// transport.
#[derive(Debug, Clone, Copy)]
pub struct BusConfigBuilder {
    divider: DividerRequest,
    polarity: ClockPolarity,
    phase: ClockPhase,
    frame_width: u8,
}

impl BusConfigBuilder {
    /// Creates a new builder seeded with [`BusConfig::default()`].
    pub fn new() -> Self {
        let defaults = BusConfig::default();
        Self {
            divider: DividerRequest::Ratio(defaults.divider.ratio()),
            polarity: defaults.polarity,
            phase: defaults.phase,
            frame_width: defaults.frame_width.bits(),
        }
    }

    /// Sets the clock divide ratio (2, 4, 8, ... 256).
    pub fn clock_rate_divider(mut self, ratio: u16) -> Self {
        self.divider = DividerRequest::Ratio(ratio);
        self
    }

    /// Sets the clock divide ratio as a right shift of the peripheral clock.
    pub fn clock_rate_shift(mut self, shift: u8) -> Self {
        self.divider = DividerRequest::Shift(shift);
        self
    }

    /// Sets the clock idle level.
    pub fn clock_polarity(mut self, polarity: ClockPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Sets the clock sampling edge.
    pub fn clock_phase(mut self, phase: ClockPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Sets the frame width in bits (8 or 16).
    pub fn frame_width(mut self, bits: u8) -> Self {
        self.frame_width = bits;
        self
    }

    /// Validates the collected values and returns the [`BusConfig`].
    pub fn build(self) -> core::result::Result<BusConfig, ConfigError> {
        let divider = match self.divider {
            DividerRequest::Ratio(ratio) => ClockDivider::from_ratio(ratio)
                .ok_or(ConfigError::UnsupportedClockDivider(ratio))?,
            DividerRequest::Shift(shift) => ClockDivider::from_shift(shift)
                .ok_or(ConfigError::UnsupportedClockShift(shift))?,
        };
        let frame_width = FrameWidth::from_bits(self.frame_width)
            .ok_or(ConfigError::UnsupportedFrameWidth(self.frame_width))?;

        Ok(BusConfig {
            divider,
            polarity: self.polarity,
            phase: self.phase,
            frame_width,
        })
    }
}

// Divider as the caller expressed it, kept raw until `build`.
#[derive(Debug, Clone, Copy)]
enum DividerRequest {
    Ratio(u16),
    Shift(u8),
}

impl Default for BusConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Conversion timing for one device class.
///
/// Each value carries its device-class conversion-time floor, so per-instance
/// overrides can lengthen the delay but never shorten it below the datasheet
/// minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    minimum_ns: u32,
    conversion_time_ns: u32,
    busy_timeout_ms: u32,
}

impl Timing {
    /// AD7685/AD7686/AD7687/AD7688 timing: t_CONV >= 2.2 us, chained busy
    /// budget of 5 ms.
    pub const AD7685: Self = Self {
        minimum_ns: 2_200,
        conversion_time_ns: 2_200,
        busy_timeout_ms: 5,
    };

    /// Overrides the delay between conversion start and readout.
    ///
    /// A delay below the device-class minimum would read the converter
    /// mid-conversion, so it is rejected rather than clamped.
    pub const fn with_conversion_time_ns(
        mut self,
        conversion_time_ns: u32,
    ) -> core::result::Result<Self, ConfigError> {
        if conversion_time_ns < self.minimum_ns {
            return Err(ConfigError::ConversionTimeTooShort {
                requested_ns: conversion_time_ns,
                minimum_ns: self.minimum_ns,
            });
        }
        self.conversion_time_ns = conversion_time_ns;
        Ok(self)
    }

    /// Overrides the busy-line poll budget.
    pub const fn with_busy_timeout_ms(
        mut self,
        busy_timeout_ms: u32,
    ) -> core::result::Result<Self, ConfigError> {
        if busy_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.busy_timeout_ms = busy_timeout_ms;
        Ok(self)
    }

    /// Device-class minimum conversion time, in nanoseconds.
    pub const fn minimum_conversion_time_ns(&self) -> u32 {
        self.minimum_ns
    }

    /// Delay between conversion start and readout, in nanoseconds.
    pub const fn conversion_time_ns(&self) -> u32 {
        self.conversion_time_ns
    }

    /// Upper bound on the busy-line poll, in milliseconds.
    pub const fn busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::AD7685
    }
}

/// Validation errors generated while building a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock divide ratio is not one of 2, 4, 8, ... 256.
    UnsupportedClockDivider(u16),
    /// Clock rate shift is outside `1..=8`.
    UnsupportedClockShift(u8),
    /// Frame width is neither 8 nor 16 bits.
    UnsupportedFrameWidth(u8),
    /// Conversion delay is shorter than the device's documented minimum.
    ConversionTimeTooShort {
        /// Requested delay in nanoseconds.
        requested_ns: u32,
        /// Device-class minimum in nanoseconds.
        minimum_ns: u32,
    },
    /// Busy timeout of zero would never poll.
    ZeroTimeout,
}
