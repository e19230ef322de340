#![cfg_attr(not(test), no_std)]

mod error;

pub mod chain;
pub mod config;
pub mod device;
pub mod interface;
pub mod lines;
mod log;
pub mod params;
pub mod registers;
pub mod time;

pub use crate::chain::{AsyncChainedAd7xxx, ChainedAd7xxx};
pub use crate::config::{BusConfig, BusConfigBuilder, ConfigError, Timing};
pub use crate::device::Ad7xxx;
pub use crate::error::{Error, Result};
pub use crate::interface::Transport;
pub use crate::interface::spi::SpiTransport;
pub use crate::lines::{BusyLine, InputLine, OutputLine, TriggerLine};
pub use crate::time::Clock;
