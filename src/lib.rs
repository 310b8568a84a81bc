//! Hardware access layer for the Raspberry Pi 4 (BCM2711) GPIO controller and the auxiliary
//! mini UART used as the firmware console.
//!
//! Every register access goes through the [`Mmio`] trait, so the drivers run unchanged against
//! real memory-mapped I/O ([`mmio::Volatile`]) or a host-side register file
//! ([`mmio::ShadowBus`]).

#![cfg_attr(not(test), no_std)]

pub mod bitfield;
pub mod board;
pub mod console;
pub mod drivers;
pub mod error;
pub mod mmio;
pub mod utils;

pub use bitfield::{set_field, Bank, Location, Width};
pub use drivers::{Function, Gpio, MiniUart, Pull};
pub use error::{Error, Operand, Result};
pub use mmio::Mmio;
