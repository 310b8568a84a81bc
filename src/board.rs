//! BCM2711 (Raspberry Pi 4) address map and console settings.

use crate::drivers::mini_uart::baud_divisor;

/// Start of the peripheral window in the ARM "low peripheral" address map.
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;

pub const GPIO_BASE: usize = PERIPHERAL_BASE + 0x20_0000;

/// Auxiliary peripherals block (mini UART, SPI1, SPI2).
pub const AUX_BASE: usize = PERIPHERAL_BASE + 0x21_5000;

/// Highest GPIO line on the BCM2711.
pub const GPIO_MAX_PIN: u32 = 57;

/// Core clock feeding the mini UART.
pub const AUX_UART_CLOCK_HZ: u32 = 500_000_000;

pub const CONSOLE_BAUD: u32 = 115_200;
pub const CONSOLE_BAUD_DIVISOR: u32 = baud_divisor(AUX_UART_CLOCK_HZ, CONSOLE_BAUD);

pub const CONSOLE_TX_PIN: u32 = 14;
pub const CONSOLE_RX_PIN: u32 = 15;

/// Green activity LED.
pub const ACT_LED_PIN: u32 = 42;
