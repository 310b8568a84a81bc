use core::fmt;

use tock_registers::register_bitfields;

use super::gpio::Gpio;
use crate::board::{AUX_BASE, CONSOLE_BAUD_DIVISOR, CONSOLE_RX_PIN, CONSOLE_TX_PIN};
use crate::error::Result;
use crate::mmio::Mmio;
use crate::utils;

const AUX_ENABLES_REG: usize = AUX_BASE + 0x04;
const AUX_MU_IO_REG: usize = AUX_BASE + 0x40;
const AUX_MU_IER_REG: usize = AUX_BASE + 0x44;
const AUX_MU_IIR_REG: usize = AUX_BASE + 0x48;
const AUX_MU_LCR_REG: usize = AUX_BASE + 0x4c;
const AUX_MU_MCR_REG: usize = AUX_BASE + 0x50;
const AUX_MU_LSR_REG: usize = AUX_BASE + 0x54;
const AUX_MU_CNTL_REG: usize = AUX_BASE + 0x60;
const AUX_MU_BAUD_REG: usize = AUX_BASE + 0x68;

register_bitfields! {
    u32,

    AUX_ENABLES [
        SPI2 OFFSET(2) NUMBITS(1) [],
        SPI1 OFFSET(1) NUMBITS(1) [],
        MINI_UART OFFSET(0) NUMBITS(1) []
    ],

    AUX_MU_IIR [
        // Always reads as set on the mini UART.
        FIFO_ENABLES OFFSET(6) NUMBITS(2) [],
        // Write-only: clears the selected FIFOs.
        FIFO_CLEAR OFFSET(1) NUMBITS(2) [
            Receive = 0b01,
            Transmit = 0b10,
            Both = 0b11
        ]
    ],

    AUX_MU_LCR [
        DATA_SIZE OFFSET(0) NUMBITS(2) [
            SevenBit = 0b00,
            EightBit = 0b11
        ]
    ],

    AUX_MU_LSR [
        TX_IDLE OFFSET(6) NUMBITS(1) [],
        // The transmit FIFO can accept at least one byte.
        TX_EMPTY OFFSET(5) NUMBITS(1) [],
        DATA_READY OFFSET(0) NUMBITS(1) []
    ],

    AUX_MU_CNTL [
        TX_ENABLE OFFSET(1) NUMBITS(1) [],
        RX_ENABLE OFFSET(0) NUMBITS(1) []
    ]
}

/// Mini UART baud rate divisor [according to the BCM2711 peripherals
/// datasheet](https://datasheets.raspberrypi.com/bcm2711/bcm2711-peripherals.pdf), section 2.2.1:
///
/// ```text
///                  system_clock_freq
/// baudrate = ---------------------------
///             8 * (baudrate_divisor + 1)
/// ```
pub const fn baud_divisor(clock_hz: u32, baud: u32) -> u32 {
    clock_hz / (baud * 8) - 1
}

/// A set-up Mini UART, transmitting 8-bit frames.
///
/// The only way to get one is [`MiniUart::init`], so holding a `MiniUart` means the peripheral is
/// ready to send.
pub struct MiniUart<M: Mmio> {
    mmio: M,
}

impl<M: Mmio> MiniUart<M> {
    /// Sets up the Mini UART at 115200 baud @ 500 MHz and routes it to the console pins.
    pub fn init<G: Mmio>(mmio: M, gpio: &mut Gpio<G>) -> Result<Self> {
        Self::init_with_divisor(mmio, gpio, CONSOLE_BAUD_DIVISOR as u16)
    }

    /// Sets up the Mini UART with interrupts off, 8-bit frames and the given baud rate divisor
    /// (see [`baud_divisor`]), muxes the TX/RX pins onto it and enables both directions.
    pub fn init_with_divisor<G: Mmio>(mmio: M, gpio: &mut Gpio<G>, divisor: u16) -> Result<Self> {
        // SPI1 and SPI2 share this register.
        let enables = mmio.read(AUX_ENABLES_REG);
        mmio.write(AUX_ENABLES_REG, enables | AUX_ENABLES::MINI_UART::SET.value);

        mmio.write(AUX_MU_IER_REG, 0);
        mmio.write(AUX_MU_CNTL_REG, 0);
        mmio.write(AUX_MU_LCR_REG, AUX_MU_LCR::DATA_SIZE::EightBit.value);
        mmio.write(AUX_MU_MCR_REG, 0);
        mmio.write(AUX_MU_IER_REG, 0);
        mmio.write(
            AUX_MU_IIR_REG,
            (AUX_MU_IIR::FIFO_ENABLES::SET + AUX_MU_IIR::FIFO_CLEAR::Both).value,
        );
        mmio.write(AUX_MU_BAUD_REG, divisor as u32);

        gpio.use_as_alt5(CONSOLE_TX_PIN)?;
        gpio.use_as_alt5(CONSOLE_RX_PIN)?;

        mmio.write(
            AUX_MU_CNTL_REG,
            (AUX_MU_CNTL::TX_ENABLE::SET + AUX_MU_CNTL::RX_ENABLE::SET).value,
        );

        Ok(MiniUart { mmio })
    }

    /// Whether the transmitter can take another byte.
    #[inline]
    pub fn is_ready_to_send(&self) -> bool {
        AUX_MU_LSR::TX_EMPTY.is_set(self.mmio.read(AUX_MU_LSR_REG))
    }

    /// Sends a single byte through the UART. Spins while there is no space in the UART send
    /// buffer, forever if the peripheral never drains it.
    pub fn send_byte(&mut self, byte: u8) {
        while !self.is_ready_to_send() {
            utils::relax();
        }

        self.mmio.write(AUX_MU_IO_REG, byte as u32);
    }

    /// Sends `text` up to its first NUL byte (or all of it if there is none), turning every `\n`
    /// into `\r\n`.
    pub fn send_text(&mut self, text: &[u8]) {
        let len = text.iter().position(|&b| b == 0).unwrap_or(text.len());
        self.send_crlf(&text[..len]);
    }

    fn send_crlf(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == b'\n' {
                self.send_byte(b'\r');
            }
            self.send_byte(byte);
        }
    }
}

impl<M: Mmio> fmt::Write for MiniUart<M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_crlf(s.as_bytes());
        Ok(())
    }
}
