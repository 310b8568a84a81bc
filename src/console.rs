//! The firmware console: one process-wide Mini UART behind a spin lock, plus printing macros.

use core::fmt::{self, Write};

use crate::drivers::{Gpio, MiniUart};
use crate::error::Result;
use crate::mmio::Volatile;

static LOCK: spin::Mutex<Option<MiniUart<Volatile>>> = spin::Mutex::new(None);

/// Brings the console up. Calling it again once it is set up does nothing.
pub fn init() -> Result<()> {
    let mut console = LOCK.lock();
    if console.is_none() {
        // SAFETY: these are the BCM2711 GPIO and AUX blocks, and the console is the only owner
        // of the AUX block and of the console pins.
        let (mut gpio, mmio) = unsafe { (Gpio::new(Volatile::new()), Volatile::new()) };
        *console = Some(MiniUart::init(mmio, &mut gpio)?);
    }
    Ok(())
}

/// Checks whether the console is setup.
pub fn is_setup() -> bool {
    LOCK.lock().is_some()
}

/// Sends one byte, blocking until the UART takes it. Dropped if the console is not set up.
pub fn send_byte(byte: u8) {
    if let Some(uart) = LOCK.lock().as_mut() {
        uart.send_byte(byte);
    }
}

/// Sends a NUL-terminated byte string with `\n` expanded to `\r\n`. Dropped if the console is not
/// set up.
pub fn send_text(text: &[u8]) {
    if let Some(uart) = LOCK.lock().as_mut() {
        uart.send_text(text);
    }
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    if let Some(uart) = LOCK.lock().as_mut() {
        // Writing to the UART itself never fails.
        let _ = uart.write_fmt(args);
    }
}

/// Prints without waiting for the lock, for use from the panic handler where the lock may be held
/// by the code that panicked. Returns whether anything was printed.
#[doc(hidden)]
pub fn _print_unlocked(args: fmt::Arguments) -> bool {
    match LOCK.try_lock() {
        Some(mut guard) => match guard.as_mut() {
            Some(uart) => uart.write_fmt(args).is_ok(),
            None => false,
        },
        None => false,
    }
}

/// Print through the Mini UART (MU)
#[macro_export]
macro_rules! mu_print {
    ($($tok:tt)*) => {
        $crate::console::_print(format_args!($($tok)*))
    };
}

/// Print through the Mini UART (MU) followed by a newline.
#[macro_export]
macro_rules! mu_println {
    () => {
        $crate::console::_print(format_args!("\n"))
    };

    ($($tok:tt)+) => {
        $crate::console::_print(format_args!("{}\n", format_args!($($tok)+)))
    };
}

#[macro_export]
macro_rules! mu_info {
    ($($tok:tt)+) => {
        $crate::mu_println!("[INFO] {}", format_args!($($tok)+))
    };
}

#[macro_export]
macro_rules! mu_warn {
    ($($tok:tt)+) => {
        $crate::mu_println!("[WARN] {}", format_args!($($tok)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // The console is never set up on the host, so everything is dropped without touching memory.
    #[test]
    fn output_before_init_is_dropped() {
        assert!(!is_setup());
        send_byte(b'x');
        send_text(b"hello\n");
        crate::mu_info!("pin {} ready", 14);
        assert!(!_print_unlocked(format_args!("panic")));
    }
}
