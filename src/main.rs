//! Kernel main
//!
//! Brings up the console, reports where it is running and blinks the activity LED. On a hosted
//! target this builds to a stub so the library tests can run.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod boot;

#[cfg(target_os = "none")]
use rasp4_io::{
    board::{ACT_LED_PIN, CONSOLE_BAUD, CONSOLE_BAUD_DIVISOR},
    console,
    mmio::Volatile,
    mu_info, mu_println, mu_warn, utils, Function, Gpio,
};

/// Roughly a quarter of a second at 1.5 GHz.
#[cfg(target_os = "none")]
const BLINK_CYCLES: usize = 375_000_000;

#[cfg(target_os = "none")]
unsafe fn kernel_init() -> ! {
    if console::init().is_err() {
        // Nowhere to report it.
        utils::park();
    }

    kernel_main()
}

#[cfg(target_os = "none")]
fn kernel_main() -> ! {
    mu_println!("Initializing kernel...");
    mu_info!("initialized in exception level {}", utils::exception_level());
    mu_info!("core {:x}", utils::core_id());
    mu_info!("console at {} baud (divisor {})", CONSOLE_BAUD, CONSOLE_BAUD_DIVISOR);

    // SAFETY: the console only owns the AUX block and pins 14 and 15.
    let mut gpio = Gpio::new(unsafe { Volatile::new() });
    if let Err(e) = gpio.select_function(ACT_LED_PIN, Function::Output) {
        mu_warn!("activity LED unavailable: {}", e);
        utils::park();
    }

    mu_info!("blinking GPIO {}", ACT_LED_PIN);
    loop {
        // The pin was validated by `select_function` above.
        let _ = gpio.set_high(ACT_LED_PIN);
        utils::delay_cycles(BLINK_CYCLES);
        let _ = gpio.set_low(ACT_LED_PIN);
        utils::delay_cycles(BLINK_CYCLES);
    }
}

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    console::_print_unlocked(format_args!("[PANIC] {}\n", info));
    utils::park();
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("the kernel only runs on bare metal, build it with `cargo xtask build`");
}
