#[cfg(target_arch = "aarch64")]
use cortex_a::asm;
#[cfg(target_arch = "aarch64")]
use tock_registers::interfaces::Readable;

/// Body of a busy-wait loop.
#[inline(always)]
pub fn relax() {
    #[cfg(target_arch = "aarch64")]
    asm::nop();
    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

/// Infinite loop that executes a wait for event (`wfe`) instruction on each iteration, so the
/// processor may enter low power mode.
#[inline(always)]
pub fn park() -> ! {
    loop {
        #[cfg(target_arch = "aarch64")]
        asm::wfe();
        #[cfg(not(target_arch = "aarch64"))]
        core::hint::spin_loop();
    }
}

/// Does nothing for approximately `cycles` CPU cycles.
pub fn delay_cycles(cycles: usize) {
    #[cfg(target_arch = "aarch64")]
    unsafe {
        core::arch::asm!(
            "cbz {count:x}, 2f",
            "1:",
            "  subs {count:x}, {count:x}, #1",
            "  bne 1b",
            "2:",
            count = inout(reg) cycles => _,
            options(nomem, nostack),
        );
    }
    #[cfg(not(target_arch = "aarch64"))]
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}

/// Gets the current cpu id.
#[cfg(target_arch = "aarch64")]
pub fn core_id() -> u64 {
    use cortex_a::registers::MPIDR_EL1;
    MPIDR_EL1.get() & 0xff
}

/// Gets the current exception level
#[cfg(target_arch = "aarch64")]
pub fn exception_level() -> u64 {
    use cortex_a::registers::CurrentEL;
    CurrentEL.read(CurrentEL::EL)
}
