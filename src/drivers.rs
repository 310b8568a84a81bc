pub mod gpio;
pub mod mini_uart;

pub use gpio::{Function, Gpio, Pull};
pub use mini_uart::MiniUart;
