use crate::bitfield::{Bank, Width};
use crate::board::{GPIO_BASE, GPIO_MAX_PIN};
use crate::error::Result;
use crate::mmio::Mmio;

const FUNC_SELECT: Bank = Bank::new(GPIO_BASE, Width::Three, GPIO_MAX_PIN);
const OUTPUT_SET: Bank = Bank::new(GPIO_BASE + 0x1c, Width::One, GPIO_MAX_PIN);
const OUTPUT_CLEAR: Bank = Bank::new(GPIO_BASE + 0x28, Width::One, GPIO_MAX_PIN);
const LEVEL: Bank = Bank::new(GPIO_BASE + 0x34, Width::One, GPIO_MAX_PIN);
const PULL_CONTROL: Bank = Bank::new(GPIO_BASE + 0xe4, Width::Two, GPIO_MAX_PIN);

/// Pin function as encoded in the function select registers.
///
/// The alternate function codes are not in numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl Function {
    pub const fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0b000 => Function::Input,
            0b001 => Function::Output,
            0b100 => Function::Alt0,
            0b101 => Function::Alt1,
            0b110 => Function::Alt2,
            0b111 => Function::Alt3,
            0b011 => Function::Alt4,
            0b010 => Function::Alt5,
            _ => return None,
        })
    }
}

/// Pull resistor state, as encoded in `GPIO_PUP_PDN_CNTRL_REGn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

impl Pull {
    /// Returns `None` for the reserved pattern `0b11`.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0b00 => Pull::None,
            0b01 => Pull::Up,
            0b10 => Pull::Down,
            _ => return None,
        })
    }
}

/// Handle to the GPIO controller.
pub struct Gpio<M: Mmio> {
    mmio: M,
}

impl<M: Mmio> Gpio<M> {
    pub const fn new(mmio: M) -> Self {
        Gpio { mmio }
    }

    pub fn select_function(&mut self, pin: u32, func: Function) -> Result<()> {
        FUNC_SELECT.write(&self.mmio, pin, func as u32)
    }

    /// Drives an output pin high. Has no effect on pins not configured as outputs.
    pub fn set_high(&mut self, pin: u32) -> Result<()> {
        OUTPUT_SET.strobe(&self.mmio, pin, 1)
    }

    /// Drives an output pin low. Has no effect on pins not configured as outputs.
    pub fn set_low(&mut self, pin: u32) -> Result<()> {
        OUTPUT_CLEAR.strobe(&self.mmio, pin, 1)
    }

    pub fn configure_pull(&mut self, pin: u32, pull: Pull) -> Result<()> {
        PULL_CONTROL.write(&self.mmio, pin, pull as u32)
    }

    /// Hands the pin over to its alternate function 5 with the pull resistors disabled.
    pub fn use_as_alt5(&mut self, pin: u32) -> Result<()> {
        self.configure_pull(pin, Pull::None)?;
        self.select_function(pin, Function::Alt5)
    }

    pub fn function(&self, pin: u32) -> Result<Function> {
        let bits = FUNC_SELECT.read(&self.mmio, pin)?;
        // Every 3-bit pattern is a valid function.
        Ok(Function::from_bits(bits).unwrap_or(Function::Input))
    }

    pub fn pull(&self, pin: u32) -> Result<Pull> {
        let bits = PULL_CONTROL.read(&self.mmio, pin)?;
        // 0b11 is reserved.
        Ok(Pull::from_bits(bits).unwrap_or(Pull::None))
    }

    /// Current logic level of the pin.
    pub fn is_high(&self, pin: u32) -> Result<bool> {
        Ok(LEVEL.read(&self.mmio, pin)? == 1)
    }
}
