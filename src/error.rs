use core::fmt::{self, Display};

/// Which argument of a field access was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Index,
    Value,
}

/// Errors reported by the register addressing layer.
///
/// Both kinds are found by validation before any register is touched, so a returned error
/// always means that nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A pin index or a field value is outside what the bank can hold.
    OutOfRange { operand: Operand, got: u32, max: u32 },
    /// The bank base address is not a multiple of 4.
    Misaligned { address: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Index => f.write_str("index"),
            Operand::Value => f.write_str("field value"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::OutOfRange { operand, got, max } => {
                write!(f, "{} {} out of range (max {})", operand, got, max)
            }
            Error::Misaligned { address } => {
                write!(f, "register bank at {:#x} is not 4-byte aligned", address)
            }
        }
    }
}
