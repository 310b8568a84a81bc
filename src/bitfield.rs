//! Addressing of fixed-width fields packed into banks of contiguous 32-bit registers.
//!
//! A bank stores one field per logical index. Consecutive indices occupy consecutive fields of a
//! register, and once a register is full the next index starts at bit 0 of the following
//! register. With `width` bits per field a register holds `32 / width` fields, so the
//! function-select bank (3 bits) uses bits 0..30 and leaves the top two bits unused.

use crate::error::{Error, Operand, Result};
use crate::mmio::Mmio;

const REG_BYTES: usize = 4;
const REG_BITS: u32 = 32;

/// Width in bits of each field of a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Width {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Width {
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Largest value a field can hold.
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        (1 << self.bits()) - 1
    }

    #[inline(always)]
    pub const fn fields_per_register(self) -> u32 {
        REG_BITS / self.bits()
    }
}

/// Where the field of an index lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Address of the register holding the field.
    pub address: usize,
    /// Position of the field's lowest bit within that register.
    pub shift: u32,
}

/// A family of identically shaped registers starting at `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bank {
    pub base: usize,
    pub width: Width,
    pub max_index: u32,
}

impl Bank {
    pub const fn new(base: usize, width: Width, max_index: u32) -> Self {
        Bank { base, width, max_index }
    }

    /// Validates `index` and the bank alignment, and computes where its field lives.
    pub fn locate(&self, index: u32) -> Result<Location> {
        if index > self.max_index {
            return Err(Error::OutOfRange {
                operand: Operand::Index,
                got: index,
                max: self.max_index,
            });
        }
        if self.base % REG_BYTES != 0 {
            return Err(Error::Misaligned { address: self.base });
        }

        let per_reg = self.width.fields_per_register();
        Ok(Location {
            address: self.base + (index / per_reg) as usize * REG_BYTES,
            shift: (index % per_reg) * self.width.bits(),
        })
    }

    /// Stores `value` into the field of `index`, leaving every other field of the register as it
    /// was.
    ///
    /// The read-modify-write is not atomic: nothing else may access the same register while it
    /// runs.
    pub fn write<M: Mmio + ?Sized>(&self, mmio: &M, index: u32, value: u32) -> Result<()> {
        let loc = self.checked(index, value)?;
        let mask = self.width.mask();

        let mut reg = mmio.read(loc.address);
        // Clear the field, then put the new value in.
        reg &= !(mask << loc.shift);
        reg |= value << loc.shift;
        mmio.write(loc.address, reg);

        Ok(())
    }

    /// Writes `value` into the field of `index` with every other bit of the register zero,
    /// without reading the register first.
    ///
    /// This is the access pattern for write-only banks where a 0 bit has no effect, such as the
    /// GPIO set and clear registers.
    pub fn strobe<M: Mmio + ?Sized>(&self, mmio: &M, index: u32, value: u32) -> Result<()> {
        let loc = self.checked(index, value)?;
        mmio.write(loc.address, value << loc.shift);
        Ok(())
    }

    /// Reads back the field of `index`.
    pub fn read<M: Mmio + ?Sized>(&self, mmio: &M, index: u32) -> Result<u32> {
        let loc = self.locate(index)?;
        Ok((mmio.read(loc.address) >> loc.shift) & self.width.mask())
    }

    fn checked(&self, index: u32, value: u32) -> Result<Location> {
        let loc = self.locate(index)?;
        if value > self.width.mask() {
            return Err(Error::OutOfRange {
                operand: Operand::Value,
                got: value,
                max: self.width.mask(),
            });
        }
        Ok(loc)
    }
}

/// Read-modify-write of one field in the bank at `base`. See [`Bank::write`].
pub fn set_field<M: Mmio + ?Sized>(
    mmio: &M,
    base: usize,
    index: u32,
    value: u32,
    width: Width,
    max_index: u32,
) -> Result<()> {
    Bank::new(base, width, max_index).write(mmio, index, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::ShadowBus;

    const BASE: usize = 0xfe20_0000;

    #[test]
    fn widths_pack_the_expected_number_of_fields() {
        assert_eq!(Width::One.fields_per_register(), 32);
        assert_eq!(Width::Two.fields_per_register(), 16);
        assert_eq!(Width::Three.fields_per_register(), 10);
        assert_eq!(Width::Three.mask(), 0b111);
    }

    #[test]
    fn locates_console_pins_in_function_select() {
        let bank = Bank::new(BASE, Width::Three, 57);
        assert_eq!(bank.locate(14), Ok(Location { address: BASE + 4, shift: 12 }));
        assert_eq!(bank.locate(15), Ok(Location { address: BASE + 4, shift: 15 }));
        assert_eq!(bank.locate(57), Ok(Location { address: BASE + 20, shift: 21 }));
    }

    #[test]
    fn locates_last_pin_in_pull_control_and_set_banks() {
        let pull = Bank::new(BASE + 0xe4, Width::Two, 57);
        assert_eq!(pull.locate(57), Ok(Location { address: BASE + 0xe4 + 12, shift: 18 }));

        let set = Bank::new(BASE + 0x1c, Width::One, 57);
        assert_eq!(set.locate(31), Ok(Location { address: BASE + 0x1c, shift: 31 }));
        assert_eq!(set.locate(32), Ok(Location { address: BASE + 0x20, shift: 0 }));
    }

    #[test]
    fn index_past_max_is_rejected_without_touching_memory() {
        let bus = ShadowBus::<4>::new();
        let err = set_field(&bus, BASE, 58, 1, Width::Three, 57);

        assert_eq!(
            err,
            Err(Error::OutOfRange { operand: Operand::Index, got: 58, max: 57 })
        );
        assert_eq!(bus.writes(), 0);
    }

    #[test]
    fn value_wider_than_field_is_rejected_without_touching_memory() {
        let bus = ShadowBus::<4>::new();
        let err = set_field(&bus, BASE, 3, 0b100, Width::Two, 57);

        assert_eq!(
            err,
            Err(Error::OutOfRange { operand: Operand::Value, got: 4, max: 3 })
        );
        assert_eq!(bus.writes(), 0);
    }

    #[test]
    fn misaligned_bank_is_rejected() {
        let bus = ShadowBus::<4>::new();
        let bank = Bank::new(BASE + 2, Width::One, 57);

        assert_eq!(bank.write(&bus, 0, 1), Err(Error::Misaligned { address: BASE + 2 }));
        assert_eq!(bank.strobe(&bus, 0, 1), Err(Error::Misaligned { address: BASE + 2 }));
        assert_eq!(bus.writes(), 0);
    }

    #[test]
    fn write_preserves_neighbouring_fields() {
        let bus = ShadowBus::<4>::new();
        bus.poke(BASE + 4, 0xffff_ffff);

        set_field(&bus, BASE, 14, 0b010, Width::Three, 57).unwrap();

        assert_eq!(bus.peek(BASE + 4), 0xffff_ffff & !(0b101 << 12));
        assert_eq!(Bank::new(BASE, Width::Three, 57).read(&bus, 14), Ok(0b010));
        assert_eq!(bus.writes(), 1);
    }

    #[test]
    fn strobe_does_not_carry_over_other_bits() {
        let bus = ShadowBus::<4>::new();
        bus.poke(BASE + 0x20, 0x00f0_0000);

        Bank::new(BASE + 0x1c, Width::One, 57).strobe(&bus, 40, 1).unwrap();

        assert_eq!(bus.peek(BASE + 0x20), 1 << 8);
    }
}
