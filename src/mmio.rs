use core::cell::Cell;

/// Single-word access to memory-mapped peripheral registers.
///
/// Implementations must not cache or reorder accesses made through the same bus.
pub trait Mmio {
    fn read(&self, address: usize) -> u32;
    fn write(&self, address: usize, value: u32);
}

impl<T: Mmio + ?Sized> Mmio for &T {
    #[inline(always)]
    fn read(&self, address: usize) -> u32 {
        (**self).read(address)
    }

    #[inline(always)]
    fn write(&self, address: usize, value: u32) {
        (**self).write(address, value)
    }
}

/// The real bus: volatile loads and stores to physical addresses.
#[derive(Debug)]
pub struct Volatile {
    _private: (),
}

impl Volatile {
    /// # Safety
    ///
    /// Every address later handed to this bus must be a valid, mapped, 4-byte aligned device
    /// register. Nothing stops two `Volatile` handles from touching the same register, so the
    /// caller is also responsible for not racing another owner of the same peripheral.
    pub const unsafe fn new() -> Self {
        Volatile { _private: () }
    }
}

impl Mmio for Volatile {
    #[inline(always)]
    fn read(&self, address: usize) -> u32 {
        // SAFETY: `Volatile::new` requires the address to be a device register.
        unsafe { core::ptr::read_volatile(address as *const u32) }
    }

    #[inline(always)]
    fn write(&self, address: usize, value: u32) {
        // SAFETY: see `read`.
        unsafe { core::ptr::write_volatile(address as *mut u32, value) }
    }
}

/// Sparse in-memory register file standing in for hardware on the host.
///
/// Holds up to `SLOTS` distinct addresses without allocating. Addresses that were never written
/// read as zero. Only writes made through [`Mmio::write`] are counted, so a test can seed the
/// registers with [`ShadowBus::poke`] and then check that an operation wrote nothing.
pub struct ShadowBus<const SLOTS: usize> {
    slots: [Cell<Option<(usize, u32)>>; SLOTS],
    writes: Cell<usize>,
}

impl<const SLOTS: usize> ShadowBus<SLOTS> {
    pub fn new() -> Self {
        ShadowBus {
            slots: core::array::from_fn(|_| Cell::new(None)),
            writes: Cell::new(0),
        }
    }

    /// Current value of the register at `address`.
    pub fn peek(&self, address: usize) -> u32 {
        self.slot(address)
            .and_then(Cell::get)
            .map_or(0, |(_, value)| value)
    }

    /// Stores `value` without counting it as a bus write.
    ///
    /// # Panics
    ///
    /// Panics when `address` is new and all `SLOTS` slots are taken.
    pub fn poke(&self, address: usize, value: u32) {
        let slot = match self.slot(address) {
            Some(slot) => slot,
            None => match self.slots.iter().find(|slot| slot.get().is_none()) {
                Some(slot) => slot,
                None => panic!("shadow bus is full ({} registers in use)", SLOTS),
            },
        };
        slot.set(Some((address, value)));
    }

    /// Number of writes made through the [`Mmio`] interface so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn slot(&self, address: usize) -> Option<&Cell<Option<(usize, u32)>>> {
        self.slots
            .iter()
            .find(|slot| matches!(slot.get(), Some((addr, _)) if addr == address))
    }
}

impl<const SLOTS: usize> Default for ShadowBus<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SLOTS: usize> Mmio for ShadowBus<SLOTS> {
    fn read(&self, address: usize) -> u32 {
        self.peek(address)
    }

    fn write(&self, address: usize, value: u32) {
        self.writes.set(self.writes.get() + 1);
        self.poke(address, value);
    }
}
