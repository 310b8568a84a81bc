#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use rasp4_io::board::AUX_BASE;
use rasp4_io::mmio::ShadowBus;
use rasp4_io::Mmio;

pub const AUX_MU_IO_REG: usize = AUX_BASE + 0x40;
pub const AUX_MU_LSR_REG: usize = AUX_BASE + 0x54;

const LSR_TX_EMPTY: u32 = 1 << 5;

/// Register file for a whole board: GPIO and AUX registers in a shadow bus, a transmitter that
/// stays busy for `busy_polls` status reads per byte, and a capture of every transmitted byte.
#[derive(Default)]
pub struct Board {
    pub regs: ShadowBus<64>,
    pub busy_polls: Cell<u32>,
    pending: Cell<u32>,
    pub tx: RefCell<Vec<u8>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<u8> {
        self.tx.borrow().clone()
    }
}

impl Mmio for Board {
    fn read(&self, address: usize) -> u32 {
        if address == AUX_MU_LSR_REG {
            if self.pending.get() > 0 {
                self.pending.set(self.pending.get() - 1);
                return 0;
            }
            return LSR_TX_EMPTY;
        }
        self.regs.read(address)
    }

    fn write(&self, address: usize, value: u32) {
        if address == AUX_MU_IO_REG {
            self.tx.borrow_mut().push(value as u8);
            self.pending.set(self.busy_polls.get());
        }
        self.regs.write(address, value);
    }
}
