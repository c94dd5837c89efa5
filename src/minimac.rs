//! Memory mapped minimac backend.
//!
//! The MAC exposes one 32 bit register per signal and three buffers of
//! `BUFFER_LEN` bytes it reads and writes by DMA. Where those live depends on
//! the SoC, so the addresses are supplied by the caller.

use std::ptr;
use std::slice;

use crate::core::link::{
    Link,
    Slot,
    SlotState,
    BUFFER_LEN,
};

/// Physical addresses of the minimac registers and buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    /// Setup register, written with 0 on start.
    pub setup: usize,
    /// State register of each receive slot.
    pub rx_state: [usize; 2],
    /// Byte count register of each receive slot.
    pub rx_count: [usize; 2],
    /// Transmit count register.
    pub tx_count: usize,
    /// Receive buffer of each slot.
    pub rx_buffer: [usize; 2],
    /// Transmit buffer.
    pub tx_buffer: usize,
}

/// A minimac at fixed addresses.
pub struct Minimac {
    regs: Registers,
}

impl Minimac {
    /// Creates a backend over the registers and buffers at regs.
    ///
    /// # Safety
    ///
    /// Every register address must be valid for aligned 32 bit volatile reads
    /// and writes, every buffer address must be valid for BUFFER_LEN bytes and
    /// nothing else may access them while the backend is alive.
    pub unsafe fn new(regs: Registers) -> Minimac {
        Minimac { regs }
    }

    fn read_reg(&self, addr: usize) -> u32 {
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    fn write_reg(&mut self, addr: usize, value: u32) {
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }
}

impl Link for Minimac {
    fn rx_state(&self, slot: Slot) -> SlotState {
        SlotState::from_register(self.read_reg(self.regs.rx_state[slot.index()]))
    }

    fn set_rx_state(&mut self, slot: Slot, state: SlotState) {
        let addr = self.regs.rx_state[slot.index()];
        self.write_reg(addr, state as u32);
    }

    fn rx_count(&self, slot: Slot) -> usize {
        self.read_reg(self.regs.rx_count[slot.index()]) as usize
    }

    fn rx_buffer(&self, slot: Slot) -> &[u8] {
        let addr = self.regs.rx_buffer[slot.index()];
        unsafe { slice::from_raw_parts(addr as *const u8, BUFFER_LEN) }
    }

    fn tx_buffer(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.regs.tx_buffer as *mut u8, BUFFER_LEN) }
    }

    fn tx_count(&self) -> usize {
        self.read_reg(self.regs.tx_count) as usize
    }

    fn set_tx_count(&mut self, count: usize) {
        let addr = self.regs.tx_count;
        self.write_reg(addr, count as u32);
    }

    fn set_setup(&mut self, setup: u32) {
        let addr = self.regs.setup;
        self.write_reg(addr, setup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dev::Device;

    // Register indices into the fake register file.
    const SETUP: usize = 0;
    const RX_STATE: [usize; 2] = [1, 2];
    const RX_COUNT: [usize; 2] = [3, 4];
    const TX_COUNT: usize = 5;

    struct Memory {
        regs: Box<[u32; 6]>,
        rx: Box<[[u8; BUFFER_LEN]; 2]>,
        tx: Box<[u8; BUFFER_LEN]>,
    }

    impl Memory {
        fn new() -> Memory {
            Memory {
                regs: Box::new([0xFFFF_FFFF; 6]),
                rx: Box::new([[0; BUFFER_LEN]; 2]),
                tx: Box::new([0; BUFFER_LEN]),
            }
        }

        fn registers(&mut self) -> Registers {
            let base = self.regs.as_mut_ptr() as usize;
            let reg = |i: usize| base + i * 4;
            Registers {
                setup: reg(SETUP),
                rx_state: [reg(RX_STATE[0]), reg(RX_STATE[1])],
                rx_count: [reg(RX_COUNT[0]), reg(RX_COUNT[1])],
                tx_count: reg(TX_COUNT),
                rx_buffer: [
                    self.rx[0].as_mut_ptr() as usize,
                    self.rx[1].as_mut_ptr() as usize,
                ],
                tx_buffer: self.tx.as_mut_ptr() as usize,
            }
        }

        fn reg(&self, i: usize) -> u32 {
            unsafe { ptr::read_volatile(&self.regs[i]) }
        }
    }

    #[test]
    fn test_reset_writes_registers() {
        let mut memory = Memory::new();
        let mut dev = Device::new(unsafe { Minimac::new(memory.registers()) });

        dev.reset();

        assert_eq!(0, memory.reg(SETUP));
        assert_eq!(SlotState::Loaded as u32, memory.reg(RX_STATE[0]));
        assert_eq!(SlotState::Loaded as u32, memory.reg(RX_STATE[1]));
        assert_eq!(0xFFFF_FFFF, memory.reg(TX_COUNT));
    }

    #[test]
    fn test_receive_slot() {
        let mut memory = Memory::new();
        let regs = memory.registers();
        let mut dev = Device::new(unsafe { Minimac::new(regs) });
        dev.reset();

        unsafe {
            ptr::write_volatile(regs.rx_state[1] as *mut u32, SlotState::Pending as u32);
            ptr::write_volatile(regs.rx_count[1] as *mut u32, 3);
            ptr::copy_nonoverlapping([7u8, 8, 9].as_ptr(), regs.rx_buffer[1] as *mut u8, 3);
        }

        assert!(!dev.poll_slot(Slot::Zero));
        assert!(dev.poll_slot(Slot::One));
        assert_eq!(dev.slot_payload(Slot::One), &[7, 8, 9][..]);

        dev.release_slot(Slot::One);
        assert_eq!(SlotState::Loaded as u32, memory.reg(RX_STATE[1]));
    }

    #[test]
    fn test_oversized_count_is_clamped() {
        let mut memory = Memory::new();
        let regs = memory.registers();
        let dev = Device::new(unsafe { Minimac::new(regs) });

        unsafe {
            ptr::write_volatile(regs.rx_count[0] as *mut u32, 4096);
        }

        assert_eq!(BUFFER_LEN, dev.slot_payload(Slot::Zero).len());
    }

    #[test]
    fn test_tx_buffer_is_mapped() {
        let mut memory = Memory::new();
        let mut link = unsafe { Minimac::new(memory.registers()) };

        link.tx_buffer()[.. 2].copy_from_slice(&[0xAB, 0xCD]);
        link.set_tx_count(0);

        assert_eq!(&memory.tx[.. 2], &[0xAB, 0xCD][..]);
        assert_eq!(0, memory.reg(TX_COUNT));
        assert_eq!(0, link.tx_count());
    }
}
