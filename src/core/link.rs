//! Register level interface to the MAC peripheral.

use crate::{
    Error,
    Result,
};

/// Size of each receive slot and the transmit buffer of the MAC.
pub const BUFFER_LEN: usize = 1532;

/// One of the two receive buffers of the MAC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Zero,
    One,
}

impl Slot {
    /// Slots in the order they are drained.
    pub const ALL: [Slot; 2] = [Slot::Zero, Slot::One];

    pub fn index(self) -> usize {
        match self {
            Slot::Zero => 0,
            Slot::One => 1,
        }
    }
}

/// Value of a receive slot state register.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// The slot is not handed to the MAC.
    Empty = 0,
    /// The slot is owned by the MAC and waiting for a frame.
    Loaded = 1,
    /// The slot holds a received frame and is owned by software.
    Pending = 2,
}

impl SlotState {
    /// Decodes a state register value, unknown values read as Empty.
    pub fn from_register(value: u32) -> SlotState {
        match value {
            1 => SlotState::Loaded,
            2 => SlotState::Pending,
            _ => SlotState::Empty,
        }
    }
}

/// The signals of a MAC with two receive slots and one transmit buffer.
///
/// Implementations only expose registers and buffers; sequencing (claiming
/// and releasing slots, waiting for transmit completion) is done by
/// `core::dev::Device`.
pub trait Link {
    /// Reads the state register of a receive slot.
    fn rx_state(&self, slot: Slot) -> SlotState;

    /// Writes the state register of a receive slot.
    fn set_rx_state(&mut self, slot: Slot, state: SlotState);

    /// Reads the byte count register of a receive slot.
    fn rx_count(&self, slot: Slot) -> usize;

    /// Returns the full BUFFER_LEN bytes of a receive slot.
    fn rx_buffer(&self, slot: Slot) -> &[u8];

    /// Returns the full BUFFER_LEN bytes of the transmit buffer.
    fn tx_buffer(&mut self) -> &mut [u8];

    /// Reads the transmit count register, 0 once the MAC is done sending.
    fn tx_count(&self) -> usize;

    /// Writes the transmit count register which starts a transmission.
    fn set_tx_count(&mut self, count: usize);

    /// Writes the setup register.
    fn set_setup(&mut self, setup: u32);
}

struct RxSlot {
    buffer: [u8; BUFFER_LEN],
    count: usize,
    state: SlotState,
}

impl RxSlot {
    fn new() -> RxSlot {
        RxSlot {
            buffer: [0; BUFFER_LEN],
            count: 0,
            state: SlotState::Empty,
        }
    }
}

/// An in memory MAC which completes transmissions instantly.
///
/// Frames are injected with `load(...)` the way the MAC would write them into
/// a slot and every transmitted frame is recorded.
pub struct MockLink {
    rx: [RxSlot; 2],
    tx_buffer: [u8; BUFFER_LEN],
    setup: Option<u32>,
    sent: Vec<Vec<u8>>,
}

impl MockLink {
    pub fn new() -> MockLink {
        MockLink {
            rx: [RxSlot::new(), RxSlot::new()],
            tx_buffer: [0; BUFFER_LEN],
            setup: None,
            sent: Vec::new(),
        }
    }

    /// Receives a frame into the first slot owned by the MAC.
    pub fn load(&mut self, frame: &[u8]) -> Result<Slot> {
        let slot = Slot::ALL
            .iter()
            .cloned()
            .find(|slot| self.rx[slot.index()].state == SlotState::Loaded)
            .ok_or(Error::Exhausted)?;
        self.load_slot(slot, frame)?;
        Ok(slot)
    }

    /// Receives a frame into a specific slot, which must be owned by the MAC.
    pub fn load_slot(&mut self, slot: Slot, frame: &[u8]) -> Result<()> {
        let rx = &mut self.rx[slot.index()];
        if rx.state != SlotState::Loaded || frame.len() > BUFFER_LEN {
            return Err(Error::Exhausted);
        }

        rx.buffer[.. frame.len()].copy_from_slice(frame);
        rx.count = frame.len();
        rx.state = SlotState::Pending;
        Ok(())
    }

    /// Frames transmitted so far, including the CRC trailer.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Removes and returns the frames transmitted so far.
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        std::mem::replace(&mut self.sent, Vec::new())
    }

    /// Last value written to the setup register.
    pub fn setup(&self) -> Option<u32> {
        self.setup
    }
}

impl Default for MockLink {
    fn default() -> MockLink {
        MockLink::new()
    }
}

impl Link for MockLink {
    fn rx_state(&self, slot: Slot) -> SlotState {
        self.rx[slot.index()].state
    }

    fn set_rx_state(&mut self, slot: Slot, state: SlotState) {
        self.rx[slot.index()].state = state;
    }

    fn rx_count(&self, slot: Slot) -> usize {
        self.rx[slot.index()].count
    }

    fn rx_buffer(&self, slot: Slot) -> &[u8] {
        &self.rx[slot.index()].buffer
    }

    fn tx_buffer(&mut self) -> &mut [u8] {
        &mut self.tx_buffer
    }

    fn tx_count(&self) -> usize {
        0
    }

    fn set_tx_count(&mut self, count: usize) {
        if count > 0 {
            let count = count.min(BUFFER_LEN);
            self.sent.push(self.tx_buffer[.. count].to_vec());
        }
    }

    fn set_setup(&mut self, setup: u32) {
        self.setup = Some(setup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_loaded_slot() {
        let mut link = MockLink::new();
        assert_matches!(link.load(&[1, 2, 3]), Err(Error::Exhausted));
    }

    #[test]
    fn test_load_fills_slots_in_order() {
        let mut link = MockLink::new();
        link.set_rx_state(Slot::Zero, SlotState::Loaded);
        link.set_rx_state(Slot::One, SlotState::Loaded);

        assert_matches!(link.load(&[1, 2, 3]), Ok(Slot::Zero));
        assert_matches!(link.load(&[4, 5]), Ok(Slot::One));
        assert_matches!(link.load(&[6]), Err(Error::Exhausted));

        assert_eq!(SlotState::Pending, link.rx_state(Slot::Zero));
        assert_eq!(3, link.rx_count(Slot::Zero));
        assert_eq!(&link.rx_buffer(Slot::One)[.. 2], &[4, 5][..]);
    }

    #[test]
    fn test_load_oversized_frame() {
        let mut link = MockLink::new();
        link.set_rx_state(Slot::Zero, SlotState::Loaded);
        assert_matches!(
            link.load_slot(Slot::Zero, &[0; BUFFER_LEN + 1]),
            Err(Error::Exhausted)
        );
    }

    #[test]
    fn test_transmit_is_recorded() {
        let mut link = MockLink::new();
        link.tx_buffer()[.. 4].copy_from_slice(&[1, 2, 3, 4]);
        link.set_tx_count(4);

        assert_eq!(0, link.tx_count());
        assert_eq!(link.take_sent(), vec![vec![1, 2, 3, 4]]);
        assert!(link.sent().is_empty());
    }

    #[test]
    fn test_slot_state_from_register() {
        assert_eq!(SlotState::Loaded, SlotState::from_register(1));
        assert_eq!(SlotState::Pending, SlotState::from_register(2));
        assert_eq!(SlotState::Empty, SlotState::from_register(7));
    }
}
