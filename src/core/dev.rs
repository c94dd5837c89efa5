use crate::core::check;
use crate::core::link::{
    Link,
    Slot,
    SlotState,
};
use crate::core::repr::EthernetFrame;
use crate::{
    Error,
    Result,
};

/// Manages the receive slots and the transmit buffer of a MAC.
///
/// A slot is claimed by software once the MAC marks it pending and must be
/// released after processing, otherwise the MAC stops receiving into it. There
/// is a single transmit buffer so only one frame can be in flight.
pub struct Device<L: Link> {
    link: L,
}

impl<L: Link> Device<L> {
    /// Creates a device over a link. Call reset() before polling.
    pub fn new(link: L) -> Device<L> {
        Device { link }
    }

    /// Hands both receive slots to the MAC and clears its setup register.
    pub fn reset(&mut self) {
        for slot in Slot::ALL.iter() {
            self.link.set_rx_state(*slot, SlotState::Loaded);
        }
        self.link.set_setup(0);
    }

    /// Checks if a receive slot holds a frame.
    pub fn poll_slot(&self, slot: Slot) -> bool {
        self.link.rx_state(slot) == SlotState::Pending
    }

    /// Returns the bytes received into a slot.
    pub fn slot_payload(&self, slot: Slot) -> &[u8] {
        let buffer = self.link.rx_buffer(slot);
        let len = self.link.rx_count(slot).min(buffer.len());
        &buffer[.. len]
    }

    /// Returns a slot to the MAC.
    pub fn release_slot(&mut self, slot: Slot) {
        self.link.set_rx_state(slot, SlotState::Loaded);
    }

    /// Returns the transmit buffer for writing a frame.
    pub fn begin_transmit(&mut self) -> &mut [u8] {
        self.link.tx_buffer()
    }

    /// Sends the first frame_len bytes of the transmit buffer.
    ///
    /// The CRC over everything after the preamble is appended before starting
    /// the MAC. This blocks until the MAC reports completion and there is no
    /// timeout, a MAC which never finishes hangs the caller.
    pub fn transmit(&mut self, frame_len: usize) -> Result<()> {
        if frame_len < EthernetFrame::<&[u8]>::PREAMBLE_LEN {
            return Err(Error::Malformed);
        }

        let frame_len = check::crc32_append(
            self.link.tx_buffer(),
            EthernetFrame::<&[u8]>::PREAMBLE_LEN,
            frame_len - EthernetFrame::<&[u8]>::PREAMBLE_LEN,
        ).ok_or(Error::Exhausted)?;

        trace!("Transmitting {} byte frame.", frame_len);
        self.link.set_tx_count(frame_len);

        while self.link.tx_count() != 0 {
            std::hint::spin_loop();
        }

        Ok(())
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
