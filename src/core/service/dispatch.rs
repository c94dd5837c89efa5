use crate::core::link::{
    Link,
    Slot,
};
use crate::core::service::{
    ethernet,
    Interface,
};

/// Processes the frames waiting in the receive slots, slot 0 first.
///
/// Every pending slot is handed back to the MAC afterwards, whether the frame
/// in it was valid or not. Errors are logged and dropped.
pub fn service<L: Link>(interface: &mut Interface<L>) {
    for slot in Slot::ALL.iter().cloned() {
        if !interface.dev.poll_slot(slot) {
            continue;
        }

        if let Err(err) = ethernet::recv_frame(interface, slot) {
            debug!("Dropped frame in slot {:?} with {:?}.", slot, err);
        }

        interface.dev.release_slot(slot);
    }
}
