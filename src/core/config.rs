//! Tunables for an interface.

/// Retry and timeout settings used by an `Interface`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of ARP requests sent before giving up on an address.
    pub arp_retries: usize,
    /// Number of polls to wait for an ARP reply after each request.
    ///
    /// This is an iteration count rather than a duration, so the wall clock
    /// timeout depends on how fast the CPU drains the receive slots.
    pub arp_poll_iterations: usize,
}

impl Config {
    pub const DEFAULT_ARP_RETRIES: usize = 5;

    pub const DEFAULT_ARP_POLL_ITERATIONS: usize = 2_000_000;
}

impl Default for Config {
    fn default() -> Config {
        Config {
            arp_retries: Self::DEFAULT_ARP_RETRIES,
            arp_poll_iterations: Self::DEFAULT_ARP_POLL_ITERATIONS,
        }
    }
}
