//! A polled Ethernet, ARP, IPv4 and UDP stack for a memory mapped MAC.
//!
//! Everything runs on the caller's thread: `Interface::service()` drains the
//! receive slots of the MAC and the send functions block until the MAC
//! reports completion.

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate log;

pub mod core;
pub mod minimac;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Indicates an error where an address could not be resolved.
    Address,
    /// Indicates an error where address resolution ran out of retries.
    Timeout,
    /// Indicates an error where a buffer, device, etc. is full or empty.
    Exhausted,
    /// Indicates an error where a packet or frame is malformed.
    Malformed,
    /// Indicates an error where a checksum is invalid.
    Checksum,
    /// Indicates a packet or frame which is valid but not meant for us.
    Ignored,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::Address => "address not resolved",
            Error::Timeout => "address resolution timed out",
            Error::Exhausted => "buffer exhausted",
            Error::Malformed => "malformed packet",
            Error::Checksum => "invalid checksum",
            Error::Ignored => "packet ignored",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
