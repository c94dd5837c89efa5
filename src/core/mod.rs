//! Core, platform independent networking code.

pub mod arp_cache;
pub mod check;
pub mod config;
pub mod dev;
pub mod link;
pub mod repr;
pub mod service;
