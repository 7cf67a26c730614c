//! Outbound adapters implementing the domain's repository ports.

pub mod memory;
pub mod persistence;
