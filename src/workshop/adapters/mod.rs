//! Adapter implementations for workshop ports.

pub mod memory;
