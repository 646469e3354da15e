//! In-memory adapters for the workshop ports.

mod workshop;

pub use workshop::InMemoryWorkshop;
