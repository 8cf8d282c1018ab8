//! Inbound adapters.

pub mod console;
