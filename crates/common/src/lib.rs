//! Relay wire contract and errors shared across `ccdrop` crates.

pub mod error;
pub mod protocol;

pub use error::RelayError;
