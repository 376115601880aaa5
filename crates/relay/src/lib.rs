//! ccdrop relay: an untrusted store for opaque ciphertext frames.
//!
//! The relay accepts a frame on `POST /share`, answers with a fresh
//! identifier, and returns the same bytes on `GET /get/{id}`. It never sees
//! keys or plaintext.

pub mod config;
pub mod server;
pub mod store;
pub mod telemetry;
