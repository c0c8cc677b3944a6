//! Domain models shared by the console, the SDK and the reference backend.
//!
//! These are the wire types: what the backend serializes and the console caches.

pub mod role;

pub use role::*;
