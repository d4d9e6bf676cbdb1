//! Safe Rust wrappers for FFmpeg data structures
//!
//! This module provides RAII wrappers around FFmpeg's C structures,
//! ensuring proper resource cleanup and memory safety.

pub mod dictionary;
pub mod packet;

pub use dictionary::Dictionary;
pub use packet::Packet;
