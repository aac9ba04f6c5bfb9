//! # patscan-core
//!
//! Wildcard byte-pattern scanning over the memory of an attached process.
//!
//! This crate provides:
//! - [`Address`], a pointer-sized value for 32-bit or 64-bit targets with
//!   wrapping arithmetic and unsigned comparisons
//! - [`BytePattern`], an immutable signature with wildcard bytes
//! - [`find_pattern`] and [`PatternScanner`], which search a buffer, a
//!   range, a section or a module for the first match
//!
//! Reading the target is delegated to a [`ReadMemory`] implementation.
//! [`MemorySnapshot`] serves reads from an in-memory dump.
//!
//! ## Feature Flags
//!
//! - `x86`: Use 32-bit addresses for [`NativeAddress`]. 64-bit otherwise.

pub mod address;
pub mod error;
pub mod memory;
pub mod pattern;
pub mod scanner;

pub use address::{
    Address, Address32, Address64, MIN_VALID_ADDRESS, NativeAddress, NativeWidth, Width,
};
pub use error::{Error, Result};
pub use memory::{MemoryRegion, MemorySnapshot, Module, ReadMemory, Section};
pub use pattern::{BytePattern, Signature, SignatureSet, load_signatures, save_signatures};
pub use scanner::{PatternScanner, find_pattern};
