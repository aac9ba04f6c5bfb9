//! In-memory process image
//!
//! A [`MemorySnapshot`] serves reads from a byte buffer mapped at a fixed base
//! address. It backs scans over memory dumps and lets the scanner be driven
//! without a live process.

use std::future::{self, Future};
use std::path::Path;

use tracing::debug;

use super::{Module, ReadMemory};
use crate::address::{Address, NativeWidth, Width};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MemorySnapshot<W: Width = NativeWidth> {
    base: Address<W>,
    bytes: Vec<u8>,
}

impl<W: Width> MemorySnapshot<W> {
    pub fn new(base: Address<W>, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    /// Load a raw dump from disk, mapping its first byte at `base`
    pub async fn from_file<P: AsRef<Path>>(path: P, base: Address<W>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        debug!(
            "Loaded snapshot {} ({} bytes) at {}",
            path.display(),
            bytes.len(),
            base
        );
        Ok(Self::new(base, bytes))
    }

    pub fn base(&self) -> Address<W> {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The whole snapshot described as a module.
    ///
    /// Fails with [`Error::RangeTooLarge`] when the snapshot is longer than
    /// the address width can describe.
    pub fn module(&self, name: impl Into<String>) -> Result<Module<W>> {
        let size = region_size(self.bytes.len())?;
        Ok(Module::new(name, self.base, size))
    }

    fn slice(&self, start: Address<W>, size: usize) -> Result<&[u8]> {
        let out_of_range = || Error::MemoryReadFailed {
            address: start.to_u64(),
            message: format!(
                "{} bytes outside snapshot of {} bytes at {}",
                size,
                self.bytes.len(),
                self.base
            ),
        };

        if start < self.base {
            return Err(out_of_range());
        }

        let offset = usize::try_from((start - self.base).to_u64()).map_err(|_| out_of_range())?;
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(out_of_range)?;

        Ok(&self.bytes[offset..end])
    }
}

/// Byte length as an address-sized size
fn region_size<W: Width>(len: usize) -> Result<Address<W>> {
    let size = len as u64;
    Address::try_from_u64(size).ok_or(Error::RangeTooLarge { size })
}

impl<W: Width> ReadMemory for MemorySnapshot<W> {
    type Width = W;

    fn read_memory(
        &self,
        start: Address<W>,
        size: usize,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send {
        future::ready(self.slice(start, size).map(<[u8]>::to_vec))
    }
}
