//! Scriptable [`ReadMemory`] for tests

use std::sync::atomic::{AtomicUsize, Ordering};

use super::ReadMemory;
use crate::address::{Address, Width};
use crate::error::{Error, Result};

/// Reader over a fixed buffer that counts reads and can be told to fail
#[derive(Debug)]
pub struct MockMemoryReader<W: Width> {
    base: Address<W>,
    bytes: Vec<u8>,
    failure: Option<String>,
    truncate_to: Option<usize>,
    reads: AtomicUsize,
}

impl<W: Width> MockMemoryReader<W> {
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl<W: Width> ReadMemory for MockMemoryReader<W> {
    type Width = W;

    async fn read_memory(&self, start: Address<W>, size: usize) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(Error::MemoryReadFailed {
                address: start.to_u64(),
                message: message.clone(),
            });
        }

        let offset = (start - self.base).to_u64() as usize;
        let end = (offset + size).min(self.bytes.len());
        let mut bytes = self.bytes.get(offset..end).unwrap_or_default().to_vec();
        if let Some(limit) = self.truncate_to {
            bytes.truncate(limit);
        }
        Ok(bytes)
    }
}

pub struct MockMemoryBuilder<W: Width> {
    base: Address<W>,
    bytes: Vec<u8>,
    failure: Option<String>,
    truncate_to: Option<usize>,
}

impl<W: Width> MockMemoryBuilder<W> {
    pub fn new(base: Address<W>) -> Self {
        Self {
            base,
            bytes: Vec::new(),
            failure: None,
            truncate_to: None,
        }
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes = bytes.to_vec();
        self
    }

    /// Overwrite bytes at `offset` from the base, growing the buffer as needed
    pub fn write_at(mut self, offset: usize, bytes: &[u8]) -> Self {
        let end = offset + bytes.len();
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[offset..end].copy_from_slice(bytes);
        self
    }

    /// Every read fails with `message`
    pub fn fail_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Reads return at most `limit` bytes
    pub fn truncate_reads(mut self, limit: usize) -> Self {
        self.truncate_to = Some(limit);
        self
    }

    pub fn build(self) -> MockMemoryReader<W> {
        MockMemoryReader {
            base: self.base,
            bytes: self.bytes,
            failure: self.failure,
            truncate_to: self.truncate_to,
            reads: AtomicUsize::new(0),
        }
    }
}
