//! Wildcard pattern search
//!
//! [`find_pattern`] is the pure search over a byte slice. [`PatternScanner`]
//! resolves a range, section or module to `(start, size)`, reads those bytes
//! from the target with a single [`ReadMemory`] call and maps the match back
//! to an absolute address.
//!
//! Every form returns the leftmost match. The last possible start position,
//! `buffer.len() - pattern.len()`, is always tested, so a pattern sitting
//! flush against the end of a range is found.

use memchr::memchr_iter;
use tracing::debug;

use crate::address::Address;
use crate::error::{Error, Result};
use crate::memory::{MemoryRegion, Module, ReadMemory, Section};
use crate::pattern::{BytePattern, Signature};

/// Offset of the first match of `pattern` in `buffer`, or `None`.
///
/// Candidate positions are found with `memchr` on the first non-wildcard
/// element; each candidate is then checked with [`BytePattern::matches_at`].
/// An all-wildcard pattern matches at 0 whenever it fits.
pub fn find_pattern(pattern: &BytePattern, buffer: &[u8]) -> Option<usize> {
    if buffer.len() < pattern.len() {
        return None;
    }
    let last = buffer.len() - pattern.len();

    let Some((anchor, value)) = pattern.first_fixed() else {
        return Some(0);
    };

    // Window index `i` is the start whose anchor lands on `buffer[anchor + i]`
    memchr_iter(value, &buffer[anchor..=last + anchor])
        .find(|&start| pattern.matches_at(buffer, start))
}

pub struct PatternScanner<'a, R: ReadMemory> {
    reader: &'a R,
}

impl<'a, R: ReadMemory> PatternScanner<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Search `size` bytes starting at `start`.
    ///
    /// Returns the absolute address of the first match, or the null address
    /// when the pattern does not occur. Read failures propagate unchanged; a
    /// read that returns fewer than `size` bytes is [`Error::ShortRead`].
    pub async fn find_pattern_in_range(
        &self,
        pattern: &BytePattern,
        start: Address<R::Width>,
        size: usize,
    ) -> Result<Address<R::Width>> {
        debug!("Scanning {:#x} bytes at {} for {}", size, start, pattern);

        let bytes = self.reader.read_memory(start, size).await?;
        if bytes.len() != size {
            return Err(Error::ShortRead {
                address: start.to_u64(),
                expected: size,
                actual: bytes.len(),
            });
        }

        match find_pattern(pattern, &bytes) {
            Some(offset) => {
                let address = start + offset;
                debug!("  Match at {} (offset {:#x})", address, offset);
                Ok(address)
            }
            None => {
                debug!("  No match in {:#x} bytes at {}", size, start);
                Ok(Address::NULL)
            }
        }
    }

    pub async fn find_pattern_in_section(
        &self,
        pattern: &BytePattern,
        section: &Section<R::Width>,
    ) -> Result<Address<R::Width>> {
        debug!("Searching section {}", section.name);
        self.find_pattern_in_region(pattern, section).await
    }

    pub async fn find_pattern_in_module(
        &self,
        pattern: &BytePattern,
        module: &Module<R::Width>,
    ) -> Result<Address<R::Width>> {
        debug!("Searching module {}", module.name);
        self.find_pattern_in_region(pattern, module).await
    }

    /// Search any `(start, size)` region
    pub async fn find_pattern_in_region<M>(
        &self,
        pattern: &BytePattern,
        region: &M,
    ) -> Result<Address<R::Width>>
    where
        M: MemoryRegion<R::Width> + ?Sized,
    {
        let size = region.size().to_u64();
        let size = usize::try_from(size).map_err(|_| Error::RangeTooLarge { size })?;
        self.find_pattern_in_range(pattern, region.start(), size).await
    }

    /// Search a module for a named signature
    pub async fn find_signature(
        &self,
        signature: &Signature,
        module: &Module<R::Width>,
    ) -> Result<Address<R::Width>> {
        let address = self
            .find_pattern_in_module(&signature.pattern, module)
            .await?;
        if address.is_null() {
            debug!("Signature {} not found in {}", signature.name, module.name);
        } else {
            debug!("Signature {} found at {}", signature.name, address);
        }
        Ok(address)
    }
}
