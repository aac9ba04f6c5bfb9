use std::future::Future;

use crate::address::{Address, Width};
use crate::error::Result;

/// Read access to the memory of a target process.
///
/// This is the only capability the scanner needs from a process backend.
/// Implementations own whatever synchronization the target requires.
pub trait ReadMemory {
    type Width: Width;

    /// Read exactly `size` bytes starting at `start`.
    ///
    /// Cancellation, timeouts and access failures are reported as errors.
    /// Returning fewer than `size` bytes is treated by callers as a failure.
    fn read_memory(
        &self,
        start: Address<Self::Width>,
        size: usize,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
