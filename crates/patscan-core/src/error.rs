use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Short read at address {address:#x}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Range of {size:#x} bytes is too large to scan")]
    RangeTooLarge { size: u64 },

    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from reading the target's memory
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            Error::MemoryReadFailed { .. } | Error::ShortRead { .. }
        )
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
