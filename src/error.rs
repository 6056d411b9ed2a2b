//! Error types for compression and decompression.

use thiserror::Error;

/// Error variants for compression pipeline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The compress input contained a symbol the model alphabet does not cover.
    #[error("symbol {0:?} is not in the alphabet")]
    SymbolOutsideAlphabet(char),

    /// The emitted-pair count does not fit the u32 container header.
    #[error("message of {0} symbols overflows the container header")]
    MessageTooLong(usize),

    /// The compressed container is shorter than its 4-byte header.
    #[error("missing container header")]
    MissingHeader,

    /// The bit stream ended while a code word was still being decoded.
    #[error("truncated bit stream")]
    TruncatedStream,

    /// The container's header and its bit stream disagree: bits that
    /// cannot be padding remain after the declared pair count.
    #[error("corrupt bit stream")]
    CorruptStream,

    /// An I/O error occurred while reading or writing a container.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for compression operations.
pub type Result<T> = std::result::Result<T, Error>;
