use thiserror::Error;

/// Errors that can occur while framing or transforming USM data.
#[derive(Debug, Error)]
pub enum Error {
    /// Key handed to a cipher does not have the length the cipher works with.
    #[error("invalid key length: expected {expected} bytes, got {actual} bytes")]
    KeyLength { expected: usize, actual: usize },

    /// Chunk header is malformed or chunk boundaries have desynchronized.
    #[error("invalid chunk framing: {0}")]
    Framing(String),

    /// Input is not the kind of value the operation works on.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A `Result` alias where the `Err` case is `cri_usm::Error`.
pub type Result<T> = std::result::Result<T, Error>;
