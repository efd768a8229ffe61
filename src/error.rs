//! Error types for the RLE codec.

use thiserror::Error;

/// Every failure the codec can surface. Nothing is retried or swallowed in
/// the library; callers decide what to do with partial output files.
#[derive(Error, Debug)]
pub enum RleError {
    #[error("no node format yields a positive saving on this input")]
    Inefficient,

    #[error("input is too large: the node table would overflow the header's count field")]
    InputTooLarge,

    #[error("not an RLE file: bad magic bytes")]
    BadMagic,

    #[error("unknown node format byte: {0:#04x}")]
    BadFormat(u8),

    #[error("compressed stream does not match the declared decompressed length")]
    LengthMismatch,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
