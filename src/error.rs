use std::io;

use thiserror::Error;

use crate::{MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};

/// Errors produced while compressing, decompressing, or configuring a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The input stream reported an error (not a plain end of stream).
    #[error("failed reading input: {0}")]
    InputRead(#[source] io::Error),

    /// The output stream rejected a write or a flush.
    #[error("failed writing output: {0}")]
    OutputWrite(#[source] io::Error),

    /// The serialized tree of a block is malformed or cut short.
    #[error("corrupt tree description: {0}")]
    CorruptDescription(&'static str),

    /// The encoded bits of a block ended before its end-of-block symbol.
    #[error("encoded data truncated before the end of the block")]
    TruncatedEncodedData,

    /// Requested block size is outside the supported range.
    #[error("invalid block size {0}, expected a value in [{min}, {max}]", min = MIN_BLOCK_SIZE, max = MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),

    /// A configuration property has a value that cannot be used.
    #[error("invalid property {key}: {value:?}")]
    InvalidProperty { key: String, value: String },

    /// The properties file could not be opened or created.
    #[error("failed accessing configuration file: {0}")]
    Config(#[source] io::Error),

    /// The properties file could not be parsed.
    #[error("failed parsing properties: {0}")]
    Properties(#[from] java_properties::PropertiesError),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
