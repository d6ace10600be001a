//! Block-oriented Huffman compression.
//!
//! ```
//! use huff_rust::{compress, decompress, Properties};
//!
//! let data = b"abracadabra".repeat(100);
//! let mut compressed = Vec::new();
//! compress(&data[..], &mut compressed, &Properties::default())?;
//!
//! let mut restored = Vec::new();
//! decompress(&compressed[..], &mut restored)?;
//! assert_eq!(restored, data);
//! # Ok::<(), huff_rust::Error>(())
//! ```

pub mod bitstreams;
pub mod block;
pub mod codec;
pub mod error;
pub mod properties;
pub mod stream;
pub mod tree;
pub mod utils;

pub use error::{Error, Result};
pub use properties::Properties;
pub use stream::{compress, decompress, run, Mode, StreamStats};

/// Symbol closing every block; one past the largest byte value.
pub const END_OF_BLOCK: u16 = 256;

/// Distinct symbols a block tree can hold: every byte value plus end-of-block.
pub const MAX_SYMBOLS: usize = 256 + 1;

/// Upper bound on the nodes of a block tree.
pub const MAX_NODES: usize = 2 * MAX_SYMBOLS - 1;

pub const MIN_BLOCK_SIZE: usize = 1024;
pub const MAX_BLOCK_SIZE: usize = 65536;
pub const DEFAULT_BLOCK_SIZE: usize = MAX_BLOCK_SIZE;
