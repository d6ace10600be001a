use std::io::{Read, Write};

use log::debug;

use crate::bitstreams::{BinaryReader, BinaryWriterBuilder};
use crate::codec::{read_description, write_description};
use crate::error::{Error, Result};
use crate::tree::{CodeWriter, FrequencyTable, HuffmanTree};
use crate::END_OF_BLOCK;

/// Sizes of one processed block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockStats {
    /// Uncompressed bytes in the block.
    pub raw_len: usize,
    /// Compressed bytes of the block, tree description included.
    pub encoded_len: usize,
    pub num_nodes: usize,
}

pub struct BlockEncoder {
    block_size: usize,
    block: Vec<u8>,
}

impl BlockEncoder {
    pub fn new(block_size: usize) -> Self {
        Self { block_size, block: Vec::with_capacity(block_size) }
    }

    /// Reads up to `block_size` bytes and writes their compressed block.
    /// Returns `Ok(None)` once the input is exhausted.
    pub fn encode_block<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Option<BlockStats>> {
        self.block.clear();
        input
            .by_ref()
            .take(self.block_size as u64)
            .read_to_end(&mut self.block)
            .map_err(Error::InputRead)?;

        if self.block.is_empty() {
            return Ok(None);
        }

        let (encoded, stats) = Self::encode(&self.block);
        output.write_all(&encoded).map_err(Error::OutputWrite)?;

        Ok(Some(stats))
    }

    /// Compresses one in-memory block into its wire form.
    pub fn encode(block: &[u8]) -> (Box<[u8]>, BlockStats) {
        let table = FrequencyTable::from_block(block);
        let tree = HuffmanTree::from_frequencies(&table);

        let mut writer = BinaryWriterBuilder::new();
        write_description(&tree, &mut writer);
        let description_len = writer.len();

        let mut codes = CodeWriter::new(&tree);
        for &byte in block.iter() {
            let written = codes.write_symbol(byte as u16, &mut writer);
            debug_assert!(written.is_some(), "Byte {} missing from the block tree", byte);
        }
        codes.write_symbol(END_OF_BLOCK, &mut writer);

        let encoded = writer.build().os;

        debug!(
            "Encoded block of {} bytes: {} nodes, {} description bytes, {} bytes total",
            block.len(), tree.num_nodes(), description_len, encoded.len()
        );

        let stats = BlockStats {
            raw_len: block.len(),
            encoded_len: encoded.len(),
            num_nodes: tree.num_nodes(),
        };

        (encoded, stats)
    }
}

#[derive(Default)]
pub struct BlockDecoder {
    block: Vec<u8>,
}

impl BlockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the next block and writes its bytes. Returns `Ok(None)` when
    /// the input ends cleanly before a new block.
    pub fn decode_block<R: Read, W: Write>(&mut self, reader: &mut BinaryReader<R>, output: &mut W) -> Result<Option<BlockStats>> {
        let start = reader.read_bits;

        let tree = match read_description(reader)? {
            Some(tree) => tree,
            None => return Ok(None),
        };

        self.block.clear();
        Self::decode_symbols(&tree, reader, &mut self.block)?;
        reader.align();

        output.write_all(&self.block).map_err(Error::OutputWrite)?;

        let stats = BlockStats {
            raw_len: self.block.len(),
            encoded_len: (reader.read_bits - start) / 8,
            num_nodes: tree.num_nodes(),
        };

        debug!("Decoded block of {} bytes from {} bytes, {} nodes", stats.raw_len, stats.encoded_len, stats.num_nodes);

        Ok(Some(stats))
    }

    /// Walks the tree from the root one bit per edge until the end-of-block
    /// leaf, collecting every other symbol into `out`.
    fn decode_symbols<R: Read>(tree: &HuffmanTree, reader: &mut BinaryReader<R>, out: &mut Vec<u8>) -> Result<()> {
        loop {
            let mut node = tree.root();

            while !node.is_leaf() {
                let bit = reader.read_bit()?.ok_or(Error::TruncatedEncodedData)?;
                let next = if bit { node.right } else { node.left };
                node = match next {
                    Some(child) => tree.node(child),
                    None => return Err(Error::CorruptDescription("internal node with a single child")),
                };
            }

            if node.symbol == END_OF_BLOCK {
                return Ok(());
            }

            out.push(node.symbol as u8);
        }
    }
}
