use std::io::Read;

use log::trace;

use crate::bitstreams::{BinaryReader, BinaryWriterBuilder};
use crate::error::{Error, Result};
use crate::tree::{HuffmanTree, Node};
use crate::{END_OF_BLOCK, MAX_NODES};

pub const ESCAPE: u8 = 0xFF;
pub const ESCAPED_END_OF_BLOCK: u8 = 0x00;
pub const ESCAPED_255: u8 = 0x01;

/// Writes the escape-coded form of a leaf symbol.
#[inline(always)]
pub fn write_symbol(writer: &mut BinaryWriterBuilder, symbol: u16) {
    match symbol {
        END_OF_BLOCK => {
            writer.push_byte(ESCAPE);
            writer.push_byte(ESCAPED_END_OF_BLOCK);
        }
        255 => {
            writer.push_byte(ESCAPE);
            writer.push_byte(ESCAPED_255);
        }
        s => writer.push_byte(s as u8),
    }
}

/// Reads one escape-coded leaf symbol.
#[inline(always)]
pub fn read_symbol<R: Read>(reader: &mut BinaryReader<R>) -> Result<u16> {
    let byte = reader.read_byte()?.ok_or(Error::CorruptDescription("truncated symbol list"))?;

    if byte != ESCAPE {
        return Ok(byte as u16);
    }

    match reader.read_byte()? {
        Some(ESCAPED_END_OF_BLOCK) => Ok(END_OF_BLOCK),
        Some(ESCAPED_255) => Ok(255),
        Some(_) => Err(Error::CorruptDescription("unknown escape sequence")),
        None => Err(Error::CorruptDescription("truncated symbol list")),
    }
}

/// Appends the description of `tree` to `writer`, leaving it byte aligned.
pub fn write_description(tree: &HuffmanTree, writer: &mut BinaryWriterBuilder) {
    let num_nodes = tree.num_nodes();
    debug_assert!(num_nodes <= MAX_NODES);

    writer.push_bits(num_nodes as u64, 16);

    tree.postorder(|_, node| writer.push_bit(!node.is_leaf()));
    writer.align();

    for symbol in tree.leaf_symbols() {
        write_symbol(writer, symbol);
    }
}

/// Serializes a tree description into a fresh buffer.
pub fn serialize(tree: &HuffmanTree) -> Box<[u8]> {
    let mut writer = BinaryWriterBuilder::new();
    write_description(tree, &mut writer);
    writer.build().os
}

/// Reads one tree description. `Ok(None)` means the input ended cleanly
/// before the first byte of a description.
pub fn read_description<R: Read>(reader: &mut BinaryReader<R>) -> Result<Option<HuffmanTree>> {
    debug_assert!(reader.is_aligned());

    let high = match reader.read_byte()? {
        Some(byte) => byte as usize,
        None => return Ok(None),
    };
    let low = reader.read_byte()?.ok_or(Error::CorruptDescription("truncated node count"))? as usize;
    let num_nodes = (high << 8) | low;

    if num_nodes < 3 || num_nodes > MAX_NODES || num_nodes % 2 == 0 {
        return Err(Error::CorruptDescription("impossible node count"));
    }

    let mut nodes = read_shape(reader, num_nodes)?;
    reader.align();

    label_leaves(reader, &mut nodes)?;

    trace!("Read tree description with {} nodes", num_nodes);

    Ok(Some(HuffmanTree::from_nodes(nodes)))
}

/// Rebuilds the tree topology from `num_nodes` postorder shape bits.
///
/// Subtrees still waiting for a parent form a stack at the low end of the
/// arena (`[0, top)`); completed children are moved to the high end, which
/// grows down from `num_nodes` to `free`.
fn read_shape<R: Read>(reader: &mut BinaryReader<R>, num_nodes: usize) -> Result<Vec<Node>> {
    let mut nodes = vec![Node::default(); num_nodes];
    let mut top = 0;
    let mut free = num_nodes;

    for _ in 0..num_nodes {
        let internal = reader.read_bit()?.ok_or(Error::CorruptDescription("truncated shape bits"))?;

        if internal {
            if top < 2 {
                return Err(Error::CorruptDescription("internal node without two children"));
            }
            if free < top + 1 {
                return Err(Error::CorruptDescription("shape does not fit the node count"));
            }

            let right = nodes[top - 1];
            let left = nodes[top - 2];
            nodes[free - 1] = right;
            nodes[free - 2] = left;
            top -= 1;

            nodes[top - 1] = Node::internal(free - 2, free - 1, 0);
            free -= 2;
        } else {
            if top >= free {
                return Err(Error::CorruptDescription("shape does not fit the node count"));
            }

            nodes[top] = Node::leaf(0, 0);
            top += 1;
        }
    }

    if top != 1 {
        return Err(Error::CorruptDescription("shape does not reduce to a single root"));
    }

    Ok(nodes)
}

/// Assigns symbols to the leaves of a freshly rebuilt shape, left to right.
fn label_leaves<R: Read>(reader: &mut BinaryReader<R>, nodes: &mut [Node]) -> Result<()> {
    let mut leaves = Vec::with_capacity((nodes.len() + 1) / 2);
    collect_leaves(nodes, 0, &mut leaves);

    let mut end_of_block_leaves = 0;

    for leaf in leaves {
        let symbol = read_symbol(reader)?;
        if symbol == END_OF_BLOCK {
            end_of_block_leaves += 1;
        }
        nodes[leaf].symbol = symbol;
    }

    if end_of_block_leaves != 1 {
        return Err(Error::CorruptDescription("expected exactly one end-of-block leaf"));
    }

    Ok(())
}

fn collect_leaves(nodes: &[Node], index: usize, leaves: &mut Vec<usize>) {
    let node = &nodes[index];

    if let Some(left) = node.left {
        collect_leaves(nodes, left, leaves);
    }
    if let Some(right) = node.right {
        collect_leaves(nodes, right, leaves);
    }
    if node.is_leaf() {
        leaves.push(index);
    }
}
