use log::trace;

use crate::bitstreams::BinaryWriterBuilder;
use crate::{END_OF_BLOCK, MAX_SYMBOLS};

/// Symbol stored in internal nodes.
pub const INTERNAL: u16 = u16::MAX;

/// Arena slot; children are indices into the same arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub weight: u64,
    pub symbol: u16,
}

impl Default for Node {
    fn default() -> Self {
        Self { left: None, right: None, weight: 0, symbol: INTERNAL }
    }
}

impl Node {
    pub fn leaf(symbol: u16, weight: u64) -> Self {
        Self { symbol, weight, ..Default::default() }
    }

    pub fn internal(left: usize, right: usize, weight: u64) -> Self {
        Self { left: Some(left), right: Some(right), weight, symbol: INTERNAL }
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Occurrence counts of one block: one leaf per distinct byte value, in order
/// of first appearance, followed by the end-of-block leaf.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    leaves: Vec<Node>,
}

impl FrequencyTable {
    pub fn from_block(block: &[u8]) -> Self {
        let mut slot_for_symbol = [None; 256];
        let mut leaves = Vec::with_capacity(MAX_SYMBOLS);

        for &byte in block.iter() {
            match slot_for_symbol[byte as usize] {
                Some(slot) => {
                    let leaf: &mut Node = &mut leaves[slot];
                    leaf.weight += 1;
                }
                None => {
                    slot_for_symbol[byte as usize] = Some(leaves.len());
                    leaves.push(Node::leaf(byte as u16, 1));
                }
            }
        }

        leaves.push(Node::leaf(END_OF_BLOCK, 0));

        Self { leaves }
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaves(&self) -> &[Node] {
        &self.leaves
    }

    /// Count recorded for `symbol`, if it occurs in the block.
    pub fn weight_of(&self, symbol: u16) -> Option<u64> {
        self.leaves.iter().find(|leaf| leaf.symbol == symbol).map(|leaf| leaf.weight)
    }
}

/// Mapping from symbol value (0..=256) to its leaf slot in the arena.
pub struct SymbolIndex {
    leaf_for_symbol: [Option<usize>; MAX_SYMBOLS],
}

impl SymbolIndex {
    #[inline(always)]
    pub fn get(&self, symbol: u16) -> Option<usize> {
        self.leaf_for_symbol.get(symbol as usize).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub(crate) nodes: Vec<Node>,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes of the
    /// active region `[0, low)`, parking merged nodes at the high end of the
    /// arena.
    pub fn from_frequencies(table: &FrequencyTable) -> Self {
        let num_leaves = table.num_leaves();
        debug_assert!(num_leaves >= 2, "A block tree needs the end-of-block leaf and at least one symbol");

        let num_nodes = 2 * num_leaves - 1;
        let mut nodes = vec![Node::default(); num_nodes];
        nodes[..num_leaves].copy_from_slice(table.leaves());

        let mut low = num_leaves;
        let mut high = num_nodes;

        while low > 1 {
            let (min_index_1, min_index_2) = Self::two_lowest(&nodes[..low]);

            nodes[high - 1] = nodes[min_index_2];
            nodes[high - 2] = nodes[min_index_1];

            let min_index = min_index_1.min(min_index_2);
            let max_index = min_index_1.max(min_index_2);

            let weight = nodes[high - 2].weight + nodes[high - 1].weight;
            nodes[min_index] = Node::internal(high - 2, high - 1, weight);

            nodes.copy_within(max_index + 1..low, max_index);

            low -= 1;
            high -= 2;
        }

        trace!("Built tree with {} leaves and {} nodes", num_leaves, num_nodes);

        Self { nodes }
    }

    /// Indices of the lightest and second lightest node. Scanning is left to
    /// right and only a strictly smaller weight displaces a candidate, so the
    /// earliest node wins every tie.
    fn two_lowest(active: &[Node]) -> (usize, usize) {
        let (mut min_1, mut min_2) = (u64::MAX, u64::MAX);
        let (mut min_index_1, mut min_index_2) = (0, 0);

        for (i, node) in active.iter().enumerate() {
            if node.weight < min_1 {
                min_2 = min_1;
                min_index_2 = min_index_1;
                min_1 = node.weight;
                min_index_1 = i;
            } else if node.weight < min_2 {
                min_2 = node.weight;
                min_index_2 = i;
            }
        }

        (min_index_1, min_index_2)
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[inline(always)]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }

    /// Visits every node as left subtree, right subtree, then the node itself.
    pub fn postorder<F: FnMut(usize, &Node)>(&self, mut visit: F) {
        self.postorder_from(0, &mut visit);
    }

    fn postorder_from<F: FnMut(usize, &Node)>(&self, index: usize, visit: &mut F) {
        let node = &self.nodes[index];

        if let Some(left) = node.left {
            self.postorder_from(left, visit);
        }
        if let Some(right) = node.right {
            self.postorder_from(right, visit);
        }

        visit(index, node);
    }

    /// Leaf symbols from the left of the tree to the right.
    pub fn leaf_symbols(&self) -> Vec<u16> {
        let mut symbols = Vec::with_capacity(self.num_leaves());
        self.postorder(|_, node| {
            if node.is_leaf() {
                symbols.push(node.symbol);
            }
        });
        symbols
    }

    /// Parent slot of every node; `None` for the root.
    pub fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];

        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(left) = node.left {
                parents[left] = Some(i);
            }
            if let Some(right) = node.right {
                parents[right] = Some(i);
            }
        }

        parents
    }

    pub fn symbol_index(&self) -> SymbolIndex {
        let mut leaf_for_symbol = [None; MAX_SYMBOLS];

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() && (node.symbol as usize) < MAX_SYMBOLS {
                leaf_for_symbol[node.symbol as usize] = Some(i);
            }
        }

        SymbolIndex { leaf_for_symbol }
    }

    /// Shape of the tree as nested parentheses, leaves shown by symbol.
    pub fn shape(&self) -> String {
        let mut stack: Vec<String> = Vec::new();

        self.postorder(|_, node| {
            if node.is_leaf() {
                stack.push(node.symbol.to_string());
            } else {
                let right = stack.pop().unwrap_or_default();
                let left = stack.pop().unwrap_or_default();
                stack.push(format!("({left} {right})"));
            }
        });

        stack.pop().unwrap_or_default()
    }
}

/// Derives codes leaf to root through a parent table, reusing one path
/// buffer across lookups.
pub struct CodeWriter<'a> {
    tree: &'a HuffmanTree,
    parents: Vec<Option<usize>>,
    index: SymbolIndex,
    path: Vec<bool>,
}

impl<'a> CodeWriter<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        Self {
            tree,
            parents: tree.parents(),
            index: tree.symbol_index(),
            path: Vec::new(),
        }
    }

    /// Directions from the root to the leaf of `symbol`, 0 for left and 1
    /// for right. `None` if the symbol is not in the tree.
    pub fn code(&mut self, symbol: u16) -> Option<&[bool]> {
        let leaf = self.index.get(symbol)?;

        self.path.clear();

        let mut child = leaf;
        while let Some(parent) = self.parents[child] {
            self.path.push(self.tree.nodes[parent].left != Some(child));
            child = parent;
        }

        self.path.reverse();
        Some(self.path.as_slice())
    }

    /// Emits the code of `symbol`. Returns the code length, or `None` if the
    /// symbol is not in the tree.
    #[inline(always)]
    pub fn write_symbol(&mut self, symbol: u16, writer: &mut BinaryWriterBuilder) -> Option<usize> {
        let code = self.code(symbol)?;

        for &bit in code.iter() {
            writer.push_bit(bit);
        }

        Some(code.len())
    }
}

#[cfg(test)]
mod tests;
