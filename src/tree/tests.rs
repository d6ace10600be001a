use super::*;
use crate::bitstreams::BinaryWriterBuilder;

fn build(block: &[u8]) -> HuffmanTree {
    HuffmanTree::from_frequencies(&FrequencyTable::from_block(block))
}

#[test]
fn test_frequency_table_first_appearance_order() {
    let table = FrequencyTable::from_block(b"banana");

    let symbols: Vec<u16> = table.leaves().iter().map(|leaf| leaf.symbol).collect();
    assert_eq!(symbols, vec![b'b' as u16, b'a' as u16, b'n' as u16, END_OF_BLOCK]);

    assert_eq!(table.weight_of(b'a' as u16), Some(3));
    assert_eq!(table.weight_of(b'n' as u16), Some(2));
    assert_eq!(table.weight_of(b'b' as u16), Some(1));
    assert_eq!(table.weight_of(END_OF_BLOCK), Some(0));
    assert_eq!(table.weight_of(b'z' as u16), None);
}

#[test]
fn test_frequency_table_single_value() {
    let table = FrequencyTable::from_block(&[0x41; 5000]);

    assert_eq!(table.num_leaves(), 2);
    assert_eq!(table.weight_of(0x41), Some(5000));
}

#[test]
fn test_node_count_is_two_leaves_minus_one() {
    let block: Vec<u8> = (0..=255).chain(0..100).collect();
    let tree = build(&block);

    assert_eq!(tree.num_leaves(), 257);
    assert_eq!(tree.num_nodes(), 2 * 257 - 1);

    let mut leaves = 0;
    tree.postorder(|_, node| if node.is_leaf() { leaves += 1 });
    assert_eq!(leaves, 257);
}

#[test]
fn test_small_tree_shape() {
    let tree = build(b"aab");

    // EOB (0) and 'b' (1) merge first, then the pair (1) with 'a' (2).
    assert_eq!(tree.shape(), "((256 98) 97)");
    assert_eq!(tree.leaf_symbols(), vec![END_OF_BLOCK, b'b' as u16, b'a' as u16]);
    assert_eq!(tree.root().weight, 3);
}

#[test]
fn test_tie_break_prefers_earliest() {
    let tree = build(b"ab");

    // 'a' and 'b' weigh the same; 'a' was inserted first so it pairs with EOB.
    assert_eq!(tree.shape(), "((256 97) 98)");
}

#[test]
fn test_single_value_tree() {
    let tree = build(&[0x41; 5000]);

    assert_eq!(tree.num_nodes(), 3);
    assert_eq!(tree.shape(), "(256 65)");
    assert_eq!(tree.root().weight, 5000);
}

#[test]
fn test_rebuild_is_deterministic() {
    let block: Vec<u8> = (0..4096u32).map(|i| ((i * 7919) % 61) as u8).collect();

    assert_eq!(build(&block), build(&block));
}

#[test]
fn test_parents_point_back() {
    let tree = build(b"abracadabra");
    let parents = tree.parents();

    assert_eq!(parents[0], None);
    for (i, node) in tree.nodes.iter().enumerate() {
        if let (Some(left), Some(right)) = (node.left, node.right) {
            assert_eq!(parents[left], Some(i));
            assert_eq!(parents[right], Some(i));
        }
    }
    assert_eq!(parents.iter().filter(|p| p.is_none()).count(), 1);
}

#[test]
fn test_codes_follow_tree() {
    let tree = build(b"aab");
    let mut codes = CodeWriter::new(&tree);

    assert_eq!(codes.code(b'a' as u16).unwrap(), &[true]);
    assert_eq!(codes.code(b'b' as u16).unwrap(), &[false, true]);
    assert_eq!(codes.code(END_OF_BLOCK).unwrap(), &[false, false]);
    assert!(codes.code(b'z' as u16).is_none());
}

#[test]
fn test_codes_are_prefix_free() {
    let block: Vec<u8> = (0..10000u32).map(|i| (i % 97 + i % 13) as u8).collect();
    let tree = build(&block);
    let mut codes = CodeWriter::new(&tree);

    let all: Vec<Vec<bool>> = tree
        .leaf_symbols()
        .into_iter()
        .map(|symbol| codes.code(symbol).unwrap().to_vec())
        .collect();

    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            if i != j {
                assert!(!b.starts_with(a), "{:?} is a prefix of {:?}", a, b);
            }
        }
    }
}

#[test]
fn test_write_symbol() {
    let tree = build(b"aab");
    let mut codes = CodeWriter::new(&tree);
    let mut writer = BinaryWriterBuilder::new();

    for &byte in b"aab" {
        codes.write_symbol(byte as u16, &mut writer).unwrap();
    }
    assert_eq!(codes.write_symbol(END_OF_BLOCK, &mut writer), Some(2));

    assert_eq!(writer.written_bits, 6);
    assert_eq!(&*writer.build().os, &[0b1101_0000]);
}
