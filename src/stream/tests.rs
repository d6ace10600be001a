use std::io::{self, Read};

use rand::Rng;

use super::*;
use crate::{MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};

fn props(block_size: usize) -> Properties {
    Properties::default().set_block_size(block_size).unwrap()
}

fn compress_vec(data: &[u8], block_size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    compress(data, &mut out, &props(block_size)).unwrap();
    out
}

fn decompress_vec(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}

/// Yields `data` and then fails instead of reporting end of stream.
struct FailAfter<'a> {
    data: &'a [u8],
}

impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }
        self.data.read(buf)
    }
}

fn random_bytes(len: usize, alphabet: u32) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect()
}

#[test]
fn test_empty_input() {
    let mut out = Vec::new();
    let stats = compress(&b""[..], &mut out, &Properties::default()).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.blocks, 0);

    let stats = decompress(&b""[..], &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.blocks, 0);
}

#[test]
fn test_roundtrip_random_data() {
    let data = random_bytes(200_000, 256);

    for block_size in [MIN_BLOCK_SIZE, 4096, 50_000, MAX_BLOCK_SIZE] {
        let compressed = compress_vec(&data, block_size);
        assert_eq!(decompress_vec(&compressed).unwrap(), data, "block size {block_size}");
    }
}

#[test]
fn test_roundtrip_skewed_data_shrinks() {
    let data = random_bytes(100_000, 4);
    let compressed = compress_vec(&data, MAX_BLOCK_SIZE);

    assert!(compressed.len() < data.len() / 3);
    assert_eq!(decompress_vec(&compressed).unwrap(), data);
}

#[test]
fn test_input_multiple_of_block_size() {
    let data = random_bytes(3 * MIN_BLOCK_SIZE, 256);
    let mut out = Vec::new();

    let stats = compress(&data[..], &mut out, &props(MIN_BLOCK_SIZE)).unwrap();
    assert_eq!(stats.blocks, 3);
    assert_eq!(stats.bytes_in, data.len() as u64);
    assert_eq!(stats.bytes_out, out.len() as u64);

    let mut decoded = Vec::new();
    let stats = decompress(&out[..], &mut decoded).unwrap();
    assert_eq!(stats.blocks, 3);
    assert_eq!(decoded, data);
}

#[test]
fn test_single_value_stream() {
    let data = vec![0x41; 5000];
    let compressed = compress_vec(&data, MAX_BLOCK_SIZE);

    assert_eq!(&compressed[..2], &[0x00, 0x03]);
    assert_eq!(decompress_vec(&compressed).unwrap(), data);
}

#[test]
fn test_compression_is_deterministic() {
    let data = random_bytes(70_000, 40);

    assert_eq!(compress_vec(&data, 8192), compress_vec(&data, 8192));
}

#[test]
fn test_truncated_stream_fails() {
    let data = random_bytes(10_000, 256);
    let compressed = compress_vec(&data, 2048);

    let result = decompress_vec(&compressed[..compressed.len() - 1]);
    assert!(matches!(result, Err(Error::TruncatedEncodedData)));
}

#[test]
fn test_truncated_description_fails() {
    let compressed = compress_vec(b"some short text", MIN_BLOCK_SIZE);

    let result = decompress_vec(&compressed[..4]);
    assert!(matches!(result, Err(Error::CorruptDescription(_))));
}

#[test]
fn test_invalid_block_size_rejected() {
    let props = Properties { block_size: 100 };
    let mut out = Vec::new();

    assert!(matches!(compress(&b"abc"[..], &mut out, &props), Err(Error::InvalidBlockSize(100))));
}

#[test]
fn test_run_dispatches_on_mode() {
    let data = random_bytes(5000, 16);
    let props = props(MIN_BLOCK_SIZE);

    let mut compressed = Vec::new();
    run(Mode::Compress, &props, &data[..], &mut compressed).unwrap();

    let mut decoded = Vec::new();
    let stats = run(Mode::Decompress, &props, &compressed[..], &mut decoded).unwrap();

    assert_eq!(decoded, data);
    assert_eq!(stats.blocks, 5);
    assert!(stats.ratio() > 1.0);
}

#[test]
fn test_compress_input_error_keeps_earlier_blocks() {
    let data = random_bytes(1500, 256);
    let mut out = Vec::new();

    let result = compress(FailAfter { data: &data }, &mut out, &props(MIN_BLOCK_SIZE));
    assert!(matches!(result, Err(Error::InputRead(_))));

    assert_eq!(out, compress_vec(&data[..MIN_BLOCK_SIZE], MIN_BLOCK_SIZE));
    assert_eq!(decompress_vec(&out).unwrap(), &data[..MIN_BLOCK_SIZE]);
}

#[test]
fn test_decompress_input_error_keeps_earlier_blocks() {
    let data = random_bytes(1500, 256);
    let compressed = compress_vec(&data, MIN_BLOCK_SIZE);
    let first_block_len = compress_vec(&data[..MIN_BLOCK_SIZE], MIN_BLOCK_SIZE).len();

    let mut out = Vec::new();
    let result = decompress(FailAfter { data: &compressed[..first_block_len + 10] }, &mut out);

    assert!(matches!(result, Err(Error::InputRead(_))));
    assert_eq!(out, &data[..MIN_BLOCK_SIZE]);
}
