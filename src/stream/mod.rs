use std::io::{BufReader, Read, Write};

use log::info;
use serde::Serialize;

use crate::bitstreams::BinaryReader;
use crate::block::{BlockDecoder, BlockEncoder, BlockStats};
use crate::error::{Error, Result};
use crate::properties::Properties;
use crate::utils::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Compress,
    Decompress,
}

/// Totals of a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub blocks: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub largest_tree: usize,
    pub elapsed_ns: u64,
}

impl StreamStats {
    fn add_compressed(&mut self, block: &BlockStats) {
        self.blocks += 1;
        self.bytes_in += block.raw_len as u64;
        self.bytes_out += block.encoded_len as u64;
        self.largest_tree = self.largest_tree.max(block.num_nodes);
    }

    fn add_decompressed(&mut self, block: &BlockStats) {
        self.blocks += 1;
        self.bytes_in += block.encoded_len as u64;
        self.bytes_out += block.raw_len as u64;
        self.largest_tree = self.largest_tree.max(block.num_nodes);
    }

    /// Output bytes per input byte, 0 for an empty run.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            return 0.0;
        }
        self.bytes_out as f64 / self.bytes_in as f64
    }
}

/// Compresses `input` block by block until it is exhausted.
pub fn compress<R: Read, W: Write>(mut input: R, mut output: W, props: &Properties) -> Result<StreamStats> {
    props.validate()?;

    let mut timer = Timer::new();
    let mut stats = StreamStats::default();
    let mut encoder = BlockEncoder::new(props.block_size);

    while let Some(block) = encoder.encode_block(&mut input, &mut output)? {
        stats.add_compressed(&block);
    }

    output.flush().map_err(Error::OutputWrite)?;
    stats.elapsed_ns = timer.stop() as u64;

    info!(
        "Compressed {} bytes into {} bytes in {} blocks of at most {} bytes ({}ns)",
        stats.bytes_in, stats.bytes_out, stats.blocks, props.block_size, stats.elapsed_ns
    );

    Ok(stats)
}

/// Decompresses `input` block by block until it is exhausted.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<StreamStats> {
    let mut timer = Timer::new();
    let mut stats = StreamStats::default();
    let mut reader = BinaryReader::new(BufReader::new(input));
    let mut decoder = BlockDecoder::new();

    while let Some(block) = decoder.decode_block(&mut reader, &mut output)? {
        stats.add_decompressed(&block);
    }

    output.flush().map_err(Error::OutputWrite)?;
    stats.elapsed_ns = timer.stop() as u64;

    info!(
        "Decompressed {} bytes into {} bytes from {} blocks ({}ns)",
        stats.bytes_in, stats.bytes_out, stats.blocks, stats.elapsed_ns
    );

    Ok(stats)
}

/// Runs one compression or decompression over the given streams.
pub fn run<R: Read, W: Write>(mode: Mode, props: &Properties, input: R, output: W) -> Result<StreamStats> {
    match mode {
        Mode::Compress => compress(input, output, props),
        Mode::Decompress => decompress(input, output),
    }
}

#[cfg(test)]
mod tests;
