use std::io::{self, Read};

use crate::error::{Error, Result};

/// The bytes produced by a [`BinaryWriterBuilder`], final byte zero padded.
pub struct BinaryWriter {
    pub os: Box<[u8]>,
}

/// Accumulates bits most-significant-bit first into an in-memory buffer.
pub struct BinaryWriterBuilder {
    os: Vec<u8>,
    pub written_bits: usize,
    pub current: u64,
    pub free: usize,
}

impl Default for BinaryWriterBuilder {
    fn default() -> Self {
        BinaryWriterBuilder {
            os: Vec::default(),
            written_bits: 0,
            current: 0,
            free: 8,
        }
    }
}

impl BinaryWriterBuilder {
    pub fn build(mut self) -> BinaryWriter {
        self.align();

        BinaryWriter {
            os: self.os.into_boxed_slice()
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of complete bytes emitted so far.
    pub fn len(&self) -> usize {
        self.os.len()
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_empty() && self.free == 8
    }

    #[inline(always)]
    pub fn write(&mut self, b: u64) {
        self.os.push(b as u8);
    }

    #[inline(always)]
    pub fn write_in_current(&mut self, b: u64, len: u64) -> u64 {
        debug_assert!(len as usize <= self.free);

        self.free -= len as usize;
        self.current |= (b & ((1 << len) - 1)) << self.free;

        if self.free == 0 {
            self.write(self.current);
            self.free = 8;
            self.current = 0;
        }

        self.written_bits += len as usize;
        len
    }

    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) {
        self.write_in_current(bit as u64, 1);
    }

    /// Writes the lowest `len` bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u64, len: u64) -> u64 {
        assert!(len <= 64, "Cannot write {} bits to an integer", len);

        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(self.free as u64);
            remaining -= chunk;
            self.write_in_current(x >> remaining, chunk);
        }

        len
    }

    /// Writes a whole byte; the writer must be byte aligned.
    #[inline(always)]
    pub fn push_byte(&mut self, b: u8) {
        debug_assert_eq!(self.free, 8, "Unaligned byte write");
        self.write(b as u64);
        self.written_bits += 8;
    }

    /// Pads the partial byte with zero bits. Returns the number of padding bits.
    pub fn align(&mut self) -> usize {
        if self.free == 8 {
            return 0;
        }

        let padding = self.free;
        self.write(self.current);
        self.written_bits += padding;
        self.free = 8;
        self.current = 0;
        padding
    }
}

/// Pulls bits most-significant-bit first from a byte stream, one byte at a
/// time so that nothing past the current byte is consumed.
///
/// Reads return `Ok(None)` on a clean end of stream and
/// [`Error::InputRead`] when the underlying reader fails.
pub struct BinaryReader<R> {
    is: R,
    pub read_bits: usize,
    pub current: u64,
    pub fill: usize,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(input_stream: R) -> Self {
        BinaryReader {
            is: input_stream,
            read_bits: 0,
            current: 0,
            fill: 0
        }
    }

    pub fn into_inner(self) -> R {
        self.is
    }

    /// Reads the next byte from the stream, ignoring any bits still buffered.
    #[inline(always)]
    pub fn read(&mut self) -> Result<Option<u64>> {
        let mut byte = [0u8; 1];
        loop {
            match self.is.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0] as u64)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::InputRead(e)),
            }
        }
    }

    /// Loads the next byte into `current` when it is exhausted.
    #[inline(always)]
    fn refill(&mut self) -> Result<bool> {
        if self.fill > 0 {
            return Ok(true);
        }

        match self.read()? {
            Some(byte) => {
                self.current = byte;
                self.fill = 8;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if !self.refill()? {
            return Ok(None);
        }

        self.fill -= 1;
        self.read_bits += 1;
        Ok(Some((self.current >> self.fill) & 1 == 1))
    }

    /// Reads `len` bits as an integer, most significant first. Returns
    /// `Ok(None)` if the stream ends before `len` bits were available.
    #[inline(always)]
    pub fn read_int(&mut self, len: u64) -> Result<Option<u64>> {
        assert!(len < 64);

        let mut x = 0;
        let mut len = len as usize;

        while len > 0 {
            if !self.refill()? {
                return Ok(None);
            }

            let take = len.min(self.fill);
            self.fill -= take;
            x = (x << take) | ((self.current >> self.fill) & ((1 << take) - 1));
            self.read_bits += take;
            len -= take;
        }

        Ok(Some(x))
    }

    #[inline(always)]
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.read_int(8)?.map(|b| b as u8))
    }

    /// Drops the bits left in the current byte. Returns how many were dropped.
    pub fn align(&mut self) -> usize {
        let dropped = self.fill;
        self.read_bits += dropped;
        self.fill = 0;
        dropped
    }

    pub fn is_aligned(&self) -> bool {
        self.fill == 0
    }
}
