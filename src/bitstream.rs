//! Bit-level serialization for compressed containers.
//!
//! [`BitWriter`] and [`BitReader`] wrap a [`bitvec`] buffer with the few
//! operations the driver needs: single bits for code words, fixed-width
//! fields for headers. Bits fill each byte most-significant first;
//! trailing bits in the last byte are padding.

use bitvec::prelude::*;

/// Append-only bit sink backing a compressed payload.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: u8) {
        debug_assert!(bit <= 1);
        self.bits.push(bit != 0);
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);
        for index in (0..count).rev() {
            self.write_bit(((value >> index) & 1) as u8);
        }
    }

    /// Append a `u32` as four little-endian bytes.
    pub fn write_u32(&mut self, value: u32) {
        for byte in value.to_le_bytes() {
            self.write_bits(u32::from(byte), 8);
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Pad the tail with zero bits and return the bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        while self.bits.len() % 8 != 0 {
            self.bits.push(false);
        }
        self.bits.into_vec()
    }
}

/// Bit-level reader over a compressed payload.
#[derive(Debug)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Read bits from `bytes`, starting at the first byte's high bit.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: bytes.view_bits::<Msb0>(),
            position: 0,
        }
    }

    /// The next bit, or `None` at end of stream.
    pub fn read_bit(&mut self) -> Option<u8> {
        let bit = *self.bits.get(self.position)?;
        self.position += 1;
        Some(u8::from(bit))
    }

    /// The next `count` bits as the low bits of a `u32`, most significant
    /// first, or `None` if the stream ends early.
    pub fn read_bits(&mut self, count: u8) -> Option<u32> {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Some(value)
    }

    /// Four little-endian bytes as a `u32`, or `None` if the stream ends
    /// early.
    pub fn read_u32(&mut self) -> Option<u32> {
        let mut bytes = [0u8; 4];
        for byte in &mut bytes {
            *byte = self.read_bits(8)? as u8;
        }
        Some(u32::from_le_bytes(bytes))
    }

    /// Number of unread bits, padding included.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }
}
