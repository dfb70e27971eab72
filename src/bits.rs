//! A [`BitCursor`](struct.BitCursor.html) for reading big-endian, bit-packed fields from a byte
//! slice.
//!
//! All of the fixed-offset syntax in the transport stream and PES headers is read through this one
//! type, so the bit offsets used by the rest of the crate can be checked in a single place.

use crate::error::DecodeError;

/// Reads MSB-first bit fields from a borrowed buffer, tracking an absolute bit position.
///
/// Reads never move the cursor when they fail.
///
/// ```rust
/// # use mpeg2ts_header::bits::BitCursor;
/// let data = [0b1011_0011, 0b1100_0000];
/// let mut c = BitCursor::new(&data[..]);
/// assert!(c.read_bit().unwrap());
/// assert_eq!(c.read_uint(3).unwrap(), 0b011);
/// assert_eq!(c.read_uint(6).unwrap(), 0b0011_11);
/// assert_eq!(c.position(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct BitCursor<'buf> {
    buf: &'buf [u8],
    pos: usize,
}

impl<'buf> BitCursor<'buf> {
    /// The widest integer `read_uint()` can produce.
    pub const MAX_WIDTH: u32 = 64;

    /// Create a cursor positioned at the first bit of `buf`.
    pub fn new(buf: &'buf [u8]) -> BitCursor<'buf> {
        BitCursor { buf, pos: 0 }
    }

    /// Create a cursor already positioned at the given absolute bit offset.
    pub fn at(buf: &'buf [u8], bit_offset: usize) -> Result<BitCursor<'buf>, DecodeError> {
        let mut c = BitCursor::new(buf);
        c.seek(bit_offset)?;
        Ok(c)
    }

    /// The current absolute bit offset from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the underlying buffer, in bits.
    #[inline]
    pub fn len_bits(&self) -> usize {
        self.buf.len() * 8
    }

    /// Number of bits between the current position and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len_bits() - self.pos
    }

    /// `true` if the current position is on a byte boundary.
    #[inline]
    pub fn is_byte_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    /// Borrow the whole underlying buffer.
    pub fn buffer(&self) -> &'buf [u8] {
        self.buf
    }

    fn check(&self, bits: usize) -> Result<(), DecodeError> {
        if bits > self.remaining() {
            Err(DecodeError::OutOfRange {
                position: self.pos,
                requested: bits,
                available: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Move to the given absolute bit offset.  Seeking to exactly the end of the buffer is
    /// allowed.
    pub fn seek(&mut self, bit_offset: usize) -> Result<(), DecodeError> {
        if bit_offset > self.len_bits() {
            return Err(DecodeError::OutOfRange {
                position: 0,
                requested: bit_offset,
                available: self.len_bits(),
            });
        }
        self.pos = bit_offset;
        Ok(())
    }

    /// Advance by `bits` without reading them.
    pub fn skip(&mut self, bits: usize) -> Result<(), DecodeError> {
        self.check(bits)?;
        self.pos += bits;
        Ok(())
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        self.check(1)?;
        let byte = self.buf[self.pos / 8];
        let bit = byte >> (7 - self.pos % 8) & 1;
        self.pos += 1;
        Ok(bit != 0)
    }

    /// Read an unsigned, big-endian integer of `width` bits, where `width` is between 1 and 64.
    /// The field may start at any bit and span any number of bytes.
    pub fn read_uint(&mut self, width: u32) -> Result<u64, DecodeError> {
        if width == 0 || width > Self::MAX_WIDTH {
            return Err(DecodeError::InvalidWidth { width });
        }
        let width = width as usize;
        self.check(width)?;
        let start = self.pos / 8;
        let end = (self.pos + width + 7) / 8;
        // at most 9 bytes are touched, so the window always fits
        let window = self.buf[start..end]
            .iter()
            .fold(0u128, |acc, b| acc << 8 | u128::from(*b));
        let shift = (end - start) * 8 - self.pos % 8 - width;
        let mask = u128::from(u64::MAX) >> (64 - width);
        self.pos += width;
        Ok(((window >> shift) & mask) as u64)
    }

    /// Read an 8-bit value.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_uint(8).map(|v| v as u8)
    }

    /// Read a 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_uint(16).map(|v| v as u16)
    }

    /// Borrow the next `len` bytes.  The cursor must be byte-aligned.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'buf [u8], DecodeError> {
        if !self.is_byte_aligned() {
            return Err(DecodeError::Unaligned { position: self.pos });
        }
        self.check(len.saturating_mul(8))?;
        let start = self.pos / 8;
        self.pos += len * 8;
        Ok(&self.buf[start..start + len])
    }
}
