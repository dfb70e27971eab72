//! The single error type returned by every decoder in this crate.

use thiserror::Error;

/// Some problem encountered while decoding transport stream or PES header syntax.
///
/// None of these are fatal; each is returned from the specific accessor which hit the problem.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DecodeError {
    /// The first byte of a transport stream packet was not `0x47`.
    #[error("invalid sync byte 0x{found:02x}, expected 0x47")]
    InvalidSync {
        /// the byte actually found at the start of the packet
        found: u8,
    },
    /// The buffer given for a transport stream packet was not exactly 188 bytes long.
    #[error("transport stream packet must be {expected} bytes, got {actual}")]
    InvalidPacketSize {
        /// always `Packet::SIZE`
        expected: usize,
        /// the length of the buffer supplied
        actual: usize,
    },
    /// The PES _packet_start_code_prefix_ did not have the value `0x000001`.
    #[error("invalid packet_start_code_prefix 0x{actual:06x}, expected 0x{expected:06x}")]
    InvalidStartCode {
        /// always `0x000001`
        expected: u32,
        /// the 24-bit value actually found
        actual: u32,
    },
    /// An optional field was requested, but the flag which signals its presence is not set.
    #[error("{field} not present")]
    FieldNotPresent {
        /// name of the syntax element, as written in _ISO/IEC 13818-1_
        field: &'static str,
    },
    /// A read would run past the end of the available data.
    #[error("{requested} bits requested at bit {position}, only {available} available")]
    OutOfRange {
        /// bit offset at which the read was attempted
        position: usize,
        /// number of bits the read needed
        requested: usize,
        /// number of bits left after `position`
        available: usize,
    },
    /// An integer read was requested with a width outside `1..=64`.
    #[error("invalid read width of {width} bits")]
    InvalidWidth {
        /// the requested width
        width: u32,
    },
    /// A byte-slice read was attempted while the cursor was not on a byte boundary.
    #[error("byte read at unaligned bit position {position}")]
    Unaligned {
        /// the cursor's bit offset
        position: usize,
    },
}
