//! Support for the header of a Packetised Elementary Stream packet, found at the start of a
//! transport stream packet payload when _payload_unit_start_indicator_ is set.
//!
//! Only the leading part of the header is decoded: the start code, _stream_id_,
//! _PES_packet_length_, and the PTS / DTS timestamps signalled by _PTS_DTS_flags_.
//!
//! ```text
//! byte 0..3   packet_start_code_prefix (0x000001)
//! byte 3      stream_id
//! byte 4..6   PES_packet_length
//! byte 6      '10' | scrambling(2) | priority | alignment | copyright | original
//! byte 7      PTS_DTS_flags(2) | ESCR | ES_rate | trick_mode | copy_info | CRC | extension
//! byte 8      PES_header_data_length
//! byte 9..14  PTS  ('0010' or '0011' prefix, then 36 marker-interleaved bits)
//! byte 14..19 DTS  ('0001' prefix, then 36 marker-interleaved bits)
//! ```

use crate::bits::BitCursor;
use crate::clock::Timestamp;
use crate::error::DecodeError;
use log::warn;
use std::fmt;

/// Indicates which of PTS and DTS follow the fixed part of the PES header.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PtsDtsFlags {
    /// `0b00`, no timestamps
    None,
    /// `0b01`, which the standard forbids; treated as no timestamps
    Forbidden,
    /// `0b10`, only a Presentation Time Stamp
    PtsOnly,
    /// `0b11`, both Presentation and Decode Time Stamps
    PtsAndDts,
}

impl PtsDtsFlags {
    /// Only the low 2 bits of `val` are used.
    pub fn from_bits(val: u8) -> PtsDtsFlags {
        match val & 0b11 {
            0b00 => PtsDtsFlags::None,
            0b01 => PtsDtsFlags::Forbidden,
            0b10 => PtsDtsFlags::PtsOnly,
            _ => PtsDtsFlags::PtsAndDts,
        }
    }

    /// `true` for `PtsOnly` and `PtsAndDts`
    pub fn has_pts(self) -> bool {
        matches!(self, PtsDtsFlags::PtsOnly | PtsDtsFlags::PtsAndDts)
    }

    /// `true` only for `PtsAndDts`
    pub fn has_dts(self) -> bool {
        self == PtsDtsFlags::PtsAndDts
    }
}

/// Returns `true` if `buf` starts with the PES _packet_start_code_prefix_.
pub fn is_pes(buf: &[u8]) -> bool {
    PesHeader::from_bytes(buf).is_ok()
}

/// Access to the fields at the start of a PES packet.
///
/// Only the 3-byte start code is checked on construction; each accessor fails with
/// `DecodeError::OutOfRange` if the buffer is too short to hold the field it reads.
pub struct PesHeader<'buf> {
    buf: &'buf [u8],
}

impl<'buf> PesHeader<'buf> {
    /// The value of the 24-bit _packet_start_code_prefix_.
    pub const START_CODE_PREFIX: u32 = 0x00_0001;

    const STREAM_ID_OFFSET: usize = 24;
    const PES_PACKET_LENGTH_OFFSET: usize = 32;
    const PTS_DTS_FLAGS_OFFSET: usize = 56;
    const HEADER_DATA_LENGTH_OFFSET: usize = 64;
    // each timestamp is a 5-byte block; the 36-bit field starts 4 bits in
    const PTS_OFFSET: usize = 72;
    const DTS_OFFSET: usize = Self::PTS_OFFSET + Self::TIMESTAMP_BLOCK_BITS;
    const TIMESTAMP_BLOCK_BITS: usize = 40;

    const PTS_ONLY_PREFIX: u8 = 0b0010;
    const PTS_WITH_DTS_PREFIX: u8 = 0b0011;
    const DTS_PREFIX: u8 = 0b0001;

    /// Wraps the given slice in a PesHeader, which will then provide methods to parse the header
    /// fields within the slice.
    ///
    /// Fails with `DecodeError::InvalidStartCode` if the PES 'start code prefix' is missing.
    pub fn from_bytes(buf: &'buf [u8]) -> Result<PesHeader<'buf>, DecodeError> {
        let actual = BitCursor::new(buf).read_uint(24)? as u32;
        if actual != Self::START_CODE_PREFIX {
            return Err(DecodeError::InvalidStartCode {
                expected: Self::START_CODE_PREFIX,
                actual,
            });
        }
        Ok(PesHeader { buf })
    }

    fn cursor(&self, bit_offset: usize) -> Result<BitCursor<'buf>, DecodeError> {
        BitCursor::at(self.buf, bit_offset)
    }

    /// Indicator of the type of stream per _ISO/IEC 13818-1_, _Table 2-18_.
    pub fn stream_id(&self) -> Result<u8, DecodeError> {
        self.cursor(Self::STREAM_ID_OFFSET)?.read_u8()
    }

    /// The _PES_packet_length_ field.  Zero means 'unbounded', which is only allowed for video
    /// streams carried in transport stream packets.
    pub fn pes_packet_length(&self) -> Result<u16, DecodeError> {
        self.cursor(Self::PES_PACKET_LENGTH_OFFSET)?.read_u16()
    }

    /// The _PTS_DTS_flags_ field.
    pub fn pts_dts_flags(&self) -> Result<PtsDtsFlags, DecodeError> {
        let flags =
            PtsDtsFlags::from_bits(self.cursor(Self::PTS_DTS_FLAGS_OFFSET)?.read_uint(2)? as u8);
        if flags == PtsDtsFlags::Forbidden {
            warn!("PTS_DTS_flags has forbidden value 0b01, treating as no timestamps");
        }
        Ok(flags)
    }

    /// The _PES_header_data_length_ field: the number of optional header bytes following it.
    pub fn header_data_length(&self) -> Result<u8, DecodeError> {
        self.cursor(Self::HEADER_DATA_LENGTH_OFFSET)?.read_u8()
    }

    fn check_header_data_length(&self, needed_bits: usize) -> Result<(), DecodeError> {
        let len = usize::from(self.header_data_length()?);
        let needed = (needed_bits - Self::HEADER_DATA_LENGTH_OFFSET - 8) / 8;
        if len < needed {
            warn!(
                "PES_header_data_length {} too small to hold the {} bytes of signalled timestamps",
                len, needed
            );
        }
        Ok(())
    }

    /// The Presentation Time Stamp, or `DecodeError::FieldNotPresent` if _PTS_DTS_flags_ is
    /// less than `0b10`.
    pub fn pts(&self) -> Result<Timestamp, DecodeError> {
        let flags = self.pts_dts_flags()?;
        let prefix = match flags {
            PtsDtsFlags::PtsOnly => Self::PTS_ONLY_PREFIX,
            PtsDtsFlags::PtsAndDts => Self::PTS_WITH_DTS_PREFIX,
            PtsDtsFlags::None | PtsDtsFlags::Forbidden => {
                return Err(DecodeError::FieldNotPresent { field: "PTS" })
            }
        };
        self.check_header_data_length(Self::DTS_OFFSET)?;
        Timestamp::read(&mut self.cursor(Self::PTS_OFFSET)?, prefix)
    }

    /// The Decode Time Stamp, or `DecodeError::FieldNotPresent` unless _PTS_DTS_flags_ is `0b11`.
    pub fn dts(&self) -> Result<Timestamp, DecodeError> {
        if !self.pts_dts_flags()?.has_dts() {
            return Err(DecodeError::FieldNotPresent { field: "DTS" });
        }
        self.check_header_data_length(Self::DTS_OFFSET + Self::TIMESTAMP_BLOCK_BITS)?;
        Timestamp::read(&mut self.cursor(Self::DTS_OFFSET)?, Self::DTS_PREFIX)
    }

    /// borrow a reference to the underlying buffer
    pub fn buffer(&self) -> &'buf [u8] {
        self.buf
    }
}

impl<'buf> fmt::Debug for PesHeader<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut s = f.debug_struct("PesHeader");
        if let Ok(stream_id) = self.stream_id() {
            s.field("stream_id", &format_args!("0x{:02x}", stream_id));
        }
        if let Ok(len) = self.pes_packet_length() {
            s.field("pes_packet_length", &len);
        }
        if let Ok(pts) = self.pts() {
            s.field("pts", &pts);
        }
        if let Ok(dts) = self.dts() {
            s.field("dts", &dts);
        }
        s.finish()
    }
}
