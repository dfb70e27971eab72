//! A [`Packet`](./struct.Packet.html) struct and associated infrastructure to read an MPEG Transport Stream packet

use crate::adaptation_field::AdaptationField;
use crate::bits::BitCursor;
use crate::error::DecodeError;
use log::warn;
use std::fmt;

/// the different values indicating whether a `Packet`'s `adaptation_field()` and `payload()`
/// methods will return `Some` or `None`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AdaptationControl {
    /// This value is used if the transport stream packet `adaptation_control` field uses the value
    /// `0b00`, which is not defined by the spec.
    Reserved,
    /// indicates that this packet contains a payload, but not an adaptation field
    PayloadOnly,
    /// indicates that this packet contains an adaptation field, but not a payload
    AdaptationFieldOnly,
    /// indicates that this packet contains both an adaptation field and a payload
    AdaptationFieldAndPayload,
}

impl AdaptationControl {
    /// Only the low 2 bits of `val` are used.
    #[inline(always)]
    pub fn from_bits(val: u8) -> AdaptationControl {
        match val & 0b11 {
            0 => AdaptationControl::Reserved,
            1 => AdaptationControl::PayloadOnly,
            2 => AdaptationControl::AdaptationFieldOnly,
            _ => AdaptationControl::AdaptationFieldAndPayload,
        }
    }

    /// True if this AdaptationControl variant indicates that the packet will have a payload
    #[inline(always)]
    pub fn has_payload(self) -> bool {
        match self {
            AdaptationControl::Reserved | AdaptationControl::AdaptationFieldOnly => false,
            AdaptationControl::PayloadOnly | AdaptationControl::AdaptationFieldAndPayload => true,
        }
    }

    /// True if this AdaptationControl variant indicates that an _adaptation_field_length_ byte
    /// follows the fixed header
    #[inline(always)]
    pub fn has_adaptation_field(self) -> bool {
        match self {
            AdaptationControl::Reserved | AdaptationControl::PayloadOnly => false,
            AdaptationControl::AdaptationFieldOnly
            | AdaptationControl::AdaptationFieldAndPayload => true,
        }
    }
}

/// Indicates content scrambling in use, if any.
///
/// Actual content scrambling schemes, indicated through the `u8` value in the `Undefined` variant,
/// are undefined in the main TS spec (left to be described by other specifications).
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TransportScramblingControl {
    /// The stream is not scrambled.
    NotScrambled,
    /// The stream is scrambled using a scheme not defined in the TS spec.
    Undefined(u8),
}

impl TransportScramblingControl {
    /// Only the low 2 bits of `val` are used.
    pub fn from_bits(val: u8) -> TransportScramblingControl {
        match val & 0b11 {
            0 => TransportScramblingControl::NotScrambled,
            v => TransportScramblingControl::Undefined(v),
        }
    }
}

/// A counter value used within a transport stream to detect discontinuities in a sequence of packets.
///
/// See [`Packet.continuity_counter()`](struct.Packet.html#method.continuity_counter)
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ContinuityCounter {
    val: u8,
}

impl ContinuityCounter {
    /// Returns `None` if the given value is greater than 15.
    #[inline]
    pub fn new(count: u8) -> Option<ContinuityCounter> {
        if count < 0b10000 {
            Some(ContinuityCounter { val: count })
        } else {
            None
        }
    }

    /// Returns this counter's value, which will be between 0 and 15 inclusive.
    #[inline]
    pub fn count(self) -> u8 {
        self.val
    }
}

impl TryFrom<u8> for ContinuityCounter {
    type Error = ();

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        ContinuityCounter::new(count).ok_or(())
    }
}

/// A Packet Identifier value, between `0x0000` and `0x1fff`.
///
/// PID values identify a particular sub-stream within the overall Transport Stream.
///
/// As returned by the [`Packet::pid`](struct.Packet.html#method.pid) method for example.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pid(u16);
impl Pid {
    /// The largest possible PID value, `0x1fff`.
    pub const MAX_VALUE: u16 = 0x1fff;
}
impl TryFrom<u16> for Pid {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= Pid::MAX_VALUE {
            Ok(Pid(value))
        } else {
            Err(())
        }
    }
}
impl From<Pid> for u16 {
    #[inline]
    fn from(pid: Pid) -> Self {
        pid.0
    }
}
impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Pid({:04x})", self.0)
    }
}

/// The fixed 4-byte header at the start of every transport stream packet, decoded.
///
/// ```text
/// sync_byte(8) | TEI(1) | PUSI(1) | transport_priority(1) | PID(13) | TSC(2) | AFC(2) | CC(4)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// *May* have been set if some previous processing of this TS data detected at least
    /// 1 uncorrectable bit error in this TS packet.
    pub transport_error_indicator: bool,
    /// Set if this packet's payload contains the start of a PES packet or PSI section.
    pub payload_unit_start_indicator: bool,
    /// When set, this packet has higher priority than other packets of the the same PID.
    pub transport_priority: bool,
    /// The sub-stream to which the packet belongs.
    pub pid: Pid,
    /// Value of the _transport_scrambling_control_ field.
    pub transport_scrambling_control: TransportScramblingControl,
    /// Whether an adaptation field and / or payload follow the header.
    pub adaptation_control: AdaptationControl,
    /// The 4-bit _continuity_counter_.
    pub continuity_counter: ContinuityCounter,
}

impl PacketHeader {
    /// Size of the fixed header, in bytes.
    pub const SIZE: usize = 4;

    /// Decode the header from the first 4 bytes of `buf`, checking the sync byte.
    pub fn decode(buf: &[u8]) -> Result<PacketHeader, DecodeError> {
        let mut c = BitCursor::new(buf);
        let sync = c.read_u8()?;
        if !Packet::is_sync_byte(sync) {
            return Err(DecodeError::InvalidSync { found: sync });
        }
        Ok(PacketHeader {
            transport_error_indicator: c.read_bit()?,
            payload_unit_start_indicator: c.read_bit()?,
            transport_priority: c.read_bit()?,
            pid: Pid(c.read_uint(13)? as u16),
            transport_scrambling_control: TransportScramblingControl::from_bits(
                c.read_uint(2)? as u8,
            ),
            adaptation_control: AdaptationControl::from_bits(c.read_uint(2)? as u8),
            continuity_counter: ContinuityCounter {
                val: c.read_uint(4)? as u8,
            },
        })
    }
}

/// A transport stream `Packet` is a wrapper around a byte slice which allows the bytes to be
/// interpreted as a packet structure per _ISO/IEC 13818-1, Section 2.4.3.3_.
///
/// The fixed header is decoded on construction; the adaptation field is decoded on request.
pub struct Packet<'buf> {
    buf: &'buf [u8],
    header: PacketHeader,
}

const PACKET_SIZE: usize = 188;
// when AF present, a 1-byte 'length' field precedes the content,
const ADAPTATION_FIELD_OFFSET: usize = PacketHeader::SIZE + 1;
const MAX_ADAPTATION_FIELD_LENGTH: usize = PACKET_SIZE - ADAPTATION_FIELD_OFFSET;

impl<'buf> Packet<'buf> {
    /// The value `0x47`, which must appear in the first byte of every transport stream packet.
    pub const SYNC_BYTE: u8 = 0x47;

    /// The fixed 188 byte size of a transport stream packet.
    pub const SIZE: usize = PACKET_SIZE;

    /// returns `true` if the given value is a valid synchronisation byte, the value `Packet::SYNC_BYTE` (0x47), which
    /// must appear at the start of every transport stream packet.
    #[inline(always)]
    pub fn is_sync_byte(b: u8) -> bool {
        b == Self::SYNC_BYTE
    }

    /// Wrap the given buffer, which must be exactly `Packet::SIZE` (188) bytes long and start
    /// with `Packet::SYNC_BYTE` (0x47).
    pub fn try_new(buf: &'buf [u8]) -> Result<Packet<'buf>, DecodeError> {
        if buf.len() != Self::SIZE {
            return Err(DecodeError::InvalidPacketSize {
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }
        let header = PacketHeader::decode(buf)?;
        Ok(Packet { buf, header })
    }

    /// The decoded fixed header.
    pub fn header(&self) -> &PacketHeader {
        &self.header
    }

    /// *May* have been set if some previous processing of this TS data detected at least
    /// 1 uncorrectable bit error in this TS packet.
    #[inline]
    pub fn transport_error_indicator(&self) -> bool {
        self.header.transport_error_indicator
    }

    /// a structure larger than a single packet payload needs to be split across multiple packets,
    /// `payload_unit_start()` indicates if this packet payload contains the start of the
    /// structure.  If `false`, this packets payload is a continuation of a structure which began
    /// in an earlier packet within the transport stream.
    #[inline]
    pub fn payload_unit_start_indicator(&self) -> bool {
        self.header.payload_unit_start_indicator
    }

    /// When `1`, this TS packet has higher priority than other packets of the the same PID having
    /// PID `0`.
    pub fn transport_priority(&self) -> bool {
        self.header.transport_priority
    }

    /// The sub-stream to which a particular packet belongs is indicated by this Packet Identifier
    /// value.
    #[inline]
    pub fn pid(&self) -> Pid {
        self.header.pid
    }

    /// Value of the _transport_scrambling_control_ field.
    pub fn transport_scrambling_control(&self) -> TransportScramblingControl {
        self.header.transport_scrambling_control
    }

    /// The returned enum value indicates if `adaptation_field()`, `payload()` or both will return
    /// something.
    #[inline]
    pub fn adaptation_control(&self) -> AdaptationControl {
        self.header.adaptation_control
    }

    /// Each packet with a given `pid()` value within a transport stream should have a continuity
    /// counter value which increases by 1 from the last counter value seen.
    #[inline]
    pub fn continuity_counter(&self) -> ContinuityCounter {
        self.header.continuity_counter
    }

    /// The _adaptation_field_length_ byte, if `adaptation_control()` says there is one.
    pub fn adaptation_field_length(&self) -> Option<usize> {
        if self.adaptation_control().has_adaptation_field() {
            Some(usize::from(self.buf[PacketHeader::SIZE]))
        } else {
            None
        }
    }

    /// An `AdaptationField` contains additional packet headers that may be present in the packet.
    ///
    /// `Ok(None)` if `adaptation_control()` indicates no adaptation field, or if the
    /// _adaptation_field_length_ is zero.  An error is returned if the length runs past the end of
    /// the packet, or if the fields signalled within the adaptation field do not fit in it.
    pub fn adaptation_field(&self) -> Result<Option<AdaptationField<'buf>>, DecodeError> {
        let len = match self.adaptation_field_length() {
            None | Some(0) => return Ok(None),
            Some(len) => len,
        };
        if self.adaptation_control() == AdaptationControl::AdaptationFieldOnly
            && len != MAX_ADAPTATION_FIELD_LENGTH
        {
            warn!(
                "{:?}: invalid adaptation_field_length for AdaptationFieldOnly: {}",
                self.pid(),
                len
            );
        }
        let mut c = BitCursor::at(self.buf, ADAPTATION_FIELD_OFFSET * 8)?;
        AdaptationField::parse(c.read_bytes(len)?).map(Some)
    }

    /// The data contained within the packet, not including the packet headers.
    /// Not all packets have a payload, and `None` is returned if `adaptation_control()` indicates
    /// that no payload is present.  None may also be returned if the packet is malformed.
    /// If `Some` payload is returned, it is guaranteed not to be an empty slice.
    #[inline(always)]
    pub fn payload(&self) -> Option<&'buf [u8]> {
        if !self.adaptation_control().has_payload() {
            return None;
        }
        let offset = match self.adaptation_field_length() {
            Some(len) => ADAPTATION_FIELD_OFFSET + len,
            None => PacketHeader::SIZE,
        };
        if offset == self.buf.len() {
            warn!("{:?}: no payload data present", self.pid());
            None
        } else if offset > self.buf.len() {
            warn!(
                "{:?}: adaptation_field_length {} too large",
                self.pid(),
                offset - ADAPTATION_FIELD_OFFSET
            );
            None
        } else {
            Some(&self.buf[offset..])
        }
    }

    /// borrow a reference to the underlying buffer of this packet
    pub fn buffer(&self) -> &'buf [u8] {
        self.buf
    }

    /// A copy of this packet with the _continuity_counter_ field replaced.
    pub fn with_continuity_counter(&self, cc: ContinuityCounter) -> [u8; PACKET_SIZE] {
        let mut out = [0u8; PACKET_SIZE];
        out.copy_from_slice(self.buf);
        set_continuity_counter(&mut out, cc);
        out
    }
}

impl<'buf> fmt::Debug for Packet<'buf> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Packet");
        d.field("header", &self.header);
        if let Ok(Some(af)) = self.adaptation_field() {
            d.field("adaptation_field", &af);
        }
        d.field("payload_len", &self.payload().map(<[u8]>::len));
        d.finish()
    }
}

fn set_continuity_counter(buf: &mut [u8], cc: ContinuityCounter) {
    buf[3] = buf[3] & 0b1111_0000 | cc.count();
}

/// Overwrite the _continuity_counter_ of the packet held in `buf`, leaving every other bit
/// unchanged.
///
/// `buf` is checked in the same way as by `Packet::try_new()`.  Taking `&mut` means no `Packet`
/// borrowing the same buffer can be alive during the rewrite.
pub fn rewrite_continuity_counter(buf: &mut [u8], cc: ContinuityCounter) -> Result<(), DecodeError> {
    Packet::try_new(buf)?;
    set_continuity_counter(buf, cc);
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::adaptation_field::SeamlessSplice;
    use crate::clock::Timestamp;
    use crate::error::DecodeError;
    use crate::packet::*;
    use assert_matches::assert_matches;
    use bitstream_io::{BigEndian, BitWrite, BitWriter};
    use std::thread;

    fn packet_with(f: impl FnOnce(&mut [u8])) -> [u8; Packet::SIZE] {
        let mut buf = [0xffu8; Packet::SIZE];
        buf[0] = Packet::SYNC_BYTE;
        f(&mut buf[..]);
        buf
    }

    #[test]
    fn pid() {
        assert!(Pid::try_from(0x2000).is_err());
        assert_eq!(u16::from(Pid::try_from(0x1fff).unwrap()), 0x1fff);
    }

    #[test]
    fn continuity_counter_bounds() {
        assert_eq!(ContinuityCounter::new(15).map(ContinuityCounter::count), Some(15));
        assert!(ContinuityCounter::new(16).is_none());
        assert!(ContinuityCounter::try_from(200).is_err());
    }

    #[test]
    fn zero_len() {
        let buf = [0u8; 0];
        assert_eq!(
            Packet::try_new(&buf[..]).err(),
            Some(DecodeError::InvalidPacketSize {
                expected: 188,
                actual: 0
            })
        );
    }

    #[test]
    fn sync_byte() {
        for fill in [0x00u8, 0x55, 0xaa, 0xff] {
            let mut buf = [fill; Packet::SIZE];
            buf[0] = Packet::SYNC_BYTE;
            assert!(Packet::try_new(&buf[..]).is_ok());
        }
        let mut buf = [0u8; Packet::SIZE];
        for first in [0x00u8, 0x46, 0x48, 0xff] {
            buf[0] = first;
            assert_eq!(
                Packet::try_new(&buf[..]).err(),
                Some(DecodeError::InvalidSync { found: first })
            );
        }
    }

    #[test]
    fn header_offsets() {
        let mut w = BitWriter::endian(Vec::new(), BigEndian);
        w.write(8, 0x47u8).unwrap();
        w.write_bit(true).unwrap(); // TEI
        w.write_bit(false).unwrap(); // PUSI
        w.write_bit(true).unwrap(); // transport_priority
        w.write(13, 0x0abcu16).unwrap();
        w.write(2, 0b10u8).unwrap(); // TSC
        w.write(2, 0b01u8).unwrap(); // AFC
        w.write(4, 9u8).unwrap(); // CC
        let mut buf = w.into_writer();
        buf.resize(Packet::SIZE, 0);
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert!(pk.transport_error_indicator());
        assert!(!pk.payload_unit_start_indicator());
        assert!(pk.transport_priority());
        assert_eq!(u16::from(pk.pid()), 0x0abc);
        assert_eq!(
            pk.transport_scrambling_control(),
            TransportScramblingControl::Undefined(2)
        );
        assert_eq!(pk.adaptation_control(), AdaptationControl::PayloadOnly);
        assert_eq!(pk.continuity_counter().count(), 9);
        assert_eq!(pk.payload().map(<[u8]>::len), Some(184));
    }

    #[test]
    fn test_xmas_tree() {
        let buf = packet_with(|buf| {
            buf[4] = 28; // adaptation_field_length
            buf[19] = 1; // transport_private_data_length
            buf[21] = 11; // adaptation_field_extension_length
        });
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert_eq!(u16::from(pk.pid()), 0b1111111111111u16);
        assert!(pk.transport_error_indicator());
        assert!(pk.payload_unit_start_indicator());
        assert!(pk.transport_priority());
        assert_eq!(
            pk.transport_scrambling_control(),
            TransportScramblingControl::Undefined(3)
        );
        assert_eq!(
            pk.adaptation_control(),
            AdaptationControl::AdaptationFieldAndPayload
        );
        assert_eq!(pk.continuity_counter().count(), 0b1111);
        let ad = pk.adaptation_field().unwrap().unwrap();
        assert!(ad.discontinuity_indicator());
        assert!(ad.random_access_indicator());
        assert!(ad.elementary_stream_priority_indicator());
        let pcr = ad.pcr().unwrap();
        assert_eq!(pcr.base(), 0b1_1111_1111_1111_1111_1111_1111_1111_1111);
        assert_eq!(pcr.extension(), 0b1_1111_1111);
        assert_eq!(ad.opcr(), Ok(pcr));
        assert_eq!(ad.splice_countdown(), Ok(-1));
        let expected_data = [0xff];
        assert_eq!(ad.transport_private_data(), Ok(&expected_data[..]));
        let ext = ad.adaptation_field_extension().unwrap();
        assert_eq!(ext.ltw().unwrap().valid_offset(), Some(0b0111_1111_1111_1111));
        assert_eq!(ext.piecewise_rate(), Ok(0b0011_1111_1111_1111_1111_1111));
        assert_eq!(
            ext.seamless_splice(),
            Ok(SeamlessSplice {
                splice_type: 0b1111,
                dts_next_au: Timestamp::MAX,
            })
        );
        assert_eq!(pk.payload().map(<[u8]>::len), Some(188 - 5 - 28));
        assert!(!format!("{:?}", pk).is_empty())
    }

    #[test]
    fn empty_adaptation_field() {
        let buf = packet_with(|buf| buf[4] = 0);
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert_eq!(
            pk.adaptation_control(),
            AdaptationControl::AdaptationFieldAndPayload
        );
        assert_eq!(pk.adaptation_field(), Ok(None));
        assert_eq!(pk.payload().map(<[u8]>::len), Some(183));

        let buf = packet_with(|buf| {
            buf[3] = 0b0010_0000;
            buf[4] = 0;
        });
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert_eq!(pk.adaptation_control(), AdaptationControl::AdaptationFieldOnly);
        assert_eq!(pk.adaptation_field(), Ok(None));
    }

    #[test]
    fn no_adaptation_field_for_reserved_or_payload_only() {
        for afc in [0b00u8, 0b01] {
            let buf = packet_with(|buf| buf[3] = afc << 4);
            let pk = Packet::try_new(&buf[..]).unwrap();
            assert_eq!(pk.adaptation_field_length(), None);
            assert_eq!(pk.adaptation_field(), Ok(None));
        }
        let buf = packet_with(|buf| buf[3] = 0);
        assert_eq!(Packet::try_new(&buf[..]).unwrap().payload(), None);
    }

    #[test]
    fn adaptation_field_only() {
        let _ = env_logger::builder().is_test(true).try_init();
        let buf = packet_with(|buf| {
            buf[3] = 0b0010_0000;
            buf[4] = 183;
            buf[5] = 0b0001_0000; // PCR_flag
            buf[6..12].copy_from_slice(&[0, 0, 0, 0, 0x7e, 0x01]);
        });
        let pk = Packet::try_new(&buf[..]).unwrap();
        let af = pk.adaptation_field().unwrap().unwrap();
        assert_eq!(af.length(), 183);
        assert_eq!(af.pcr().unwrap().value(), 1);
        assert_eq!(af.stuffing().len(), 183 - 7);
        assert_eq!(pk.payload(), None);

        // short length is reported, but decoded anyway
        let buf = packet_with(|buf| {
            buf[3] = 0b0010_0000;
            buf[4] = 1;
            buf[5] = 0;
        });
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert!(pk.adaptation_field().unwrap().is_some());
    }

    #[test]
    fn adaptation_field_too_long() {
        let _ = env_logger::builder().is_test(true).try_init();
        let buf = packet_with(|buf| buf[4] = 184);
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert_matches!(pk.adaptation_field(), Err(DecodeError::OutOfRange { .. }));
        assert_eq!(pk.payload(), None);

        let buf = packet_with(|buf| buf[4] = 183);
        let pk = Packet::try_new(&buf[..]).unwrap();
        assert_eq!(pk.payload(), None);
    }

    #[test]
    fn pcr_flag_clear() {
        let buf = packet_with(|buf| {
            buf[4] = 7;
            buf[5] = 0b1110_1000; // OPCR_flag only
        });
        let pk = Packet::try_new(&buf[..]).unwrap();
        let af = pk.adaptation_field().unwrap().unwrap();
        assert_eq!(af.pcr(), Err(DecodeError::FieldNotPresent { field: "PCR" }));
        assert!(af.opcr().is_ok());
    }

    #[test]
    fn continuity_counter_transform() {
        let buf = packet_with(|buf| buf[3] = 0b1101_0111);
        let pk = Packet::try_new(&buf[..]).unwrap();
        let out = pk.with_continuity_counter(ContinuityCounter::new(2).unwrap());
        let rewritten = Packet::try_new(&out[..]).unwrap();
        assert_eq!(rewritten.continuity_counter().count(), 2);
        assert_eq!(out[3], 0b1101_0010);
        assert_eq!(&out[..3], &buf[..3]);
        assert_eq!(&out[4..], &buf[4..]);
        // the source is untouched
        assert_eq!(pk.continuity_counter().count(), 7);
    }

    #[test]
    fn continuity_counter_in_place() {
        let mut buf = packet_with(|buf| buf[3] = 0b0001_0000);
        rewrite_continuity_counter(&mut buf[..], ContinuityCounter::new(15).unwrap()).unwrap();
        assert_eq!(Packet::try_new(&buf[..]).unwrap().continuity_counter().count(), 15);

        let mut bad = [0u8; Packet::SIZE];
        assert_eq!(
            rewrite_continuity_counter(&mut bad[..], ContinuityCounter::new(1).unwrap()),
            Err(DecodeError::InvalidSync { found: 0 })
        );
        assert_eq!(bad[3], 0);
    }

    fn summarise(buf: &[u8]) -> (u16, u8, Option<u64>, Option<usize>) {
        let pk = Packet::try_new(buf).unwrap();
        let pcr = pk
            .adaptation_field()
            .unwrap()
            .and_then(|af| af.pcr().ok())
            .map(|pcr| pcr.value());
        (
            u16::from(pk.pid()),
            pk.continuity_counter().count(),
            pcr,
            pk.payload().map(<[u8]>::len),
        )
    }

    #[test]
    fn concurrent_decode_matches_sequential() {
        let packets: Vec<[u8; Packet::SIZE]> = (0..16u8)
            .map(|i| {
                packet_with(|buf| {
                    buf[1] = i & 0b1_1111;
                    buf[2] = i;
                    buf[3] = 0b0011_0000 | i & 0b1111;
                    buf[4] = 7;
                    buf[5] = 0b0001_0000;
                    buf[6..12].copy_from_slice(&[0, 0, 0, i, 0x7e, i]);
                })
            })
            .collect();
        let sequential: Vec<_> = packets.iter().map(|p| summarise(&p[..])).collect();
        let concurrent: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = packets
                .iter()
                .map(|p| s.spawn(move || summarise(&p[..])))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(sequential, concurrent);
    }
}
