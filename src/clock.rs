//! Clock values carried in transport stream and PES headers.
//!
//! Two kinds of clock appear in the syntax:
//!
//!  * a [`ClockRef`](struct.ClockRef.html), used for the _PCR_ and _OPCR_ fields of an adaptation
//!    field, which counts at 27MHz
//!  * a [`Timestamp`](struct.Timestamp.html), used for _PTS_ and _DTS_ values (and for the
//!    _DTS_next_AU_ of a seamless splice), which counts at 90kHz
//!
//! Either can be rendered as an hours / minutes / seconds value using
//! [`ClockDuration`](struct.ClockDuration.html).

use crate::bits::BitCursor;
use crate::error::DecodeError;
use log::warn;
use std::fmt;
use std::time::Duration;

/// The tick rate of some clock, in Hz.  Never zero.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClockRate(u64);

impl ClockRate {
    /// The 90kHz rate of PTS, DTS and the `base` component of a PCR.
    pub const NINETY_KHZ: ClockRate = ClockRate(90_000);
    /// The 27MHz rate of a full PCR / OPCR value.
    pub const TWENTY_SEVEN_MHZ: ClockRate = ClockRate(27_000_000);

    /// Returns `None` if `hz` is zero.
    pub const fn new(hz: u64) -> Option<ClockRate> {
        if hz == 0 {
            None
        } else {
            Some(ClockRate(hz))
        }
    }

    /// ticks per second
    pub fn hz(self) -> u64 {
        self.0
    }
}

/// A _Clock Reference_ is used to represent the values of PCR and OPCR fields within the transport
/// stream data.
///
/// A _Clock Reference_ includes a 33-bit, 90kHz `base` component, together with another 9-bit,
/// high-resolution `extension` component counting 300ths of a base tick.
///
/// Together these can be viewed as a 42-bit, 27MHz quantity (e.g. `let full_value = pcr.value()`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClockRef {
    base: u64,
    extension: u16,
}

impl ClockRef {
    /// Size of the encoded field, including the 6 reserved bits between base and extension.
    pub const SIZE_BITS: usize = 48;
    /// Number of extension ticks in one base tick.
    pub const EXTENSION_RATIO: u16 = 300;
    const BASE_BITS: u32 = 33;
    const RESERVED_BITS: usize = 6;
    const EXTENSION_BITS: u32 = 9;

    /// Returns `None` if `base` is greater than 2^33-1, or if `extension` is 300 or more.
    pub fn from_parts(base: u64, extension: u16) -> Option<ClockRef> {
        if base >> Self::BASE_BITS != 0 || extension >= Self::EXTENSION_RATIO {
            None
        } else {
            Some(ClockRef { base, extension })
        }
    }

    /// Read the 48-bit PCR syntax at the cursor's position.
    ///
    /// An `extension` of 300 or more is out of range for the 27MHz clock, but is still returned
    /// as encoded.
    pub fn read(c: &mut BitCursor<'_>) -> Result<ClockRef, DecodeError> {
        let start = c.position();
        let base = c.read_uint(Self::BASE_BITS)?;
        c.skip(Self::RESERVED_BITS)?;
        let extension = c.read_uint(Self::EXTENSION_BITS)? as u16;
        if extension >= Self::EXTENSION_RATIO {
            warn!(
                "clock reference extension {} at bit {} is not less than {}",
                extension,
                start,
                Self::EXTENSION_RATIO
            );
        }
        Ok(ClockRef { base, extension })
    }

    /// get the 33-bit, 90kHz 'base' component of the timestamp
    pub fn base(&self) -> u64 {
        self.base
    }

    /// get the 9-bit 'extension' component of the timestamp, measured in 300ths of the 90kHz base
    /// clockrate (i.e. 27MHz)
    pub fn extension(&self) -> u16 {
        self.extension
    }

    /// The combined value, `base * 300 + extension`, in 27MHz ticks.
    pub fn value(&self) -> u64 {
        self.base * u64::from(Self::EXTENSION_RATIO) + u64::from(self.extension)
    }

    /// The elapsed time this clock value represents.
    pub fn duration(&self) -> ClockDuration {
        ClockDuration::from_ticks(self.value(), ClockRate::TWENTY_SEVEN_MHZ)
    }
}

impl From<ClockRef> for u64 {
    fn from(pcr: ClockRef) -> u64 {
        pcr.value()
    }
}

impl fmt::Debug for ClockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PCR{{{:08x}:{:04x}}}", self.base, self.extension)
    }
}

/// A 33-bit Elementary Stream timestamp, used to represent PTS and DTS values which may appear in
/// an Elementary Stream header.
///
/// On the wire the 33 bits are split 3 / 15 / 15, with a `1` marker bit after each part, giving a
/// 36-bit field.  That field is normally preceded by a 4-bit prefix, making a 5-byte block.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    val: u64,
}

impl Timestamp {
    /// The largest representable timestamp value before the timestamp wraps back around to zero.
    pub const MAX: Timestamp = Timestamp { val: (1 << 33) - 1 };

    /// 90kHz timebase in which PTS and DTS values are measured.
    pub const TIMEBASE: u64 = 90_000;

    /// Width of the marker-interleaved field, excluding the 4-bit prefix.
    pub const FIELD_BITS: u32 = 36;

    /// Returns `None` if the given val is greater than 2^33-1
    pub fn from_u64(val: u64) -> Option<Timestamp> {
        if val > Self::MAX.val {
            None
        } else {
            Some(Timestamp { val })
        }
    }

    /// Recover the 33-bit value from the low 36 bits of `field` by dropping the three marker bits.
    /// Marker bit values are not checked.
    pub fn unpack(field: u64) -> Timestamp {
        Timestamp {
            val: (field >> 3) & (0x7 << 30) | (field >> 2) & (0x7fff << 15) | (field >> 1) & 0x7fff,
        }
    }

    /// The 36-bit wire form of this timestamp, with all three marker bits set.
    pub fn pack(self) -> u64 {
        (self.val >> 30 & 0x7) << 33
            | 1 << 32
            | (self.val >> 15 & 0x7fff) << 17
            | 1 << 16
            | (self.val & 0x7fff) << 1
            | 1
    }

    /// Read a 36-bit timestamp field at the cursor position (i.e. _after_ any prefix bits).
    ///
    /// A marker bit with value `0` is reported via `warn!()`, but does not prevent the value
    /// being decoded.
    pub fn read_field(c: &mut BitCursor<'_>) -> Result<Timestamp, DecodeError> {
        let start = c.position();
        let field = c.read_uint(Self::FIELD_BITS)?;
        for marker in [32, 16, 0] {
            if field >> marker & 1 == 0 {
                warn!(
                    "timestamp marker_bit at bit {} not set",
                    start + Self::FIELD_BITS as usize - 1 - marker
                );
            }
        }
        Ok(Timestamp::unpack(field))
    }

    /// Read a complete 5-byte PTS or DTS block: the 4-bit prefix, followed by the 36-bit field.
    /// A prefix other than `expected_prefix` is reported via `warn!()`.
    pub fn read(c: &mut BitCursor<'_>, expected_prefix: u8) -> Result<Timestamp, DecodeError> {
        let prefix = c.read_uint(4)? as u8;
        if prefix != expected_prefix {
            warn!(
                "timestamp prefix 0b{:04b} at bit {}, expected 0b{:04b}",
                prefix,
                c.position() - 4,
                expected_prefix
            );
        }
        Timestamp::read_field(c)
    }

    /// produces the timestamp's value (only the low 33 bits are used)
    pub fn value(self) -> u64 {
        self.val
    }

    /// The elapsed time this timestamp represents.
    pub fn duration(self) -> ClockDuration {
        ClockDuration::from_ticks(self.val, ClockRate::NINETY_KHZ)
    }
}

/// A clock value split into hours, minutes, seconds and microseconds.
///
/// Works for any [`ClockRate`](struct.ClockRate.html), so PCR and PTS values share the same
/// formatting:
///
/// ```rust
/// # use mpeg2ts_header::clock::{ClockDuration, ClockRate};
/// let d = ClockDuration::from_ticks(90_000 * 3661 + 45_000, ClockRate::NINETY_KHZ);
/// assert_eq!(d.to_string(), "01h01m01s500000µs");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClockDuration {
    /// whole hours
    pub hours: u64,
    /// minutes, `0..60`
    pub minutes: u8,
    /// seconds, `0..60`
    pub seconds: u8,
    /// sub-second part, `0..1_000_000`
    pub micros: u32,
}

impl ClockDuration {
    /// Split `ticks` of a clock running at `rate` using integer division.  Any sub-microsecond
    /// remainder is truncated.
    pub fn from_ticks(ticks: u64, rate: ClockRate) -> ClockDuration {
        let hz = rate.hz();
        let secs = ticks / hz;
        let micros = u128::from(ticks % hz) * 1_000_000 / u128::from(hz);
        ClockDuration {
            hours: secs / 3600,
            minutes: (secs / 60 % 60) as u8,
            seconds: (secs % 60) as u8,
            micros: micros as u32,
        }
    }

    /// Total whole seconds.
    pub fn as_secs(&self) -> u64 {
        self.hours * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl From<ClockDuration> for Duration {
    fn from(d: ClockDuration) -> Duration {
        Duration::new(d.as_secs(), d.micros * 1_000)
    }
}

impl fmt::Display for ClockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}h{:02}m{:02}s{:06}µs",
            self.hours, self.minutes, self.seconds, self.micros
        )
    }
}
