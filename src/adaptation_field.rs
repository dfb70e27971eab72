//! The _adaptation_field_ which may follow the fixed 4-byte header of a transport stream packet.
//!
//! The field is a flags byte followed by a sequence of optional fields, each present only if the
//! corresponding flag is set, and always in the order
//!
//!  1. PCR
//!  2. OPCR
//!  3. splice_countdown
//!  4. transport_private_data
//!  5. adaptation_field_extension
//!
//! so that the offset of each field depends on the flags of all those before it.  Rather than
//! recompute those offsets on every access, [`AdaptationField::parse()`](struct.AdaptationField.html#method.parse)
//! walks the syntax once and keeps the decoded values.

use crate::bits::BitCursor;
use crate::clock::{ClockRef, Timestamp};
use crate::error::DecodeError;

/// The five presence flags of an adaptation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdaptationFieldFlags {
    /// _PCR_flag_
    pub pcr: bool,
    /// _OPCR_flag_
    pub opcr: bool,
    /// _splicing_point_flag_
    pub splicing_point: bool,
    /// _transport_private_data_flag_
    pub transport_private_data: bool,
    /// _adaptation_field_extension_flag_
    pub adaptation_field_extension: bool,
}

/// A collection of fields that may optionally appear within the header of a transport stream
/// `Packet`.
///
/// As returned by [`Packet::adaptation_field()`](../packet/struct.Packet.html#method.adaptation_field)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptationField<'buf> {
    length: u8,
    discontinuity_indicator: bool,
    random_access_indicator: bool,
    elementary_stream_priority_indicator: bool,
    pcr: Option<ClockRef>,
    opcr: Option<ClockRef>,
    splice_countdown: Option<i8>,
    transport_private_data: Option<&'buf [u8]>,
    extension: Option<AdaptationFieldExtension<'buf>>,
    stuffing: &'buf [u8],
}

impl<'buf> AdaptationField<'buf> {
    /// Decode the adaptation field held in `buf`, which must contain exactly the
    /// _adaptation_field_length_ bytes following the length byte itself.
    ///
    /// Fails with `DecodeError::OutOfRange` if any field signalled by the flags does not fit.
    pub fn parse(buf: &'buf [u8]) -> Result<AdaptationField<'buf>, DecodeError> {
        let mut c = BitCursor::new(buf);
        let discontinuity_indicator = c.read_bit()?;
        let random_access_indicator = c.read_bit()?;
        let elementary_stream_priority_indicator = c.read_bit()?;
        let pcr_flag = c.read_bit()?;
        let opcr_flag = c.read_bit()?;
        let splicing_point_flag = c.read_bit()?;
        let transport_private_data_flag = c.read_bit()?;
        let adaptation_field_extension_flag = c.read_bit()?;

        let pcr = if pcr_flag {
            Some(ClockRef::read(&mut c)?)
        } else {
            None
        };
        let opcr = if opcr_flag {
            Some(ClockRef::read(&mut c)?)
        } else {
            None
        };
        let splice_countdown = if splicing_point_flag {
            Some(c.read_u8()? as i8)
        } else {
            None
        };
        let transport_private_data = if transport_private_data_flag {
            let len = c.read_u8()?;
            Some(c.read_bytes(usize::from(len))?)
        } else {
            None
        };
        let extension = if adaptation_field_extension_flag {
            Some(AdaptationFieldExtension::read(&mut c)?)
        } else {
            None
        };
        let stuffing = c.read_bytes(c.remaining() / 8)?;

        Ok(AdaptationField {
            length: buf.len() as u8,
            discontinuity_indicator,
            random_access_indicator,
            elementary_stream_priority_indicator,
            pcr,
            opcr,
            splice_countdown,
            transport_private_data,
            extension,
            stuffing,
        })
    }

    /// The _adaptation_field_length_, i.e. the number of bytes following the length byte.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Get the value of the _discontinuity_indicator_ field which might have been written into
    /// the transport stream by some 'upstream' processor on discovering that there was a break
    /// in the data.
    pub fn discontinuity_indicator(&self) -> bool {
        self.discontinuity_indicator
    }
    /// Get the value of the _random_access_indicator_ field.
    pub fn random_access_indicator(&self) -> bool {
        self.random_access_indicator
    }
    /// Get the value of the _elementary_stream_priority_indicator_ field.
    pub fn elementary_stream_priority_indicator(&self) -> bool {
        self.elementary_stream_priority_indicator
    }

    /// The presence flags, as they appeared in the flags byte.
    pub fn flags(&self) -> AdaptationFieldFlags {
        AdaptationFieldFlags {
            pcr: self.pcr.is_some(),
            opcr: self.opcr.is_some(),
            splicing_point: self.splice_countdown.is_some(),
            transport_private_data: self.transport_private_data.is_some(),
            adaptation_field_extension: self.extension.is_some(),
        }
    }

    /// Get the _Program Clock Reference_ field,
    /// or `DecodeError::FieldNotPresent` if absent
    pub fn pcr(&self) -> Result<ClockRef, DecodeError> {
        self.pcr
            .ok_or(DecodeError::FieldNotPresent { field: "PCR" })
    }

    /// Returns the 'Original Program Clock Reference' value,
    /// or `DecodeError::FieldNotPresent` if absent
    pub fn opcr(&self) -> Result<ClockRef, DecodeError> {
        self.opcr
            .ok_or(DecodeError::FieldNotPresent { field: "OPCR" })
    }

    /// Get the value of the _splice_countdown_ field, or `DecodeError::FieldNotPresent` if
    /// absent.  Negative once the splicing point has passed.
    pub fn splice_countdown(&self) -> Result<i8, DecodeError> {
        self.splice_countdown.ok_or(DecodeError::FieldNotPresent {
            field: "splice_countdown",
        })
    }

    /// Borrow a slice of the underlying buffer containing private data,
    /// or `DecodeError::FieldNotPresent` if absent
    pub fn transport_private_data(&self) -> Result<&'buf [u8], DecodeError> {
        self.transport_private_data
            .ok_or(DecodeError::FieldNotPresent {
                field: "transport_private_data",
            })
    }

    /// Returns extended adaptation fields, or `DecodeError::FieldNotPresent` if absent
    pub fn adaptation_field_extension(
        &self,
    ) -> Result<&AdaptationFieldExtension<'buf>, DecodeError> {
        self.extension
            .as_ref()
            .ok_or(DecodeError::FieldNotPresent {
                field: "adaptation_field_extension",
            })
    }

    /// Any bytes remaining after the last optional field (normally `0xff` stuffing).
    pub fn stuffing(&self) -> &'buf [u8] {
        self.stuffing
    }
}

/// The _ltw_valid_flag_ and _ltw_offset_ fields of an adaptation field extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalTimeWindow {
    /// _ltw_valid_flag_
    pub valid: bool,
    /// 15-bit _ltw_offset_, in units of (300 / f_s) seconds
    pub offset: u16,
}

impl LegalTimeWindow {
    /// The offset, but only if the window is flagged as valid.
    pub fn valid_offset(&self) -> Option<u16> {
        if self.valid {
            Some(self.offset)
        } else {
            None
        }
    }
}

/// Value of the _seamless_splice_ field, as returned by
/// [`AdaptationFieldExtension::seamless_splice()`](struct.AdaptationFieldExtension.html#method.seamless_splice)
/// method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeamlessSplice {
    /// see _ISO/IEC 13818-1 : 2000_, Table 2-7 through Table 2-16
    pub splice_type: u8,
    /// The DTS of the access unit after the splice-point.
    pub dts_next_au: Timestamp,
}

/// One of the optional fields of an
/// [`AdaptationFieldExtension`](struct.AdaptationFieldExtension.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionField {
    /// _ltw_flag_ was set
    LegalTimeWindow(LegalTimeWindow),
    /// _piecewise_rate_flag_ was set; the 22-bit rate in units of 50 bytes/second
    PiecewiseRate(u32),
    /// _seamless_splice_flag_ was set
    SeamlessSplice(SeamlessSplice),
}

/// Optional extensions within an [`AdaptationField`](struct.AdaptationField.html).
///
/// As returned by
/// [`AdaptationField::adaptation_field_extension()`](struct.AdaptationField.html#method.adaptation_field_extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptationFieldExtension<'buf> {
    ltw: Option<LegalTimeWindow>,
    piecewise_rate: Option<u32>,
    seamless_splice: Option<SeamlessSplice>,
    reserved: &'buf [u8],
}

impl<'buf> AdaptationFieldExtension<'buf> {
    /// Read the length-prefixed extension at the cursor position, leaving the cursor after the
    /// last byte covered by _adaptation_field_extension_length_.
    ///
    /// A zero length yields an extension with no fields present.
    pub fn read(c: &mut BitCursor<'buf>) -> Result<AdaptationFieldExtension<'buf>, DecodeError> {
        let len = c.read_u8()?;
        AdaptationFieldExtension::parse(c.read_bytes(usize::from(len))?)
    }

    /// Decode extension fields from `buf`, which holds the bytes following the
    /// _adaptation_field_extension_length_ byte.
    pub fn parse(buf: &'buf [u8]) -> Result<AdaptationFieldExtension<'buf>, DecodeError> {
        if buf.is_empty() {
            return Ok(AdaptationFieldExtension {
                ltw: None,
                piecewise_rate: None,
                seamless_splice: None,
                reserved: buf,
            });
        }
        let mut c = BitCursor::new(buf);
        let ltw_flag = c.read_bit()?;
        let piecewise_rate_flag = c.read_bit()?;
        let seamless_splice_flag = c.read_bit()?;
        c.skip(5)?; // reserved

        let ltw = if ltw_flag {
            Some(LegalTimeWindow {
                valid: c.read_bit()?,
                offset: c.read_uint(15)? as u16,
            })
        } else {
            None
        };
        let piecewise_rate = if piecewise_rate_flag {
            c.skip(2)?; // reserved
            Some(c.read_uint(22)? as u32)
        } else {
            None
        };
        let seamless_splice = if seamless_splice_flag {
            let splice_type = c.read_uint(4)? as u8;
            Some(SeamlessSplice {
                splice_type,
                dts_next_au: Timestamp::read_field(&mut c)?,
            })
        } else {
            None
        };

        Ok(AdaptationFieldExtension {
            ltw,
            piecewise_rate,
            seamless_splice,
            reserved: c.read_bytes(c.remaining() / 8)?,
        })
    }

    /// Returns the 'Legal time window', or `DecodeError::FieldNotPresent` if absent.
    pub fn ltw(&self) -> Result<LegalTimeWindow, DecodeError> {
        self.ltw.ok_or(DecodeError::FieldNotPresent { field: "ltw" })
    }

    /// Get the value of the _piecewise_rate_ field,
    /// or `DecodeError::FieldNotPresent` if absent
    pub fn piecewise_rate(&self) -> Result<u32, DecodeError> {
        self.piecewise_rate.ok_or(DecodeError::FieldNotPresent {
            field: "piecewise_rate",
        })
    }

    /// Get the value of the _seamless_splice_ field,
    /// or `DecodeError::FieldNotPresent` if absent
    pub fn seamless_splice(&self) -> Result<SeamlessSplice, DecodeError> {
        self.seamless_splice.ok_or(DecodeError::FieldNotPresent {
            field: "seamless_splice",
        })
    }

    /// The fields present, in the order they appear in the syntax.
    pub fn fields(&self) -> impl Iterator<Item = ExtensionField> {
        self.ltw
            .map(ExtensionField::LegalTimeWindow)
            .into_iter()
            .chain(self.piecewise_rate.map(ExtensionField::PiecewiseRate))
            .chain(self.seamless_splice.map(ExtensionField::SeamlessSplice))
    }

    /// Trailing reserved bytes covered by the extension length but not by any known field.
    pub fn reserved(&self) -> &'buf [u8] {
        self.reserved
    }
}
