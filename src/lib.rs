//! Field-accurate decoding of MPEG2 Transport Stream packet headers and PES headers, per the
//! _ISO/IEC 13818-1_ standard.
//!
//! # Design principals
//!
//!  * *Avoid copying and allocating*.  Decoded structures borrow slices of the caller's buffer,
//!    and nothing here allocates.
//!  * *One unit at a time*.  Each call decodes a single 188-byte transport stream packet or a
//!    single PES header.  Demultiplexing by PID, continuity checking across packets and
//!    reassembly of PES packets spanning many transport stream packets are left to the caller.
//!  * *Absent is not zero*.  An optional field whose flag is clear is reported as
//!    [`DecodeError::FieldNotPresent`](error/enum.DecodeError.html#variant.FieldNotPresent),
//!    so that a decoded value of `0` is never confused with a missing field.
//!  * *Transport Neutral*.  There is no code here supporting consuming from files or the
//!    network.  The APIs accept `&[u8]`, and the caller handles providing the data from wherever.
//!
//! # Example
//!
//! ```rust
//! use mpeg2ts_header::packet::Packet;
//!
//! let mut buf = [0xffu8; Packet::SIZE];
//! buf[0] = Packet::SYNC_BYTE;
//! buf[1] = 0x01;
//! buf[2] = 0x00;
//! buf[3] = 0x30; // adaptation field and payload, continuity_counter 0
//! buf[4] = 7; // adaptation_field_length
//! buf[5] = 0x10; // PCR_flag
//! buf[6..12].copy_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x7e, 0x00]);
//!
//! let pk = Packet::try_new(&buf[..]).unwrap();
//! assert_eq!(u16::from(pk.pid()), 0x100);
//! let af = pk.adaptation_field().unwrap().expect("adaptation field");
//! let pcr = af.pcr().unwrap();
//! assert_eq!(pcr.value(), 2 * 300);
//! assert_eq!(pcr.duration().to_string(), "00h00m00s000022µs");
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, future_incompatible)]
#![warn(missing_docs)]

pub mod adaptation_field;
pub mod bits;
pub mod clock;
pub mod error;
pub mod packet;
pub mod pes;

pub use crate::error::DecodeError;
