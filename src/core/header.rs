//! # Packet Header
//!
//! Decoding and encoding of the OpenPGP packet header: one tag octet followed
//! by a body length in either the legacy (old) or the new format.
//!
//! ## Wire Format
//! ```text
//! Legacy: [1 0 t t t t l l] [length: 0, 1, 2 or 4 octets]
//! New:    [1 1 t t t t t t] [length: 1, 2 or 5 octets, or a partial chunk octet]
//! ```
//!
//! New-format length octets:
//!
//! | first octet `L` | body length                          |
//! |-----------------|--------------------------------------|
//! | `L < 192`       | `L`                                  |
//! | `192..=223`     | `((L - 192) << 8) + next + 192`      |
//! | `224..=254`     | partial chunk of `1 << (L & 0x1F)`   |
//! | `255`           | next 4 octets, big-endian            |

use crate::core::tag::Tag;
use crate::error::{FramingError, PacketError, Result};
use std::io::{self, BufRead};
use tracing::trace;

/// Largest body length the two-octet new-format form can express
pub const MAX_TWO_OCTET_LENGTH: u32 = 8383;

/// Which header encoding a packet arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFormat {
    /// Old format, tag in bits 2..=5, length type in bits 0..=1
    Legacy,
    /// New format, tag in bits 0..=5
    New,
}

/// Width of the legacy length field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LegacyLengthType {
    OneOctet = 0,
    TwoOctets = 1,
    FourOctets = 2,
    Indeterminate = 3,
}

impl TryFrom<u8> for LegacyLengthType {
    type Error = FramingError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(LegacyLengthType::OneOctet),
            1 => Ok(LegacyLengthType::TwoOctets),
            2 => Ok(LegacyLengthType::FourOctets),
            3 => Ok(LegacyLengthType::Indeterminate),
            other => Err(FramingError::InvalidLegacyLengthType(other)),
        }
    }
}

impl LegacyLengthType {
    /// Number of length octets following the tag octet
    pub fn octets(self) -> usize {
        match self {
            LegacyLengthType::OneOctet => 1,
            LegacyLengthType::TwoOctets => 2,
            LegacyLengthType::FourOctets => 4,
            LegacyLengthType::Indeterminate => 0,
        }
    }

    /// Smallest length type able to carry `len`
    fn fitting(len: u32) -> Self {
        if len <= u8::MAX as u32 {
            LegacyLengthType::OneOctet
        } else if len <= u16::MAX as u32 {
            LegacyLengthType::TwoOctets
        } else {
            LegacyLengthType::FourOctets
        }
    }
}

/// Declared length of a packet body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLength {
    /// Exactly this many octets follow the header
    Fixed(u32),
    /// New-format partial body; the first chunk holds this many octets and
    /// more length-prefixed chunks follow
    Partial(u32),
    /// Legacy length type 3; no length on the wire
    Indeterminate,
}

impl BodyLength {
    /// The length as declared in the header, if there is one
    pub fn declared(self) -> Option<u32> {
        match self {
            BodyLength::Fixed(n) | BodyLength::Partial(n) => Some(n),
            BodyLength::Indeterminate => None,
        }
    }
}

/// A decoded OpenPGP packet header
///
/// `legacy_length_type` is only present for legacy headers, and only a legacy
/// header can carry an indeterminate length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    tag: u8,
    format: HeaderFormat,
    legacy_length_type: Option<LegacyLengthType>,
    length: BodyLength,
}

impl PacketHeader {
    /// New-format header with a fixed body length
    pub fn new(tag: Tag, body_len: usize) -> Result<Self> {
        Ok(Self {
            tag: tag.into(),
            format: HeaderFormat::New,
            legacy_length_type: None,
            length: BodyLength::Fixed(checked_len(body_len)?),
        })
    }

    /// Legacy header using the smallest length type that fits.
    ///
    /// `None` produces an indeterminate length.
    pub fn legacy(tag: Tag, body_len: Option<usize>) -> Result<Self> {
        let (length_type, length) = match body_len {
            Some(len) => {
                let len = checked_len(len)?;
                (LegacyLengthType::fitting(len), BodyLength::Fixed(len))
            }
            None => (LegacyLengthType::Indeterminate, BodyLength::Indeterminate),
        };

        Ok(Self {
            tag: tag.into(),
            format: HeaderFormat::Legacy,
            legacy_length_type: Some(length_type),
            length,
        })
    }

    /// Raw tag number, 0..=63
    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn format(&self) -> HeaderFormat {
        self.format
    }

    pub fn is_new_format(&self) -> bool {
        self.format == HeaderFormat::New
    }

    pub fn legacy_length_type(&self) -> Option<LegacyLengthType> {
        self.legacy_length_type
    }

    pub fn length(&self) -> BodyLength {
        self.length
    }

    /// Decode one header from `src`.
    ///
    /// Returns `Ok(None)` when the source is exhausted before the tag octet.
    /// Running out of input after the tag octet is a `TruncatedHeader` error.
    pub fn decode<R: BufRead + ?Sized>(src: &mut R) -> Result<Option<Self>> {
        let Some(octet) = read_octet(src)? else {
            return Ok(None);
        };

        if octet & 0x80 == 0 {
            return Err(FramingError::InvalidTagOctet(octet).into());
        }

        let header = if octet >= 0xC0 {
            Self {
                tag: octet & 0x3F,
                format: HeaderFormat::New,
                legacy_length_type: None,
                length: decode_new_length(src)?,
            }
        } else {
            let length_type = LegacyLengthType::try_from(octet & 0x03)?;
            let length = match length_type {
                LegacyLengthType::Indeterminate => BodyLength::Indeterminate,
                fixed => BodyLength::Fixed(read_be(src, fixed.octets())?),
            };
            Self {
                tag: (octet >> 2) & 0x0F,
                format: HeaderFormat::Legacy,
                legacy_length_type: Some(length_type),
                length,
            }
        };

        trace!(tag = header.tag, format = ?header.format, length = ?header.length, "decoded packet header");
        Ok(Some(header))
    }

    /// Append the wire form of this header to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self.format {
            HeaderFormat::New => {
                out.push(0xC0 | (self.tag & 0x3F));
                match self.length {
                    BodyLength::Fixed(len) => write_new_length(len, out),
                    BodyLength::Partial(chunk) => {
                        out.push(0xE0 | (chunk.trailing_zeros() as u8 & 0x1F))
                    }
                    // constructors never pair the new format with this
                    BodyLength::Indeterminate => write_new_length(0, out),
                }
            }
            HeaderFormat::Legacy => {
                let length_type = self
                    .legacy_length_type
                    .unwrap_or(LegacyLengthType::Indeterminate);
                out.push(0x80 | ((self.tag & 0x0F) << 2) | length_type as u8);
                if let BodyLength::Fixed(len) = self.length {
                    let be = len.to_be_bytes();
                    out.extend_from_slice(&be[4 - length_type.octets()..]);
                }
            }
        }
    }

    /// Wire form of this header
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6);
        self.write_to(&mut out);
        out
    }
}

/// Decode a new-format body length, reading the first length octet from `src`.
///
/// Also used for the length octets between partial body chunks.
pub fn decode_new_length<R: BufRead + ?Sized>(src: &mut R) -> Result<BodyLength> {
    let first = read_required(src)?;
    let length = match first {
        0..=191 => BodyLength::Fixed(first as u32),
        192..=223 => {
            let second = read_required(src)?;
            BodyLength::Fixed((((first as u32) - 192) << 8) + second as u32 + 192)
        }
        224..=254 => BodyLength::Partial(1u32 << (first & 0x1F)),
        255 => BodyLength::Fixed(read_be(src, 4)?),
    };
    Ok(length)
}

/// Append the minimal new-format encoding of a fixed `len`
pub fn write_new_length(len: u32, out: &mut Vec<u8>) {
    match len {
        0..=191 => out.push(len as u8),
        192..=MAX_TWO_OCTET_LENGTH => {
            let v = len - 192;
            out.push(((v >> 8) + 192) as u8);
            out.push((v & 0xFF) as u8);
        }
        _ => {
            out.push(0xFF);
            out.extend_from_slice(&len.to_be_bytes());
        }
    }
}

/// Read one octet, retrying interrupted reads. `None` at end of input.
pub(crate) fn read_octet<R: BufRead + ?Sized>(src: &mut R) -> io::Result<Option<u8>> {
    loop {
        let octet = match src.fill_buf() {
            Ok(buf) => buf.first().copied(),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if octet.is_some() {
            src.consume(1);
        }
        return Ok(octet);
    }
}

fn read_required<R: BufRead + ?Sized>(src: &mut R) -> Result<u8> {
    read_octet(src)?.ok_or_else(|| FramingError::TruncatedHeader.into())
}

fn read_be<R: BufRead + ?Sized>(src: &mut R, octets: usize) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..octets {
        value = (value << 8) | read_required(src)? as u32;
    }
    Ok(value)
}

fn checked_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| PacketError::BodyTooLarge {
        length: len,
        limit: u32::MAX as usize,
    })
}
