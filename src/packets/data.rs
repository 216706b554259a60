use super::{be_u32, require_len, PacketBody};
use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::{constants, PacketError, Result};

/// Tag 8: compressed packet sequence. The data is not inflated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    header: PacketHeader,
    algorithm: u8,
    data: Vec<u8>,
}

impl CompressedData {
    pub fn new(algorithm: u8, data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, 1 + data.len())?,
            algorithm,
            data,
        })
    }

    /// 0 uncompressed, 1 ZIP, 2 ZLIB, 3 BZip2
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PacketBody for CompressedData {
    const TAG: Tag = Tag::CompressedData;

    fn from_body(header: PacketHeader, mut body: Vec<u8>) -> Result<Self> {
        if body.is_empty() {
            return Err(PacketError::payload(Self::TAG.into(), constants::ERR_EMPTY_BODY));
        }
        let data = body.split_off(1);
        Ok(Self {
            header,
            algorithm: body[0],
            data,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(self.algorithm);
        out.extend_from_slice(&self.data);
    }
}

/// Tag 9: legacy encrypted data without integrity protection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymEncryptedData {
    header: PacketHeader,
    data: Vec<u8>,
}

impl SymEncryptedData {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, data.len())?,
            data,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PacketBody for SymEncryptedData {
    const TAG: Tag = Tag::SymEncryptedData;

    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        Ok(Self { header, data: body })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data);
    }
}

/// Format octet of a literal data packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralFormat {
    Binary,
    Text,
    Utf8,
    Mime,
    /// `'l'` and the older `'1'`, both local-machine formats
    Local(u8),
}

impl LiteralFormat {
    pub fn from_octet(octet: u8) -> Option<Self> {
        match octet {
            b'b' => Some(LiteralFormat::Binary),
            b't' => Some(LiteralFormat::Text),
            b'u' => Some(LiteralFormat::Utf8),
            b'm' => Some(LiteralFormat::Mime),
            b'l' | b'1' => Some(LiteralFormat::Local(octet)),
            _ => None,
        }
    }

    pub fn octet(self) -> u8 {
        match self {
            LiteralFormat::Binary => b'b',
            LiteralFormat::Text => b't',
            LiteralFormat::Utf8 => b'u',
            LiteralFormat::Mime => b'm',
            LiteralFormat::Local(octet) => octet,
        }
    }
}

/// Tag 11: the actual message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralData {
    header: PacketHeader,
    format: LiteralFormat,
    file_name: Vec<u8>,
    date: u32,
    data: Vec<u8>,
}

impl LiteralData {
    /// Binary literal with no file name and a zero date
    pub fn binary(data: Vec<u8>) -> Result<Self> {
        Self::new(LiteralFormat::Binary, Vec::new(), 0, data)
    }

    /// The file name length is a single octet, so names over 255 octets are
    /// refused.
    pub fn new(
        format: LiteralFormat,
        file_name: Vec<u8>,
        date: u32,
        data: Vec<u8>,
    ) -> Result<Self> {
        if file_name.len() > u8::MAX as usize {
            return Err(PacketError::payload(
                Self::TAG.into(),
                constants::ERR_FILENAME_TOO_LONG,
            ));
        }
        Ok(Self {
            header: PacketHeader::new(Self::TAG, 6 + file_name.len() + data.len())?,
            format,
            file_name,
            date,
            data,
        })
    }

    pub fn format(&self) -> LiteralFormat {
        self.format
    }

    pub fn file_name(&self) -> &[u8] {
        &self.file_name
    }

    pub fn date(&self) -> u32 {
        self.date
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PacketBody for LiteralData {
    const TAG: Tag = Tag::LiteralData;

    fn from_body(header: PacketHeader, mut body: Vec<u8>) -> Result<Self> {
        require_len(Self::TAG, &body, 2)?;
        let format = LiteralFormat::from_octet(body[0]).ok_or_else(|| {
            PacketError::payload(Self::TAG.into(), constants::ERR_BAD_LITERAL_FORMAT)
        })?;

        let name_end = 2 + body[1] as usize;
        if body.len() < name_end + 4 {
            return Err(PacketError::payload(
                Self::TAG.into(),
                constants::ERR_FILENAME_OVERRUN,
            ));
        }

        let data = body.split_off(name_end + 4);
        let date = be_u32(&body[name_end..]);
        let file_name = body[2..name_end].to_vec();

        Ok(Self {
            header,
            format,
            file_name,
            date,
            data,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(self.format.octet());
        out.push(self.file_name.len() as u8);
        out.extend_from_slice(&self.file_name);
        out.extend_from_slice(&self.date.to_be_bytes());
        out.extend_from_slice(&self.data);
    }
}
