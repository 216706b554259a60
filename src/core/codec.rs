//! Tokio codec for OpenPGP packets over async byte streams.
//!
//! Framing rules match `PacketReader`. `decode` leaves the buffer untouched
//! until a complete packet is available. A legacy indeterminate-length packet
//! runs to the end of the stream, so it is only produced by `decode_eof`.
//!
//! Incomplete frames are scanned without copying: only header and chunk
//! length octets are read, and the scan resumes where the previous call
//! stopped. The body is assembled once, after its last octet has arrived.

use crate::config::FramingConfig;
use crate::core::header::{decode_new_length, BodyLength, PacketHeader};
use crate::core::packet::Packet;
use crate::core::reader::{check_limit, check_partial_start, read_body};
use crate::error::{FramingError, PacketError, Result};
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

/// Progress through a frame that has not fully arrived.
///
/// Offsets are relative to the start of the decode buffer, which only grows
/// at its end until the frame is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameScan {
    /// Offset just past the last chunk whose length is known
    end: usize,
    /// Body octets announced so far
    body_len: usize,
    /// The chunk ending at `end` closes the body
    last: bool,
}

/// Packet codec for use with `FramedRead`, `FramedWrite` and `Framed`
#[derive(Debug, Clone, Default)]
pub struct PacketCodec {
    config: FramingConfig,
    scan: Option<FrameScan>,
    length_reads: u64,
}

impl PacketCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FramingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    fn decode_frame(&mut self, src: &mut BytesMut, eof: bool) -> Result<Option<Packet>> {
        if src.is_empty() {
            self.scan = None;
            return Ok(None);
        }

        let scan = match self.scan_frame(src, eof) {
            Ok(scan) => scan,
            Err(e) => {
                self.scan = None;
                return Err(e);
            }
        };

        match scan {
            Some(scan) if scan.last && src.len() >= scan.end => {
                trace!(
                    wire_len = scan.end,
                    length_reads = self.length_reads,
                    "frame fully buffered"
                );
            }
            Some(scan) if !eof => {
                self.scan = Some(scan);
                let missing = scan.end.saturating_sub(src.len());
                src.reserve(missing);
                trace!(buffered = src.len(), missing, "waiting for more packet octets");
                return Ok(None);
            }
            None if !eof => return Ok(None),
            // at end of stream the full parse reports the exact truncation
            _ => {}
        }

        self.scan = None;
        self.take_frame(src)
    }

    /// Walk the header and chunk lengths buffered so far.
    ///
    /// `None` means the header itself is incomplete, or the frame is an
    /// indeterminate-length one and the stream has not ended.
    fn scan_frame(&mut self, src: &[u8], eof: bool) -> Result<Option<FrameScan>> {
        let mut scan = match self.scan {
            Some(scan) => scan,
            None => {
                let mut cursor = src;
                self.length_reads += 1;
                let header = match PacketHeader::decode(&mut cursor) {
                    Ok(Some(header)) => header,
                    Ok(None) | Err(PacketError::Framing(FramingError::TruncatedHeader)) => {
                        return Ok(None)
                    }
                    Err(e) => return Err(e),
                };
                let header_len = src.len() - cursor.len();

                match header.length() {
                    BodyLength::Fixed(len) => {
                        let len = check_limit(len as usize, &self.config)?;
                        FrameScan {
                            end: header_len + len,
                            body_len: len,
                            last: true,
                        }
                    }
                    BodyLength::Partial(first) => {
                        check_partial_start(header.tag(), first, &self.config)?;
                        let first = check_limit(first as usize, &self.config)?;
                        FrameScan {
                            end: header_len + first,
                            body_len: first,
                            last: false,
                        }
                    }
                    BodyLength::Indeterminate if eof => FrameScan {
                        end: src.len(),
                        body_len: src.len() - header_len,
                        last: true,
                    },
                    BodyLength::Indeterminate => return Ok(None),
                }
            }
        };

        while !scan.last && src.len() > scan.end {
            let mut cursor = &src[scan.end..];
            self.length_reads += 1;
            let length = match decode_new_length(&mut cursor) {
                Ok(length) => length,
                Err(PacketError::Framing(FramingError::TruncatedHeader)) => break,
                Err(e) => return Err(e),
            };
            let octets = src.len() - scan.end - cursor.len();
            let chunk = length.declared().unwrap_or(0) as usize;

            scan.body_len = check_limit(scan.body_len.saturating_add(chunk), &self.config)?;
            scan.end += octets + chunk;
            scan.last = !matches!(length, BodyLength::Partial(_));
        }

        Ok(Some(scan))
    }

    /// Parse and remove one frame from the front of `src`
    fn take_frame(&self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let mut cursor: &[u8] = &src[..];
        let Some(header) = PacketHeader::decode(&mut cursor)? else {
            return Ok(None);
        };
        let body = read_body(&mut cursor, &header, &self.config)?;

        let consumed = src.len() - cursor.len();
        src.advance(consumed);
        debug!(tag = header.tag(), wire_len = consumed, "framed packet");
        Packet::from_parts(header, body).map(Some)
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = PacketError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        self.decode_frame(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        self.decode_frame(src, true)
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = PacketError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<()> {
        let bytes = item.to_bytes()?;
        dst.reserve(bytes.len());
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
