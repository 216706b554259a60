//! Blocking packet decoder over any `BufRead` source.
//!
//! One packet per call. `Ok(None)` means the source is exhausted. After a
//! stream-fatal error (framing, unsupported tag, transport) the reader
//! refuses further use with `StreamFailed`: there is no resynchronization.

use crate::config::{FramingConfig, IndeterminatePolicy, PartialBodyPolicy, MIN_FIRST_PARTIAL_CHUNK};
use crate::core::header::{decode_new_length, BodyLength, PacketHeader};
use crate::core::packet::Packet;
use crate::core::tag::permits_partial_length;
use crate::error::{FramingError, PacketError, Result};
use crate::utils::metrics::Metrics;
use std::io::{self, BufRead, Read};
use std::iter::FusedIterator;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Open,
    Exhausted,
    Failed,
}

/// Packet decoder owning its byte source
#[derive(Debug)]
pub struct PacketReader<R> {
    inner: R,
    config: FramingConfig,
    state: ReaderState,
    metrics: Option<Arc<Metrics>>,
    packets_read: u64,
}

impl<R: BufRead> PacketReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FramingConfig::default())
    }

    pub fn with_config(inner: R, config: FramingConfig) -> Self {
        Self {
            inner,
            config,
            state: ReaderState::Open,
            metrics: None,
            packets_read: 0,
        }
    }

    /// Report decoded packets and errors to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Number of packets decoded so far
    pub fn packets_read(&self) -> u64 {
        self.packets_read
    }

    /// True once a stream-fatal error has been returned
    pub fn is_failed(&self) -> bool {
        self.state == ReaderState::Failed
    }

    /// Decode the next packet.
    ///
    /// A `PayloadDecode` error only rejects the current packet: its body was
    /// consumed in full, so the next call starts at the following header.
    #[instrument(level = "trace", skip(self), fields(index = self.packets_read))]
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        let Some((header, body)) = self.read_frame()? else {
            return Ok(None);
        };

        let body_len = body.len();
        match Packet::from_parts(header, body) {
            Ok(packet) => {
                self.packets_read += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.packet_read(body_len as u64);
                }
                debug!(tag = %packet.tag(), body_len, "decoded packet");
                Ok(Some(packet))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Decode the next header and its complete body without dispatching it
    pub fn read_frame(&mut self) -> Result<Option<(PacketHeader, Vec<u8>)>> {
        match self.state {
            ReaderState::Failed => return Err(PacketError::StreamFailed),
            ReaderState::Exhausted => return Ok(None),
            ReaderState::Open => {}
        }

        let header = match PacketHeader::decode(&mut self.inner) {
            Ok(Some(header)) => header,
            Ok(None) => {
                debug!(packets = self.packets_read, "packet source exhausted");
                self.state = ReaderState::Exhausted;
                return Ok(None);
            }
            Err(e) => return Err(self.fail(e)),
        };

        match read_body(&mut self.inner, &header, &self.config) {
            Ok(body) => Ok(Some((header, body))),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: PacketError) -> PacketError {
        if let Some(metrics) = &self.metrics {
            metrics.record_error(&error);
        }
        if error.is_fatal_to_stream() {
            warn!(error = %error, packets = self.packets_read, "packet stream failed");
            self.state = ReaderState::Failed;
        } else {
            debug!(error = %error, "packet rejected");
        }
        error
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Give back the source, abandoning the decoder
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Release the source. The reader cannot be reopened.
    pub fn close(self) {
        debug!(packets = self.packets_read, "packet reader closed");
    }
}

impl<R: BufRead> Iterator for PacketReader<R> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReaderState::Failed {
            return None;
        }
        self.read_packet().transpose()
    }
}

impl<R: BufRead> FusedIterator for PacketReader<R> {}

/// Read the complete body declared by `header`.
///
/// Shared by `PacketReader` and `PacketCodec`. Never returns a partially
/// filled buffer: running out of input is a `TruncatedBody` error.
pub(crate) fn read_body<R: BufRead + ?Sized>(
    src: &mut R,
    header: &PacketHeader,
    config: &FramingConfig,
) -> Result<Vec<u8>> {
    match header.length() {
        BodyLength::Fixed(len) => {
            let len = check_limit(len as usize, config)?;
            let mut body = vec![0u8; len];
            fill(src, &mut body)?;
            Ok(body)
        }
        BodyLength::Partial(first) => read_partial(src, header.tag(), first, config),
        BodyLength::Indeterminate => read_indeterminate(src, config),
    }
}

fn read_partial<R: BufRead + ?Sized>(
    src: &mut R,
    tag: u8,
    first: u32,
    config: &FramingConfig,
) -> Result<Vec<u8>> {
    check_partial_start(tag, first, config)?;

    let mut body = Vec::new();
    let mut chunk = first as usize;
    let mut chunks = 1usize;
    loop {
        let start = body.len();
        let end = start.checked_add(chunk).ok_or(PacketError::BodyTooLarge {
            length: usize::MAX,
            limit: config.max_body_length,
        })?;
        check_limit(end, config)?;
        body.resize(end, 0);
        fill(src, &mut body[start..])?;

        let next = match decode_new_length(src)? {
            BodyLength::Partial(n) => n,
            last => {
                let len = last.declared().unwrap_or(0) as usize;
                let start = body.len();
                check_limit(start.saturating_add(len), config)?;
                body.resize(start + len, 0);
                fill(src, &mut body[start..])?;
                break;
            }
        };
        chunk = next as usize;
        chunks += 1;
    }

    trace!(tag, chunks, body_len = body.len(), "reassembled partial body");
    Ok(body)
}

/// Reject a partial length the tag or policy does not allow, or whose first
/// chunk is below the minimum
pub(crate) fn check_partial_start(tag: u8, first: u32, config: &FramingConfig) -> Result<()> {
    if config.partial_bodies == PartialBodyPolicy::Reject || !permits_partial_length(tag) {
        return Err(FramingError::PartialLengthNotAllowed(tag).into());
    }
    if first < MIN_FIRST_PARTIAL_CHUNK {
        return Err(FramingError::PartialChunkTooSmall(first).into());
    }
    Ok(())
}

fn read_indeterminate<R: BufRead + ?Sized>(src: &mut R, config: &FramingConfig) -> Result<Vec<u8>> {
    match config.indeterminate {
        IndeterminatePolicy::Buffered => {
            // an empty buffer costs exactly one blocking read of the source
            let available = loop {
                match src.fill_buf() {
                    Ok(buf) => break buf.len(),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            let mut body = vec![0u8; check_limit(available, config)?];
            fill(src, &mut body)?;
            Ok(body)
        }
        IndeterminatePolicy::UntilEof => {
            let mut body = Vec::new();
            let cap = config.max_body_length as u64 + 1;
            (&mut *src).take(cap).read_to_end(&mut body)?;
            check_limit(body.len(), config)?;
            Ok(body)
        }
    }
}

pub(crate) fn check_limit(len: usize, config: &FramingConfig) -> Result<usize> {
    if len > config.max_body_length {
        Err(PacketError::BodyTooLarge {
            length: len,
            limit: config.max_body_length,
        })
    } else {
        Ok(len)
    }
}

/// Fill `buf` completely, retrying short and interrupted reads
fn fill<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FramingError::TruncatedBody {
                    expected: buf.len(),
                    actual: filled,
                }
                .into())
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
