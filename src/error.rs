//! # Error Types
//!
//! Error handling for OpenPGP packet framing.
//!
//! Every failure surfaces to the caller as a distinct, inspectable variant.
//! Nothing is swallowed or logged-and-ignored inside the crate.
//!
//! ## Error Categories
//! - **Framing**: malformed tag octet, invalid legacy length type, truncated
//!   header or body. Fatal to the stream.
//! - **Unsupported packet type**: tag outside 1..=14. Fatal to the stream.
//! - **Payload decode**: a packet variant rejected its body. The body was
//!   already consumed, so the stream position stays valid.
//! - **Transport**: underlying I/O failure. Fatal, never retried.
//! - **Key identifier / malformed header**: fatal to the single parse call.
//!
//! ## Example Usage
//! ```rust
//! use pgp_framing::error::{PacketError, Result};
//! use pgp_framing::PacketReader;
//!
//! fn count_packets(bytes: &[u8]) -> Result<usize> {
//!     let mut reader = PacketReader::new(bytes);
//!     let mut count = 0;
//!     while reader.read_packet()?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//!
//! match count_packets(&[0x3f]) {
//!     Err(PacketError::Framing(e)) => println!("bad framing: {e}"),
//!     other => println!("{other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Payload decode messages shared by several packet variants
    pub const ERR_EMPTY_BODY: &str = "packet body is empty";
    pub const ERR_SHORT_BODY: &str = "packet body is shorter than its fixed fields";
    pub const ERR_UNSUPPORTED_VERSION: &str = "unsupported packet version";
    pub const ERR_BAD_MARKER: &str = "marker packet body must be \"PGP\"";
    pub const ERR_BAD_LITERAL_FORMAT: &str = "unknown literal data format octet";
    pub const ERR_FILENAME_OVERRUN: &str = "literal data file name overruns the body";
    pub const ERR_FILENAME_TOO_LONG: &str = "literal data file name exceeds 255 octets";
    pub const ERR_ONE_PASS_LENGTH: &str = "one-pass signature body must be 13 octets";

    /// Key identifier messages
    pub const ERR_KEY_ID_LENGTH: &str = "key id must be exactly 8 octets";
    pub const ERR_EMPTY_ADDRESS: &str = "address is empty";
    pub const ERR_ADDRESS_TOKENS: &str = "address must be 'email' or 'Name <email>'";

    /// MIME header messages
    pub const ERR_BOUNDARY_MISSING: &str = "content-type has no boundary=\"...\" parameter";
    pub const ERR_BOUNDARY_UNTERMINATED: &str = "content-type boundary is not terminated";
}

/// Violations of the packet framing layer itself.
///
/// Any of these leaves the stream at an unknown position, so the decoder
/// that produced it must be abandoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("invalid tag octet 0x{0:02x}: high bit is clear")]
    InvalidTagOctet(u8),

    #[error("invalid legacy length type {0}")]
    InvalidLegacyLengthType(u8),

    #[error("stream ended inside a packet header")]
    TruncatedHeader,

    #[error("stream ended inside a packet body: expected {expected} octets, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    #[error("partial body lengths are not allowed for packet tag {0}")]
    PartialLengthNotAllowed(u8),

    #[error("first partial body chunk of {0} octets is below the 512 octet minimum")]
    PartialChunkTooSmall(u32),
}

// PacketError is the primary error type for all framing operations
#[derive(Error, Debug)]
pub enum PacketError {
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("unsupported packet type: tag {0}")]
    UnsupportedPacketType(u8),

    #[error("malformed payload in packet tag {tag}: {reason}")]
    PayloadDecode { tag: u8, reason: String },

    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    #[error("packet body of {length} octets exceeds the {limit} octet limit")]
    BodyTooLarge { length: usize, limit: usize },

    #[error("packet stream already failed")]
    StreamFailed,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("no mapping possible for command: {0}")]
    NoMapping(String),

    #[error("invalid key identifier: {0}")]
    KeyIdentifierFormat(String),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl PacketError {
    /// Build a payload decode error for `tag`.
    pub fn payload(tag: u8, reason: impl Into<String>) -> Self {
        PacketError::PayloadDecode {
            tag,
            reason: reason.into(),
        }
    }

    /// Whether the error leaves the byte stream unusable.
    ///
    /// Payload, key-identifier, MIME and config errors are scoped to one
    /// call. Everything else means the stream position can no longer be
    /// trusted.
    pub fn is_fatal_to_stream(&self) -> bool {
        !matches!(
            self,
            PacketError::PayloadDecode { .. }
                | PacketError::KeyIdentifierFormat(_)
                | PacketError::MalformedHeader(_)
                | PacketError::ConfigError(_)
                | PacketError::NoMapping(_)
        )
    }
}

/// Type alias for Results using PacketError
pub type Result<T> = std::result::Result<T, PacketError>;
