//! # pgp-framing
//!
//! OpenPGP (RFC 4880) packet framing: header decoding in both the legacy and
//! new formats, body-length arithmetic including partial and indeterminate
//! lengths, dispatch over the supported packet tags, and the matching encoder.
//!
//! Payload semantics (signature verification, key material, decryption) are
//! left to the caller; packet variants only parse their fixed leading fields
//! and carry the rest as opaque octets.
//!
//! ## Quick Start
//!
//! ```
//! use pgp_framing::{Packet, PacketReader, PacketWriter, Tag};
//! use pgp_framing::packets::UserId;
//!
//! # fn main() -> pgp_framing::Result<()> {
//! let mut writer = PacketWriter::new(Vec::new());
//! writer.write_packet(&Packet::from(UserId::new("Alice <alice@example.org>")?))?;
//! let wire = writer.into_inner();
//!
//! let mut reader = PacketReader::new(wire.as_slice());
//! let packet = reader.read_packet()?.expect("one packet");
//! assert_eq!(packet.tag(), Tag::UserId);
//! assert!(reader.read_packet()?.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`core`]: headers, tags, packet dispatch, reader, writer, Tokio codec
//! - [`packets`]: the packet variants
//! - [`identity`]: key IDs, key identifiers and address parsing
//! - [`mime`]: multipart boundary extraction
//! - [`transport`]: command pipe contract and packet pipe
//! - [`config`]: framing limits and policies
//! - [`utils`]: metrics

pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod mime;
pub mod packets;
pub mod transport;
pub mod utils;

pub use crate::config::{FramingConfig, IndeterminatePolicy, PartialBodyPolicy};
pub use crate::core::codec::PacketCodec;
pub use crate::core::header::{BodyLength, HeaderFormat, LegacyLengthType, PacketHeader};
pub use crate::core::packet::Packet;
pub use crate::core::reader::PacketReader;
pub use crate::core::tag::Tag;
pub use crate::core::writer::PacketWriter;
pub use crate::error::{FramingError, PacketError, Result};
pub use crate::identity::{KeyId, KeyIdentifier};
pub use crate::transport::{CommandPipe, PacketPipe};
pub use crate::utils::metrics::Metrics;
