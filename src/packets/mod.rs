//! # Packet Variants
//!
//! The fourteen payload types behind the supported tags. Each one implements
//! [`PacketBody`]: it builds itself from a decoded header plus the exact raw
//! body, and serializes itself back to its complete wire form.
//!
//! Variants only parse structural fields (versions, algorithm identifiers,
//! key ids, lengths). Cryptographic material is kept as opaque octets.

mod data;
mod key;
mod session_key;
mod signature;
mod simple;

pub use data::{CompressedData, LiteralData, LiteralFormat, SymEncryptedData};
pub use key::{KeyMaterial, PublicKey, PublicSubkey, SecretKey, SecretSubkey};
pub use session_key::{PublicKeyEncryptedSessionKey, SymKeyEncryptedSessionKey};
pub use signature::{OnePassSignature, Signature};
pub use simple::{Marker, Trust, UserId};

use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::{constants, PacketError, Result};

/// Capability every packet variant provides to dispatch and encoding
pub trait PacketBody: Sized {
    /// Tag this variant is dispatched from
    const TAG: Tag;

    /// Build the variant from its header and raw body.
    ///
    /// Malformed bodies must fail with `PacketError::PayloadDecode`.
    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self>;

    /// Header the packet was decoded with, or built with
    fn header(&self) -> &PacketHeader;

    /// Append the body octets to `out`
    fn write_body(&self, out: &mut Vec<u8>);

    /// Complete wire form, normalized to a new-format header
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.write_body(&mut body);

        let header = PacketHeader::new(Self::TAG, body.len())?;
        let mut out = Vec::with_capacity(body.len() + 6);
        header.write_to(&mut out);
        out.extend_from_slice(&body);
        Ok(out)
    }
}

/// Fail with a short-body payload error unless `body` holds `len` octets
fn require_len(tag: Tag, body: &[u8], len: usize) -> Result<()> {
    if body.len() < len {
        Err(PacketError::payload(tag.into(), constants::ERR_SHORT_BODY))
    } else {
        Ok(())
    }
}

fn unsupported_version(tag: Tag, version: u8) -> PacketError {
    PacketError::payload(
        tag.into(),
        format!("{} {version}", constants::ERR_UNSUPPORTED_VERSION),
    )
}

fn be_u32(octets: &[u8]) -> u32 {
    octets
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

