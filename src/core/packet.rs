use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::Result;
use crate::packets::{
    CompressedData, LiteralData, Marker, OnePassSignature, PacketBody, PublicKey,
    PublicKeyEncryptedSessionKey, PublicSubkey, SecretKey, SecretSubkey, Signature,
    SymEncryptedData, SymKeyEncryptedSessionKey, Trust, UserId,
};

/// A decoded or constructed OpenPGP packet, one variant per supported tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    PublicKeyEncryptedSessionKey(PublicKeyEncryptedSessionKey),
    Signature(Signature),
    SymKeyEncryptedSessionKey(SymKeyEncryptedSessionKey),
    OnePassSignature(OnePassSignature),
    SecretKey(SecretKey),
    PublicKey(PublicKey),
    SecretSubkey(SecretSubkey),
    CompressedData(CompressedData),
    SymEncryptedData(SymEncryptedData),
    Marker(Marker),
    LiteralData(LiteralData),
    Trust(Trust),
    UserId(UserId),
    PublicSubkey(PublicSubkey),
}

/// Run `$body` with `$p` bound to the inner variant
macro_rules! with_variant {
    ($packet:expr, $p:ident => $body:expr) => {
        match $packet {
            Packet::PublicKeyEncryptedSessionKey($p) => $body,
            Packet::Signature($p) => $body,
            Packet::SymKeyEncryptedSessionKey($p) => $body,
            Packet::OnePassSignature($p) => $body,
            Packet::SecretKey($p) => $body,
            Packet::PublicKey($p) => $body,
            Packet::SecretSubkey($p) => $body,
            Packet::CompressedData($p) => $body,
            Packet::SymEncryptedData($p) => $body,
            Packet::Marker($p) => $body,
            Packet::LiteralData($p) => $body,
            Packet::Trust($p) => $body,
            Packet::UserId($p) => $body,
            Packet::PublicSubkey($p) => $body,
        }
    };
}

impl Packet {
    /// Dispatch a header and its complete raw body to the matching variant.
    ///
    /// Tags outside 1..=14 fail with `UnsupportedPacketType`; malformed
    /// bodies fail with `PayloadDecode`.
    pub fn from_parts(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        let packet = match Tag::try_from(header.tag())? {
            Tag::PublicKeyEncryptedSessionKey => {
                Packet::PublicKeyEncryptedSessionKey(PacketBody::from_body(header, body)?)
            }
            Tag::Signature => Packet::Signature(PacketBody::from_body(header, body)?),
            Tag::SymKeyEncryptedSessionKey => {
                Packet::SymKeyEncryptedSessionKey(PacketBody::from_body(header, body)?)
            }
            Tag::OnePassSignature => Packet::OnePassSignature(PacketBody::from_body(header, body)?),
            Tag::SecretKey => Packet::SecretKey(PacketBody::from_body(header, body)?),
            Tag::PublicKey => Packet::PublicKey(PacketBody::from_body(header, body)?),
            Tag::SecretSubkey => Packet::SecretSubkey(PacketBody::from_body(header, body)?),
            Tag::CompressedData => Packet::CompressedData(PacketBody::from_body(header, body)?),
            Tag::SymEncryptedData => Packet::SymEncryptedData(PacketBody::from_body(header, body)?),
            Tag::Marker => Packet::Marker(PacketBody::from_body(header, body)?),
            Tag::LiteralData => Packet::LiteralData(PacketBody::from_body(header, body)?),
            Tag::Trust => Packet::Trust(PacketBody::from_body(header, body)?),
            Tag::UserId => Packet::UserId(PacketBody::from_body(header, body)?),
            Tag::PublicSubkey => Packet::PublicSubkey(PacketBody::from_body(header, body)?),
        };
        Ok(packet)
    }

    pub fn tag(&self) -> Tag {
        with_variant!(self, p => tag_of(p))
    }

    /// Header this packet was decoded with, or built with
    pub fn header(&self) -> &PacketHeader {
        with_variant!(self, p => p.header())
    }

    /// Complete wire form: new-format header followed by the body
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        with_variant!(self, p => p.to_bytes())
    }

    /// Body octets only
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        with_variant!(self, p => p.write_body(&mut out));
        out
    }
}

fn tag_of<P: PacketBody>(_: &P) -> Tag {
    P::TAG
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Packet {
                fn from(p: $variant) -> Self {
                    Packet::$variant(p)
                }
            }
        )*
    };
}

impl_from_variant!(
    PublicKeyEncryptedSessionKey,
    Signature,
    SymKeyEncryptedSessionKey,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymEncryptedData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
);
