use crate::error::PacketError;
use std::fmt;

/// Packet tags this crate can dispatch.
///
/// The tag space is fixed by RFC 4880, so this is a closed set. Anything else
/// (0, 15..=63) is rejected with `UnsupportedPacketType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tag {
    PublicKeyEncryptedSessionKey = 1,
    Signature = 2,
    SymKeyEncryptedSessionKey = 3,
    OnePassSignature = 4,
    SecretKey = 5,
    PublicKey = 6,
    SecretSubkey = 7,
    CompressedData = 8,
    SymEncryptedData = 9,
    Marker = 10,
    LiteralData = 11,
    Trust = 12,
    UserId = 13,
    PublicSubkey = 14,
}

impl Tag {
    /// Every supported tag in ascending order
    pub const ALL: [Tag; 14] = [
        Tag::PublicKeyEncryptedSessionKey,
        Tag::Signature,
        Tag::SymKeyEncryptedSessionKey,
        Tag::OnePassSignature,
        Tag::SecretKey,
        Tag::PublicKey,
        Tag::SecretSubkey,
        Tag::CompressedData,
        Tag::SymEncryptedData,
        Tag::Marker,
        Tag::LiteralData,
        Tag::Trust,
        Tag::UserId,
        Tag::PublicSubkey,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::PublicKeyEncryptedSessionKey => "Public-Key Encrypted Session Key",
            Tag::Signature => "Signature",
            Tag::SymKeyEncryptedSessionKey => "Symmetric-Key Encrypted Session Key",
            Tag::OnePassSignature => "One-Pass Signature",
            Tag::SecretKey => "Secret-Key",
            Tag::PublicKey => "Public-Key",
            Tag::SecretSubkey => "Secret-Subkey",
            Tag::CompressedData => "Compressed Data",
            Tag::SymEncryptedData => "Symmetrically Encrypted Data",
            Tag::Marker => "Marker",
            Tag::LiteralData => "Literal Data",
            Tag::Trust => "Trust",
            Tag::UserId => "User ID",
            Tag::PublicSubkey => "Public-Subkey",
        }
    }
}

/// Whether a raw tag may use new-format partial body lengths.
///
/// RFC 4880 only allows them on data packets: compressed (8), symmetrically
/// encrypted (9), literal (11), and the integrity-protected (18) and AEAD (20)
/// containers. 18 and 20 pass framing here and then fail dispatch.
pub fn permits_partial_length(raw_tag: u8) -> bool {
    matches!(raw_tag, 8 | 9 | 11 | 18 | 20)
}

impl TryFrom<u8> for Tag {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tag::ALL
            .get((value as usize).wrapping_sub(1))
            .copied()
            .ok_or(PacketError::UnsupportedPacketType(value))
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}
