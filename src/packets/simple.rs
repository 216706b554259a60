use super::PacketBody;
use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::{constants, PacketError, Result};
use crate::identity::{format_user_id, KeyIdentifier};

/// Tag 10: the literal octets "PGP"; must be ignored by readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    header: PacketHeader,
}

impl Marker {
    pub const BODY: &'static [u8; 3] = b"PGP";

    pub fn new() -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, Self::BODY.len())?,
        })
    }
}

impl PacketBody for Marker {
    const TAG: Tag = Tag::Marker;

    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        if body.as_slice() != Self::BODY {
            return Err(PacketError::payload(Self::TAG.into(), constants::ERR_BAD_MARKER));
        }
        Ok(Self { header })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(Self::BODY);
    }
}

/// Tag 12: keyring-local trust data, opaque to everyone else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trust {
    header: PacketHeader,
    data: Vec<u8>,
}

impl Trust {
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

impl PacketBody for Trust {
    const TAG: Tag = Tag::Trust;

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

/// Tag 13: a user id, conventionally `Name <email>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId {
    header: PacketHeader,
    id: Vec<u8>,
}

impl UserId {
    pub fn new(id: impl Into<Vec<u8>>) -> Result<Self> {
        let id = id.into();
        Ok(Self {
            header: PacketHeader::new(Self::TAG, id.len())?,
            id,
        })
    }

    /// Build the canonical `Name <email>` form
    pub fn from_name_and_email(name: &[u8], email: &[u8]) -> Result<Self> {
        Self::new(format_user_id(name, email))
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// The id as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.id).ok()
    }

    /// Split the id into a name/email identifier for key lookup
    pub fn to_key_identifier(&self) -> Result<KeyIdentifier> {
        let text = self.as_str().ok_or_else(|| {
            PacketError::KeyIdentifierFormat("user id is not valid UTF-8".to_string())
        })?;
        KeyIdentifier::from_address(text)
    }
}

impl PacketBody for UserId {
    const TAG: Tag = Tag::UserId;

    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        Ok(Self { header, id: body })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_marker_body_is_exact() {
        let header = PacketHeader::new(Tag::Marker, 3).unwrap();
        assert!(Marker::from_body(header, b"PGP".to_vec()).is_ok());
        assert!(matches!(
            Marker::from_body(header, b"GPG".to_vec()),
            Err(PacketError::PayloadDecode { tag: 10, .. })
        ));
        assert_eq!(Marker::new().unwrap().to_bytes().unwrap(), vec![0xCA, 3, b'P', b'G', b'P']);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_user_id_identifier() {
        let uid = UserId::from_name_and_email(b"Joe Bloggs", b"joe@example.com").unwrap();
        assert_eq!(uid.as_str(), Some("Joe Bloggs <joe@example.com>"));

        match uid.to_key_identifier().unwrap() {
            KeyIdentifier::UserId { name, email } => {
                assert_eq!(name, b"Joe Bloggs");
                assert_eq!(email, b"joe@example.com");
            }
            other => panic!("unexpected identifier {other:?}"),
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_user_id_rejects_non_utf8() {
        let uid = UserId::new(vec![0xFF, 0xFE]).unwrap();
        assert!(uid.as_str().is_none());
        assert!(matches!(
            uid.to_key_identifier(),
            Err(PacketError::KeyIdentifierFormat(_))
        ));
    }
}
