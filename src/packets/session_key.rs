use super::{require_len, unsupported_version, PacketBody};
use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::Result;
use crate::identity::KeyId;

/// Tag 1: a session key encrypted to a recipient's public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyEncryptedSessionKey {
    header: PacketHeader,
    key_id: KeyId,
    algorithm: u8,
    encrypted_key: Vec<u8>,
}

impl PublicKeyEncryptedSessionKey {
    const VERSION: u8 = 3;

    pub fn new(key_id: KeyId, algorithm: u8, encrypted_key: Vec<u8>) -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, 10 + encrypted_key.len())?,
            key_id,
            algorithm,
            encrypted_key,
        })
    }

    /// Recipient key id; all zeros is a wildcard
    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Algorithm-specific encrypted session key MPIs
    pub fn encrypted_key(&self) -> &[u8] {
        &self.encrypted_key
    }
}

impl PacketBody for PublicKeyEncryptedSessionKey {
    const TAG: Tag = Tag::PublicKeyEncryptedSessionKey;

    fn from_body(header: PacketHeader, mut body: Vec<u8>) -> Result<Self> {
        require_len(Self::TAG, &body, 10)?;
        if body[0] != Self::VERSION {
            return Err(unsupported_version(Self::TAG, body[0]));
        }

        let mut id = [0u8; KeyId::LEN];
        id.copy_from_slice(&body[1..9]);
        let algorithm = body[9];
        let encrypted_key = body.split_off(10);

        Ok(Self {
            header,
            key_id: KeyId::from(id),
            algorithm,
            encrypted_key,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(Self::VERSION);
        out.extend_from_slice(self.key_id.as_bytes());
        out.push(self.algorithm);
        out.extend_from_slice(&self.encrypted_key);
    }
}

/// Tag 3: a session key derived from, or encrypted with, a passphrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymKeyEncryptedSessionKey {
    header: PacketHeader,
    algorithm: u8,
    s2k_and_key: Vec<u8>,
}

impl SymKeyEncryptedSessionKey {
    const VERSION: u8 = 4;

    pub fn new(algorithm: u8, s2k_and_key: Vec<u8>) -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, 2 + s2k_and_key.len())?,
            algorithm,
            s2k_and_key,
        })
    }

    /// Symmetric algorithm the session key is used with
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// S2K specifier followed by the optional encrypted session key
    pub fn s2k_and_key(&self) -> &[u8] {
        &self.s2k_and_key
    }
}

impl PacketBody for SymKeyEncryptedSessionKey {
    const TAG: Tag = Tag::SymKeyEncryptedSessionKey;

    fn from_body(header: PacketHeader, mut body: Vec<u8>) -> Result<Self> {
        require_len(Self::TAG, &body, 2)?;
        if body[0] != Self::VERSION {
            return Err(unsupported_version(Self::TAG, body[0]));
        }

        let algorithm = body[1];
        let s2k_and_key = body.split_off(2);
        Ok(Self {
            header,
            algorithm,
            s2k_and_key,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(Self::VERSION);
        out.push(self.algorithm);
        out.extend_from_slice(&self.s2k_and_key);
    }
}
