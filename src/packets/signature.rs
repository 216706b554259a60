use super::{require_len, unsupported_version, PacketBody};
use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::{constants, PacketError, Result};
use crate::identity::KeyId;

/// Tag 2: a signature over data, a key, or a user id.
///
/// Only the leading fields are read. Subpackets and signature MPIs stay in
/// the raw body, which is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    header: PacketHeader,
    version: u8,
    signature_type: u8,
    public_key_algorithm: u8,
    hash_algorithm: u8,
    raw: Vec<u8>,
}

impl Signature {
    /// Wrap an already encoded signature body, version octet first
    pub fn new(raw: Vec<u8>) -> Result<Self> {
        let header = PacketHeader::new(Self::TAG, raw.len())?;
        Self::from_body(header, raw)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn signature_type(&self) -> u8 {
        self.signature_type
    }

    pub fn public_key_algorithm(&self) -> u8 {
        self.public_key_algorithm
    }

    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// Entire signature body, version octet included
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl PacketBody for Signature {
    const TAG: Tag = Tag::Signature;

    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        require_len(Self::TAG, &body, 1)?;
        let version = body[0];

        let (signature_type, public_key_algorithm, hash_algorithm) = match version {
            // v3: version, hashed length (always 5), type, time(4), key id(8), pk alg, hash alg
            2 | 3 => {
                require_len(Self::TAG, &body, 19)?;
                if body[1] != 5 {
                    return Err(PacketError::payload(
                        Self::TAG.into(),
                        "v3 signature hashed material length must be 5",
                    ));
                }
                (body[2], body[15], body[16])
            }
            4..=6 => {
                require_len(Self::TAG, &body, 4)?;
                (body[1], body[2], body[3])
            }
            other => return Err(unsupported_version(Self::TAG, other)),
        };

        Ok(Self {
            header,
            version,
            signature_type,
            public_key_algorithm,
            hash_algorithm,
            raw: body,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.raw);
    }
}

/// Tag 4: announces a signature that follows the signed data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnePassSignature {
    header: PacketHeader,
    signature_type: u8,
    hash_algorithm: u8,
    public_key_algorithm: u8,
    key_id: KeyId,
    is_last: bool,
}

impl OnePassSignature {
    const VERSION: u8 = 3;
    const BODY_LEN: usize = 13;

    pub fn new(
        signature_type: u8,
        hash_algorithm: u8,
        public_key_algorithm: u8,
        key_id: KeyId,
        is_last: bool,
    ) -> Result<Self> {
        Ok(Self {
            header: PacketHeader::new(Self::TAG, Self::BODY_LEN)?,
            signature_type,
            hash_algorithm,
            public_key_algorithm,
            key_id,
            is_last,
        })
    }

    pub fn signature_type(&self) -> u8 {
        self.signature_type
    }

    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    pub fn public_key_algorithm(&self) -> u8 {
        self.public_key_algorithm
    }

    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    /// False when another one-pass signature packet follows
    pub fn is_last(&self) -> bool {
        self.is_last
    }
}

impl PacketBody for OnePassSignature {
    const TAG: Tag = Tag::OnePassSignature;

    fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
        if body.len() != Self::BODY_LEN {
            return Err(PacketError::payload(
                Self::TAG.into(),
                constants::ERR_ONE_PASS_LENGTH,
            ));
        }
        if body[0] != Self::VERSION {
            return Err(unsupported_version(Self::TAG, body[0]));
        }

        let mut id = [0u8; KeyId::LEN];
        id.copy_from_slice(&body[4..12]);

        Ok(Self {
            header,
            signature_type: body[1],
            hash_algorithm: body[2],
            public_key_algorithm: body[3],
            key_id: KeyId::from(id),
            is_last: body[12] != 0,
        })
    }

    fn header(&self) -> &PacketHeader {
        &self.header
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.push(Self::VERSION);
        out.push(self.signature_type);
        out.push(self.hash_algorithm);
        out.push(self.public_key_algorithm);
        out.extend_from_slice(self.key_id.as_bytes());
        out.push(u8::from(self.is_last));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::header::BodyLength;

    #[allow(clippy::unwrap_used)]
    fn header(tag: Tag, len: usize) -> PacketHeader {
        PacketHeader::new(tag, len).unwrap()
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_v4_signature_fields() {
        let body = vec![4, 0x13, 1, 8, 0, 0, 0, 0, 0xDE, 0xAD];
        let sig = Signature::from_body(header(Tag::Signature, body.len()), body.clone()).unwrap();
        assert_eq!(sig.version(), 4);
        assert_eq!(sig.signature_type(), 0x13);
        assert_eq!(sig.public_key_algorithm(), 1);
        assert_eq!(sig.hash_algorithm(), 8);
        assert_eq!(sig.raw(), body.as_slice());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_v3_signature_fields() {
        let mut body = vec![3, 5, 0x00, 0, 0, 0, 1];
        body.extend_from_slice(&[9; 8]);
        body.extend_from_slice(&[17, 2, 0xAB, 0xCD]);
        let sig = Signature::from_body(header(Tag::Signature, body.len()), body).unwrap();
        assert_eq!(sig.version(), 3);
        assert_eq!(sig.public_key_algorithm(), 17);
        assert_eq!(sig.hash_algorithm(), 2);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_signature_from_raw_body() {
        let sig = Signature::new(vec![4, 0x00, 22, 10, 0, 0]).unwrap();
        assert_eq!(sig.header().tag(), u8::from(Tag::Signature));
        assert_eq!(sig.header().length(), BodyLength::Fixed(6));
        assert_eq!(sig.public_key_algorithm(), 22);
        assert_eq!(sig.hash_algorithm(), 10);

        let mut body = Vec::new();
        sig.write_body(&mut body);
        assert_eq!(body, sig.raw());

        let short = Signature::new(vec![4, 0]);
        assert!(matches!(short, Err(PacketError::PayloadDecode { tag: 2, .. })));
    }

    #[test]
    fn test_signature_rejects_unknown_version() {
        let result = Signature::from_body(header(Tag::Signature, 4), vec![9, 0, 0, 0]);
        assert!(matches!(result, Err(PacketError::PayloadDecode { tag: 2, .. })));
        let empty = Signature::from_body(header(Tag::Signature, 0), Vec::new());
        assert!(matches!(empty, Err(PacketError::PayloadDecode { tag: 2, .. })));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_one_pass_signature_layout() {
        let ops = OnePassSignature::new(0x00, 8, 1, KeyId::from([7; 8]), true).unwrap();
        let mut body = Vec::new();
        ops.write_body(&mut body);
        assert_eq!(body.len(), 13);
        assert_eq!(body[0], 3);
        assert_eq!(body[12], 1);

        let parsed = OnePassSignature::from_body(*ops.header(), body).unwrap();
        assert_eq!(parsed, ops);
    }

    #[test]
    fn test_one_pass_signature_length_is_exact() {
        let result = OnePassSignature::from_body(header(Tag::OnePassSignature, 12), vec![3; 12]);
        assert!(matches!(result, Err(PacketError::PayloadDecode { tag: 4, .. })));
    }
}
