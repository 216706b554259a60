use super::{be_u32, require_len, unsupported_version, PacketBody};
use crate::core::header::PacketHeader;
use crate::core::tag::Tag;
use crate::error::Result;

/// Structural fields shared by the four key packets.
///
/// The algorithm-specific key material (and, for secret keys, the S2K usage
/// and protected secret MPIs) is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    version: u8,
    created: u32,
    validity_days: Option<u16>,
    algorithm: u8,
    material: Vec<u8>,
}

impl KeyMaterial {
    /// Version 4 key material
    pub fn v4(created: u32, algorithm: u8, material: Vec<u8>) -> Self {
        Self {
            version: 4,
            created,
            validity_days: None,
            algorithm,
            material,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Creation time, seconds since the Unix epoch
    pub fn created(&self) -> u32 {
        self.created
    }

    /// v2/v3 keys only; zero means the key does not expire
    pub fn validity_days(&self) -> Option<u16> {
        self.validity_days
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn material(&self) -> &[u8] {
        &self.material
    }

    fn parse(tag: Tag, mut body: Vec<u8>) -> Result<Self> {
        require_len(tag, &body, 1)?;
        let version = body[0];

        let (validity_days, algorithm, rest) = match version {
            2 | 3 => {
                require_len(tag, &body, 8)?;
                (Some(u16::from_be_bytes([body[5], body[6]])), body[7], 8)
            }
            4..=6 => {
                require_len(tag, &body, 6)?;
                (None, body[5], 6)
            }
            other => return Err(unsupported_version(tag, other)),
        };

        Ok(Self {
            version,
            created: be_u32(&body[1..5]),
            validity_days,
            algorithm,
            material: body.split_off(rest),
        })
    }

    fn encoded_len(&self) -> usize {
        1 + 4 + self.validity_days.map_or(0, |_| 2) + 1 + self.material.len()
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.version);
        out.extend_from_slice(&self.created.to_be_bytes());
        if let Some(days) = self.validity_days {
            out.extend_from_slice(&days.to_be_bytes());
        }
        out.push(self.algorithm);
        out.extend_from_slice(&self.material);
    }
}

macro_rules! key_packet {
    ($(#[$doc:meta])* $name:ident, $tag:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            header: PacketHeader,
            key: KeyMaterial,
        }

        impl $name {
            pub fn new(key: KeyMaterial) -> Result<Self> {
                Ok(Self {
                    header: PacketHeader::new($tag, key.encoded_len())?,
                    key,
                })
            }

            pub fn key(&self) -> &KeyMaterial {
                &self.key
            }
        }

        impl PacketBody for $name {
            const TAG: Tag = $tag;

            fn from_body(header: PacketHeader, body: Vec<u8>) -> Result<Self> {
                Ok(Self {
                    header,
                    key: KeyMaterial::parse(Self::TAG, body)?,
                })
            }

            fn header(&self) -> &PacketHeader {
                &self.header
            }

            fn write_body(&self, out: &mut Vec<u8>) {
                self.key.write(out);
            }
        }
    };
}

key_packet!(
    /// Tag 5: primary secret key
    SecretKey,
    Tag::SecretKey
);
key_packet!(
    /// Tag 6: primary public key
    PublicKey,
    Tag::PublicKey
);
key_packet!(
    /// Tag 7: secret subkey
    SecretSubkey,
    Tag::SecretSubkey
);
key_packet!(
    /// Tag 14: public subkey
    PublicSubkey,
    Tag::PublicSubkey
);
