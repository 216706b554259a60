//! # Key Identification
//!
//! Identifiers handed to the key store: either an 8-octet key id, or the
//! name/email pair of a user id.
//!
//! ## Address Rules
//! The address is split on `<` and `>` and empty pieces are dropped:
//! - one token: a bare email address, empty name
//! - two tokens: `Name <email>`, name trimmed and unquoted
//! - anything else is a `KeyIdentifierFormat` error

use crate::error::{constants, PacketError, Result};
use std::fmt;

/// 8-octet OpenPGP key id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId([u8; 8]);

impl KeyId {
    pub const LEN: usize = 8;

    /// Fails unless `bytes` is exactly 8 octets long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; 8]>::try_from(bytes)
            .map(KeyId)
            .map_err(|_| PacketError::KeyIdentifierFormat(constants::ERR_KEY_ID_LENGTH.into()))
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// The all-zero id used for anonymous recipients
    pub fn is_wildcard(&self) -> bool {
        self.0 == [0; 8]
    }
}

impl From<[u8; 8]> for KeyId {
    fn from(bytes: [u8; 8]) -> Self {
        KeyId(bytes)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// What the key store is asked to look up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyIdentifier {
    KeyId(KeyId),
    UserId { name: Vec<u8>, email: Vec<u8> },
}

impl KeyIdentifier {
    /// Key id identifier; the slice must be exactly 8 octets
    pub fn from_key_id(bytes: &[u8]) -> Result<Self> {
        KeyId::from_slice(bytes).map(KeyIdentifier::KeyId)
    }

    /// Name/email identifier parsed from an address string
    pub fn from_address(address: &str) -> Result<Self> {
        let (name, email) = parse_address(address)?;
        Ok(KeyIdentifier::UserId {
            name: name.into_bytes(),
            email: email.into_bytes(),
        })
    }

    /// Canonical user id octets, for the name/email form
    pub fn user_id_bytes(&self) -> Option<Vec<u8>> {
        match self {
            KeyIdentifier::KeyId(_) => None,
            KeyIdentifier::UserId { name, email } => Some(format_user_id(name, email)),
        }
    }
}

/// Split an address into `(name, email)`.
///
/// `"user@example.com"` gives an empty name; `"Joe Bloggs <joe@example.com>"`
/// gives `("Joe Bloggs", "joe@example.com")`.
pub fn parse_address(address: &str) -> Result<(String, String)> {
    let tokens: Vec<&str> = address
        .split(['<', '>'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [] => Err(PacketError::KeyIdentifierFormat(
            constants::ERR_EMPTY_ADDRESS.into(),
        )),
        [email] => Ok((String::new(), (*email).to_string())),
        [name, email] => {
            let name = name.trim_matches('"').trim();
            Ok((name.to_string(), (*email).to_string()))
        }
        _ => Err(PacketError::KeyIdentifierFormat(format!(
            "{}: '{address}'",
            constants::ERR_ADDRESS_TOKENS
        ))),
    }
}

/// `Name <email>`, or just `<email>` when the name is empty
pub fn format_user_id(name: &[u8], email: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + email.len() + 3);
    if !name.is_empty() {
        out.extend_from_slice(name);
        out.push(b' ');
    }
    out.push(b'<');
    out.extend_from_slice(email);
    out.push(b'>');
    out
}
