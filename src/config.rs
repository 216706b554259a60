//! # Configuration Management
//!
//! Decoder limits and policies for OpenPGP packet framing.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` or strings via `from_toml()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Security Considerations
//! - Body lengths come straight off the wire, so `max_body_length` is checked
//!   before any allocation happens.
//! - The `buffered` indeterminate policy never blocks for more input than the
//!   source already holds, but it is unreliable on multiplexed streams.

use crate::error::{PacketError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Default cap on a single packet body (16 MB)
pub const MAX_BODY_LENGTH: usize = 16 * 1024 * 1024;

/// Smallest first chunk a partial-length body may start with
pub const MIN_FIRST_PARTIAL_CHUNK: u32 = 512;

/// How new-format partial body lengths are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialBodyPolicy {
    /// Read chunks until a terminating non-partial length and join them
    #[default]
    Reassemble,
    /// Treat any partial length as a framing error
    Reject,
}

impl FromStr for PartialBodyPolicy {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reassemble" => Ok(PartialBodyPolicy::Reassemble),
            "reject" => Ok(PartialBodyPolicy::Reject),
            other => Err(PacketError::ConfigError(format!(
                "unknown partial body policy: '{other}'"
            ))),
        }
    }
}

/// How legacy indeterminate-length bodies are delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminatePolicy {
    /// Take only the octets the source has already buffered.
    ///
    /// When the header drained the buffer, `fill_buf` refills it with a
    /// single read, which blocks until the source yields data or reports end
    /// of stream. The body is whatever that one read returned.
    #[default]
    Buffered,
    /// Read until the source is exhausted
    UntilEof,
}

impl FromStr for IndeterminatePolicy {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buffered" => Ok(IndeterminatePolicy::Buffered),
            "until_eof" => Ok(IndeterminatePolicy::UntilEof),
            other => Err(PacketError::ConfigError(format!(
                "unknown indeterminate policy: '{other}'"
            ))),
        }
    }
}

/// Framing configuration shared by `PacketReader` and `PacketCodec`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Largest body (after partial reassembly) the decoder will allocate
    pub max_body_length: usize,

    /// Partial body length handling
    pub partial_bodies: PartialBodyPolicy,

    /// Legacy indeterminate length handling
    pub indeterminate: IndeterminatePolicy,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_body_length: MAX_BODY_LENGTH,
            partial_bodies: PartialBodyPolicy::default(),
            indeterminate: IndeterminatePolicy::default(),
        }
    }
}

impl FramingConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| PacketError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| PacketError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| PacketError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(limit) = std::env::var("PGP_FRAMING_MAX_BODY_LENGTH") {
            config.max_body_length = limit.parse::<usize>().map_err(|e| {
                PacketError::ConfigError(format!("PGP_FRAMING_MAX_BODY_LENGTH: {e}"))
            })?;
        }

        if let Ok(policy) = std::env::var("PGP_FRAMING_PARTIAL_BODIES") {
            config.partial_bodies = policy.parse()?;
        }

        if let Ok(policy) = std::env::var("PGP_FRAMING_INDETERMINATE") {
            config.indeterminate = policy.parse()?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PacketError::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_body_length == 0 {
            errors.push("Max body length cannot be 0".to_string());
        } else if self.max_body_length > u32::MAX as usize {
            errors.push(format!(
                "Max body length too large: {} octets (maximum: {})",
                self.max_body_length,
                u32::MAX
            ));
        }

        if self.partial_bodies == PartialBodyPolicy::Reassemble
            && self.max_body_length < MIN_FIRST_PARTIAL_CHUNK as usize
        {
            errors.push(format!(
                "Max body length {} is below the {} octet minimum partial chunk",
                self.max_body_length, MIN_FIRST_PARTIAL_CHUNK
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PacketError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
