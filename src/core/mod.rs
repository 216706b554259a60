//! # Core Framing Components
//!
//! Packet headers, body-length arithmetic, dispatch over the supported tags,
//! and the stream decoder and encoder built on them.
//!
//! ## Components
//! - **Header**: legacy and new-format header decoding and encoding
//! - **Tag**: the supported packet tags
//! - **Packet**: closed set of packet variants
//! - **Reader / Writer**: blocking decoder and encoder over `BufRead` / `Write`
//! - **Codec**: Tokio codec for framing over async byte streams
//!
//! ## Security
//! - Body lengths are checked against `FramingConfig::max_body_length`
//!   before allocation
//! - Partial bodies are only accepted for the tags that permit them

pub mod codec;
pub mod header;
pub mod packet;
pub mod reader;
pub mod tag;
pub mod writer;
