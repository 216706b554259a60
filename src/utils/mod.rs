//! # Utility Modules
//!
//! Supporting utilities shared by the decoder and encoder.
//!
//! ## Components
//! - **Metrics**: thread-safe counters for packets, octets, and error kinds

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
