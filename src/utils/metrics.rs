//! Observability and Metrics
//!
//! Counters for packet framing traffic and failures. A single `Metrics` can
//! be shared between readers and writers through an `Arc`.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::error::PacketError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for packet framing
#[derive(Debug)]
pub struct Metrics {
    /// Packets successfully decoded
    pub packets_read: AtomicU64,
    /// Body octets consumed by the decoder
    pub body_bytes_read: AtomicU64,
    /// Packets written and flushed
    pub packets_written: AtomicU64,
    /// Wire octets written, headers included
    pub bytes_written: AtomicU64,
    /// Malformed tags, length types, truncations, oversized bodies
    pub framing_errors: AtomicU64,
    /// Packets with a tag outside the supported set
    pub unsupported_packets: AtomicU64,
    /// Bodies rejected by their packet variant
    pub payload_errors: AtomicU64,
    /// Underlying I/O failures
    pub transport_errors: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            packets_read: AtomicU64::new(0),
            body_bytes_read: AtomicU64::new(0),
            packets_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            framing_errors: AtomicU64::new(0),
            unsupported_packets: AtomicU64::new(0),
            payload_errors: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a decoded packet and its body length
    pub fn packet_read(&self, body_len: u64) {
        self.packets_read.fetch_add(1, Ordering::Relaxed);
        self.body_bytes_read.fetch_add(body_len, Ordering::Relaxed);
    }

    /// Record a written packet and its wire length
    pub fn packet_written(&self, byte_count: u64) {
        self.packets_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Count an error under its kind
    pub fn record_error(&self, error: &PacketError) {
        let counter = match error {
            PacketError::Framing(_) | PacketError::BodyTooLarge { .. } => &self.framing_errors,
            PacketError::UnsupportedPacketType(_) => &self.unsupported_packets,
            PacketError::PayloadDecode { .. } => &self.payload_errors,
            PacketError::Io(_) => &self.transport_errors,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_read: self.packets_read.load(Ordering::Relaxed),
            body_bytes_read: self.body_bytes_read.load(Ordering::Relaxed),
            packets_written: self.packets_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            framing_errors: self.framing_errors.load(Ordering::Relaxed),
            unsupported_packets: self.unsupported_packets.load(Ordering::Relaxed),
            payload_errors: self.payload_errors.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            uptime_secs: self.uptime_secs(),
        }
    }

    /// Log a summary of the counters at info level
    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            packets_read = s.packets_read,
            body_bytes_read = s.body_bytes_read,
            packets_written = s.packets_written,
            bytes_written = s.bytes_written,
            framing_errors = s.framing_errors,
            unsupported_packets = s.unsupported_packets,
            payload_errors = s.payload_errors,
            transport_errors = s.transport_errors,
            uptime_secs = s.uptime_secs,
            "packet framing metrics"
        );
    }

    /// Reset all counters (useful for testing)
    pub fn reset(&self) {
        self.packets_read.store(0, Ordering::Relaxed);
        self.body_bytes_read.store(0, Ordering::Relaxed);
        self.packets_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.framing_errors.store(0, Ordering::Relaxed);
        self.unsupported_packets.store(0, Ordering::Relaxed);
        self.payload_errors.store(0, Ordering::Relaxed);
        self.transport_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of the counters at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub packets_read: u64,
    pub body_bytes_read: u64,
    pub packets_written: u64,
    pub bytes_written: u64,
    pub framing_errors: u64,
    pub unsupported_packets: u64,
    pub payload_errors: u64,
    pub transport_errors: u64,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FramingError;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.packet_read(10);
        metrics.packet_read(5);
        metrics.packet_written(7);

        let s = metrics.snapshot();
        assert_eq!(s.packets_read, 2);
        assert_eq!(s.body_bytes_read, 15);
        assert_eq!(s.packets_written, 1);
        assert_eq!(s.bytes_written, 7);
    }

    #[test]
    fn test_error_classification() {
        let metrics = Metrics::new();
        metrics.record_error(&FramingError::TruncatedHeader.into());
        metrics.record_error(&PacketError::UnsupportedPacketType(40));
        metrics.record_error(&PacketError::payload(2, "bad"));
        metrics.record_error(&PacketError::StreamFailed);

        let s = metrics.snapshot();
        assert_eq!(s.framing_errors, 1);
        assert_eq!(s.unsupported_packets, 1);
        assert_eq!(s.payload_errors, 1);
        assert_eq!(s.transport_errors, 0);

        metrics.reset();
        assert_eq!(metrics.snapshot().framing_errors, 0);
    }
}
