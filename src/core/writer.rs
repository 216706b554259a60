//! Blocking packet encoder over any `Write` sink.

use crate::core::packet::Packet;
use crate::error::Result;
use crate::utils::metrics::Metrics;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

/// Packet encoder owning its byte sink.
///
/// Every packet is written with a new-format header and flushed before
/// `write_packet` returns.
#[derive(Debug)]
pub struct PacketWriter<W: Write> {
    inner: W,
    metrics: Option<Arc<Metrics>>,
    packets_written: u64,
}

impl<W: Write> PacketWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            metrics: None,
            packets_written: 0,
        }
    }

    /// Report written packets and errors to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn packets_written(&self) -> u64 {
        self.packets_written
    }

    /// Serialize `packet`, write it in full, and flush the sink
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let result = packet.to_bytes().and_then(|bytes| {
            self.inner.write_all(&bytes)?;
            self.inner.flush()?;
            Ok(bytes.len())
        });

        match result {
            Ok(len) => {
                self.packets_written += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.packet_written(len as u64);
                }
                debug!(tag = %packet.tag(), wire_len = len, "wrote packet");
                Ok(())
            }
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(&e);
                }
                warn!(tag = %packet.tag(), error = %e, "failed to write packet");
                Err(e)
            }
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flush and release the sink
    pub fn close(mut self) -> Result<()> {
        self.inner.flush()?;
        debug!(packets = self.packets_written, "packet writer closed");
        Ok(())
    }
}
