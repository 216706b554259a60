use super::CommandPipe;
use crate::core::packet::Packet;
use crate::core::reader::PacketReader;
use crate::core::writer::PacketWriter;
use crate::error::{PacketError, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipeState {
    Idle,
    Connected,
    Closed,
}

/// Packets out through a `PacketWriter`, packets back through a `PacketReader`
#[derive(Debug)]
pub struct PacketPipe<R: BufRead, W: Write> {
    reader: PacketReader<R>,
    writer: PacketWriter<W>,
    state: PipeState,
}

impl<R: BufRead, W: Write> PacketPipe<R, W> {
    pub fn new(reader: PacketReader<R>, writer: PacketWriter<W>) -> Self {
        Self {
            reader,
            writer,
            state: PipeState::Idle,
        }
    }

    /// Take the reader and writer back
    pub fn into_parts(self) -> (PacketReader<R>, PacketWriter<W>) {
        (self.reader, self.writer)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.state == PipeState::Connected {
            Ok(())
        } else {
            Err(PacketError::ConnectionClosed)
        }
    }
}

impl<R: BufRead, W: Write> CommandPipe for PacketPipe<R, W> {
    type Command = Packet;
    type Response = Packet;

    fn connect(&mut self) -> Result<()> {
        match self.state {
            PipeState::Idle => {
                self.state = PipeState::Connected;
                info!("packet pipe connected");
                Ok(())
            }
            PipeState::Connected => Ok(()),
            PipeState::Closed => Err(PacketError::ConnectionClosed),
        }
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.state == PipeState::Closed {
            return Ok(());
        }
        let was_connected = self.state == PipeState::Connected;
        self.state = PipeState::Closed;
        if was_connected {
            self.writer.get_mut().flush()?;
            info!(
                sent = self.writer.packets_written(),
                received = self.reader.packets_read(),
                "packet pipe disconnected"
            );
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state == PipeState::Connected
    }

    #[instrument(level = "debug", skip_all, fields(tag = %command.tag()))]
    fn send_command(&mut self, command: Packet) -> Result<()> {
        self.ensure_connected()?;
        self.writer.write_packet(&command)
    }

    #[instrument(level = "debug", skip_all)]
    fn await_response(&mut self) -> Result<Packet> {
        self.ensure_connected()?;
        match self.reader.read_packet()? {
            Some(packet) => Ok(packet),
            None => {
                debug!("packet source exhausted while awaiting response");
                self.state = PipeState::Closed;
                Err(PacketError::ConnectionClosed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::{Marker, UserId};

    fn pipe(incoming: &[u8]) -> PacketPipe<&[u8], Vec<u8>> {
        PacketPipe::new(PacketReader::new(incoming), PacketWriter::new(Vec::new()))
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_operations_require_connection() {
        let mut pipe = pipe(&[]);
        assert!(!pipe.is_connected());
        assert!(matches!(
            pipe.send_command(Marker::new().unwrap().into()),
            Err(PacketError::ConnectionClosed)
        ));
        assert!(matches!(pipe.await_response(), Err(PacketError::ConnectionClosed)));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_round_trip_and_close() {
        let incoming = [0xCD, 3, b'e', b'v', b'e'];
        let mut pipe = pipe(&incoming);
        pipe.connect().unwrap();
        pipe.send_command(UserId::new("dan").unwrap().into()).unwrap();

        let response = pipe.await_response().unwrap();
        assert_eq!(response.body_bytes(), b"eve".to_vec());

        // source exhausted
        assert!(matches!(pipe.await_response(), Err(PacketError::ConnectionClosed)));
        assert!(!pipe.is_connected());
        assert!(matches!(pipe.connect(), Err(PacketError::ConnectionClosed)));

        let (_, writer) = pipe.into_parts();
        assert_eq!(writer.get_ref().as_slice(), &[0xCD, 3, b'd', b'a', b'n']);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_disconnect_is_idempotent() {
        let mut pipe = pipe(&[]);
        pipe.connect().unwrap();
        pipe.disconnect().unwrap();
        pipe.disconnect().unwrap();
        assert!(matches!(
            pipe.send_command(Marker::new().unwrap().into()),
            Err(PacketError::ConnectionClosed)
        ));
    }
}
