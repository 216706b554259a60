//! # Transport
//!
//! The command pipe contract used by proxy layers that relay higher-level
//! protocol commands over a transport, and `PacketPipe`, its packet-level
//! implementation over a blocking reader and writer.
//!
//! ## Lifecycle
//! ```text
//! Idle --connect--> Connected --disconnect--> Closed
//! ```
//! A closed pipe cannot be reconnected.

pub mod pipe;

pub use pipe::PacketPipe;

use crate::error::Result;

/// Request/response channel between a proxy and the far end.
///
/// Operations other than `connect` fail with `ConnectionClosed` unless the
/// pipe is connected. Implementations translating foreign protocol commands
/// report commands without an equivalent as `NoMapping`.
pub trait CommandPipe {
    type Command;
    type Response;

    fn connect(&mut self) -> Result<()>;

    /// Flush pending output and close. Disconnecting twice is a no-op.
    fn disconnect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    fn send_command(&mut self, command: Self::Command) -> Result<()>;

    /// Block until the next response arrives
    fn await_response(&mut self) -> Result<Self::Response>;
}
