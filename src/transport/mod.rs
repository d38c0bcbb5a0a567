//! Transport module - the byte-level link underneath the framing layer.
//!
//! The framing layer only needs two non-blocking primitives:
//! - receive one byte if one is available
//! - offer one byte, which the transport may accept or refuse for now
//!
//! Provides:
//! - [`MemoryTransport`]: in-process byte queues (tests, simulations)
//! - [`IoTransport`]: adapter over `std::io::Read + Write`, e.g. a serial
//!   device opened in non-blocking mode

mod io;
mod memory;

pub use self::io::IoTransport;
pub use memory::MemoryTransport;

use crate::error::Result;

/// Outcome of offering one byte to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// The byte was taken.
    Accepted,
    /// The transport cannot take the byte right now; offer it again later.
    Busy,
}

/// A byte-oriented, non-packetized link.
///
/// Implementations are driven from a single execution context; the
/// framing layer never calls them concurrently.
pub trait ByteTransport {
    /// Prepare the transport. Must complete before any frame operation.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Take one byte if one is available.
    ///
    /// Returns `Ok(None)` when nothing is buffered. That is the normal
    /// idle state, not an error.
    fn try_recv(&mut self) -> Result<Option<u8>>;

    /// Offer one byte without blocking.
    ///
    /// An `Err` is a real transport failure; `Ok(SendStatus::Busy)` means
    /// retry.
    fn try_send(&mut self, byte: u8) -> Result<SendStatus>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn try_recv(&mut self) -> Result<Option<u8>> {
        (**self).try_recv()
    }

    fn try_send(&mut self, byte: u8) -> Result<SendStatus> {
        (**self).try_send(byte)
    }
}
