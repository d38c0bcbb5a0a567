//! `std::io` adapter.
//!
//! Wraps any reader/writer pair, typically both halves of a serial device
//! opened with `O_NONBLOCK`.
//!
//! Mapping:
//! - read `WouldBlock` or `Interrupted` → no data
//! - write `WouldBlock` or `Interrupted` → [`SendStatus::Busy`]
//! - read or write `Ok(0)` → [`LinkError::TransportClosed`]
//! - anything else → [`LinkError::Io`]
//!
//! A read of `Ok(0)` is end-of-stream (peer closed, device unplugged). An
//! idle reader must report `WouldBlock` instead, so termios `VMIN = 0`
//! without `O_NONBLOCK` is not enough.
//!
//! Writes go straight to `W`; wrapping it in a `BufWriter` would hold
//! frames back until the buffer fills.
//!
//! # Example
//!
//! ```ignore
//! use std::fs::OpenOptions;
//! use std::os::unix::fs::OpenOptionsExt;
//! use sensorlink::transport::IoTransport;
//!
//! let port = OpenOptions::new()
//!     .read(true)
//!     .write(true)
//!     .custom_flags(libc::O_NONBLOCK)
//!     .open("/dev/ttyUSB0")?;
//! let transport = IoTransport::new(port.try_clone()?, port);
//! ```

use std::io::{ErrorKind, Read, Write};

use super::{ByteTransport, SendStatus};
use crate::error::{LinkError, Result};

/// Byte transport over a `Read` half and a `Write` half.
#[derive(Debug)]
pub struct IoTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> IoTransport<R, W> {
    /// Create a transport from a reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Get a reference to the reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Get a reference to the writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap into the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> ByteTransport for IoTransport<R, W> {
    fn try_recv(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte) {
            Ok(0) => Err(LinkError::TransportClosed),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(LinkError::Io(e)),
        }
    }

    fn try_send(&mut self, byte: u8) -> Result<SendStatus> {
        match self.writer.write(&[byte]) {
            Ok(0) => Err(LinkError::TransportClosed),
            Ok(_) => Ok(SendStatus::Accepted),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(SendStatus::Busy)
            }
            Err(e) => Err(LinkError::Io(e)),
        }
    }
}
