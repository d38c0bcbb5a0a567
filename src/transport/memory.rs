//! In-memory transport.
//!
//! Holds an inbound queue the decoder reads from and an outbound buffer the
//! encoder writes to. Send refusals and failures can be scripted to exercise
//! the retry and abort paths.
//!
//! # Example
//!
//! ```
//! use sensorlink::transport::{ByteTransport, MemoryTransport};
//!
//! let mut transport = MemoryTransport::new();
//! transport.feed(&[0x5A, 0x00]);
//!
//! assert_eq!(transport.try_recv().unwrap(), Some(0x5A));
//! assert_eq!(transport.pending(), 1);
//! ```

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};

use super::{ByteTransport, SendStatus};
use crate::error::{LinkError, Result};

/// Byte queues standing in for a physical link.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    /// Bytes waiting to be received.
    inbound: VecDeque<u8>,
    /// Bytes accepted by `try_send`.
    outbound: BytesMut,
    /// Number of upcoming `try_send` calls to refuse with `Busy`.
    refuse: usize,
    /// Outbound length at which `try_send` starts failing.
    fail_after: Option<usize>,
    /// Whether `init` has run.
    initialized: bool,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with `bytes` already waiting to be received.
    pub fn with_inbound(bytes: &[u8]) -> Self {
        let mut transport = Self::new();
        transport.feed(bytes);
        transport
    }

    /// Append bytes to the inbound queue.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Number of inbound bytes not yet received.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Bytes sent so far.
    pub fn sent(&self) -> &[u8] {
        &self.outbound
    }

    /// Take the bytes sent so far, leaving the outbound buffer empty.
    pub fn take_sent(&mut self) -> Bytes {
        self.outbound.split().freeze()
    }

    /// Move every sent byte into the inbound queue (loopback).
    pub fn loop_back(&mut self) {
        let sent = self.take_sent();
        self.feed(&sent);
    }

    /// Refuse the next `count` send attempts with [`SendStatus::Busy`].
    pub fn refuse_next(&mut self, count: usize) {
        self.refuse = count;
    }

    /// Fail every send once the outbound buffer holds `count` bytes.
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(count);
    }

    /// Whether `init` has been called.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ByteTransport for MemoryTransport {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<u8>> {
        Ok(self.inbound.pop_front())
    }

    fn try_send(&mut self, byte: u8) -> Result<SendStatus> {
        if self.fail_after.is_some_and(|limit| self.outbound.len() >= limit) {
            return Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted send failure",
            )));
        }

        if self.refuse > 0 {
            self.refuse -= 1;
            return Ok(SendStatus::Busy);
        }

        self.outbound.extend_from_slice(&[byte]);
        Ok(SendStatus::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recv_in_order_then_empty() {
        let mut transport = MemoryTransport::with_inbound(&[1, 2]);

        assert_eq!(transport.try_recv().unwrap(), Some(1));
        assert_eq!(transport.try_recv().unwrap(), Some(2));
        assert_eq!(transport.try_recv().unwrap(), None);
        assert_eq!(transport.try_recv().unwrap(), None);
    }

    #[test]
    fn test_refuse_then_accept() {
        let mut transport = MemoryTransport::new();
        transport.refuse_next(2);

        assert_eq!(transport.try_send(9).unwrap(), SendStatus::Busy);
        assert_eq!(transport.try_send(9).unwrap(), SendStatus::Busy);
        assert_eq!(transport.try_send(9).unwrap(), SendStatus::Accepted);
        assert_eq!(transport.sent(), &[9]);
    }

    #[test]
    fn test_fail_after() {
        let mut transport = MemoryTransport::new();
        transport.fail_after(1);

        assert!(transport.try_send(1).is_ok());
        let err = transport.try_send(2).unwrap_err();
        assert!(matches!(err, LinkError::Io(_)));
        assert_eq!(transport.sent(), &[1]);
    }

    #[test]
    fn test_loop_back() {
        let mut transport = MemoryTransport::new();
        transport.try_send(0x5A).unwrap();
        transport.try_send(0x01).unwrap();

        transport.loop_back();

        assert!(transport.sent().is_empty());
        assert_eq!(transport.pending(), 2);
        assert_eq!(transport.try_recv().unwrap(), Some(0x5A));
    }

    #[test]
    fn test_init_flag() {
        let mut transport = MemoryTransport::new();
        assert!(!transport.is_initialized());
        transport.init().unwrap();
        assert!(transport.is_initialized());
    }
}
