//! Frame encoder.
//!
//! Writes `[SYNC_BYTE, type id, payload...]` one byte at a time. When the
//! transport refuses a byte the encoder retries it under a [`SendPolicy`]:
//!
//! ```text
//! try_send ─► Accepted ─► next byte
//!     │
//!     └──► Busy ─► timeout elapsed? ─► yes: SendTimeout
//!                        │
//!                        └──► no: back off, try again
//! ```
//!
//! A failure or timeout aborts the frame where it stands. Bytes already
//! accepted stay sent; the peer's decoder resynchronizes on the next sync
//! byte.
//!
//! # Example
//!
//! ```
//! use sensorlink::{Encoder, PacketType};
//! use sensorlink::transport::MemoryTransport;
//!
//! let encoder = Encoder::new();
//! let mut transport = MemoryTransport::new();
//!
//! encoder.send(&mut transport, PacketType::Ping, &[0u8; 16]).unwrap();
//! assert_eq!(transport.sent().len(), 18);
//! ```

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::error::{LinkError, Result};
use crate::protocol::{build_frame, encode_header, PacketType, Registry};
use crate::transport::{ByteTransport, SendStatus};

/// Shortest pause between async retries.
const ASYNC_MIN_BACKOFF: Duration = Duration::from_micros(100);

/// Retry contract for bytes the transport refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendPolicy {
    /// Pause between attempts. Zero spins.
    pub backoff: Duration,
    /// How long a single byte may keep being refused. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl SendPolicy {
    /// Spin until every byte is accepted.
    pub const BLOCKING: SendPolicy = SendPolicy {
        backoff: Duration::ZERO,
        timeout: None,
    };

    /// Create a policy with a backoff and a per-byte timeout.
    pub fn new(backoff: Duration, timeout: Option<Duration>) -> Self {
        Self { backoff, timeout }
    }
}

/// Serializes frames onto a [`ByteTransport`].
///
/// Holds no per-frame state; one encoder can serve any number of sends.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    registry: Registry,
    policy: SendPolicy,
}

impl Encoder {
    /// Create an encoder for the standard registry that spins on `Busy`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder for a custom registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            policy: SendPolicy::BLOCKING,
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: SendPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the retry policy.
    pub fn policy(&self) -> SendPolicy {
        self.policy
    }

    /// Encode a frame to bytes without sending it.
    ///
    /// # Panics
    ///
    /// Panics if `payload` is not exactly the registered size for `packet_type`.
    pub fn encode(&self, packet_type: PacketType, payload: &[u8]) -> Bytes {
        self.check_payload(packet_type, payload);
        build_frame(packet_type, payload)
    }

    /// Send one frame, blocking the caller until every byte is accepted.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if a send fails, or
    /// [`LinkError::SendTimeout`] if a byte stays refused past the policy
    /// timeout. Either way the frame is left partially written.
    ///
    /// # Panics
    ///
    /// Panics if `payload` is not exactly the registered size for `packet_type`.
    pub fn send<T>(&self, transport: &mut T, packet_type: PacketType, payload: &[u8]) -> Result<()>
    where
        T: ByteTransport + ?Sized,
    {
        self.check_payload(packet_type, payload);

        let header = encode_header(packet_type.id());
        for (sent, &byte) in header.iter().chain(payload).enumerate() {
            self.send_byte(transport, byte, sent)?;
        }
        Ok(())
    }

    /// Send one frame, yielding to the runtime between refused attempts.
    ///
    /// Same contract as [`send`](Self::send). Backoff is at least 100µs so
    /// the task never busy-loops the executor.
    pub async fn send_async<T>(
        &self,
        transport: &mut T,
        packet_type: PacketType,
        payload: &[u8],
    ) -> Result<()>
    where
        T: ByteTransport + ?Sized,
    {
        self.check_payload(packet_type, payload);

        let header = encode_header(packet_type.id());
        for (sent, &byte) in header.iter().chain(payload).enumerate() {
            self.send_byte_async(transport, byte, sent).await?;
        }
        Ok(())
    }

    fn check_payload(&self, packet_type: PacketType, payload: &[u8]) {
        let expected = self.registry.payload_size(packet_type);
        assert_eq!(
            payload.len(),
            expected,
            "{:?} payload must be {} bytes",
            packet_type,
            expected
        );
    }

    fn send_byte<T>(&self, transport: &mut T, byte: u8, sent: usize) -> Result<()>
    where
        T: ByteTransport + ?Sized,
    {
        let mut refused_since: Option<Instant> = None;

        loop {
            if self.offer(transport, byte, sent)? {
                return Ok(());
            }

            let since = *refused_since.get_or_insert_with(Instant::now);
            if self.policy.timeout.is_some_and(|t| since.elapsed() >= t) {
                return Err(self.timed_out(sent));
            }

            if self.policy.backoff.is_zero() {
                std::hint::spin_loop();
            } else {
                std::thread::sleep(self.policy.backoff);
            }
        }
    }

    async fn send_byte_async<T>(&self, transport: &mut T, byte: u8, sent: usize) -> Result<()>
    where
        T: ByteTransport + ?Sized,
    {
        let mut refused_since: Option<tokio::time::Instant> = None;
        let backoff = self.policy.backoff.max(ASYNC_MIN_BACKOFF);

        loop {
            if self.offer(transport, byte, sent)? {
                return Ok(());
            }

            let since = *refused_since.get_or_insert_with(tokio::time::Instant::now);
            if self.policy.timeout.is_some_and(|t| since.elapsed() >= t) {
                return Err(self.timed_out(sent));
            }

            tokio::time::sleep(backoff).await;
        }
    }

    /// One attempt. `Ok(true)` if accepted.
    fn offer<T>(&self, transport: &mut T, byte: u8, sent: usize) -> Result<bool>
    where
        T: ByteTransport + ?Sized,
    {
        match transport.try_send(byte) {
            Ok(SendStatus::Accepted) => Ok(true),
            Ok(SendStatus::Busy) => Ok(false),
            Err(e) => {
                tracing::warn!("Send failed after {} bytes of frame: {}", sent, e);
                Err(e)
            }
        }
    }

    fn timed_out(&self, sent: usize) -> LinkError {
        tracing::warn!("Transport stalled, abandoning frame after {} bytes", sent);
        LinkError::SendTimeout { sent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Decoder, SYNC_BYTE};
    use crate::transport::MemoryTransport;

    fn payload() -> Vec<u8> {
        (100..116).collect()
    }

    #[test]
    fn test_send_layout() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();

        encoder
            .send(&mut transport, PacketType::Gyroscope, &payload())
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 18);
        assert_eq!(sent[0], SYNC_BYTE);
        assert_eq!(sent[1], PacketType::Gyroscope.id());
        assert_eq!(&sent[2..], &payload()[..]);
    }

    #[test]
    fn test_encode_matches_send() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();

        encoder
            .send(&mut transport, PacketType::Pong, &payload())
            .unwrap();

        assert_eq!(
            encoder.encode(PacketType::Pong, &payload()),
            transport.take_sent()
        );
    }

    #[test]
    fn test_busy_is_retried() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();
        transport.refuse_next(5);

        encoder
            .send(&mut transport, PacketType::Ping, &payload())
            .unwrap();

        let mut decoder = Decoder::new();
        let frames = decoder.push(transport.sent());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload(), &payload()[..]);
    }

    #[test]
    fn test_failure_aborts_mid_frame() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();
        transport.fail_after(6);

        let result = encoder.send(&mut transport, PacketType::Ping, &payload());

        assert!(matches!(result, Err(LinkError::Io(_))));
        // No rollback: the first six bytes stay on the wire.
        assert_eq!(transport.sent().len(), 6);
    }

    #[test]
    fn test_timeout_reports_progress() {
        let encoder = Encoder::new().with_policy(SendPolicy::new(
            Duration::from_micros(50),
            Some(Duration::from_millis(2)),
        ));
        let mut transport = MemoryTransport::new();
        transport.refuse_next(usize::MAX);

        let result = encoder.send(&mut transport, PacketType::Ping, &payload());

        assert!(matches!(result, Err(LinkError::SendTimeout { sent: 0 })));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_zero_timeout_tries_once() {
        let encoder =
            Encoder::new().with_policy(SendPolicy::new(Duration::ZERO, Some(Duration::ZERO)));
        let mut transport = MemoryTransport::new();
        transport.refuse_next(1);

        let err = encoder
            .send(&mut transport, PacketType::Ping, &payload())
            .unwrap_err();

        assert!(matches!(err, LinkError::SendTimeout { sent: 0 }));
    }

    #[test]
    #[should_panic(expected = "payload must be 16 bytes")]
    fn test_wrong_payload_length_panics() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();
        let _ = encoder.send(&mut transport, PacketType::Accelerometer, &[0u8; 15]);
    }

    #[test]
    fn test_custom_registry_size() {
        let registry = Registry::STANDARD.with_payload_size(PacketType::Ping, 4);
        let encoder = Encoder::with_registry(registry);

        let bytes = encoder.encode(PacketType::Ping, &[1, 2, 3, 4]);
        assert_eq!(&bytes[..], &[SYNC_BYTE, 0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_send_async() {
        let encoder = Encoder::new();
        let mut transport = MemoryTransport::new();
        transport.refuse_next(3);

        encoder
            .send_async(&mut transport, PacketType::RotationVector, &payload())
            .await
            .unwrap();

        assert_eq!(transport.sent().len(), 18);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_async_timeout() {
        let encoder = Encoder::new().with_policy(SendPolicy::new(
            Duration::from_millis(1),
            Some(Duration::from_millis(10)),
        ));
        let mut transport = MemoryTransport::new();
        transport.refuse_next(usize::MAX);

        let result = encoder
            .send_async(&mut transport, PacketType::Ping, &payload())
            .await;

        assert!(matches!(result, Err(LinkError::SendTimeout { sent: 0 })));
    }
}
