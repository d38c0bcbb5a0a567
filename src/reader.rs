//! Drain-to-latest reader.
//!
//! When the producer outpaces the consumer, reading frames one by one lets
//! a backlog build up in the transport and every sample arrives later than
//! the one before. This reader drains whatever is buffered and keeps only
//! the newest frame, so each call sees the freshest sensor state.
//!
//! Must-deliver types are never coalesced away:
//!
//! ```text
//! buffered: [Acc₁] [Acc₂] [Pong*] [Gyro₁]      (* = must-deliver)
//!
//! call 1 ─► Pong   (Acc₁, Acc₂ dropped; Gyro₁ left in transport)
//! call 2 ─► Gyro₁
//! call 3 ─► None
//! ```
//!
//! # Example
//!
//! ```
//! use sensorlink::{DrainReader, Encoder, PacketType};
//! use sensorlink::transport::MemoryTransport;
//!
//! let encoder = Encoder::new();
//! let mut transport = MemoryTransport::new();
//! for seed in 0..3u8 {
//!     encoder.send(&mut transport, PacketType::Gyroscope, &[seed; 16]).unwrap();
//! }
//! transport.loop_back();
//!
//! let mut reader = DrainReader::new();
//! let frame = reader.poll_latest(&mut transport).unwrap().unwrap();
//! assert_eq!(frame.payload(), &[2u8; 16]);
//! assert_eq!(reader.coalesced(), 2);
//! ```

use crate::error::Result;
use crate::protocol::{Decoder, Frame, Registry};
use crate::transport::ByteTransport;

/// Frame reader that favors freshness over completeness.
#[derive(Debug, Clone, Default)]
pub struct DrainReader {
    decoder: Decoder,
    /// Droppable frames discarded in favor of a newer one.
    coalesced: u64,
}

impl DrainReader {
    /// Create a reader for the standard registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader for a custom registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self::from_decoder(Decoder::with_registry(registry))
    }

    /// Wrap an existing decoder, keeping any partial frame it holds.
    pub fn from_decoder(decoder: Decoder) -> Self {
        Self {
            decoder,
            coalesced: 0,
        }
    }

    /// Read the next frame in arrival order, without coalescing.
    pub fn poll<T>(&mut self, transport: &mut T) -> Result<Option<Frame>>
    where
        T: ByteTransport + ?Sized,
    {
        self.decoder.poll(transport)
    }

    /// Drain the transport and return the newest frame.
    ///
    /// Returns:
    /// - the first must-deliver frame met, immediately; bytes behind it stay
    ///   in the transport for the next call
    /// - otherwise the last droppable frame decoded before the transport ran
    ///   dry
    /// - `Ok(None)` if no frame completed
    ///
    /// Droppable frames passed over on the way are discarded.
    pub fn poll_latest<T>(&mut self, transport: &mut T) -> Result<Option<Frame>>
    where
        T: ByteTransport + ?Sized,
    {
        let mut latest: Option<Frame> = None;

        while let Some(frame) = self.decoder.poll(transport)? {
            if self.decoder.registry().is_must_deliver(frame.packet_type()) {
                if let Some(stale) = latest.take() {
                    self.drop_stale(&stale);
                }
                return Ok(Some(frame));
            }

            if let Some(stale) = latest.replace(frame) {
                self.drop_stale(&stale);
            }
        }

        Ok(latest)
    }

    fn drop_stale(&mut self, stale: &Frame) {
        self.coalesced += 1;
        tracing::debug!("Dropping stale {:?} frame", stale.packet_type());
    }

    /// Number of droppable frames discarded so far.
    #[inline]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Get a reference to the underlying decoder.
    #[inline]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Get a mutable reference to the underlying decoder.
    #[inline]
    pub fn decoder_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }
}
