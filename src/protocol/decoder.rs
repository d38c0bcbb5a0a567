//! Resynchronizing frame decoder.
//!
//! Consumes bytes one at a time and assembles frames in a fixed buffer.
//! The cursor counts bytes accumulated for the current frame:
//! - `Searching` (cursor = 0): bytes other than the sync byte are dropped
//! - `Assembling` (cursor >= 1): sync accepted, collecting type + payload
//!
//! When the type byte arrives it is checked against the registry. An
//! unknown type discards both header bytes and goes back to searching; the
//! discarded type byte is not rescanned for a sync byte.
//!
//! There is no timeout for a frame stuck mid-assembly. Callers that want
//! one can watch [`Decoder::is_assembling`] and call [`Decoder::reset`].
//!
//! # Example
//!
//! ```
//! use sensorlink::protocol::{build_frame, Decoder, PacketType};
//!
//! let mut decoder = Decoder::new();
//!
//! let mut wire = vec![0x00, 0x13, 0x37]; // line noise
//! wire.extend_from_slice(&build_frame(PacketType::Ping, &[1u8; 16]));
//!
//! let frames = decoder.push(&wire);
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].packet_type(), PacketType::Ping);
//! assert_eq!(decoder.stats().sync_misses, 3);
//! ```

use super::frame::Frame;
use super::registry::Registry;
use super::wire_format::{FRAME_CAPACITY, HEADER_SIZE, SYNC_BYTE};
use crate::error::Result;
use crate::transport::ByteTransport;

/// Coarse decoder state, derived from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Waiting for a sync byte.
    Searching,
    /// Sync accepted, frame partially assembled.
    Assembling,
}

/// Counters for bytes and headers the decoder threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Complete frames produced.
    pub frames: u64,
    /// Bytes dropped while searching for sync.
    pub sync_misses: u64,
    /// Headers rejected for an unregistered type id.
    pub unknown_types: u64,
}

/// Byte-at-a-time frame decoder.
///
/// Owns its assembly buffer, so independent links each get their own
/// decoder. Not meant to be shared between execution contexts.
#[derive(Debug, Clone)]
pub struct Decoder {
    /// Type registry used to validate type bytes and size payloads.
    registry: Registry,
    /// Assembly buffer. Bytes at and beyond `cursor` are stale.
    buf: [u8; FRAME_CAPACITY],
    /// Bytes of the current frame accumulated so far.
    cursor: usize,
    /// Discard counters.
    stats: DecoderStats,
}

impl Decoder {
    /// Create a decoder for the standard registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::STANDARD)
    }

    /// Create a decoder for a custom registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            buf: [0u8; FRAME_CAPACITY],
            cursor: 0,
            stats: DecoderStats::default(),
        }
    }

    /// Pull bytes from `transport` until a frame completes or no byte is
    /// available.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` when a frame completed
    /// - `Ok(None)` when the transport ran dry (partial state is kept)
    /// - `Err(...)` on a transport fault
    pub fn poll<T>(&mut self, transport: &mut T) -> Result<Option<Frame>>
    where
        T: ByteTransport + ?Sized,
    {
        while let Some(byte) = transport.try_recv()? {
            if let Some(frame) = self.push_byte(byte) {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed one byte. Returns the frame it completes, if any.
    ///
    /// # Panics
    ///
    /// Panics if assembly would overrun the buffer, which means the registry
    /// declares a payload larger than [`MAX_PAYLOAD_SIZE`](super::MAX_PAYLOAD_SIZE).
    pub fn push_byte(&mut self, byte: u8) -> Option<Frame> {
        if self.cursor == 0 && byte != SYNC_BYTE {
            self.stats.sync_misses += 1;
            tracing::trace!("Discarding byte {:#04x} outside a frame", byte);
            return None;
        }

        assert!(
            self.cursor < FRAME_CAPACITY,
            "frame overran the assembly buffer; registry payload sizes exceed capacity"
        );
        self.buf[self.cursor] = byte;
        self.cursor += 1;

        if self.cursor < HEADER_SIZE {
            return None;
        }

        let type_id = self.buf[1];
        let Some((packet_type, info)) = self.registry.lookup_id(type_id) else {
            // Only reachable at cursor == HEADER_SIZE: later bytes always
            // follow a registered type byte.
            self.stats.unknown_types += 1;
            tracing::debug!("Unknown packet type {:#04x}, resynchronizing", type_id);
            self.cursor = 0;
            return None;
        };

        if self.cursor < HEADER_SIZE + info.payload_size {
            return None;
        }

        let frame = Frame::from_parts(packet_type, &self.buf[HEADER_SIZE..self.cursor]);
        self.cursor = 0;
        self.stats.frames += 1;
        Some(frame)
    }

    /// Feed a slice of bytes and collect every frame it completes.
    ///
    /// Trailing partial frames stay buffered for the next call.
    pub fn push(&mut self, data: &[u8]) -> Vec<Frame> {
        data.iter().filter_map(|&b| self.push_byte(b)).collect()
    }

    /// Drop any partially assembled frame and search for sync again.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Current state.
    pub fn state(&self) -> DecoderState {
        if self.cursor == 0 {
            DecoderState::Searching
        } else {
            DecoderState::Assembling
        }
    }

    /// Whether a frame is partially assembled.
    #[inline]
    pub fn is_assembling(&self) -> bool {
        self.cursor > 0
    }

    /// Bytes of the current frame accumulated so far.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.cursor
    }

    /// Discard counters since creation.
    #[inline]
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Registry this decoder validates against.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
