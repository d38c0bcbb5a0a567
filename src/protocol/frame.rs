//! Decoded frame value.
//!
//! Uses `bytes::Bytes` so a frame can be handed to another task without
//! copying the payload again.
//!
//! # Example
//!
//! ```
//! use sensorlink::protocol::{build_frame, Frame, PacketType};
//!
//! let frame = Frame::from_parts(PacketType::Ping, &[0u8; 16]);
//! assert_eq!(frame.packet_type(), PacketType::Ping);
//! assert_eq!(build_frame(frame.packet_type(), frame.payload()).len(), 18);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::registry::PacketType;
use super::wire_format::{encode_header, HEADER_SIZE};

/// A complete frame: type plus its fixed-size payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Packet type from the header.
    pub packet_type: PacketType,
    /// Payload bytes, exactly `payload_size(packet_type)` long.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame from a type and payload.
    pub fn new(packet_type: PacketType, payload: Bytes) -> Self {
        Self {
            packet_type,
            payload,
        }
    }

    /// Create a frame from a type and raw bytes (copies data).
    pub fn from_parts(packet_type: PacketType, payload: &[u8]) -> Self {
        Self {
            packet_type,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    /// Get the packet type.
    #[inline]
    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Build the on-wire bytes of a frame.
///
/// Does not check `payload` against the registry; use
/// [`Encoder`](crate::Encoder) for checked sends.
pub fn build_frame(packet_type: PacketType, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(&encode_header(packet_type.id()));
    buf.put_slice(payload);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SYNC_BYTE;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(PacketType::Pong, Bytes::from_static(&[7u8; 16]));

        assert_eq!(frame.packet_type(), PacketType::Pong);
        assert_eq!(frame.payload_len(), 16);
        assert!(frame.payload().iter().all(|&b| b == 7));
    }

    #[test]
    fn test_from_parts_copies() {
        let mut raw = [1u8; 16];
        let frame = Frame::from_parts(PacketType::Accelerometer, &raw);
        raw[0] = 9;

        assert_eq!(raw[0], 9);
        assert_eq!(frame.payload()[0], 1);
    }

    #[test]
    fn test_build_frame_layout() {
        let payload: Vec<u8> = (0..16).collect();
        let bytes = build_frame(PacketType::RotationVector, &payload);

        assert_eq!(bytes.len(), HEADER_SIZE + 16);
        assert_eq!(bytes[0], SYNC_BYTE);
        assert_eq!(bytes[1], 4);
        assert_eq!(&bytes[HEADER_SIZE..], &payload[..]);
    }
}
