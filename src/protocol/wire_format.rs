//! Wire format constants and header encoding.
//!
//! Every frame is a 2-byte header followed by a fixed-size payload:
//! ```text
//! ┌────────┬─────────┬──────────────────────────┐
//! │ Sync   │ Type ID │ Payload                  │
//! │ 1 byte │ 1 byte  │ payload_size(type) bytes │
//! │ 0x5A   │         │                          │
//! └────────┴─────────┴──────────────────────────┘
//! ```
//!
//! There is no length field, no escaping and no checksum. The payload size
//! is implied by the type. Numeric payload fields are Big Endian.

/// Frame start marker (`0b0101_1010`).
pub const SYNC_BYTE: u8 = 0x5A;

/// Header size in bytes (sync + type id).
pub const HEADER_SIZE: usize = 2;

/// Largest payload any registered type may declare.
pub const MAX_PAYLOAD_SIZE: usize = 100;

/// Capacity of the decoder's assembly buffer.
pub const FRAME_CAPACITY: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Encode the 2-byte header for a raw type id.
///
/// # Example
///
/// ```
/// use sensorlink::protocol::{encode_header, SYNC_BYTE};
///
/// assert_eq!(encode_header(3), [SYNC_BYTE, 3]);
/// ```
#[inline]
pub fn encode_header(type_id: u8) -> [u8; HEADER_SIZE] {
    [SYNC_BYTE, type_id]
}

/// Total on-wire size of a frame carrying `payload_size` bytes.
#[inline]
pub const fn frame_size(payload_size: usize) -> usize {
    HEADER_SIZE + payload_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_byte_value() {
        assert_eq!(SYNC_BYTE, 0b0101_1010);
    }

    #[test]
    fn test_capacity_covers_max_payload() {
        assert_eq!(FRAME_CAPACITY, 102);
        assert_eq!(frame_size(MAX_PAYLOAD_SIZE), FRAME_CAPACITY);
    }

    #[test]
    fn test_encode_header() {
        let header = encode_header(0x04);
        assert_eq!(header.len(), HEADER_SIZE);
        assert_eq!(header[0], SYNC_BYTE);
        assert_eq!(header[1], 0x04);
    }
}
