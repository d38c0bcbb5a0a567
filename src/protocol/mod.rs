//! Protocol module - wire format, type registry, frames and decoding.
//!
//! This module implements the link-layer framing:
//! - 2-byte header (sync + type id), fixed payload per type
//! - Type registry with payload sizes and must-deliver flags
//! - Resynchronizing byte-at-a-time decoder

mod decoder;
mod frame;
mod registry;
mod wire_format;

pub use decoder::{Decoder, DecoderState, DecoderStats};
pub use frame::{build_frame, Frame};
pub use registry::{PacketType, Registry, TypeInfo, SAMPLE_PAYLOAD_SIZE};
pub use wire_format::{
    encode_header, frame_size, FRAME_CAPACITY, HEADER_SIZE, MAX_PAYLOAD_SIZE, SYNC_BYTE,
};
