//! Error types for sensorlink.

use thiserror::Error;

use crate::protocol::PacketType;

/// Main error type for all link operations.
///
/// "No data available" is not an error: receive paths report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error from the underlying byte transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Link configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The transport reached end-of-stream (device unplugged, peer gone).
    #[error("Transport closed")]
    TransportClosed,

    /// The transport kept refusing a byte until the send timeout elapsed.
    ///
    /// The frame in flight may have been partially written.
    #[error("Send timeout after {sent} bytes of frame")]
    SendTimeout {
        /// Bytes of the current frame accepted before the timeout.
        sent: usize,
    },

    /// A frame's payload does not fit its type's sample layout.
    #[error("Malformed {packet_type:?} payload: {len} bytes")]
    MalformedPayload {
        /// Type of the offending frame.
        packet_type: PacketType,
        /// Actual payload length.
        len: usize,
    },

    /// A raw type identifier outside the registry.
    #[error("Unknown packet type: {0:#04x}")]
    UnknownType(u8),
}

/// Result type alias using LinkError.
pub type Result<T> = std::result::Result<T, LinkError>;
