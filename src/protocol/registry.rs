//! Packet type registry.
//!
//! The registry maps each [`PacketType`] to its attribute record
//! ([`TypeInfo`]): the fixed payload size and whether the drain-to-latest
//! reader may skip it. Type ids on the wire are the enum discriminants.
//!
//! # Example
//!
//! ```
//! use sensorlink::protocol::{PacketType, Registry};
//!
//! let registry = Registry::STANDARD.with_must_deliver(PacketType::Pong, true);
//!
//! assert_eq!(registry.payload_size(PacketType::Gyroscope), 16);
//! assert!(registry.is_must_deliver(PacketType::Pong));
//! assert!(registry.lookup_id(0xFF).is_none());
//! ```

use serde::{Deserialize, Serialize};

use super::wire_format::MAX_PAYLOAD_SIZE;
use crate::error::LinkError;

/// Closed set of packet types carried by the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PacketType {
    /// Liveness probe.
    Ping = 0,
    /// Reply to a ping.
    Pong = 1,
    /// Linear acceleration sample (x, y, z).
    Accelerometer = 2,
    /// Calibrated angular velocity sample (x, y, z).
    Gyroscope = 3,
    /// Orientation quaternion (real, i, j, k).
    RotationVector = 4,
}

impl PacketType {
    /// Number of registered types.
    pub const COUNT: usize = 5;

    /// All types, in wire id order.
    pub const ALL: [PacketType; Self::COUNT] = [
        PacketType::Ping,
        PacketType::Pong,
        PacketType::Accelerometer,
        PacketType::Gyroscope,
        PacketType::RotationVector,
    ];

    /// Wire identifier of this type.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a type by wire identifier.
    #[inline]
    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < Self::COUNT {
            Some(Self::ALL[id as usize])
        } else {
            None
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = LinkError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(LinkError::UnknownType(id))
    }
}

impl From<PacketType> for u8 {
    fn from(ty: PacketType) -> u8 {
        ty.id()
    }
}

/// Attributes of one packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Exact payload length in bytes.
    pub payload_size: usize,
    /// Never coalesced away by the drain-to-latest reader.
    pub must_deliver: bool,
}

impl TypeInfo {
    /// A skippable type with the given payload size.
    pub const fn droppable(payload_size: usize) -> Self {
        Self {
            payload_size,
            must_deliver: false,
        }
    }
}

/// Payload size shared by all sensor types (four 32-bit floats).
pub const SAMPLE_PAYLOAD_SIZE: usize = 16;

/// Type registry: one [`TypeInfo`] per [`PacketType`].
///
/// Every entry's payload size is at most [`MAX_PAYLOAD_SIZE`], which is
/// what lets the decoder use a fixed assembly buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    entries: [TypeInfo; PacketType::COUNT],
}

impl Registry {
    /// The registry of the current firmware: 16-byte payloads, nothing
    /// must-deliver.
    pub const STANDARD: Registry = Registry {
        entries: [TypeInfo::droppable(SAMPLE_PAYLOAD_SIZE); PacketType::COUNT],
    };

    /// Attributes of `ty`.
    #[inline]
    pub const fn lookup(&self, ty: PacketType) -> TypeInfo {
        self.entries[ty as usize]
    }

    /// Resolve a raw wire id. Returns `None` for unregistered ids.
    #[inline]
    pub fn lookup_id(&self, id: u8) -> Option<(PacketType, TypeInfo)> {
        PacketType::from_id(id).map(|ty| (ty, self.lookup(ty)))
    }

    /// Payload size of `ty`.
    #[inline]
    pub const fn payload_size(&self, ty: PacketType) -> usize {
        self.entries[ty as usize].payload_size
    }

    /// Whether `ty` is must-deliver.
    #[inline]
    pub const fn is_must_deliver(&self, ty: PacketType) -> bool {
        self.entries[ty as usize].must_deliver
    }

    /// Largest payload size across the registry.
    pub fn max_payload_size(&self) -> usize {
        self.entries
            .iter()
            .map(|info| info.payload_size)
            .max()
            .unwrap_or(0)
    }

    /// Return a copy with the must-deliver flag of `ty` set to `must_deliver`.
    pub const fn with_must_deliver(mut self, ty: PacketType, must_deliver: bool) -> Self {
        self.entries[ty as usize].must_deliver = must_deliver;
        self
    }

    /// Return a copy with the payload size of `ty` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `payload_size` exceeds [`MAX_PAYLOAD_SIZE`].
    pub const fn with_payload_size(mut self, ty: PacketType, payload_size: usize) -> Self {
        assert!(
            payload_size <= MAX_PAYLOAD_SIZE,
            "payload size exceeds decoder capacity"
        );
        self.entries[ty as usize].payload_size = payload_size;
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::STANDARD
    }
}
