//! Sensor sample payloads.
//!
//! Sensor frames carry four IEEE-754 `f32` values, Big Endian:
//! ```text
//! ┌─────────┬─────────┬─────────┬─────────┐
//! │ value 0 │ value 1 │ value 2 │ value 3 │
//! │ f32 BE  │ f32 BE  │ f32 BE  │ f32 BE  │
//! └─────────┴─────────┴─────────┴─────────┘
//! ```
//! Accelerometer and gyroscope samples use (x, y, z, 0). Rotation vectors
//! use (real, i, j, k).

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{LinkError, Result};
use crate::protocol::{Frame, PacketType, SAMPLE_PAYLOAD_SIZE};

/// Four floats as carried in a sensor payload.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SensorSample(pub [f32; 4]);

impl SensorSample {
    /// Encode to the 16-byte wire payload.
    pub fn encode(&self) -> [u8; SAMPLE_PAYLOAD_SIZE] {
        let mut buf = [0u8; SAMPLE_PAYLOAD_SIZE];
        for (chunk, value) in buf.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&value.to_be_bytes());
        }
        buf
    }

    /// Decode a 16-byte wire payload.
    ///
    /// Returns `None` if `payload` is not exactly 16 bytes.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        if payload.len() != SAMPLE_PAYLOAD_SIZE {
            return None;
        }
        let mut buf = payload;
        Some(Self([
            buf.get_f32(),
            buf.get_f32(),
            buf.get_f32(),
            buf.get_f32(),
        ]))
    }
}

/// Three-axis vector (m/s² or rad/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    /// X axis, in m/s² (accelerometer) or rad/s (gyroscope).
    pub x: f32,
    /// Y axis, same unit as `x`.
    pub y: f32,
    /// Z axis, same unit as `x`.
    pub z: f32,
}

/// Orientation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Quaternion {
    /// Scalar part.
    pub real: f32,
    /// `i` component.
    pub i: f32,
    /// `j` component.
    pub j: f32,
    /// `k` component.
    pub k: f32,
}

impl From<Vector3> for SensorSample {
    fn from(v: Vector3) -> Self {
        Self([v.x, v.y, v.z, 0.0])
    }
}

impl From<SensorSample> for Vector3 {
    fn from(s: SensorSample) -> Self {
        Self {
            x: s.0[0],
            y: s.0[1],
            z: s.0[2],
        }
    }
}

impl From<Quaternion> for SensorSample {
    fn from(q: Quaternion) -> Self {
        Self([q.real, q.i, q.j, q.k])
    }
}

impl From<SensorSample> for Quaternion {
    fn from(s: SensorSample) -> Self {
        Self {
            real: s.0[0],
            i: s.0[1],
            j: s.0[2],
            k: s.0[3],
        }
    }
}

/// Typed view of a decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Reading {
    /// Raw ping payload.
    Ping(Bytes),
    /// Raw pong payload.
    Pong(Bytes),
    /// Linear acceleration.
    Accelerometer(Vector3),
    /// Angular velocity.
    Gyroscope(Vector3),
    /// Orientation.
    RotationVector(Quaternion),
}

impl Reading {
    /// Interpret a frame.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedPayload`] if a sensor frame's payload is
    /// not 16 bytes (only possible with a non-standard registry).
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let sample = || {
            SensorSample::decode(frame.payload()).ok_or(LinkError::MalformedPayload {
                packet_type: frame.packet_type(),
                len: frame.payload_len(),
            })
        };

        Ok(match frame.packet_type() {
            PacketType::Ping => Reading::Ping(frame.payload.clone()),
            PacketType::Pong => Reading::Pong(frame.payload.clone()),
            PacketType::Accelerometer => Reading::Accelerometer(sample()?.into()),
            PacketType::Gyroscope => Reading::Gyroscope(sample()?.into()),
            PacketType::RotationVector => Reading::RotationVector(sample()?.into()),
        })
    }

    /// Packet type this reading travels as.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Reading::Ping(_) => PacketType::Ping,
            Reading::Pong(_) => PacketType::Pong,
            Reading::Accelerometer(_) => PacketType::Accelerometer,
            Reading::Gyroscope(_) => PacketType::Gyroscope,
            Reading::RotationVector(_) => PacketType::RotationVector,
        }
    }

    /// Wire payload for this reading.
    pub fn payload(&self) -> Bytes {
        let sample: SensorSample = match self {
            Reading::Ping(raw) | Reading::Pong(raw) => return raw.clone(),
            Reading::Accelerometer(v) | Reading::Gyroscope(v) => (*v).into(),
            Reading::RotationVector(q) => (*q).into(),
        };
        let mut buf = BytesMut::with_capacity(SAMPLE_PAYLOAD_SIZE);
        buf.put_slice(&sample.encode());
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_big_endian_layout() {
        let bytes = SensorSample([1.0, -2.5, 0.0, 0.0]).encode();

        assert_eq!(&bytes[0..4], &[0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(&bytes[4..8], &[0xC0, 0x20, 0x00, 0x00]);
        assert_eq!(&bytes[8..16], &[0u8; 8]);
    }

    #[test]
    fn test_sample_decode() {
        let bytes = SensorSample([0.5, 3.25, -1.0, 9.81]).encode();
        let sample = SensorSample::decode(&bytes).unwrap();

        assert_eq!(sample.0, [0.5, 3.25, -1.0, 9.81]);
    }

    #[test]
    fn test_sample_decode_wrong_length() {
        assert!(SensorSample::decode(&[0u8; 15]).is_none());
        assert!(SensorSample::decode(&[0u8; 17]).is_none());
    }

    #[test]
    fn test_vector_padding() {
        let sample: SensorSample = Vector3 {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        }
        .into();
        assert_eq!(sample.0, [1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_reading_from_gyro_frame() {
        let payload = SensorSample([1.0, -2.5, 0.0, 0.0]).encode();
        let frame = Frame::from_parts(PacketType::Gyroscope, &payload);

        let reading = Reading::from_frame(&frame).unwrap();

        assert_eq!(
            reading,
            Reading::Gyroscope(Vector3 {
                x: 1.0,
                y: -2.5,
                z: 0.0
            })
        );
        assert_eq!(reading.packet_type(), PacketType::Gyroscope);
        assert_eq!(&reading.payload()[..], &payload[..]);
    }

    #[test]
    fn test_reading_rotation_vector() {
        let q = Quaternion {
            real: 0.7071,
            i: 0.0,
            j: 0.7071,
            k: 0.0,
        };
        let frame = Frame::from_parts(
            PacketType::RotationVector,
            &SensorSample::from(q).encode(),
        );

        assert_eq!(
            Reading::from_frame(&frame).unwrap(),
            Reading::RotationVector(q)
        );
    }

    #[test]
    fn test_reading_ping_is_raw() {
        let frame = Frame::from_parts(PacketType::Ping, &[0xEE; 16]);
        let reading = Reading::from_frame(&frame).unwrap();

        assert_eq!(reading.payload(), frame.payload);
    }

    #[test]
    fn test_reading_malformed_sensor_payload() {
        let frame = Frame::from_parts(PacketType::Accelerometer, &[0u8; 8]);
        let err = Reading::from_frame(&frame).unwrap_err();

        assert!(matches!(
            err,
            LinkError::MalformedPayload {
                packet_type: PacketType::Accelerometer,
                len: 8
            }
        ));
    }

    #[test]
    fn test_reading_serializes_tagged() {
        let reading = Reading::Accelerometer(Vector3 {
            x: 1.0,
            y: 0.0,
            z: -1.0,
        });
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["type"], "accelerometer");
        assert_eq!(json["value"]["z"], -1.0);
    }
}
