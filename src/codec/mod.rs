//! Codec module - typed payloads on top of raw frames.
//!
//! - [`SensorSample`] - four Big Endian `f32` values, the sensor payload layout
//! - [`Reading`] - typed view of a decoded [`Frame`](crate::protocol::Frame)
//!
//! # Example
//!
//! ```
//! use sensorlink::codec::{Reading, SensorSample, Vector3};
//! use sensorlink::protocol::{Frame, PacketType};
//!
//! let payload = SensorSample([1.0, -2.5, 0.0, 0.0]).encode();
//! let frame = Frame::from_parts(PacketType::Gyroscope, &payload);
//!
//! let reading = Reading::from_frame(&frame).unwrap();
//! assert_eq!(reading, Reading::Gyroscope(Vector3 { x: 1.0, y: -2.5, z: 0.0 }));
//! ```

mod sample;

pub use sample::{Quaternion, Reading, SensorSample, Vector3};
