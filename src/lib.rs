//! # sensorlink
//!
//! Link-layer framing for streaming IMU samples from a microcontroller to a
//! host over a plain serial byte stream.
//!
//! ## Architecture
//!
//! ```text
//! send:    Link ─► Encoder ─► ByteTransport
//! receive: Link ─► DrainReader ─► Decoder ─► ByteTransport
//! ```
//!
//! - **Framing**: `0x5A` sync byte, type byte, fixed-size payload. No
//!   length field, no checksum.
//! - **Resync**: the decoder drops bytes until it sees sync and rejects
//!   unknown type bytes, so it recovers from noise and peer resets.
//! - **Freshness**: [`DrainReader::poll_latest`] drains the transport and
//!   returns only the newest frame, except that must-deliver types are
//!   never skipped.
//!
//! Everything is poll-driven and single-threaded; receiving never blocks.
//!
//! ## Example
//!
//! ```
//! use sensorlink::{Link, LinkConfig, PacketType};
//! use sensorlink::codec::SensorSample;
//! use sensorlink::transport::MemoryTransport;
//!
//! let mut link = Link::open(MemoryTransport::new(), &LinkConfig::default()).unwrap();
//!
//! for x in [1.0, 2.0, 3.0] {
//!     let sample = SensorSample([x, 0.0, 0.0, 0.0]);
//!     link.send(PacketType::Accelerometer, &sample.encode()).unwrap();
//! }
//! link.transport_mut().loop_back();
//!
//! let frame = link.poll_latest().unwrap().unwrap();
//! assert_eq!(SensorSample::decode(frame.payload()).unwrap().0[0], 3.0);
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod transport;

mod encoder;
mod link;
mod reader;

pub use encoder::{Encoder, SendPolicy};
pub use error::{LinkError, Result};
pub use link::{Link, LinkConfig};
pub use protocol::{Decoder, Frame, PacketType, Registry};
pub use reader::DrainReader;
