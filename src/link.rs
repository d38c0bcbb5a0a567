//! Link facade and configuration.
//!
//! A [`Link`] owns one transport plus the encoder and drain reader bound to
//! the same registry. Opening a link initializes the transport and starts
//! the decoder searching for sync.
//!
//! # Example
//!
//! ```
//! use sensorlink::{Link, LinkConfig};
//! use sensorlink::codec::{Reading, Vector3};
//! use sensorlink::transport::MemoryTransport;
//!
//! let config = LinkConfig::from_json(r#"{ "must_deliver": ["pong"] }"#).unwrap();
//! let mut link = Link::open(MemoryTransport::new(), &config).unwrap();
//!
//! let reading = Reading::Gyroscope(Vector3 { x: 1.0, y: -2.5, z: 0.0 });
//! link.send_reading(&reading).unwrap();
//! link.transport_mut().loop_back();
//!
//! assert_eq!(link.poll_latest_reading().unwrap(), Some(reading));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec::Reading;
use crate::encoder::{Encoder, SendPolicy};
use crate::error::Result;
use crate::protocol::{DecoderStats, Frame, PacketType, Registry};
use crate::reader::DrainReader;
use crate::transport::ByteTransport;

/// Link configuration.
///
/// Defaults reproduce the firmware's behavior: spin on a busy transport
/// with no timeout, and let the reader coalesce every type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Pause between send attempts on a busy transport, in microseconds.
    pub send_backoff_micros: u64,
    /// How long one byte may stay refused before the send fails.
    pub send_timeout_millis: Option<u64>,
    /// Types the drain reader must never skip.
    pub must_deliver: Vec<PacketType>,
}

impl LinkConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Send retry policy.
    pub fn send_policy(&self) -> SendPolicy {
        SendPolicy::new(
            Duration::from_micros(self.send_backoff_micros),
            self.send_timeout_millis.map(Duration::from_millis),
        )
    }

    /// Standard registry with this config's must-deliver overrides applied.
    pub fn registry(&self) -> Registry {
        self.must_deliver
            .iter()
            .fold(Registry::STANDARD, |registry, &ty| {
                registry.with_must_deliver(ty, true)
            })
    }
}

/// One end of a serial link.
#[derive(Debug)]
pub struct Link<T> {
    transport: T,
    encoder: Encoder,
    reader: DrainReader,
}

impl<T: ByteTransport> Link<T> {
    /// Initialize `transport` and bind a link to it.
    pub fn open(mut transport: T, config: &LinkConfig) -> Result<Self> {
        transport.init()?;

        let registry = config.registry();
        tracing::debug!("Link open, must-deliver types: {:?}", config.must_deliver);

        Ok(Self {
            transport,
            encoder: Encoder::with_registry(registry).with_policy(config.send_policy()),
            reader: DrainReader::with_registry(registry),
        })
    }

    /// Send one frame. See [`Encoder::send`].
    pub fn send(&mut self, packet_type: PacketType, payload: &[u8]) -> Result<()> {
        self.encoder.send(&mut self.transport, packet_type, payload)
    }

    /// Send one frame without blocking the runtime. See [`Encoder::send_async`].
    pub async fn send_async(&mut self, packet_type: PacketType, payload: &[u8]) -> Result<()> {
        self.encoder
            .send_async(&mut self.transport, packet_type, payload)
            .await
    }

    /// Send a typed reading.
    pub fn send_reading(&mut self, reading: &Reading) -> Result<()> {
        self.send(reading.packet_type(), &reading.payload())
    }

    /// Next frame in arrival order, or `None` if no frame is ready.
    pub fn poll(&mut self) -> Result<Option<Frame>> {
        self.reader.poll(&mut self.transport)
    }

    /// Freshest frame, draining stale droppable ones. See
    /// [`DrainReader::poll_latest`].
    pub fn poll_latest(&mut self) -> Result<Option<Frame>> {
        self.reader.poll_latest(&mut self.transport)
    }

    /// [`poll_latest`](Self::poll_latest), decoded into a [`Reading`].
    pub fn poll_latest_reading(&mut self) -> Result<Option<Reading>> {
        self.poll_latest()?
            .map(|frame| Reading::from_frame(&frame))
            .transpose()
    }

    /// Decoder discard counters.
    pub fn decoder_stats(&self) -> DecoderStats {
        self.reader.decoder().stats()
    }

    /// Droppable frames coalesced away by [`poll_latest`](Self::poll_latest).
    pub fn coalesced(&self) -> u64 {
        self.reader.coalesced()
    }

    /// Drop any partially received frame.
    pub fn reset_receiver(&mut self) {
        self.reader.decoder_mut().reset();
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Unwrap the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}
