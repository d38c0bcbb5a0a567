//! Loopback demo - a fast producer and a slow consumer on one link.
//!
//! The "firmware" side emits a burst of gyroscope and rotation samples per
//! tick; the "host" side reads once per tick with `poll_latest_reading` and
//! prints what it got as JSON lines. Stale samples are coalesced away, and
//! the pong (configured must-deliver) is never skipped.
//!
//! ```text
//! cargo run --example loopback
//! ```

use sensorlink::codec::{Quaternion, Reading, Vector3};
use sensorlink::transport::MemoryTransport;
use sensorlink::{Link, LinkConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LinkConfig::from_json(r#"{ "must_deliver": ["pong"] }"#)?;
    let mut link = Link::open(MemoryTransport::new(), &config)?;

    for tick in 0..5u8 {
        // Producer: several samples between two host reads.
        for step in 0..4u8 {
            let t = f32::from(tick) + f32::from(step) * 0.25;
            link.send_reading(&Reading::Gyroscope(Vector3 {
                x: t,
                y: -t,
                z: 0.0,
            }))?;
            link.send_reading(&Reading::RotationVector(Quaternion {
                real: 1.0,
                i: 0.0,
                j: 0.0,
                k: t / 10.0,
            }))?;
        }
        if tick == 2 {
            link.send_reading(&Reading::Pong(vec![tick; 16].into()))?;
            link.send_reading(&Reading::Gyroscope(Vector3::default()))?;
        }

        // Line noise between bursts.
        link.transport_mut().feed(&[0x00, 0xFF]);
        link.transport_mut().loop_back();

        // Consumer: one read per tick.
        while let Some(reading) = link.poll_latest_reading()? {
            println!("{}", serde_json::to_string(&reading)?);
            if !matches!(reading, Reading::Pong(_)) {
                break;
            }
        }
    }

    let stats = link.decoder_stats();
    eprintln!(
        "frames={} coalesced={} sync_misses={} unknown_types={}",
        stats.frames,
        link.coalesced(),
        stats.sync_misses,
        stats.unknown_types
    );

    Ok(())
}
