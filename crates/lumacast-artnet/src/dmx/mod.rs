//! DMX output system
//!
//! This module turns sampled colors into DMX512 channel data and ships it via
//! Art-Net.
//!
//! ## Art-Net
//!
//! Art-Net is a UDP protocol for DMX transmission over Ethernet.
//! - Uses UDP port 6454
//! - One ArtDmx packet per universe per refresh tick
//! - Fire-and-forget: no acknowledgment, no retry
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lumacast_artnet::config::FixtureType;
//! use lumacast_artnet::dmx::{encoder, ArtNetSender, UNIVERSE_SIZE};
//! use lumacast_artnet::geometry::Rectangle;
//! use lumacast_artnet::sampling::Rgb;
//! use lumacast_artnet::senders::ComputedFixture;
//!
//! # fn main() -> lumacast_artnet::Result<()> {
//! let fixture = ComputedFixture {
//!     fixture_type: FixtureType::Rgbw,
//!     address: 0,
//!     rectangle: Rectangle::from_corner(0.0, 0.0, 64.0, 64.0),
//! };
//!
//! let mut dmx_data = [0u8; UNIVERSE_SIZE];
//! encoder::encode(&mut dmx_data, &fixture, Rgb::new(255, 128, 64));
//!
//! let sender = ArtNetSender::new()?;
//! sender.send_dmx(0, &dmx_data, "255.255.255.255:6454".parse().unwrap())?;
//! # Ok(())
//! # }
//! ```

pub mod artnet;
pub mod encoder;

pub use artnet::{build_packet, ArtNetPacket, ArtNetSender, ARTNET_PORT, PACKET_LEN};

/// Channels in one DMX512 universe
pub const UNIVERSE_SIZE: usize = 512;

/// Channel data for one universe
pub type DmxBuffer = [u8; UNIVERSE_SIZE];
