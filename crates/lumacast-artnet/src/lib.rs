//! Lumacast Art-Net - Video-to-DMX lighting output
//!
//! This crate samples colors from rendered video frames and drives DMX512
//! fixtures over Art-Net, so stage lighting follows what is on screen.
//!
//! - **Configuration**: validated fixture and sender declarations
//! - **Senders**: repeated fixtures expanded into addressed instances, once
//! - **Inbox**: single-slot "latest frame wins" handoff from the video thread
//! - **Refresh loop**: self-clocked worker, decoupled from the video frame rate
//! - **DMX**: per-type channel encoding and ArtDmx packets over UDP
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumacast_artnet::{ArtNetConsumer, ArtNetSettings, Configuration, FrameConsumer};
//! use lumacast_artnet::frame::{VideoField, VideoFormatDesc, VideoFrame};
//!
//! # fn main() -> lumacast_artnet::Result<()> {
//! let settings: ArtNetSettings = serde_json::from_str(r#"{
//!     "refresh-rate": 30,
//!     "senders": [{ "host": "10.0.0.50", "fixtures": [
//!         { "type": "RGB", "start-address": 1, "fixture-count": 8, "width": 1920, "height": 1080 }
//!     ]}]
//! }"#).unwrap();
//!
//! let mut consumer = ArtNetConsumer::new(Configuration::try_from(settings)?)?;
//! consumer.initialize(&VideoFormatDesc::default(), 1)?;
//! let _ = consumer.send(VideoField::Progressive, VideoFrame::solid(1920, 1080, 255, 0, 0));
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]

/// Error types
pub mod error;

/// Settings and validated configuration
pub mod config;
/// Fixture instance expansion
pub mod senders;

/// Video frame types
pub mod frame;
/// Sample rectangles
pub mod geometry;
/// Color sampling
pub mod sampling;

/// Frame handoff
pub mod inbox;
/// Refresh worker
pub mod refresh;

/// DMX encoding and Art-Net output
pub mod dmx;

/// Frame consumer
pub mod consumer;

// Re-exports
pub use config::{ArtNetSettings, Configuration, FixtureSettings, FixtureType, SenderSettings};
pub use consumer::{ArtNetConsumer, FrameConsumer, MonitorState};
pub use dmx::{ArtNetSender, UNIVERSE_SIZE};
pub use error::{ArtNetError, Result};
pub use inbox::FrameInbox;
pub use refresh::{LoopState, RefreshLoop};
pub use senders::{ComputedFixture, ComputedSender};
