//! Art-Net frame consumer
//!
//! The consumer is attached to a video channel. The channel pushes every frame
//! through [`FrameConsumer::send`], which only stores it; a separate refresh
//! worker samples the latest frame at the configured rate and sends one ArtDmx
//! packet per sender.

use std::future::{ready, Ready};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::dmx::{encoder, ArtNetSender, DmxBuffer, UNIVERSE_SIZE};
use crate::error::Result;
use crate::frame::{VideoField, VideoFormatDesc, VideoFrame};
use crate::geometry::{RectangleSolver, StripSolver};
use crate::inbox::FrameInbox;
use crate::refresh::{LoopState, RefreshLoop};
use crate::sampling::{AverageSampler, ColorSampler};
use crate::senders::{compute_senders, ComputedSender};

/// Port index reported by the Art-Net consumer
pub const CONSUMER_INDEX: i32 = 1337;

/// The interface a video channel drives its consumers through
pub trait FrameConsumer: Send {
    /// Called once when the consumer is attached to a channel
    fn initialize(&mut self, format_desc: &VideoFormatDesc, channel_index: i32) -> Result<()>;

    /// Hand over a frame. Resolves immediately; consumers never apply backpressure.
    fn send(&self, field: VideoField, frame: VideoFrame) -> Ready<bool>;

    /// Human readable identification, including the channel once attached
    fn print(&self) -> String;

    fn name(&self) -> &str;

    fn index(&self) -> i32;

    /// Monitoring snapshot
    fn state(&self) -> MonitorState;
}

/// Monitoring snapshot of an Art-Net consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonitorState {
    #[serde(rename = "artnet/computed-senders")]
    pub computed_senders: usize,
    #[serde(rename = "artnet/computed-fixtures")]
    pub computed_fixtures: usize,
    #[serde(rename = "artnet/senders")]
    pub senders: usize,
    #[serde(rename = "artnet/refresh-rate")]
    pub refresh_rate: u32,
}

impl MonitorState {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Drives Art-Net fixtures from the frames of one video channel
pub struct ArtNetConsumer {
    config: Configuration,
    senders: Arc<[ComputedSender]>,
    inbox: Arc<FrameInbox>,
    transport: Arc<ArtNetSender>,
    sampler: Arc<dyn ColorSampler>,
    refresh: RefreshLoop,
    channel_index: Option<i32>,
}

impl ArtNetConsumer {
    /// Build a consumer with the default strip geometry and averaging sampler.
    pub fn new(config: Configuration) -> Result<Self> {
        Self::with_collaborators(config, &StripSolver, Arc::new(AverageSampler))
    }

    /// Build a consumer with custom geometry and sampling.
    ///
    /// Fixture rectangles and sender endpoints are resolved here, once. A
    /// malformed host fails construction.
    pub fn with_collaborators(
        config: Configuration,
        solver: &dyn RectangleSolver,
        sampler: Arc<dyn ColorSampler>,
    ) -> Result<Self> {
        let senders: Arc<[ComputedSender]> = compute_senders(&config, solver)?.into();
        let transport = Arc::new(ArtNetSender::new()?);
        let refresh = RefreshLoop::new(config.refresh_rate());

        info!(
            "Art-Net consumer created: {} senders, {} fixtures, {} Hz",
            senders.len(),
            senders.iter().map(|s| s.fixtures.len()).sum::<usize>(),
            config.refresh_rate()
        );

        Ok(Self {
            config,
            senders,
            inbox: Arc::new(FrameInbox::new()),
            transport,
            sampler,
            refresh,
            channel_index: None,
        })
    }

    pub fn computed_senders(&self) -> &[ComputedSender] {
        &self.senders
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn loop_state(&self) -> LoopState {
        self.refresh.state()
    }

    /// Stop the refresh worker, blocking until it exits
    pub fn stop(&mut self) {
        self.refresh.stop();
    }
}

impl FrameConsumer for ArtNetConsumer {
    fn initialize(&mut self, format_desc: &VideoFormatDesc, channel_index: i32) -> Result<()> {
        if self.refresh.state() != LoopState::Idle {
            warn!("Art-Net consumer already initialized");
            return Ok(());
        }

        info!(
            "Art-Net consumer attached to channel {} ({})",
            channel_index, format_desc.name
        );
        self.channel_index = Some(channel_index);

        let senders = self.senders.clone();
        let sampler = self.sampler.clone();
        let transport = self.transport.clone();

        self.refresh.start(self.inbox.clone(), move |frame| {
            send_computed_senders(&senders, frame, sampler.as_ref(), &transport);
            Ok(())
        })
    }

    fn send(&self, _field: VideoField, frame: VideoFrame) -> Ready<bool> {
        self.inbox.deliver(frame);
        ready(true)
    }

    fn print(&self) -> String {
        match self.channel_index {
            Some(index) => format!("artnet[{}]", index),
            None => "artnet[]".to_string(),
        }
    }

    fn name(&self) -> &str {
        "artnet"
    }

    fn index(&self) -> i32 {
        CONSUMER_INDEX
    }

    fn state(&self) -> MonitorState {
        MonitorState {
            computed_senders: self.senders.len(),
            computed_fixtures: self.senders.iter().map(|s| s.fixtures.len()).sum(),
            senders: self.config.senders().len(),
            refresh_rate: self.config.refresh_rate(),
        }
    }
}

/// Sample and encode every fixture of a sender into one universe buffer.
pub fn render_universe(
    sender: &ComputedSender,
    frame: &VideoFrame,
    sampler: &dyn ColorSampler,
) -> DmxBuffer {
    let mut dmx_data = [0u8; UNIVERSE_SIZE];
    for fixture in &sender.fixtures {
        let color = sampler.average_color(frame, &fixture.rectangle);
        encoder::encode(&mut dmx_data, fixture, color);
    }
    dmx_data
}

/// One full output pass: every sender in order, one packet each.
///
/// A failed send is logged and the remaining senders still go out.
pub fn send_computed_senders(
    senders: &[ComputedSender],
    frame: &VideoFrame,
    sampler: &dyn ColorSampler,
    transport: &ArtNetSender,
) {
    for sender in senders {
        let dmx_data = render_universe(sender, frame, sampler);
        if let Err(e) = transport.send_dmx(sender.universe, &dmx_data, sender.endpoint) {
            warn!(
                "Art-Net send to {} (universe {}) failed: {}",
                sender.endpoint, sender.universe, e
            );
        }
    }
}
