//! Test pattern source
//!
//! Produces a horizontal hue sweep that drifts across the frame, so every
//! fixture along the x axis cycles through the color wheel with a phase offset.

use std::time::Duration;

use lumacast_artnet::frame::{PixelFormat, VideoFrame};
use palette::{FromColor, Hsv, Srgb};

use crate::settings::PatternSettings;

pub struct TestPattern {
    width: u32,
    height: u32,
    fps: f64,
    cycle_frames: f64,
    frame_number: u64,
}

impl TestPattern {
    pub fn new(settings: &PatternSettings) -> Self {
        let fps = if settings.fps > 0.0 { settings.fps } else { 50.0 };
        Self {
            width: settings.width.max(1),
            height: settings.height.max(1),
            fps,
            cycle_frames: (settings.cycle_seconds * fps).max(1.0),
            frame_number: 0,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    /// Render the next frame and advance the sweep
    pub fn next_frame(&mut self) -> VideoFrame {
        let phase = (self.frame_number as f64 / self.cycle_frames).fract() as f32;
        self.frame_number += 1;

        let mut row = Vec::with_capacity(self.width as usize * 4);
        for x in 0..self.width {
            let hue = ((x as f32 / self.width as f32 + phase).fract()) * 360.0;
            let color: Srgb<u8> = Srgb::<f32>::from_color(Hsv::new(hue, 1.0, 1.0)).into_format();
            row.extend_from_slice(&[color.red, color.green, color.blue, 255]);
        }

        let data = row.repeat(self.height as usize);
        VideoFrame::new(self.width, self.height, PixelFormat::Rgba8, data)
            .unwrap_or_else(|| VideoFrame::solid(self.width, self.height, 0, 0, 0))
    }
}
