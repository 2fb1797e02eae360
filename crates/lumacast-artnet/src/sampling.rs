//! Reducing a frame region to a single color

use glam::Vec2;

use crate::frame::VideoFrame;
use crate::geometry::Rectangle;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Reduces the pixels of a frame inside a rectangle to one color.
pub trait ColorSampler: Send + Sync {
    fn average_color(&self, frame: &VideoFrame, rectangle: &Rectangle) -> Rgb;
}

/// Arithmetic mean over every pixel whose center lies inside the rectangle.
///
/// Pixels outside the frame are ignored; an empty intersection is black.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageSampler;

impl ColorSampler for AverageSampler {
    fn average_color(&self, frame: &VideoFrame, rectangle: &Rectangle) -> Rgb {
        let (min, max) = rectangle.bounds();

        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(frame.width());
        let y1 = (max.y.ceil().max(0.0) as u32).min(frame.height());

        let mut sum = [0u64; 3];
        let mut count = 0u64;

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !rectangle.contains(center) {
                    continue;
                }

                let (r, g, b) = frame.rgb_at(x, y);
                sum[0] += u64::from(r);
                sum[1] += u64::from(g);
                sum[2] += u64::from(b);
                count += 1;
            }
        }

        if count == 0 {
            return Rgb::default();
        }

        let mean = |total: u64| ((total + count / 2) / count) as u8;
        Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]))
    }
}
