//! Video frames handed over by the compositing pipeline

use std::sync::Arc;

/// Byte order of 8-bit, 4-channel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    #[default]
    Rgba8,
    Bgra8,
}

/// Which field of an interlaced frame is being delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoField {
    #[default]
    Progressive,
    A,
    B,
}

/// Format of the video channel the consumer is attached to
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFormatDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl Default for VideoFormatDesc {
    fn default() -> Self {
        Self {
            name: "1080p5000".to_string(),
            width: 1920,
            height: 1080,
            fps: 50.0,
        }
    }
}

/// An immutable, cheaply clonable video frame
///
/// Cloning shares the pixel buffer; no pixel data is copied.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Arc<[u8]>,
}

impl VideoFrame {
    /// Wrap packed 4-byte pixels. Returns `None` if `data` does not match the size.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            format,
            data: data.into(),
        })
    }

    /// A frame filled with a single RGB color
    pub fn solid(width: u32, height: u32, r: u8, g: u8, b: u8) -> Self {
        let pixels = width as usize * height as usize;
        let data: Vec<u8> = [r, g, b, 255].repeat(pixels);
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            data: data.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major without padding
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGB of the pixel at `(x, y)`; caller keeps coordinates in range.
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[offset..offset + 4];
        match self.format {
            PixelFormat::Rgba8 => (px[0], px[1], px[2]),
            PixelFormat::Bgra8 => (px[2], px[1], px[0]),
        }
    }

    /// Whether two handles share the same pixel buffer
    pub fn ptr_eq(&self, other: &VideoFrame) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_check() {
        assert!(VideoFrame::new(2, 2, PixelFormat::Rgba8, vec![0; 16]).is_some());
        assert!(VideoFrame::new(2, 2, PixelFormat::Rgba8, vec![0; 15]).is_none());
    }

    #[test]
    fn test_bgra_channel_order() {
        let frame = VideoFrame::new(1, 1, PixelFormat::Bgra8, vec![30, 20, 10, 255]).unwrap();
        assert_eq!(frame.rgb_at(0, 0), (10, 20, 30));
    }

    #[test]
    fn test_clone_shares_pixels() {
        let frame = VideoFrame::solid(4, 4, 1, 2, 3);
        let copy = frame.clone();
        assert!(frame.ptr_eq(&copy));
        assert_eq!(copy.rgb_at(3, 3), (1, 2, 3));
    }
}
