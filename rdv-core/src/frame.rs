//! Frame buffers handed from the session layer to the desktop surface.
//!
//! The controller never inspects pixels; it only needs the frame's
//! dimensions and passes the buffer through to the surface for painting.

use crate::geometry::Size;

// ── PixelFormat ──────────────────────────────────────────────────

/// Pixel layout for decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 4 bytes per pixel: Blue, Green, Red, Alpha.
    #[default]
    Bgra8,
    /// 4 bytes per pixel: Red, Green, Blue, Alpha.
    Rgba8,
    /// 2 bytes per pixel, 5-6-5.
    Rgb565,
}

impl PixelFormat {
    /// Bytes consumed by a single pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb565 => 2,
        }
    }
}

// ── FrameBuffer ──────────────────────────────────────────────────

/// A decoded remote screen image.
///
/// `data` holds `height` rows of `stride` bytes each; `stride` may exceed
/// `width * bytes_per_pixel` when rows are padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    /// Row pitch in bytes.
    pub stride: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// A zero-filled, tightly packed frame. `None` when the byte size
    /// does not fit the stride or address space.
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Option<Self> {
        let stride = width.checked_mul(format.bytes_per_pixel() as u32)?;
        let len = (stride as usize).checked_mul(height as usize)?;
        Some(Self {
            width,
            height,
            stride,
            format,
            data: vec![0; len],
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    /// Total byte size the bitmap should occupy.
    pub fn byte_len(&self) -> usize {
        (self.stride as usize).saturating_mul(self.height as usize)
    }

    /// `true` when `data` is large enough for the declared geometry.
    pub fn is_complete(&self) -> bool {
        self.data.len() >= self.byte_len()
    }
}
