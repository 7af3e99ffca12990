//! Host capabilities and the locally selectable feature/encoding sets.
//!
//! The host announces two bitmasks after the session starts: the video
//! encodings it can produce and the optional features it implements.
//! Both are replaced wholesale on every announcement.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of video encodings, as advertised by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct VideoEncodings: u32 {
        const ZLIB = 0x01;
        const VP8  = 0x02;
        const VP9  = 0x04;
    }
}

bitflags! {
    /// Optional session features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Features: u32 {
        /// Bidirectional clipboard synchronisation.
        const CLIPBOARD    = 0x01;
        /// Remote cursor shapes rendered locally.
        const CURSOR_SHAPE = 0x02;
    }
}

// ── VideoEncoding ────────────────────────────────────────────────

/// A single selected video encoding (the config holds exactly one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoEncoding {
    Zlib,
    #[default]
    Vp8,
    Vp9,
}

impl VideoEncoding {
    /// The bit this encoding occupies in a [`VideoEncodings`] set.
    pub const fn flag(self) -> VideoEncodings {
        match self {
            VideoEncoding::Zlib => VideoEncodings::ZLIB,
            VideoEncoding::Vp8 => VideoEncodings::VP8,
            VideoEncoding::Vp9 => VideoEncodings::VP9,
        }
    }
}

impl std::fmt::Display for VideoEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoEncoding::Zlib => write!(f, "zlib"),
            VideoEncoding::Vp8 => write!(f, "vp8"),
            VideoEncoding::Vp9 => write!(f, "vp9"),
        }
    }
}

// ── CapabilitySet ────────────────────────────────────────────────

/// What the connected host reported it supports.
///
/// Empty until the first announcement arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub supported_video_encodings: VideoEncodings,
    pub supported_features: Features,
}

impl CapabilitySet {
    pub fn new(video_encodings: VideoEncodings, features: Features) -> Self {
        Self {
            supported_video_encodings: video_encodings,
            supported_features: features,
        }
    }

    /// Whether the host can produce `encoding`.
    pub fn supports_encoding(&self, encoding: VideoEncoding) -> bool {
        self.supported_video_encodings.intersects(encoding.flag())
    }

    /// Features enabled on both sides: the intersection of host support
    /// and the locally requested set.
    pub fn negotiate(&self, requested: Features) -> Features {
        self.supported_features & requested
    }
}
