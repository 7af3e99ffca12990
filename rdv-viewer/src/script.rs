//! Scripted session input.
//!
//! One JSON object per line, tagged by `"type"`:
//!
//! ```text
//! {"type":"capabilities","video_encodings":"ZLIB | VP8","features":"CLIPBOARD"}
//! {"type":"screen_size","width":1920,"height":1080}
//! {"type":"input","source":"viewport","input":{"kind":"pointer_move","position":{"x":790,"y":300},"buttons":""}}
//! {"type":"wait","ms":100}
//! {"type":"close"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};

use rdv_core::{
    Features, InputSource, Point, RawInput, RdvError, SessionConfig, VideoEncodings, WindowState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Host capability announcement.
    Capabilities {
        video_encodings: VideoEncodings,
        features: Features,
    },
    /// The remote screen changed size.
    ScreenSize { width: i32, height: i32 },
    /// A decoded frame of the given size.
    Frame { width: u32, height: u32 },
    /// Remote cursor image.
    Cursor {
        width: u32,
        height: u32,
        #[serde(default)]
        hotspot: Point,
    },
    /// Clipboard text from the host.
    Clipboard { text: String },
    /// Clipboard text copied locally.
    LocalClipboard { text: String },
    /// The session layer asks for a new config.
    ConfigRequest { config: SessionConfig },
    /// Raw toolkit input.
    Input { source: InputSource, input: RawInput },
    /// Panel: send a key chord; the configured one when `keys` is absent.
    KeySequence {
        #[serde(default)]
        keys: Option<String>,
    },
    /// Panel: open settings.
    Settings,
    /// Panel: autosize.
    Autosize,
    /// Panel: toggle fullscreen.
    Fullscreen { enabled: bool },
    /// The user resized the window through its chrome.
    WindowResized { width: i32, height: i32 },
    /// The user maximized or restored the window through its chrome.
    WindowStateChanged { state: WindowState },
    /// The viewport lost keyboard focus.
    FocusLost,
    /// Pause script reading; ticks keep running.
    Wait { ms: u64 },
    /// The user closes the window.
    Close,
}

impl ScriptEvent {
    /// Parse one script line. `Ok(None)` for blank and comment lines.
    pub fn parse_line(line: &str) -> Result<Option<Self>, RdvError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }
}
