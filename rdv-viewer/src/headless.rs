//! Headless collaborators.
//!
//! Stand-ins for the toolkit pieces the controller talks to. They keep
//! just enough state to behave like a real window (client size follows
//! show/resize calls and is reported back as a resize notice) and log
//! everything else.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use rdv_core::{
    CapabilitySet, ClipboardEvent, ClipboardService, ClipboardSubscription, ConfigDialog,
    CursorShape, DesktopSurface, DialogOutcome, Features, FrameBuffer, Notifier, Point, Rect,
    SessionConfig, Size, VideoEncoding, WindowHost,
};

use crate::config::{DialogSection, DisplaySection};

// ── HeadlessWindow ───────────────────────────────────────────────

/// Window chrome without a screen. Every client-size change is posted on
/// `resized` so the driver can feed it back like a toolkit resize event.
pub struct HeadlessWindow {
    client: Size,
    normal_client: Size,
    minimum: Size,
    overhead: Size,
    available: Rect,
    panel: Size,
    resized: mpsc::UnboundedSender<Size>,
}

impl HeadlessWindow {
    pub fn new(display: &DisplaySection, resized: mpsc::UnboundedSender<Size>) -> Self {
        Self {
            client: display.window_size(),
            normal_client: display.window_size(),
            minimum: Size::default(),
            overhead: display.frame_overhead(),
            available: display.available(),
            panel: display.panel_size(),
            resized,
        }
    }

    fn set_client(&mut self, size: Size) {
        if size == self.client {
            return;
        }
        self.client = size;
        // The driver owns the receiver for as long as the window lives.
        let _ = self.resized.send(size);
    }
}

impl WindowHost for HeadlessWindow {
    fn client_size(&self) -> Size {
        self.client
    }

    fn frame_size(&self) -> Size {
        self.client + self.overhead
    }

    fn available_geometry(&self) -> Rect {
        self.available
    }

    fn show_normal(&mut self) {
        info!(size = %self.normal_client, "window normal");
        self.set_client(self.normal_client);
    }

    fn show_maximized(&mut self) {
        let size = self.available.size() - self.overhead;
        info!(%size, "window maximized");
        self.set_client(size);
    }

    fn show_fullscreen(&mut self) {
        info!(size = %self.available.size(), "window fullscreen");
        self.set_client(self.available.size());
    }

    fn resize(&mut self, size: Size) {
        let size = Size::new(
            size.width.max(self.minimum.width),
            size.height.max(self.minimum.height),
        );
        debug!(%size, "window resize");
        self.normal_client = size;
        self.set_client(size);
    }

    fn move_to(&mut self, pos: Point) {
        debug!(x = pos.x, y = pos.y, "window move");
    }

    fn set_title(&mut self, title: &str) {
        info!(title, "window title");
    }

    fn set_minimum_size(&mut self, size: Size) {
        self.minimum = size;
    }

    fn panel_size(&self) -> Size {
        self.panel
    }

    fn move_panel(&mut self, pos: Point) {
        trace!(x = pos.x, y = pos.y, "panel moved");
    }
}

// ── HeadlessSurface ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: Size,
    frames: u64,
}

impl DesktopSurface for HeadlessSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn draw(&mut self, frame: &FrameBuffer) {
        self.frames += 1;
        if !frame.is_complete() {
            warn!(size = %frame.size(), len = frame.data.len(), "short frame buffer");
        }
        trace!(n = self.frames, size = %frame.size(), "frame drawn");
    }

    fn set_cursor(&mut self, cursor: &CursorShape) {
        debug!(w = cursor.width, h = cursor.height, "cursor shape");
    }
}

// ── MemoryClipboard ──────────────────────────────────────────────

/// Process-local clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<ClipboardEvent>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<ClipboardEvent> {
        self.contents.borrow().clone()
    }
}

struct MemorySubscription {
    contents: Rc<RefCell<Option<ClipboardEvent>>>,
}

impl ClipboardService for MemoryClipboard {
    fn subscribe(&mut self) -> Box<dyn ClipboardSubscription> {
        debug!("clipboard subscription opened");
        Box::new(MemorySubscription {
            contents: self.contents.clone(),
        })
    }
}

impl ClipboardSubscription for MemorySubscription {
    fn set_local(&mut self, event: &ClipboardEvent) {
        *self.contents.borrow_mut() = Some(event.clone());
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        debug!("clipboard subscription closed");
    }
}

// ── PresetDialog ─────────────────────────────────────────────────

/// A settings dialog whose answers come from the config file.
#[derive(Debug, Clone)]
pub struct PresetDialog {
    accept: bool,
    video_encoding: Option<VideoEncoding>,
    features: Option<Features>,
}

impl PresetDialog {
    pub fn new(section: &DialogSection) -> Self {
        Self {
            accept: section.accept,
            video_encoding: section.video_encoding,
            features: section.features,
        }
    }
}

impl ConfigDialog for PresetDialog {
    fn exec(&mut self, config: &mut SessionConfig, capabilities: &CapabilitySet) -> DialogOutcome {
        if let Some(encoding) = self.video_encoding {
            config.video_encoding = encoding;
        }
        if let Some(features) = self.features {
            config.features = features;
        }
        info!(
            accept = self.accept,
            encoding = %config.video_encoding,
            host = ?capabilities.supported_video_encodings,
            "settings dialog"
        );
        if self.accept {
            DialogOutcome::Accepted
        } else {
            DialogOutcome::Rejected
        }
    }
}

// ── LogNotifier ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&mut self, title: &str, message: &str) {
        warn!(title, "{message}");
    }
}

// ── Tests ────────────────────────────────────────────────────────
