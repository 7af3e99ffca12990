//! # rdv-core
//!
//! Viewport controller for a single remote-desktop session window.
//!
//! This crate contains:
//! - **Model**: `SessionDescriptor`, `SessionConfig`, `CapabilitySet`, geometry primitives
//! - **Scrolling**: `ScrollArea` and the edge-triggered `AutoscrollEngine`
//! - **Window**: `WindowGeometryController` (fullscreen memory, autosize, panel placement)
//! - **Input**: `InputEventRouter` classification, wheel conversion, key sequences
//! - **Negotiation**: `FeatureNegotiator` and the `ClipboardBridge`
//! - **Controller**: `ViewportController`, driven through the traits in `collab`
//! - **Error**: `RdvError`, `thiserror`-based

pub mod autoscroll;
pub mod capability;
pub mod clipboard;
pub mod collab;
pub mod controller;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod negotiate;
pub mod scroll;
pub mod session;
pub mod ticker;
pub mod window;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use autoscroll::{
    AutoscrollEngine, EDGE_MARGIN, SCROLL_STEP, ScrollDelta, ScrollState, TICK_PERIOD,
};
pub use capability::{CapabilitySet, Features, VideoEncoding, VideoEncodings};
pub use clipboard::ClipboardBridge;
pub use collab::{
    ClipboardService, ClipboardSubscription, ConfigDialog, DesktopSurface, DialogOutcome,
    Notifier, ScrollTimer, SessionChannel, WindowHost,
};
pub use controller::{Collaborators, MIN_WINDOW_SIZE, PanelCommand, ViewportController};
pub use error::RdvError;
pub use event::{
    ClipboardEvent, CursorShape, KeyAction, KeyCode, KeyEvent, Modifiers, OutboundEvent,
    PointerButtons,
};
pub use frame::{FrameBuffer, PixelFormat};
pub use geometry::{Point, Rect, Size};
pub use input::{
    InputEventRouter, InputSource, KeySequence, MAX_WHEEL_STEPS, RawInput, RouteDecision,
};
pub use negotiate::{ConfigOutcome, FeatureNegotiator};
pub use scroll::{Orientation, ScrollArea, ScrollBar};
pub use session::{SessionConfig, SessionDescriptor, SessionType};
pub use ticker::{IntervalTimer, ScrollTick};
pub use window::{WindowGeometryController, WindowState};
