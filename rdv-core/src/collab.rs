//! Seams to the world outside the controller.
//!
//! Every collaborator is a trait so the controller can be driven by a
//! real toolkit, by the headless viewer, or by recording test doubles.
//! All calls happen on the UI thread; none of them may block.

use std::time::Duration;

use crate::capability::CapabilitySet;
use crate::error::RdvError;
use crate::event::{ClipboardEvent, CursorShape, OutboundEvent};
use crate::frame::FrameBuffer;
use crate::geometry::{Point, Rect, Size};
use crate::session::SessionConfig;

/// Owns and paints the remote frame.
pub trait DesktopSurface {
    /// Current drawable size (equals the remote screen size once known).
    fn size(&self) -> Size;

    /// Reallocate for a new remote screen size.
    fn resize(&mut self, size: Size);

    /// Paint a decoded frame.
    fn draw(&mut self, frame: &FrameBuffer);

    /// Show a remote cursor image over the surface.
    fn set_cursor(&mut self, cursor: &CursorShape);
}

/// Top-level window chrome.
pub trait WindowHost {
    /// Size of the client area (what the viewport gets).
    fn client_size(&self) -> Size;

    /// Outer size including title bar and borders.
    fn frame_size(&self) -> Size;

    /// Usable area of the screen the window is on (excludes task bars).
    fn available_geometry(&self) -> Rect;

    fn show_normal(&mut self);
    fn show_maximized(&mut self);
    fn show_fullscreen(&mut self);

    /// Resize the client area.
    fn resize(&mut self, size: Size);

    /// Move the outer frame's top-left corner.
    fn move_to(&mut self, pos: Point);

    fn set_title(&mut self, title: &str);
    fn set_minimum_size(&mut self, size: Size);

    /// Size of the floating control panel.
    fn panel_size(&self) -> Size;

    /// Place the control panel (window client coordinates).
    fn move_panel(&mut self, pos: Point);
}

/// Outbound half of the session transport.
pub trait SessionChannel {
    fn send(&mut self, event: OutboundEvent) -> Result<(), RdvError>;
}

/// OS clipboard integration.
pub trait ClipboardService {
    /// Start a live subscription. Dropping it ends the subscription.
    fn subscribe(&mut self) -> Box<dyn ClipboardSubscription>;
}

/// A live clipboard subscription.
pub trait ClipboardSubscription {
    /// Put a payload received from the remote side on the local clipboard.
    fn set_local(&mut self, event: &ClipboardEvent);
}

/// How the user left the configuration dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Accepted,
    Rejected,
}

/// The modal configuration editor.
pub trait ConfigDialog {
    /// Run the dialog. It may edit `config` in place; the caller discards
    /// edits when the outcome is [`DialogOutcome::Rejected`].
    fn exec(&mut self, config: &mut SessionConfig, capabilities: &CapabilitySet) -> DialogOutcome;
}

/// Non-blocking user-visible messages.
pub trait Notifier {
    fn warn(&mut self, title: &str, message: &str);
}

/// Recurring tick source used by autoscroll.
///
/// Implementations deliver ticks back to the UI thread, which calls
/// [`ViewportController::on_scroll_tick`](crate::controller::ViewportController::on_scroll_tick).
pub trait ScrollTimer {
    /// Begin ticking every `period`. Calling while running is a no-op.
    fn start(&mut self, period: Duration);

    /// Stop ticking. Calling while stopped is a no-op.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}
