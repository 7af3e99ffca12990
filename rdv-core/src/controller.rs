//! The viewport controller.
//!
//! Single entry and exit point for one remote-desktop session window.
//! The session layer calls the `announce_*`/`update_*`/`deliver_*`
//! methods, the toolkit calls `handle_*`/`on_*`, and everything bound for
//! the host leaves through the [`SessionChannel`] as an [`OutboundEvent`].

use tracing::{debug, info, trace, warn};

use crate::autoscroll::{AutoscrollEngine, ScrollState};
use crate::capability::{CapabilitySet, Features};
use crate::collab::{
    ClipboardService, ConfigDialog, DesktopSurface, Notifier, ScrollTimer, SessionChannel,
    WindowHost,
};
use crate::event::{ClipboardEvent, CursorShape, KeyEvent, OutboundEvent};
use crate::frame::FrameBuffer;
use crate::geometry::Size;
use crate::input::{Forward, InputEventRouter, InputSource, KeySequence, RawInput};
use crate::negotiate::{ConfigOutcome, FeatureNegotiator, NegotiationContext};
use crate::scroll::{DEFAULT_SCROLLBAR_EXTENT, ScrollArea};
use crate::session::{SessionConfig, SessionDescriptor};
use crate::window::{WindowGeometryController, WindowState};

/// Smallest client area the window may be shrunk to.
pub const MIN_WINDOW_SIZE: Size = Size::new(800, 600);

/// Everything the controller talks to.
pub struct Collaborators {
    pub surface: Box<dyn DesktopSurface>,
    pub window: Box<dyn WindowHost>,
    pub channel: Box<dyn SessionChannel>,
    pub clipboard: Box<dyn ClipboardService>,
    pub dialog: Box<dyn ConfigDialog>,
    pub notifier: Box<dyn Notifier>,
    pub timer: Box<dyn ScrollTimer>,
}

/// Commands from the floating control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    KeySequence(KeySequence),
    Settings,
    Autosize,
    Fullscreen(bool),
}

pub struct ViewportController {
    session: SessionDescriptor,
    area: ScrollArea,
    autoscroll: AutoscrollEngine,
    geometry: WindowGeometryController,
    negotiator: FeatureNegotiator,
    router: InputEventRouter,

    surface: Box<dyn DesktopSurface>,
    window: Box<dyn WindowHost>,
    channel: Box<dyn SessionChannel>,
    clipboard: Box<dyn ClipboardService>,
    dialog: Box<dyn ConfigDialog>,
    notifier: Box<dyn Notifier>,

    closed: bool,
}

impl ViewportController {
    pub fn new(session: SessionDescriptor, collab: Collaborators) -> Self {
        let Collaborators {
            surface,
            mut window,
            channel,
            clipboard,
            dialog,
            notifier,
            timer,
        } = collab;

        window.set_title(&session.window_title());
        window.set_minimum_size(MIN_WINDOW_SIZE);

        let mut area = ScrollArea::new(window.client_size(), DEFAULT_SCROLLBAR_EXTENT);
        area.set_content_size(surface.size());

        info!(
            session = %session.session_type,
            target = session.display_name(),
            "viewport opened"
        );

        Self {
            session,
            area,
            autoscroll: AutoscrollEngine::new(timer),
            geometry: WindowGeometryController::new(),
            negotiator: FeatureNegotiator::new(),
            router: InputEventRouter::new(),
            surface,
            window,
            channel,
            clipboard,
            dialog,
            notifier,
            closed: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn session(&self) -> &SessionDescriptor {
        &self.session
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        self.negotiator.capabilities()
    }

    pub fn scroll_area(&self) -> &ScrollArea {
        &self.area
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.autoscroll.state()
    }

    pub fn window_state(&self) -> WindowState {
        self.geometry.state()
    }

    pub fn has_clipboard(&self) -> bool {
        self.negotiator.has_clipboard()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ── Session layer ────────────────────────────────────────────

    pub fn announce_capabilities(&mut self, capabilities: CapabilitySet) {
        self.negotiator
            .announce(capabilities, &self.session, self.clipboard.as_mut());
    }

    /// The remote screen changed size.
    pub fn update_screen_size(&mut self, size: Size) {
        let previous = self.surface.size();
        self.surface.resize(size);
        self.area.set_content_size(size);
        self.autoscroll.on_geometry_changed(&self.area);
        debug!(%previous, current = %size, "remote screen size");

        if self.geometry.wants_autosize(previous, size) {
            self.autosize();
        }
    }

    pub fn deliver_frame(&mut self, frame: &FrameBuffer) {
        if frame.size() != self.surface.size() {
            trace!(frame = %frame.size(), surface = %self.surface.size(), "frame size mismatch");
        }
        self.surface.draw(frame);
    }

    /// Remote cursor image. Ignored unless the host supports cursor shapes.
    pub fn deliver_cursor(&mut self, cursor: &CursorShape) {
        if !self.capabilities().supported_features.contains(Features::CURSOR_SHAPE) {
            trace!("cursor shape without host support; ignored");
            return;
        }
        self.surface.set_cursor(cursor);
    }

    /// Clipboard payload from the host.
    pub fn deliver_clipboard_event(&mut self, event: ClipboardEvent) {
        match self.negotiator.clipboard_mut() {
            Some(bridge) => bridge.inject(event),
            None => debug!("clipboard event without bridge; dropped"),
        }
    }

    /// The session layer asks to switch to `candidate`.
    pub fn request_config_change(&mut self, candidate: &mut SessionConfig) -> ConfigOutcome {
        self.negotiator.request_config_change(
            candidate,
            &mut self.session,
            NegotiationContext {
                dialog: self.dialog.as_mut(),
                notifier: self.notifier.as_mut(),
                clipboard: self.clipboard.as_mut(),
            },
        )
    }

    // ── Toolkit ──────────────────────────────────────────────────

    /// The local clipboard changed.
    pub fn on_local_clipboard(&mut self, event: ClipboardEvent) {
        let Some(bridge) = self.negotiator.clipboard_mut() else {
            return;
        };
        if let Some(event) = bridge.local_changed(event) {
            self.send(OutboundEvent::Clipboard(event));
        }
    }

    /// Route a raw input event. Returns `true` when the toolkit must not
    /// process it further.
    pub fn handle_input(&mut self, source: InputSource, input: RawInput) -> bool {
        if self.closed {
            return false;
        }

        let routing = self.router.route(source, input, &self.area);
        for forward in routing.forwards.iter().copied() {
            match forward {
                Forward::Pointer { position, buttons } => {
                    let cursor = self.area.map_to_container(position);
                    self.autoscroll.on_pointer(cursor, &self.area);
                    self.send(OutboundEvent::Pointer { position, buttons });
                }
                Forward::Key(event) => self.send(OutboundEvent::Key(event)),
            }
        }
        routing.consumed()
    }

    pub fn handle_panel(&mut self, command: PanelCommand) {
        debug!(?command, "panel command");
        match command {
            PanelCommand::KeySequence(sequence) => {
                let events = self.router.key_sequence(&sequence);
                self.send_keys(events);
            }
            PanelCommand::Settings => {
                if let Some(config) = self.negotiator.change_settings(
                    &mut self.session,
                    self.dialog.as_mut(),
                    self.clipboard.as_mut(),
                ) {
                    self.send(OutboundEvent::ConfigChanged(config));
                }
            }
            PanelCommand::Autosize => self.autosize(),
            PanelCommand::Fullscreen(on) => self.geometry.set_fullscreen(self.window.as_mut(), on),
        }
    }

    /// The window's client area was resized.
    pub fn on_window_resized(&mut self, size: Size) {
        self.area.set_size(size);
        self.autoscroll.on_geometry_changed(&self.area);
        self.geometry.place_panel(self.window.as_mut(), size);
    }

    /// The user changed the window state through the window chrome.
    pub fn on_window_state_changed(&mut self, state: WindowState) {
        self.geometry.sync_state(state);
    }

    /// The viewport lost keyboard focus.
    pub fn on_focus_lost(&mut self) {
        let released = self.router.release_all();
        if !released.is_empty() {
            debug!(count = released.len(), "releasing held keys");
        }
        self.send_keys(released);
    }

    /// One autoscroll tick. Returns `true` when the view moved.
    pub fn on_scroll_tick(&mut self) -> bool {
        self.autoscroll.tick(&mut self.area)
    }

    /// The user asked to close the window. Notifies the host once.
    pub fn on_close_requested(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.autoscroll.stop();
        info!("viewport closing");
        self.send(OutboundEvent::WindowClosed);
    }

    // ── Internals ────────────────────────────────────────────────

    fn autosize(&mut self) {
        let available = self.window.available_geometry();
        self.geometry
            .autosize(self.window.as_mut(), available, self.surface.size());
    }

    fn send_keys(&mut self, events: Vec<KeyEvent>) {
        for event in events {
            self.send(OutboundEvent::Key(event));
        }
    }

    fn send(&mut self, event: OutboundEvent) {
        if let Err(err) = self.channel.send(event) {
            warn!(%err, "failed to send event to host");
        }
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        // The tick must not outlive the viewport it scrolls.
        self.autoscroll.stop();
    }
}
