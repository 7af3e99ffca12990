//! Window geometry state machine.
//!
//! ```text
//!             enter_fullscreen (remember maximized?)
//!   Normal ─────────────────────────────► Fullscreen
//!     ▲  ▲                                   │
//!     │  └──── exit_fullscreen (was normal) ─┤
//!     │                                      │
//!     ▼        exit_fullscreen (was max)     │
//!   Maximized ◄──────────────────────────────┘
//!
//!   autosize: Normal + centered when the framed content fits, else Maximized
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collab::WindowHost;
use crate::geometry::{Point, Rect, Size};

// ── WindowState ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Normal,
    Maximized,
    Fullscreen,
}

impl std::fmt::Display for WindowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowState::Normal => write!(f, "normal"),
            WindowState::Maximized => write!(f, "maximized"),
            WindowState::Fullscreen => write!(f, "fullscreen"),
        }
    }
}

/// Memory kept across a fullscreen round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryState {
    pub was_maximized_before_fullscreen: bool,
}

// ── Autosize ─────────────────────────────────────────────────────

/// Outcome of the autosize computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosizePlan {
    /// Show normal with this client size, outer frame at `origin`.
    Fit { client: Size, origin: Point },
    Maximize,
}

/// Decide how to fit `content` on a screen whose usable area is
/// `available`, given the window's frame decoration overhead.
pub fn plan_autosize(available: Rect, content: Size, frame_overhead: Size) -> AutosizePlan {
    let required = content + frame_overhead;
    if required.fits_strictly_within(available.size()) {
        AutosizePlan::Fit {
            client: content,
            origin: available.centered_origin(required),
        }
    } else {
        AutosizePlan::Maximize
    }
}

// ── WindowGeometryController ─────────────────────────────────────

#[derive(Debug, Default)]
pub struct WindowGeometryController {
    state: WindowState,
    geometry: GeometryState,
}

impl WindowGeometryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn geometry_state(&self) -> GeometryState {
        self.geometry
    }

    pub fn is_maximized(&self) -> bool {
        self.state == WindowState::Maximized
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state == WindowState::Fullscreen
    }

    /// Panel toggle: `true` enters fullscreen, `false` leaves it.
    pub fn set_fullscreen(&mut self, host: &mut dyn WindowHost, fullscreen: bool) {
        if fullscreen {
            self.enter_fullscreen(host);
        } else {
            self.exit_fullscreen(host);
        }
    }

    /// Enter fullscreen, remembering whether the window was maximized.
    /// Ignored when already fullscreen so the memory is not overwritten.
    pub fn enter_fullscreen(&mut self, host: &mut dyn WindowHost) {
        if self.is_fullscreen() {
            return;
        }
        self.geometry.was_maximized_before_fullscreen = self.is_maximized();
        self.state = WindowState::Fullscreen;
        host.show_fullscreen();
        debug!(
            was_maximized = self.geometry.was_maximized_before_fullscreen,
            "entered fullscreen"
        );
    }

    /// Leave fullscreen, restoring the remembered state.
    pub fn exit_fullscreen(&mut self, host: &mut dyn WindowHost) {
        if !self.is_fullscreen() {
            return;
        }
        if std::mem::take(&mut self.geometry.was_maximized_before_fullscreen) {
            self.state = WindowState::Maximized;
            host.show_maximized();
        } else {
            self.state = WindowState::Normal;
            host.show_normal();
        }
        debug!(state = %self.state, "left fullscreen");
    }

    /// Fit the window around `content` or maximize when it cannot fit.
    pub fn autosize(
        &mut self,
        host: &mut dyn WindowHost,
        available: Rect,
        content: Size,
    ) -> WindowState {
        let overhead = host.frame_size() - host.client_size();
        match plan_autosize(available, content, overhead) {
            AutosizePlan::Fit { client, origin } => {
                self.state = WindowState::Normal;
                host.show_normal();
                host.resize(client);
                host.move_to(origin);
                info!(%client, x = origin.x, y = origin.y, "autosized window");
            }
            AutosizePlan::Maximize => {
                self.state = WindowState::Maximized;
                host.show_maximized();
                info!(%content, "content larger than screen; maximized");
            }
        }
        self.state
    }

    /// Screen-size changes autosize only a window the user has not
    /// maximized or made fullscreen, and only when the size really changed.
    pub fn wants_autosize(&self, previous: Size, current: Size) -> bool {
        previous != current && self.state == WindowState::Normal
    }

    /// Adopt a state change made through the window chrome.
    pub fn sync_state(&mut self, state: WindowState) {
        if self.state == WindowState::Fullscreen && state != WindowState::Fullscreen {
            self.geometry.was_maximized_before_fullscreen = false;
        }
        self.state = state;
    }

    /// Keep the control panel centered along the top edge.
    pub fn place_panel(&self, host: &mut dyn WindowHost, window: Size) {
        let panel = host.panel_size();
        host.move_panel(Point::new((window.width / 2).saturating_sub(panel.width / 2), 0));
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeHost {
        calls: Vec<String>,
        client: Size,
        frame_overhead: Size,
        panel: Size,
        panel_pos: Option<Point>,
    }

    impl WindowHost for FakeHost {
        fn client_size(&self) -> Size {
            self.client
        }
        fn frame_size(&self) -> Size {
            self.client + self.frame_overhead
        }
        fn available_geometry(&self) -> Rect {
            Rect::new(0, 0, 1920, 1080)
        }
        fn show_normal(&mut self) {
            self.calls.push("normal".into());
        }
        fn show_maximized(&mut self) {
            self.calls.push("maximized".into());
        }
        fn show_fullscreen(&mut self) {
            self.calls.push("fullscreen".into());
        }
        fn resize(&mut self, size: Size) {
            self.client = size;
            self.calls.push(format!("resize {size}"));
        }
        fn move_to(&mut self, pos: Point) {
            self.calls.push(format!("move {},{}", pos.x, pos.y));
        }
        fn set_title(&mut self, _title: &str) {}
        fn set_minimum_size(&mut self, _size: Size) {}
        fn panel_size(&self) -> Size {
            self.panel
        }
        fn move_panel(&mut self, pos: Point) {
            self.panel_pos = Some(pos);
        }
    }

    fn host() -> FakeHost {
        FakeHost {
            client: Size::new(800, 600),
            frame_overhead: Size::new(8, 30),
            panel: Size::new(300, 40),
            ..Default::default()
        }
    }

    #[test]
    fn fullscreen_roundtrip_from_normal() {
        let mut host = host();
        let mut ctl = WindowGeometryController::new();

        ctl.enter_fullscreen(&mut host);
        assert!(ctl.is_fullscreen());
        ctl.exit_fullscreen(&mut host);
        assert_eq!(ctl.state(), WindowState::Normal);
        assert_eq!(host.calls, vec!["fullscreen", "normal"]);
    }

    #[test]
    fn fullscreen_roundtrip_from_maximized() {
        let mut host = host();
        let mut ctl = WindowGeometryController::new();
        ctl.sync_state(WindowState::Maximized);

        ctl.set_fullscreen(&mut host, true);
        assert!(ctl.geometry_state().was_maximized_before_fullscreen);
        ctl.set_fullscreen(&mut host, false);
        assert_eq!(ctl.state(), WindowState::Maximized);
        assert!(!ctl.geometry_state().was_maximized_before_fullscreen);
    }

    #[test]
    fn reentering_fullscreen_keeps_memory() {
        let mut host = host();
        let mut ctl = WindowGeometryController::new();
        ctl.sync_state(WindowState::Maximized);
        ctl.enter_fullscreen(&mut host);
        ctl.enter_fullscreen(&mut host);
        ctl.exit_fullscreen(&mut host);
        assert_eq!(ctl.state(), WindowState::Maximized);
    }

    #[test]
    fn exit_when_not_fullscreen_is_noop() {
        let mut host = host();
        let mut ctl = WindowGeometryController::new();
        ctl.exit_fullscreen(&mut host);
        assert_eq!(ctl.state(), WindowState::Normal);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn plan_fits_and_centers() {
        let plan = plan_autosize(
            Rect::new(0, 0, 1920, 1080),
            Size::new(1024, 768),
            Size::new(8, 30),
        );
        assert_eq!(
            plan,
            AutosizePlan::Fit {
                client: Size::new(1024, 768),
                origin: Point::new(444, 141),
            }
        );
    }

    #[test]
    fn plan_maximizes_oversized_content() {
        let plan = plan_autosize(
            Rect::new(0, 0, 1920, 1080),
            Size::new(2000, 1200),
            Size::new(8, 30),
        );
        assert_eq!(plan, AutosizePlan::Maximize);
    }

    #[test]
    fn plan_requires_strict_fit() {
        // 1912 + 8 == 1920: not strictly smaller.
        let plan = plan_autosize(
            Rect::new(0, 0, 1920, 1080),
            Size::new(1912, 600),
            Size::new(8, 30),
        );
        assert_eq!(plan, AutosizePlan::Maximize);
    }

    #[test]
    fn autosize_drives_host() {
        let mut host = host();
        let mut ctl = WindowGeometryController::new();
        ctl.sync_state(WindowState::Maximized);

        let state = ctl.autosize(&mut host, Rect::new(0, 0, 1920, 1080), Size::new(1024, 768));
        assert_eq!(state, WindowState::Normal);
        assert_eq!(host.calls, vec!["normal", "resize 1024x768", "move 444,141"]);

        let state = ctl.autosize(&mut host, Rect::new(0, 0, 1920, 1080), Size::new(2000, 1200));
        assert_eq!(state, WindowState::Maximized);
        assert_eq!(host.calls.last().map(String::as_str), Some("maximized"));
    }

    #[test]
    fn autosize_gate() {
        let mut ctl = WindowGeometryController::new();
        let a = Size::new(1024, 768);
        let b = Size::new(1280, 1024);
        assert!(ctl.wants_autosize(a, b));
        assert!(!ctl.wants_autosize(a, a));

        ctl.sync_state(WindowState::Maximized);
        assert!(!ctl.wants_autosize(a, b));
        ctl.sync_state(WindowState::Fullscreen);
        assert!(!ctl.wants_autosize(a, b));
    }

    #[test]
    fn panel_centered_on_top() {
        let mut host = host();
        let ctl = WindowGeometryController::new();
        ctl.place_panel(&mut host, Size::new(1024, 768));
        assert_eq!(host.panel_pos, Some(Point::new(362, 0)));
    }
}
