//! Edge-triggered autoscroll.
//!
//! While the pointer lingers within [`EDGE_MARGIN`] pixels of an edge of
//! the visible client area, and the content overflows on that axis, a
//! recurring tick nudges the matching scrollbar by [`SCROLL_STEP`].
//!
//! ```text
//!   pointer event ──► evaluate ──► delta != 0 ──► timer.start(15ms)
//!                         │
//!                         └──────► delta == 0 ──► timer.stop()
//!
//!   tick ──► slider += delta (clamped to [min, max])
//! ```
//!
//! The engine is the only component that starts or stops the timer.

use std::time::Duration;

use tracing::{debug, trace};

use crate::collab::ScrollTimer;
use crate::geometry::{Point, Size};
use crate::scroll::{Orientation, ScrollArea};

/// Distance from an edge that arms autoscroll.
pub const EDGE_MARGIN: i32 = 50;

/// Slider movement per tick.
pub const SCROLL_STEP: i32 = 10;

/// Tick period.
pub const TICK_PERIOD: Duration = Duration::from_millis(15);

// ── ScrollDelta / ScrollState ────────────────────────────────────

/// Per-tick scroll direction; each component is `-SCROLL_STEP`, 0 or `SCROLL_STEP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollDelta {
    pub dx: i32,
    pub dy: i32,
}

impl ScrollDelta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Autoscroll state. `timer_active == !delta.is_zero()` after every evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub delta: ScrollDelta,
    pub timer_active: bool,
}

// ── AutoscrollEngine ─────────────────────────────────────────────

pub struct AutoscrollEngine {
    state: ScrollState,
    timer: Box<dyn ScrollTimer>,
    /// Last pointer position seen, in container coordinates.
    last_cursor: Option<Point>,
}

impl AutoscrollEngine {
    pub fn new(timer: Box<dyn ScrollTimer>) -> Self {
        Self {
            state: ScrollState::default(),
            timer,
            last_cursor: None,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Direction the viewport should scroll for a pointer at `cursor`
    /// (container coordinates).
    pub fn compute_delta(cursor: Point, area: &ScrollArea) -> ScrollDelta {
        let mut client = area.size();
        if area.horizontal().is_visible() {
            client.height = client.height.saturating_sub(area.horizontal().extent());
        }
        if area.vertical().is_visible() {
            client.width = client.width.saturating_sub(area.vertical().extent());
        }

        let content: Size = area.content_size();
        let axis = |pos: i32, client: i32, content: i32| {
            if client >= content {
                0
            } else if pos > client.saturating_sub(EDGE_MARGIN) {
                SCROLL_STEP
            } else if pos < EDGE_MARGIN {
                -SCROLL_STEP
            } else {
                0
            }
        };

        ScrollDelta::new(
            axis(cursor.x, client.width, content.width),
            axis(cursor.y, client.height, content.height),
        )
    }

    /// Re-evaluate for a pointer event at `cursor` (container coordinates).
    pub fn on_pointer(&mut self, cursor: Point, area: &ScrollArea) -> ScrollDelta {
        self.last_cursor = Some(cursor);
        self.evaluate(cursor, area);
        self.state.delta
    }

    /// Re-evaluate against the last pointer position after the container
    /// or the content changed size.
    pub fn on_geometry_changed(&mut self, area: &ScrollArea) {
        if let Some(cursor) = self.last_cursor {
            self.evaluate(cursor, area);
        }
    }

    fn evaluate(&mut self, cursor: Point, area: &ScrollArea) {
        self.state.delta = ScrollDelta::default();
        self.state.delta = Self::compute_delta(cursor, area);

        if !self.state.delta.is_zero() {
            if !self.state.timer_active {
                debug!(dx = self.state.delta.dx, dy = self.state.delta.dy, "autoscroll started");
                self.timer.start(TICK_PERIOD);
                self.state.timer_active = true;
            }
        } else if self.state.timer_active {
            debug!("autoscroll stopped");
            self.timer.stop();
            self.state.timer_active = false;
        }
    }

    /// Apply one tick. Returns `true` when a slider moved.
    ///
    /// Ticks that arrive after the timer was stopped are ignored.
    pub fn tick(&mut self, area: &mut ScrollArea) -> bool {
        if !self.state.timer_active {
            return false;
        }

        let mut moved = false;
        for (orientation, step) in [
            (Orientation::Horizontal, self.state.delta.dx),
            (Orientation::Vertical, self.state.delta.dy),
        ] {
            if step == 0 {
                continue;
            }
            let bar = area.scroll_bar_mut(orientation);
            let pos = bar
                .position()
                .saturating_add(step)
                .clamp(bar.minimum(), bar.maximum());
            if pos != bar.position() {
                moved = true;
            }
            bar.set_position(pos);
        }

        trace!(moved, "autoscroll tick");
        moved
    }

    /// Cancel any running tick and forget the pointer. Used on teardown.
    pub fn stop(&mut self) {
        self.state.delta = ScrollDelta::default();
        if self.state.timer_active {
            self.timer.stop();
            self.state.timer_active = false;
        }
        self.last_cursor = None;
    }
}

impl Drop for AutoscrollEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Tests ────────────────────────────────────────────────────────
