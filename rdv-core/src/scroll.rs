//! Scroll container model.
//!
//! The container shows the remote surface ("content"). When the content
//! is larger than the container on an axis, a scrollbar appears on that
//! axis and eats into the space on the other one. Content smaller than
//! the container is centered.

use crate::geometry::{Point, Size};

/// Default scrollbar thickness in pixels.
pub const DEFAULT_SCROLLBAR_EXTENT: i32 = 16;

/// Scrollbar axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

// ── ScrollBar ────────────────────────────────────────────────────

/// One scrollbar: a range and a slider position inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollBar {
    minimum: i32,
    maximum: i32,
    position: i32,
    visible: bool,
    /// Thickness across the bar.
    extent: i32,
}

impl ScrollBar {
    fn new(extent: i32) -> Self {
        Self {
            minimum: 0,
            maximum: 0,
            position: 0,
            visible: false,
            extent,
        }
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn extent(&self) -> i32 {
        self.extent
    }

    /// Move the slider, clamped into `[minimum, maximum]`.
    pub fn set_position(&mut self, position: i32) {
        self.position = position.clamp(self.minimum, self.maximum);
    }

    fn set_range(&mut self, minimum: i32, maximum: i32) {
        self.minimum = minimum;
        self.maximum = maximum.max(minimum);
        self.set_position(self.position);
    }
}

// ── ScrollArea ───────────────────────────────────────────────────

/// Container geometry plus both scrollbars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollArea {
    size: Size,
    content: Size,
    horizontal: ScrollBar,
    vertical: ScrollBar,
}

impl ScrollArea {
    pub fn new(size: Size, scrollbar_extent: i32) -> Self {
        let mut area = Self {
            size,
            content: Size::default(),
            horizontal: ScrollBar::new(scrollbar_extent),
            vertical: ScrollBar::new(scrollbar_extent),
        };
        area.relayout();
        area
    }

    /// Full container size, scrollbars included.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.relayout();
    }

    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
        self.relayout();
    }

    pub fn horizontal(&self) -> &ScrollBar {
        &self.horizontal
    }

    pub fn vertical(&self) -> &ScrollBar {
        &self.vertical
    }

    pub fn scroll_bar_mut(&mut self, orientation: Orientation) -> &mut ScrollBar {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    /// Visible part of the container once scrollbars are taken out.
    pub fn viewport_size(&self) -> Size {
        let dw = if self.vertical.visible { self.vertical.extent } else { 0 };
        let dh = if self.horizontal.visible { self.horizontal.extent } else { 0 };
        self.size.shrunk_by(dw, dh)
    }

    /// Where the content's top-left corner sits in container coordinates.
    pub fn content_origin(&self) -> Point {
        let view = self.viewport_size();
        let axis = |content: i32, view: i32, bar: &ScrollBar| {
            if content < view {
                view.saturating_sub(content) / 2
            } else {
                -bar.position
            }
        };
        Point::new(
            axis(self.content.width, view.width, &self.horizontal),
            axis(self.content.height, view.height, &self.vertical),
        )
    }

    /// Content coordinates to container coordinates.
    pub fn map_to_container(&self, pos: Point) -> Point {
        pos + self.content_origin()
    }

    /// Container coordinates to content coordinates.
    pub fn map_from_container(&self, pos: Point) -> Point {
        pos - self.content_origin()
    }

    // Scrollbars are shown as needed: a bar on one axis can push the
    // other axis over its limit, so the second check uses the reduced size.
    fn relayout(&mut self) {
        let mut need_h = self.content.width > self.size.width;
        let mut need_v = self.content.height > self.size.height;

        if need_h && !need_v {
            need_v = self.content.height
                > self.size.height.saturating_sub(self.horizontal.extent);
        }
        if need_v && !need_h {
            need_h = self.content.width
                > self.size.width.saturating_sub(self.vertical.extent);
        }

        self.horizontal.visible = need_h;
        self.vertical.visible = need_v;

        let view = self.viewport_size();
        self.horizontal
            .set_range(0, self.content.width.saturating_sub(view.width).max(0));
        self.vertical
            .set_range(0, self.content.height.saturating_sub(view.height).max(0));
    }
}
