//! Interactive crop rectangle.
//!
//! Tracks an axis-aligned rectangle in buffer pixels and the pointer
//! interaction acting on it: dragging the body or resizing through one of
//! eight handles (four corners, four edge midpoints). A resize always keeps
//! the edge or corner opposite the grabbed handle fixed.

use tracing::debug;

use crate::config::CropConfig;
use crate::geometry::Point;

/// Crop rectangle in buffer pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle a fresh image starts with: `size`x`size` at the origin,
    /// shrunk to the surface when the surface is smaller.
    ///
    /// A surface narrower or shorter than the minimum resize size yields a
    /// rectangle below that minimum. It still covers the whole image, and
    /// resizing can only shrink it, which the minimum then refuses.
    pub fn default_for(surface_width: usize, surface_height: usize, size: f64) -> Self {
        Self::new(
            0.0,
            0.0,
            size.min(surface_width as f64),
            size.min(surface_height as f64),
        )
    }

    /// Rectangle covering the whole surface.
    pub fn full(surface_width: usize, surface_height: usize) -> Self {
        Self::new(0.0, 0.0, surface_width as f64, surface_height as f64)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Boundary-exclusive containment.
    #[inline]
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }
}

/// One of the eight resize zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl Handle {
    /// Hit-test order: corners win over the edges they overlap.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
    ];

    /// Center of this handle's zone on `rect`.
    pub fn anchor(self, rect: &CropRect) -> Point {
        let mid_x = rect.x + rect.width / 2.0;
        let mid_y = rect.y + rect.height / 2.0;
        match self {
            Handle::TopLeft => Point::new(rect.x, rect.y),
            Handle::TopRight => Point::new(rect.right(), rect.y),
            Handle::BottomLeft => Point::new(rect.x, rect.bottom()),
            Handle::BottomRight => Point::new(rect.right(), rect.bottom()),
            Handle::Top => Point::new(mid_x, rect.y),
            Handle::Bottom => Point::new(mid_x, rect.bottom()),
            Handle::Left => Point::new(rect.x, mid_y),
            Handle::Right => Point::new(rect.right(), mid_y),
        }
    }

    pub fn cursor(self) -> CursorKind {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorKind::NwseResize,
            Handle::TopRight | Handle::BottomLeft => CursorKind::NeswResize,
            Handle::Left | Handle::Right => CursorKind::EwResize,
            Handle::Top | Handle::Bottom => CursorKind::NsResize,
        }
    }

    /// Candidate rectangle when this handle is moved to `(x, y)`.
    fn resize(self, rect: &CropRect, x: f64, y: f64) -> CropRect {
        let CropRect {
            x: old_x,
            y: old_y,
            width,
            height,
        } = *rect;

        match self {
            Handle::TopLeft => CropRect::new(x, y, width + (old_x - x), height + (old_y - y)),
            Handle::TopRight => CropRect::new(old_x, y, x - old_x, height + (old_y - y)),
            Handle::BottomLeft => CropRect::new(x, old_y, width + (old_x - x), y - old_y),
            Handle::BottomRight => CropRect::new(old_x, old_y, x - old_x, y - old_y),
            Handle::Top => CropRect::new(old_x, y, width, height + (old_y - y)),
            Handle::Bottom => CropRect::new(old_x, old_y, width, y - old_y),
            Handle::Left => CropRect::new(x, old_y, width + (old_x - x), height),
            Handle::Right => CropRect::new(old_x, old_y, x - old_x, height),
        }
    }
}

/// What the pointer is currently doing to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    Resizing(Handle),
}

/// Pointer cursor to show over a given point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Move,
    NwseResize,
    NeswResize,
    EwResize,
    NsResize,
}

impl CursorKind {
    /// CSS `cursor` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorKind::Default => "default",
            CursorKind::Move => "move",
            CursorKind::NwseResize => "nwse-resize",
            CursorKind::NeswResize => "nesw-resize",
            CursorKind::EwResize => "ew-resize",
            CursorKind::NsResize => "ns-resize",
        }
    }
}

/// Crop rectangle plus the interaction state machine driving it.
#[derive(Debug, Clone)]
pub struct CropTool {
    rect: CropRect,
    state: InteractionState,
    last_pointer: Point,
    config: CropConfig,
}

impl CropTool {
    pub fn new(rect: CropRect, config: CropConfig) -> Self {
        Self {
            rect,
            state: InteractionState::Idle,
            last_pointer: Point::default(),
            config,
        }
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Replace the rectangle and drop any interaction in progress.
    pub fn reset(&mut self, rect: CropRect) {
        self.rect = rect;
        self.state = InteractionState::Idle;
    }

    pub fn hit_test_body(&self, x: f64, y: f64) -> bool {
        self.rect.contains_strict(x, y)
    }

    /// Handle whose zone contains `(x, y)`, corners first.
    pub fn hit_test_handle(&self, x: f64, y: f64) -> Option<Handle> {
        let margin = self.config.handle_margin;
        Handle::ALL.into_iter().find(|handle| {
            let anchor = handle.anchor(&self.rect);
            (x - anchor.x).abs() < margin && (y - anchor.y).abs() < margin
        })
    }

    /// Start moving the body. Only valid from `Idle`.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        if self.state != InteractionState::Idle {
            return false;
        }
        self.state = InteractionState::Dragging;
        self.last_pointer = Point::new(x, y);
        debug!(x, y, "crop drag started");
        true
    }

    /// Start resizing through `handle`. Only valid from `Idle`.
    pub fn begin_resize(&mut self, handle: Handle) -> bool {
        if self.state != InteractionState::Idle {
            return false;
        }
        self.state = InteractionState::Resizing(handle);
        debug!(?handle, "crop resize started");
        true
    }

    /// Pointer pressed: resolve handles before the body, otherwise stay idle.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> InteractionState {
        if let Some(handle) = self.hit_test_handle(x, y) {
            self.begin_resize(handle);
            self.last_pointer = Point::new(x, y);
        } else if self.hit_test_body(x, y) {
            self.begin_drag(x, y);
        }
        self.state
    }

    /// Pointer moved: feed the active interaction. Returns whether the
    /// rectangle changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let changed = match self.state {
            InteractionState::Idle => false,
            InteractionState::Dragging => {
                let dx = x - self.last_pointer.x;
                let dy = y - self.last_pointer.y;
                self.update_drag(dx, dy)
            }
            InteractionState::Resizing(_) => self.update_resize(x, y),
        };
        self.last_pointer = Point::new(x, y);
        changed
    }

    /// Translate the rectangle. Not clamped to the surface.
    pub fn update_drag(&mut self, dx: f64, dy: f64) -> bool {
        if self.state != InteractionState::Dragging {
            return false;
        }
        self.rect.x += dx;
        self.rect.y += dy;
        true
    }

    /// Move the active handle to `(x, y)`. A candidate that is not strictly
    /// larger than the minimum size on both axes is dropped and the previous
    /// rectangle kept.
    pub fn update_resize(&mut self, x: f64, y: f64) -> bool {
        let InteractionState::Resizing(handle) = self.state else {
            return false;
        };
        let candidate = handle.resize(&self.rect, x, y);
        let min = self.config.min_size;
        if candidate.width > min && candidate.height > min {
            self.rect = candidate;
            true
        } else {
            false
        }
    }

    /// Pointer released. Always lands in `Idle`.
    pub fn end_interaction(&mut self) {
        if self.state != InteractionState::Idle {
            debug!(rect = ?self.rect, "crop interaction ended");
        }
        self.state = InteractionState::Idle;
    }

    pub fn cursor_for(&self, x: f64, y: f64) -> CursorKind {
        if let Some(handle) = self.hit_test_handle(x, y) {
            handle.cursor()
        } else if self.hit_test_body(x, y) {
            CursorKind::Move
        } else {
            CursorKind::Default
        }
    }
}
