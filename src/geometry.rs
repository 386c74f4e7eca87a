//! Screen to backing-store coordinate mapping.
//!
//! A canvas can be laid out at one CSS size while its pixel buffer has
//! another (device pixel ratio, CSS scaling). Pointer events arrive in screen
//! coordinates; everything else in the editor works in buffer pixels.

/// On-screen bounding box of the surface, as reported by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds laid out 1:1 with a buffer at the origin.
    pub fn identity(buffer_width: usize, buffer_height: usize) -> Self {
        Self::new(0.0, 0.0, buffer_width as f64, buffer_height as f64)
    }
}

/// A point in backing-store pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Map a screen-space pointer position into buffer pixels.
///
/// A zero-sized layout box maps every point to the origin.
pub fn to_canvas_coordinates(
    screen_x: f64,
    screen_y: f64,
    bounds: CanvasBounds,
    buffer_width: usize,
    buffer_height: usize,
) -> Point {
    if bounds.width == 0.0 || bounds.height == 0.0 {
        return Point::default();
    }
    let scale_x = buffer_width as f64 / bounds.width;
    let scale_y = buffer_height as f64 / bounds.height;
    Point::new(
        (screen_x - bounds.left) * scale_x,
        (screen_y - bounds.top) * scale_y,
    )
}
