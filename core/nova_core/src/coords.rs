//! # Coordinate model
//!
//! Overlay rectangles are stored in percent of the card so a layout stays
//! valid however large the background is displayed. Only percentages are ever
//! persisted; pixels are derived on demand.
//!
//! | Space    | Origin               | Units                        |
//! |----------|----------------------|------------------------------|
//! | percent  | card top-left        | `0..=100` of width / height  |
//! | pixel    | card top-left        | device pixels                |
//! | pointer  | viewport top-left    | device pixels                |
//!
//! A [`Rect`]'s `(x, y)` is its center; a [`PixelBox`] is anchored at its
//! top-left corner for rendering.

use serde::{Deserialize, Serialize};

use crate::types::Rect;

/// A position in percent space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

/// A pointer / touch position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The container's bounding box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A container that cannot map pointers (collapsed or not laid out yet).
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A rendered overlay, top-left anchored, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBox {
    /// Center of this box in percent of a `container_width` x `container_height`
    /// card. `None` when the card has no area.
    pub fn center_percent(&self, container_width: f64, container_height: f64) -> Option<PercentPoint> {
        if container_width <= 0.0 || container_height <= 0.0 {
            return None;
        }
        Some(PercentPoint {
            x: (self.left + self.width / 2.0) / container_width * 100.0,
            y: (self.top + self.height / 2.0) / container_height * 100.0,
        })
    }
}

/// Map a percent rectangle onto a card rendered at the given pixel size.
pub fn to_pixels(rect: &Rect, container_width: f64, container_height: f64) -> PixelBox {
    let width = rect.w / 100.0 * container_width;
    let height = rect.h / 100.0 * container_height;
    PixelBox {
        left: rect.x / 100.0 * container_width - width / 2.0,
        top: rect.y / 100.0 * container_height - height / 2.0,
        width,
        height,
    }
}

/// Convert a viewport pointer position into percent of the container.
///
/// Returns `None` for a degenerate container; callers defer the update.
/// The result is not clamped: a pointer outside the card maps outside `0..=100`.
pub fn from_pointer(pointer: Point, container: &ContainerRect) -> Option<PercentPoint> {
    if container.is_degenerate() {
        return None;
    }
    Some(PercentPoint {
        x: (pointer.x - container.left) / container.width * 100.0,
        y: (pointer.y - container.top) / container.height * 100.0,
    })
}
