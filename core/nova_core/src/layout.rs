//! # Layout interaction engine
//!
//! Turns a pointer / touch gesture into edits of the two card overlays.
//!
//! ```text
//!            begin_drag(t)              end()
//!   Idle ─────────────────► Dragging(t) ─────► Idle
//!     │                                          ▲
//!     └──── begin_resize(t) ──► Resizing(t) ─────┘
//! ```
//!
//! Starting a gesture while another is active replaces it: input is
//! serialized by the UI, so the last gesture wins. Rectangles are mutated in
//! place on every [`LayoutEditor::move_to`]; `end` has nothing to commit.
//!
//! * Dragging keeps the grab point under the pointer (no snapping of the
//!   center to the pointer) and clamps the center to `[0, 100]²`. The
//!   rectangle itself may overflow the card edge.
//! * Resizing keeps the center fixed and grows symmetrically: the pointer's
//!   distance from the center is the new half-width / half-height.

use serde::{Deserialize, Serialize};

use crate::coords::{from_pointer, ContainerRect, PercentPoint, Point};
use crate::types::{CardDesign, Rect, MIN_RECT_SIZE};

/// The two movable overlays on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlay {
    #[serde(rename = "NAME")]
    Name,
    #[serde(rename = "QR")]
    Qr,
}

/// Current gesture of the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        target: Overlay,
        /// Pointer position minus the overlay center at grab time (percent).
        grab_offset: PercentPoint,
    },
    Resizing {
        target: Overlay,
    },
}

/// A single numeric field of a [`Rect`], for typed-in edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectField {
    X,
    Y,
    W,
    H,
}

#[derive(Debug, Clone)]
pub struct LayoutEditor {
    design: CardDesign,
    gesture: Gesture,
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::from_design(CardDesign::default())
    }
}

impl LayoutEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume editing a previously saved design.
    pub fn from_design(design: CardDesign) -> Self {
        Self {
            design,
            gesture: Gesture::Idle,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn rect(&self, overlay: Overlay) -> Rect {
        match overlay {
            Overlay::Name => self.design.name_position,
            Overlay::Qr => self.design.qr_position,
        }
    }

    fn rect_mut(&mut self, overlay: Overlay) -> &mut Rect {
        match overlay {
            Overlay::Name => &mut self.design.name_position,
            Overlay::Qr => &mut self.design.qr_position,
        }
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.design.background_image = background;
    }

    /// Grab `target` at `pointer`.
    ///
    /// On a degenerate container the grab offset is zero, so the first
    /// usable move centers the overlay on the pointer.
    pub fn begin_drag(&mut self, target: Overlay, pointer: Point, container: &ContainerRect) {
        let center = self.rect(target);
        let grab_offset = from_pointer(pointer, container)
            .map(|p| PercentPoint {
                x: p.x - center.x,
                y: p.y - center.y,
            })
            .unwrap_or(PercentPoint { x: 0.0, y: 0.0 });
        self.gesture = Gesture::Dragging {
            target,
            grab_offset,
        };
    }

    pub fn begin_resize(&mut self, target: Overlay) {
        self.gesture = Gesture::Resizing { target };
    }

    /// Apply a pointer move to the active overlay.
    ///
    /// Returns `true` if a rectangle changed. Idle editors and degenerate
    /// containers leave everything untouched.
    pub fn move_to(&mut self, pointer: Point, container: &ContainerRect) -> bool {
        let Some(p) = from_pointer(pointer, container) else {
            return false;
        };

        match self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging {
                target,
                grab_offset,
            } => {
                let rect = self.rect_mut(target);
                rect.x = (p.x - grab_offset.x).clamp(0.0, 100.0);
                rect.y = (p.y - grab_offset.y).clamp(0.0, 100.0);
                true
            }
            Gesture::Resizing { target } => {
                let rect = self.rect_mut(target);
                rect.w = (2.0 * (p.x - rect.x).abs()).max(MIN_RECT_SIZE);
                rect.h = (2.0 * (p.y - rect.y).abs()).max(MIN_RECT_SIZE);
                true
            }
        }
    }

    pub fn end(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Typed-in edit of one field. Non-finite input is ignored; the result is
    /// normalized like a gesture would be.
    pub fn set_field(&mut self, overlay: Overlay, field: RectField, value: f64) {
        if !value.is_finite() {
            return;
        }
        let rect = self.rect_mut(overlay);
        match field {
            RectField::X => rect.x = value,
            RectField::Y => rect.y = value,
            RectField::W => rect.w = value,
            RectField::H => rect.h = value,
        }
        *rect = rect.normalized();
    }

    pub fn design(&self) -> &CardDesign {
        &self.design
    }

    pub fn into_design(self) -> CardDesign {
        self.design
    }
}
