//! Rubber-band region selection over a frozen snapshot.
//!
//! The overlay is a small state machine fed with pointer events from the UI:
//!
//! ```text
//! AwaitingFirstPoint --Down--> Dragging --Up--> Finished(Selected | Cancelled)
//!          |                      |
//!          +--------Cancel--------+-----------> Finished(Cancelled)
//! ```
//!
//! One overlay instance produces exactly one outcome. Events after that are ignored.

use image::{Rgba, RgbaImage};
use snip_types::{Point, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// Escape or any other explicit abort
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
    Selected(Region),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    AwaitingFirstPoint,
    Dragging { start: Point, current: Point },
    Finished(OverlayOutcome),
}

/// Rectangle currently being dragged, for drawing the outline and highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubberBand {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    state: OverlayState,
}

impl Default for SelectionOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionOverlay {
    pub fn new() -> Self {
        Self {
            state: OverlayState::AwaitingFirstPoint,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn outcome(&self) -> Option<OverlayOutcome> {
        match self.state {
            OverlayState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Feed one pointer event. Returns the outcome on the event that finishes the overlay.
    pub fn handle(&mut self, event: PointerEvent) -> Option<OverlayOutcome> {
        let next = match (self.state, event) {
            (OverlayState::Finished(_), _) => return None,
            (_, PointerEvent::Cancel) => OverlayState::Finished(OverlayOutcome::Cancelled),
            (OverlayState::AwaitingFirstPoint, PointerEvent::Down(p)) => OverlayState::Dragging {
                start: p,
                current: p,
            },
            // A release or motion without a press has nothing to anchor to
            (OverlayState::AwaitingFirstPoint, _) => return None,
            (OverlayState::Dragging { start, .. }, PointerEvent::Move(p)) => {
                OverlayState::Dragging { start, current: p }
            }
            // Extra presses while dragging keep the original anchor
            (OverlayState::Dragging { .. }, PointerEvent::Down(_)) => return None,
            (OverlayState::Dragging { start, .. }, PointerEvent::Up(p)) => {
                let outcome = match Region::normalize(start, p) {
                    Some(region) => OverlayOutcome::Selected(region),
                    None => {
                        tracing::debug!(?start, end = ?p, "Selection below minimum size, discarding");
                        OverlayOutcome::Cancelled
                    }
                };
                OverlayState::Finished(outcome)
            }
        };

        self.state = next;
        self.outcome()
    }

    /// The rectangle to draw while dragging
    pub fn rubber_band(&self) -> Option<RubberBand> {
        match self.state {
            OverlayState::Dragging { start, current } => Some(RubberBand {
                x: start.x.min(current.x),
                y: start.y.min(current.y),
                width: start.x.abs_diff(current.x),
                height: start.y.abs_diff(current.y),
            }),
            _ => None,
        }
    }
}

/// Darkened copy of the snapshot used as the overlay backdrop.
///
/// Colour channels are scaled by `factor` and truncated; alpha is kept.
pub fn backdrop(snapshot: &RgbaImage, factor: f32) -> RgbaImage {
    let factor = factor.clamp(0.0, 1.0);
    let mut dimmed = snapshot.clone();
    for pixel in dimmed.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        *pixel = Rgba([
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
            a,
        ]);
    }
    dimmed
}
