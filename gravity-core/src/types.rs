use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier for a [`crate::body::Body`].
///
/// Built from the placement counter at the moment the body was created,
/// so ids are unique until the body set is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point-{}", self.0)
    }
}

/// Display color of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Drawing surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the `(min, max)` corners of the canvas shrunk by `margin`
    /// on every side.
    ///
    /// On a canvas narrower than `2 * margin` the corners cross over; the
    /// boundary phase tolerates that.
    pub fn inset(&self, margin: f32) -> (Vec2, Vec2) {
        (
            Vec2::splat(margin),
            Vec2::new(self.width - margin, self.height - margin),
        )
    }
}
