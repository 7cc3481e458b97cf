use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned bounding box in screen pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.width.mul_add(0.5, self.x),
            y: self.height.mul_add(0.5, self.y),
        }
    }

    /// A rect can drive geometry-aware motion only when every coordinate is
    /// finite and both sides are strictly positive.
    pub fn is_measurable(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Vector from this rect's center to `other`'s center.
    pub fn center_offset_to(&self, other: &Self) -> Point {
        let from = self.center();
        let to = other.center();
        Point {
            x: to.x - from.x,
            y: to.y - from.y,
        }
    }
}
