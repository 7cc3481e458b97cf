//! Enter/exit motion for toasts.
//!
//! Strategies are stateless: they turn a [`MotionContext`] (screen position
//! plus optional anchor and target rects) into a [`Motion`]. Geometry-aware
//! strategies degrade to [`Slide`] when either rect is missing or
//! degenerate.

mod fly;
mod geometry;
mod morph;
mod motion;
mod slide;

pub use fly::{FLY_SCALE, Fly};
pub use geometry::{Point, Rect};
pub use morph::Morph;
pub use motion::{Easing, FillMode, Keyframe, Motion, Radius, Timing};
pub use slide::{SLIDE_OFFSET, Slide};

use serde::Serialize;

use crate::types::{AnimationMode, Position};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enter,
    Exit,
}

/// Inputs a strategy needs. `anchor` is the bounding box of the element that
/// triggered the toast, `target` the toast's own rendered bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionContext {
    pub position: Position,
    pub anchor: Option<Rect>,
    pub target: Option<Rect>,
}

impl MotionContext {
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            anchor: None,
            target: None,
        }
    }

    #[must_use]
    pub const fn with_anchor(mut self, anchor: Rect) -> Self {
        self.anchor = Some(anchor);
        self
    }

    #[must_use]
    pub const fn with_target(mut self, target: Rect) -> Self {
        self.target = Some(target);
        self
    }

    /// Both rects, if both are present and measurable.
    pub fn measured(&self) -> Option<(Rect, Rect)> {
        let anchor = self.anchor.filter(Rect::is_measurable)?;
        let target = self.target.filter(Rect::is_measurable)?;
        Some((anchor, target))
    }
}

pub trait AnimationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn enter(&self, ctx: &MotionContext) -> Motion;

    fn exit(&self, ctx: &MotionContext) -> Motion;
}

pub fn strategy_for(mode: AnimationMode) -> &'static dyn AnimationStrategy {
    match mode {
        AnimationMode::Slide => &Slide,
        AnimationMode::Morph => &Morph,
        AnimationMode::Fly => &Fly,
    }
}

pub fn motion(mode: AnimationMode, phase: Phase, ctx: &MotionContext) -> Motion {
    let strategy = strategy_for(mode);
    match phase {
        Phase::Enter => strategy.enter(ctx),
        Phase::Exit => strategy.exit(ctx),
    }
}
