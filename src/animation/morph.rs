use std::time::Duration;

use super::motion::{Easing, FillMode, Keyframe, Motion, Radius, Timing};
use super::slide::Slide;
use super::{AnimationStrategy, MotionContext, Rect};

const ENTER: Timing = Timing::new(
    Duration::from_millis(500),
    Easing::CubicBezier(0.34, 1.56, 0.64, 1.0),
    FillMode::Both,
);
const EXIT: Timing = Timing::new(
    Duration::from_millis(300),
    Easing::CubicBezier(0.36, 0.0, 0.66, -0.56),
    FillMode::Forwards,
);

/// Grows the toast out of the element that triggered it: the toast starts
/// with the anchor's size, position and a pill radius.
#[derive(Clone, Copy, Debug, Default)]
pub struct Morph;

impl Morph {
    fn collapsed(anchor: &Rect, target: &Rect) -> Keyframe {
        let shift = target.center_offset_to(anchor);
        Keyframe::REST
            .at(0.0)
            .opacity(0.0)
            .translate(shift.x, shift.y)
            .scale(anchor.width / target.width, anchor.height / target.height)
            .radius(Radius::Pill)
    }

    fn entrance(anchor: &Rect, target: &Rect) -> Motion {
        Motion::new(vec![Self::collapsed(anchor, target), Keyframe::REST], ENTER)
    }
}

impl AnimationStrategy for Morph {
    fn name(&self) -> &'static str {
        "morph"
    }

    fn enter(&self, ctx: &MotionContext) -> Motion {
        match ctx.measured() {
            Some((anchor, target)) => Self::entrance(&anchor, &target),
            None => Slide.enter(ctx),
        }
    }

    fn exit(&self, ctx: &MotionContext) -> Motion {
        match ctx.measured() {
            Some((anchor, target)) => Self::entrance(&anchor, &target).reversed(EXIT),
            None => Slide.exit(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Morph;
    use crate::animation::{AnimationStrategy, MotionContext, Radius, Rect, Slide};
    use crate::types::Position;

    fn ctx() -> MotionContext {
        MotionContext::new(Position::TopRight)
            .with_anchor(Rect::new(20.0, 20.0, 100.0, 40.0))
            .with_target(Rect::new(500.0, 10.0, 400.0, 80.0))
    }

    #[test]
    fn starts_at_anchor_size_and_center() {
        let motion = Morph.enter(&ctx());
        let start = motion.keyframes[0];
        assert!((start.scale_x - 0.25).abs() < 1e-6);
        assert!((start.scale_y - 0.5).abs() < 1e-6);
        // anchor center (70, 40), target center (700, 50)
        assert!((start.translate_x + 630.0).abs() < 1e-3);
        assert!((start.translate_y + 10.0).abs() < 1e-3);
        assert_eq!(start.radius, Radius::Pill);
        assert_eq!(motion.keyframes[1].radius, Radius::Natural);
    }

    #[test]
    fn exit_runs_the_transform_backwards() {
        let enter = Morph.enter(&ctx());
        let exit = Morph.exit(&ctx());
        assert_eq!(exit.keyframes[1].scale_x, enter.keyframes[0].scale_x);
        assert_eq!(exit.keyframes[1].radius, Radius::Pill);
    }

    #[test]
    fn falls_back_to_slide_without_geometry() {
        let bare = MotionContext::new(Position::BottomRight);
        assert_eq!(Morph.enter(&bare), Slide.enter(&bare));
        assert_eq!(Morph.exit(&bare), Slide.exit(&bare));

        let anchor_only = bare.with_anchor(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(Morph.enter(&anchor_only), Slide.enter(&anchor_only));

        let zero_target = anchor_only.with_target(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(Morph.enter(&zero_target), Slide.enter(&zero_target));
    }
}
