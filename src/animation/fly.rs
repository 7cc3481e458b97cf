use std::time::Duration;

use super::motion::{Easing, FillMode, Keyframe, Motion, Timing};
use super::slide::Slide;
use super::{AnimationStrategy, MotionContext, Rect};

/// Scale of a flying toast while it sits on the trigger point.
pub const FLY_SCALE: f32 = 0.3;

const ENTER: Timing = Timing::new(
    Duration::from_millis(450),
    Easing::CubicBezier(0.22, 1.0, 0.36, 1.0),
    FillMode::Both,
);
const EXIT: Timing = Timing::new(Duration::from_millis(350), Easing::EaseIn, FillMode::Forwards);

/// Launches the toast from the trigger's center to its resting place.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fly;

impl Fly {
    fn entrance(anchor: &Rect, target: &Rect) -> Motion {
        let path = target.center_offset_to(anchor);
        Motion::new(
            vec![
                Keyframe::REST
                    .at(0.0)
                    .opacity(0.0)
                    .translate(path.x, path.y)
                    .scale(FLY_SCALE, FLY_SCALE),
                Keyframe::REST,
            ],
            ENTER,
        )
    }
}

impl AnimationStrategy for Fly {
    fn name(&self) -> &'static str {
        "fly"
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
