use std::time::Duration;

use super::motion::{Easing, FillMode, Keyframe, Motion, Timing};
use super::{AnimationStrategy, MotionContext};

/// Vertical travel, in pixels, of a sliding toast.
pub const SLIDE_OFFSET: f32 = 16.0;
const SLIDE_SCALE: f32 = 0.95;

const ENTER: Timing = Timing::new(
    Duration::from_millis(350),
    Easing::CubicBezier(0.21, 1.02, 0.73, 1.0),
    FillMode::Forwards,
);
const EXIT: Timing = Timing::new(Duration::from_millis(200), Easing::EaseIn, FillMode::Forwards);

/// Offset fade-in from the toast's own screen edge. Ignores all geometry and
/// is the fallback for the geometry-aware strategies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Slide;

impl Slide {
    fn entrance(ctx: &MotionContext) -> Motion {
        let dy = if ctx.position.is_top() {
            -SLIDE_OFFSET
        } else {
            SLIDE_OFFSET
        };
        Motion::new(
            vec![
                Keyframe::REST
                    .at(0.0)
                    .opacity(0.0)
                    .translate(0.0, dy)
                    .scale(SLIDE_SCALE, SLIDE_SCALE),
                Keyframe::REST,
            ],
            ENTER,
        )
    }
}

impl AnimationStrategy for Slide {
    fn name(&self) -> &'static str {
        "slide"
    }

    fn enter(&self, ctx: &MotionContext) -> Motion {
        Self::entrance(ctx)
    }

    fn exit(&self, ctx: &MotionContext) -> Motion {
        Self::entrance(ctx).reversed(EXIT)
    }
}

#[cfg(test)]
mod tests {
    use super::{SLIDE_OFFSET, Slide};
    use crate::animation::{AnimationStrategy, MotionContext, Rect};
    use crate::types::Position;

    #[test]
    fn enters_from_the_stack_edge() {
        let top = Slide.enter(&MotionContext::new(Position::TopRight));
        let bottom = Slide.enter(&MotionContext::new(Position::BottomLeft));
        assert!((top.keyframes[0].translate_y + SLIDE_OFFSET).abs() < f32::EPSILON);
        assert!((bottom.keyframes[0].translate_y - SLIDE_OFFSET).abs() < f32::EPSILON);
        assert!(top.keyframes[0].opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn exit_is_faster_reverse_of_enter() {
        let ctx = MotionContext::new(Position::TopCenter);
        let enter = Slide.enter(&ctx);
        let exit = Slide.exit(&ctx);
        assert!(exit.timing.duration < enter.timing.duration);
        assert_eq!(exit.keyframes[0].opacity, enter.keyframes[1].opacity);
        assert_eq!(exit.keyframes[1].translate_y, enter.keyframes[0].translate_y);
    }

    #[test]
    fn ignores_geometry() {
        let bare = MotionContext::new(Position::TopRight);
        let with_rects = bare
            .with_anchor(Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_target(Rect::new(50.0, 50.0, 300.0, 60.0));
        assert_eq!(Slide.enter(&bare), Slide.enter(&with_rects));
    }
}
