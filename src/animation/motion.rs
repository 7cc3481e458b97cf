//! Renderer-neutral motion descriptions.
//!
//! A [`Motion`] is a list of keyframes plus timing. Renderers either hand it
//! to a native animation API (offsets, easing and fill map one-to-one onto
//! web keyframe effects) or step it themselves with [`Motion::sample`].

use std::time::Duration;

use serde::Serialize;
use serde_with::{DurationMilliSeconds, serde_as};

/// Corner radius state of a keyframe.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Radius {
    /// Fully rounded, like the pill-shaped trigger a toast morphs out of.
    Pill,
    /// Whatever radius the toast is styled with.
    #[default]
    Natural,
}

/// One animation state. Transforms are applied around the element's center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Keyframe {
    /// Position of this state within the animation, `0.0..=1.0`.
    pub offset: f32,
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub radius: Radius,
}

impl Keyframe {
    /// The toast at rest.
    pub const REST: Self = Self {
        offset: 1.0,
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        radius: Radius::Natural,
    };

    #[must_use]
    pub const fn at(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub const fn translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    #[must_use]
    pub const fn scale(mut self, x: f32, y: f32) -> Self {
        self.scale_x = x;
        self.scale_y = y;
        self
    }

    #[must_use]
    pub const fn radius(mut self, radius: Radius) -> Self {
        self.radius = radius;
        self
    }

    fn lerp(&self, to: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| (b - a).mul_add(t, a);
        Self {
            offset: mix(self.offset, to.offset),
            opacity: mix(self.opacity, to.opacity),
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            scale_x: mix(self.scale_x, to.scale_x),
            scale_y: mix(self.scale_y, to.scale_y),
            radius: if t < 0.5 { self.radius } else { to.radius },
        }
    }
}

/// Timing curve mapping linear progress onto eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub const EASE_IN: Self = Self::CubicBezier(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::CubicBezier(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Apply the curve to `t`, clamped to `[0.0, 1.0]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => Self::EASE_IN.apply(t),
            Self::EaseOut => Self::EASE_OUT.apply(t),
            Self::EaseInOut => Self::EASE_IN_OUT.apply(t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_coord(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * t + b) * t + c) * t
}

fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * t + 2.0 * b) * t + c
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        return progress;
    }

    // Newton-Raphson on x(t) = progress, bisection when the slope flattens.
    let mut t = progress;
    for _ in 0..8 {
        let err = bezier_coord(x1, x2, t) - progress;
        if err.abs() < 1e-5 {
            return bezier_coord(y1, y2, t);
        }
        let slope = bezier_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = progress;
    for _ in 0..32 {
        let x = bezier_coord(x1, x2, t);
        if (x - progress).abs() < 1e-5 {
            break;
        }
        if x < progress {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    bezier_coord(y1, y2, t)
}

/// What the element looks like outside the active interval.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    #[default]
    Forwards,
    Backwards,
    Both,
}

#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Timing {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "duration_ms")]
    pub duration: Duration,
    pub easing: Easing,
    pub fill: FillMode,
}

impl Timing {
    pub const fn new(duration: Duration, easing: Easing, fill: FillMode) -> Self {
        Self {
            duration,
            easing,
            fill,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Motion {
    pub keyframes: Vec<Keyframe>,
    pub timing: Timing,
}

impl Motion {
    pub fn new(keyframes: Vec<Keyframe>, timing: Timing) -> Self {
        Self { keyframes, timing }
    }

    /// The same keyframes played backwards under new timing.
    #[must_use]
    pub fn reversed(&self, timing: Timing) -> Self {
        let keyframes = self
            .keyframes
            .iter()
            .rev()
            .map(|frame| frame.at(1.0 - frame.offset))
            .collect();
        Self { keyframes, timing }
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    /// Interpolated state at linear progress `t`; easing is applied here.
    pub fn sample(&self, t: f32) -> Keyframe {
        let eased = self.timing.easing.apply(t);
        let Some(first) = self.keyframes.first() else {
            return Keyframe::REST.at(eased);
        };
        if eased <= first.offset {
            return first.at(eased);
        }
        for pair in self.keyframes.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if eased <= to.offset {
                let span = to.offset - from.offset;
                let local = if span > 0.0 {
                    (eased - from.offset) / span
                } else {
                    1.0
                };
                return from.lerp(to, local).at(eased);
            }
        }
        self.keyframes
            .last()
            .copied()
            .unwrap_or(Keyframe::REST)
            .at(eased)
    }
}

#[cfg(test)]
mod tests {
    use super::{Easing, FillMode, Keyframe, Motion, Radius, Timing};
    use std::time::Duration;

    fn fade() -> Motion {
        Motion::new(
            vec![Keyframe::REST.at(0.0).opacity(0.0), Keyframe::REST],
            Timing::new(Duration::from_millis(100), Easing::Linear, FillMode::Forwards),
        )
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.34, 1.56, 0.64, 1.0),
        ] {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?}");
        }
    }

    #[test]
    fn ease_out_leads_linear_at_midpoint() {
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
    }

    #[test]
    fn reversed_mirrors_offsets() {
        let motion = Motion::new(
            vec![
                Keyframe::REST.at(0.0).opacity(0.0).radius(Radius::Pill),
                Keyframe::REST.at(0.3).opacity(0.5),
                Keyframe::REST,
            ],
            Timing::new(Duration::from_millis(100), Easing::Linear, FillMode::Forwards),
        );
        let back = motion.reversed(motion.timing);
        let offsets: Vec<f32> = back.keyframes.iter().map(|k| k.offset).collect();
        assert_eq!(offsets.len(), 3);
        assert!(offsets[0].abs() < f32::EPSILON);
        assert!((offsets[1] - 0.7).abs() < 1e-6);
        assert!((offsets[2] - 1.0).abs() < f32::EPSILON);
        assert_eq!(back.keyframes[2].radius, Radius::Pill);
    }

    #[test]
    fn sample_interpolates_linearly() {
        let frame = fade().sample(0.25);
        assert!((frame.opacity - 0.25).abs() < 1e-6);
        assert!((fade().sample(1.0).opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn timing_serializes_duration_as_millis() {
        let json = serde_json::to_value(fade().timing).unwrap();
        assert_eq!(json["duration_ms"], 100);
        assert_eq!(json["fill"], "forwards");
    }
}
