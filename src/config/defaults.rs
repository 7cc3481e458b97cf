use std::time::Duration;

use crate::types::ToastDuration;

pub(super) const fn default_duration() -> ToastDuration {
    ToastDuration::Finite(Duration::from_millis(6_000))
}

pub(super) const fn default_exit_duration() -> Duration {
    Duration::from_millis(400)
}

pub(super) fn default_position() -> String {
    "top-right".to_string()
}

pub(super) fn default_animation() -> String {
    "slide".to_string()
}

pub(super) const fn default_autopilot_enabled() -> bool {
    true
}

pub(super) const fn default_expand_after() -> Duration {
    Duration::from_millis(150)
}

pub(super) const fn default_collapse_after() -> Duration {
    Duration::from_millis(4_000)
}

pub(super) const fn default_queue_bound() -> usize {
    32
}
