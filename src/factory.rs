//! Pure construction and merging of [`Toast`] records. Nothing here touches
//! timers or the store.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::toast::{Autopilot, AutopilotOption, Toast, ToastId, ToastOptions};
use crate::types::{Lifecycle, Position, ToastDuration, ToastKind};

/// Process-wide defaults applied under every create.
#[derive(Clone, Debug, Default)]
pub struct Defaults {
    pub position: Position,
    pub options: ToastOptions,
}

impl Defaults {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            options: ToastOptions::default(),
        }
    }
}

/// Build a fresh record: defaults first, caller options on top.
pub fn create(options: &ToastOptions, defaults: &Defaults, settings: &EngineSettings) -> Toast {
    let merged = defaults.options.clone().merged_with(options);
    let duration = merged.duration.unwrap_or(settings.default_duration);

    Toast {
        id: merged.id.unwrap_or_else(ToastId::generate),
        instance_id: Uuid::new_v4(),
        kind: merged.kind.unwrap_or_default(),
        title: merged.title,
        description: merged.description,
        position: merged.position.unwrap_or(defaults.position),
        duration,
        icon: merged.icon,
        styles: merged.styles,
        action: merged.action,
        animation: merged.animation.unwrap_or(settings.default_animation),
        anchor: merged.anchor.as_ref().and_then(|anchor| anchor.resolve()),
        autopilot: resolve_autopilot(merged.autopilot, duration, settings),
        lifecycle: Lifecycle::Entering,
        created_at: Utc::now(),
        exiting: false,
        on_dismiss: merged.on_dismiss,
        on_auto_close: merged.on_auto_close,
        autopilot_request: merged.autopilot,
    }
}

/// Layer `partial` onto `existing`. Always a new instance, never exiting;
/// identity, lifecycle and creation time carry over.
pub fn update(existing: &Toast, partial: &ToastOptions, settings: &EngineSettings) -> Toast {
    let kind = partial.kind.unwrap_or(existing.kind);
    let duration = match partial.duration {
        Some(duration) => duration,
        None if kind == ToastKind::Loading => ToastDuration::Persistent,
        // A settled loading toast gets a real countdown back.
        None if existing.kind == ToastKind::Loading => settings.default_duration,
        None => existing.duration,
    };
    let autopilot_request = partial.autopilot.or(existing.autopilot_request);

    let mut styles = existing.styles.clone();
    styles.extend(
        partial
            .styles
            .iter()
            .map(|(slot, value)| (*slot, value.clone())),
    );

    Toast {
        id: existing.id.clone(),
        instance_id: Uuid::new_v4(),
        kind,
        title: partial.title.clone().or_else(|| existing.title.clone()),
        description: partial
            .description
            .clone()
            .or_else(|| existing.description.clone()),
        position: partial.position.unwrap_or(existing.position),
        duration,
        icon: partial.icon.clone().or_else(|| existing.icon.clone()),
        styles,
        action: partial.action.clone().or_else(|| existing.action.clone()),
        animation: partial.animation.unwrap_or(existing.animation),
        anchor: partial
            .anchor
            .as_ref()
            .and_then(|anchor| anchor.resolve())
            .or(existing.anchor),
        autopilot: resolve_autopilot(autopilot_request, duration, settings),
        lifecycle: existing.lifecycle,
        created_at: existing.created_at,
        exiting: false,
        on_dismiss: partial
            .on_dismiss
            .clone()
            .or_else(|| existing.on_dismiss.clone()),
        on_auto_close: partial
            .on_auto_close
            .clone()
            .or_else(|| existing.on_auto_close.clone()),
        autopilot_request,
    }
}

/// Expand/collapse delays for a toast that lives for `duration`, both clamped
/// into `[0, duration]`. `None` when autopilot is off or the toast never
/// dismisses itself.
pub fn resolve_autopilot(
    request: Option<AutopilotOption>,
    duration: ToastDuration,
    settings: &EngineSettings,
) -> Option<Autopilot> {
    let limit = duration.auto_dismiss_after()?;
    let defaults = settings.autopilot;
    let (expand, collapse) = match request {
        None if !defaults.enabled => return None,
        None | Some(AutopilotOption::Enabled(true)) => (None, None),
        Some(AutopilotOption::Enabled(false)) => return None,
        Some(AutopilotOption::Custom { expand, collapse }) => (expand, collapse),
    };
    let clamp = |value: Duration| value.min(limit);
    Some(Autopilot {
        expand_after: clamp(expand.unwrap_or(defaults.expand_after)),
        collapse_after: clamp(collapse.unwrap_or(defaults.collapse_after)),
    })
}

#[cfg(test)]
mod tests {
    use super::{Defaults, create, resolve_autopilot, update};
    use crate::animation::Rect;
    use crate::config::EngineSettings;
    use crate::toast::{AutopilotOption, ToastId, ToastOptions};
    use crate::types::{AnimationMode, Lifecycle, Position, ToastDuration, ToastKind};
    use std::time::Duration;

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    #[test]
    fn create_applies_defaults_under_caller_options() {
        let defaults = Defaults {
            position: Position::BottomCenter,
            options: ToastOptions::new()
                .description("from defaults")
                .animation(AnimationMode::Fly),
        };
        let toast = create(
            &ToastOptions::titled("hello").animation(AnimationMode::Morph),
            &defaults,
            &settings(),
        );

        assert_eq!(toast.title.as_deref(), Some("hello"));
        assert_eq!(toast.description.as_deref(), Some("from defaults"));
        assert_eq!(toast.animation, AnimationMode::Morph);
        assert_eq!(toast.position, Position::BottomCenter);
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(
            toast.duration,
            ToastDuration::Finite(Duration::from_millis(6_000))
        );
        assert_eq!(toast.lifecycle, Lifecycle::Entering);
        assert!(!toast.exiting);
    }

    #[test]
    fn create_keeps_caller_id_or_generates_one() {
        let named = create(&ToastOptions::new().id("save"), &Defaults::default(), &settings());
        assert_eq!(named.id, ToastId::from("save"));

        let a = create(&ToastOptions::new(), &Defaults::default(), &settings());
        let b = create(&ToastOptions::new(), &Defaults::default(), &settings());
        assert_ne!(a.id, b.id);
        assert_ne!(a.instance_id, b.instance_id);
    }

    #[test]
    fn create_resolves_anchor_rect() {
        let rect = Rect::new(4.0, 4.0, 80.0, 24.0);
        let toast = create(
            &ToastOptions::new().anchor_rect(rect),
            &Defaults::default(),
            &settings(),
        );
        assert_eq!(toast.anchor, Some(rect));
    }

    #[test]
    fn update_mints_new_instance_and_revives() {
        let mut existing = create(&ToastOptions::titled("a").id("x"), &Defaults::default(), &settings());
        existing.lifecycle = Lifecycle::Visible;
        existing.exiting = true;

        let next = update(&existing, &ToastOptions::new().description("b"), &settings());
        assert_eq!(next.id, existing.id);
        assert_ne!(next.instance_id, existing.instance_id);
        assert!(!next.exiting);
        assert_eq!(next.lifecycle, Lifecycle::Visible);
        assert_eq!(next.created_at, existing.created_at);
        assert_eq!(next.title.as_deref(), Some("a"));
        assert_eq!(next.description.as_deref(), Some("b"));
    }

    #[test]
    fn settled_loading_toast_regains_default_duration() {
        let loading = create(
            &ToastOptions::new().kind(ToastKind::Loading).persistent(),
            &Defaults::default(),
            &settings(),
        );
        assert!(loading.autopilot.is_none());

        let done = update(&loading, &ToastOptions::new().kind(ToastKind::Success), &settings());
        assert_eq!(done.duration, settings().default_duration);
        assert!(done.autopilot.is_some());

        let still_loading = update(&loading, &ToastOptions::titled("50%"), &settings());
        assert_eq!(still_loading.duration, ToastDuration::Persistent);
    }

    #[test]
    fn autopilot_is_clamped_into_duration() {
        let pilot = resolve_autopilot(
            Some(AutopilotOption::Custom {
                expand: Some(Duration::from_millis(500)),
                collapse: Some(Duration::from_secs(10)),
            }),
            ToastDuration::Finite(Duration::from_secs(2)),
            &settings(),
        )
        .unwrap();
        assert_eq!(pilot.expand_after, Duration::from_millis(500));
        assert_eq!(pilot.collapse_after, Duration::from_secs(2));
    }

    #[test]
    fn autopilot_off_for_disabled_or_persistent() {
        let s = settings();
        let finite = ToastDuration::Finite(Duration::from_secs(3));
        assert!(resolve_autopilot(Some(false.into()), finite, &s).is_none());
        assert!(resolve_autopilot(None, ToastDuration::Persistent, &s).is_none());
        assert!(resolve_autopilot(None, ToastDuration::Finite(Duration::ZERO), &s).is_none());

        let mut off_by_default = settings();
        off_by_default.autopilot.enabled = false;
        assert!(resolve_autopilot(None, finite, &off_by_default).is_none());
        assert!(resolve_autopilot(Some(true.into()), finite, &off_by_default).is_some());
    }
}
