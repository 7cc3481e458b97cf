//! The notification record and the options callers build it from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::serde_as;
use uuid::Uuid;

use crate::animation::Rect;
use crate::config::HumantimeDuration;
use crate::types::{AnimationMode, Lifecycle, Position, ToastDuration, ToastKind};

/// Caller-stable identity. Two records with the same id are the same logical
/// toast.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ToastId(Arc<str>);

impl ToastId {
    /// A fresh, time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for ToastId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToastId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ToastId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<u64> for ToastId {
    fn from(value: u64) -> Self {
        Self(value.to_string().into())
    }
}

/// Callback receiving the toast it was registered on.
#[derive(Clone)]
pub struct ToastCallback(Arc<dyn Fn(&Toast) + Send + Sync>);

impl ToastCallback {
    pub fn new(f: impl Fn(&Toast) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, toast: &Toast) {
        (self.0)(toast);
    }
}

impl fmt::Debug for ToastCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToastCallback")
    }
}

/// Button rendered inside the toast.
#[derive(Clone)]
pub struct ActionButton {
    pub label: String,
    on_click: Arc<dyn Fn() + Send + Sync>,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, on_click: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
        }
    }

    pub fn click(&self) {
        (self.on_click)();
    }
}

impl fmt::Debug for ActionButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionButton")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "name")]
pub enum Icon {
    /// Render no icon at all, not even the kind's default.
    Hidden,
    Named(String),
}

/// Style slots a caller may override with a class name or inline style.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleSlot {
    Toast,
    Title,
    Description,
    Icon,
    ActionButton,
    CloseButton,
}

/// Something on screen whose bounds can be read at the moment a toast is
/// built, e.g. a handle to the button that triggered it.
pub trait AnchorSource: Send + Sync {
    fn bounding_rect(&self) -> Option<Rect>;
}

#[derive(Clone)]
pub enum Anchor {
    Rect(Rect),
    Element(Arc<dyn AnchorSource>),
}

impl Anchor {
    pub fn resolve(&self) -> Option<Rect> {
        match self {
            Self::Rect(rect) => Some(*rect),
            Self::Element(element) => element.bounding_rect(),
        }
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rect(rect) => f.debug_tuple("Rect").field(rect).finish(),
            Self::Element(_) => f.write_str("Element"),
        }
    }
}

/// Caller request for automatic expand-then-collapse of the detail view.
#[serde_as]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum AutopilotOption {
    Enabled(bool),
    Custom {
        #[serde(default)]
        #[serde_as(as = "Option<HumantimeDuration>")]
        expand: Option<Duration>,
        #[serde(default)]
        #[serde_as(as = "Option<HumantimeDuration>")]
        collapse: Option<Duration>,
    },
}

impl AutopilotOption {
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Enabled(false))
    }
}

impl From<bool> for AutopilotOption {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}

/// Resolved autopilot delays, measured from the toast's appearance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Autopilot {
    pub expand_after: Duration,
    pub collapse_after: Duration,
}

/// Everything a caller may specify. Unset fields fall back to process-wide
/// defaults on create, or to the existing record on update.
#[derive(Clone, Debug, Default)]
pub struct ToastOptions {
    pub id: Option<ToastId>,
    pub kind: Option<ToastKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<Position>,
    pub duration: Option<ToastDuration>,
    pub icon: Option<Icon>,
    pub styles: BTreeMap<StyleSlot, String>,
    pub action: Option<ActionButton>,
    pub animation: Option<AnimationMode>,
    pub anchor: Option<Anchor>,
    pub autopilot: Option<AutopilotOption>,
    pub on_dismiss: Option<ToastCallback>,
    pub on_auto_close: Option<ToastCallback>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self::default().title(title)
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.duration = Some(ToastDuration::Persistent);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn style(mut self, slot: StyleSlot, value: impl Into<String>) -> Self {
        self.styles.insert(slot, value.into());
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionButton) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn animation(mut self, mode: AnimationMode) -> Self {
        self.animation = Some(mode);
        self
    }

    #[must_use]
    pub fn anchor_rect(mut self, rect: Rect) -> Self {
        self.anchor = Some(Anchor::Rect(rect));
        self
    }

    #[must_use]
    pub fn anchor_element(mut self, element: Arc<dyn AnchorSource>) -> Self {
        self.anchor = Some(Anchor::Element(element));
        self
    }

    #[must_use]
    pub fn autopilot(mut self, autopilot: impl Into<AutopilotOption>) -> Self {
        self.autopilot = Some(autopilot.into());
        self
    }

    #[must_use]
    pub fn on_dismiss(mut self, f: impl Fn(&Toast) + Send + Sync + 'static) -> Self {
        self.on_dismiss = Some(ToastCallback::new(f));
        self
    }

    #[must_use]
    pub fn on_auto_close(mut self, f: impl Fn(&Toast) + Send + Sync + 'static) -> Self {
        self.on_auto_close = Some(ToastCallback::new(f));
        self
    }

    /// Layer `over` on top of `self`; every field set in `over` wins.
    #[must_use]
    pub fn merged_with(mut self, over: &Self) -> Self {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(if over.$field.is_some() {
                    self.$field.clone_from(&over.$field);
                })+
            };
        }
        take!(
            id,
            kind,
            title,
            description,
            position,
            duration,
            icon,
            action,
            animation,
            anchor,
            autopilot,
            on_dismiss,
            on_auto_close,
        );
        self.styles
            .extend(over.styles.iter().map(|(slot, value)| (*slot, value.clone())));
        self
    }
}

/// One displayed toast.
#[derive(Clone, Debug)]
pub struct Toast {
    pub id: ToastId,
    /// Fresh on every create and update; renderers key content-swap
    /// animations on it.
    pub instance_id: Uuid,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Position,
    pub duration: ToastDuration,
    pub icon: Option<Icon>,
    pub styles: BTreeMap<StyleSlot, String>,
    pub action: Option<ActionButton>,
    pub animation: AnimationMode,
    pub anchor: Option<Rect>,
    pub autopilot: Option<Autopilot>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub exiting: bool,
    pub on_dismiss: Option<ToastCallback>,
    pub on_auto_close: Option<ToastCallback>,
    pub(crate) autopilot_request: Option<AutopilotOption>,
}

impl Toast {
    /// Live means present in the store and not on its way out.
    pub const fn is_live(&self) -> bool {
        !self.exiting
    }

    pub fn view(&self) -> ToastView<'_> {
        ToastView {
            id: &self.id,
            instance_id: self.instance_id,
            kind: self.kind,
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            position: self.position,
            duration: self.duration,
            icon: self.icon.as_ref(),
            styles: &self.styles,
            action: self.action.as_ref().map(|a| a.label.as_str()),
            animation: self.animation,
            anchor: self.anchor,
            autopilot: self.autopilot,
            lifecycle: self.lifecycle,
            created_at: self.created_at,
            exiting: self.exiting,
        }
    }
}

/// Serializable, callback-free projection of a [`Toast`].
#[derive(Debug, Serialize)]
pub struct ToastView<'a> {
    pub id: &'a ToastId,
    pub instance_id: Uuid,
    pub kind: ToastKind,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub position: Position,
    pub duration: ToastDuration,
    pub icon: Option<&'a Icon>,
    pub styles: &'a BTreeMap<StyleSlot, String>,
    pub action: Option<&'a str>,
    pub animation: AnimationMode,
    pub anchor: Option<Rect>,
    pub autopilot: Option<Autopilot>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub exiting: bool,
}
