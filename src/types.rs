use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use humantime::parse_duration;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Screen anchor a toast stack is attached to.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    pub const ALL: [Self; 6] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-center" | "top" => Ok(Self::TopCenter),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-center" | "bottom" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(format!("unknown position: {other}")),
        }
    }
}

/// Semantic category of a toast.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
    Loading,
    Action,
}

impl ToastKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Loading => "loading",
            Self::Action => "action",
        }
    }
}

impl Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" | "ok" => Ok(Self::Success),
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "info" | "information" => Ok(Self::Info),
            "loading" => Ok(Self::Loading),
            "action" => Ok(Self::Action),
            other => Err(format!("unknown toast kind: {other}")),
        }
    }
}

/// Which animation strategy a renderer should use for a toast.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    Slide,
    Morph,
    Fly,
}

impl AnimationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Morph => "morph",
            Self::Fly => "fly",
        }
    }
}

impl Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slide" => Ok(Self::Slide),
            "morph" => Ok(Self::Morph),
            "fly" => Ok(Self::Fly),
            other => Err(format!("unknown animation mode: {other}")),
        }
    }
}

/// Coarse lifecycle of one toast instance. Ordered: a toast only ever moves
/// to a later variant.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Entering,
    Visible,
    Exiting,
    Removed,
}

impl Lifecycle {
    /// Returns `next` if it is a forward move, `None` otherwise.
    #[must_use]
    pub fn advance(self, next: Self) -> Option<Self> {
        (next > self).then_some(next)
    }
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entering => "entering",
            Self::Visible => "visible",
            Self::Exiting => "exiting",
            Self::Removed => "removed",
        })
    }
}

/// How long a toast stays up before it dismisses itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastDuration {
    Finite(Duration),
    /// Never auto-dismissed.
    Persistent,
}

impl ToastDuration {
    pub const fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            Self::Persistent
        } else {
            Self::Finite(Duration::from_millis(ms.unsigned_abs()))
        }
    }

    /// Delay after which the auto-dismiss timer should fire, if any. Zero
    /// counts as persistent.
    pub const fn auto_dismiss_after(self) -> Option<Duration> {
        match self {
            Self::Finite(d) if !d.is_zero() => Some(d),
            _ => None,
        }
    }

    pub const fn is_persistent(self) -> bool {
        self.auto_dismiss_after().is_none()
    }
}

impl From<Duration> for ToastDuration {
    fn from(value: Duration) -> Self {
        Self::Finite(value)
    }
}

impl Display for ToastDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.auto_dismiss_after() {
            Some(d) => write!(f, "{}", humantime::format_duration(d)),
            None => f.write_str("none"),
        }
    }
}

impl FromStr for ToastDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "none" | "never" | "persistent" | "infinite" => return Ok(Self::Persistent),
            _ => {}
        }
        if let Ok(ms) = trimmed.parse::<i64>() {
            return Ok(Self::from_millis(ms));
        }
        parse_duration(trimmed)
            .map(Self::Finite)
            .map_err(|err| format!("invalid toast duration {trimmed:?}: {err}"))
    }
}

impl Serialize for ToastDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.auto_dismiss_after() {
            Some(d) => serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => serializer.serialize_str("none"),
        }
    }
}

impl<'de> Deserialize<'de> for ToastDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = ToastDuration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("milliseconds, a humantime string or \"none\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ToastDuration::from_millis(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ToastDuration::from_millis(i64::try_from(v).unwrap_or(i64::MAX)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Lifecycle, Position, ToastDuration, ToastKind};
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn position_from_str_accepts_variants() {
        assert_eq!(Position::from_str("top-right"), Ok(Position::TopRight));
        assert_eq!(Position::from_str("BOTTOM_LEFT"), Ok(Position::BottomLeft));
        assert_eq!(Position::from_str("bottom"), Ok(Position::BottomCenter));
        assert!(Position::from_str("middle").is_err());
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [
            ToastKind::Success,
            ToastKind::Error,
            ToastKind::Warning,
            ToastKind::Info,
            ToastKind::Loading,
            ToastKind::Action,
        ] {
            assert_eq!(ToastKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn lifecycle_never_moves_backwards() {
        assert_eq!(
            Lifecycle::Entering.advance(Lifecycle::Visible),
            Some(Lifecycle::Visible)
        );
        assert_eq!(Lifecycle::Exiting.advance(Lifecycle::Visible), None);
        assert_eq!(Lifecycle::Visible.advance(Lifecycle::Visible), None);
    }

    #[test]
    fn non_positive_durations_are_persistent() {
        assert_eq!(ToastDuration::from_millis(0), ToastDuration::Persistent);
        assert_eq!(ToastDuration::from_millis(-250), ToastDuration::Persistent);
        assert!(ToastDuration::Finite(Duration::ZERO).is_persistent());
        assert_eq!(
            ToastDuration::from_millis(1500).auto_dismiss_after(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn duration_parses_strings_and_numbers() {
        assert_eq!(
            ToastDuration::from_str("6s"),
            Ok(ToastDuration::Finite(Duration::from_secs(6)))
        );
        assert_eq!(ToastDuration::from_str("none"), Ok(ToastDuration::Persistent));
        assert_eq!(ToastDuration::from_str("-1"), Ok(ToastDuration::Persistent));

        let parsed: ToastDuration = serde_json::from_str("2500").unwrap();
        assert_eq!(parsed, ToastDuration::Finite(Duration::from_millis(2500)));
        let parsed: ToastDuration = serde_json::from_str(r#""never""#).unwrap();
        assert_eq!(parsed, ToastDuration::Persistent);
    }
}
