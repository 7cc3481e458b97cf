use std::fmt;
use std::time::Duration;

use humantime::parse_duration;
use serde::de::{self, Visitor};
use serde_with::DeserializeAs;

/// Duration written either as a humantime string (`"400ms"`, `"6s"`) or as
/// integer milliseconds.
pub(crate) struct HumantimeDuration;

struct HumantimeVisitor;

impl Visitor<'_> for HumantimeVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"400ms\" or a number of milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Duration, E> {
        parse_duration(v.trim()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Duration, E> {
        Ok(Duration::from_millis(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_millis)
            .map_err(|_| E::custom(format!("duration cannot be negative: {v}")))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(HumantimeVisitor)
    }
}
