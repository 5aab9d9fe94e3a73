#![forbid(unsafe_code)]

//! Transition descriptors.
//!
//! A [`Transition`] describes one requested hand-off. Descriptors are plain
//! values: the layer stamps a `transition_id` on them when the request is
//! accepted and fills in a default duration if none was given.

use std::fmt;
use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use layerkit_core::animation::Timing;

use crate::frame::StartPosition;

/// Visual style of a hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    /// Whatever the active layout prefers.
    #[default]
    Default,
    /// Swap without animation.
    None,
    /// Content moves to the left (the target enters from the right).
    Left,
    /// Content moves to the right (the target enters from the left).
    Right,
    /// Content moves up (the target enters from below).
    Up,
    /// Content moves down (the target enters from above).
    Down,
    /// Cross-fade.
    Fade,
}

/// A requested hand-off.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transition {
    /// Target frame name or special token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framename: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransitionType,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,
    pub timing: Timing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_position: Option<StartPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,
    /// Assigned by the layer when the request is accepted.
    #[serde(skip)]
    pub transition_id: u64,
}

impl Transition {
    /// Transition to `framename` with default settings.
    pub fn to(framename: impl Into<String>) -> Self {
        Self {
            framename: Some(framename.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, kind: TransitionType) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_start_position(mut self, start: StartPosition) -> Self {
        self.start_position = Some(start);
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll_x: Option<f64>, scroll_y: Option<f64>) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Effective duration; no animation when none was set.
    pub fn duration_or_zero(&self) -> Duration {
        self.duration.unwrap_or_default()
    }
}

impl From<&str> for Transition {
    fn from(framename: &str) -> Self {
        Self::to(framename)
    }
}

impl From<String> for Transition {
    fn from(framename: String) -> Self {
        Self::to(framename)
    }
}

/// Error parsing a duration string such as `"1s"` or `"250ms"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    Empty,
    Invalid(String),
}

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty duration"),
            Self::Invalid(raw) => write!(f, "invalid duration: {raw:?}"),
        }
    }
}

impl std::error::Error for DurationParseError {}

/// Parse `"1s"`, `"0.5s"`, `"250ms"`, or a bare millisecond count.
pub fn parse_duration(raw: &str) -> Result<Duration, DurationParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }
    let (number, millis_per_unit) = if let Some(n) = trimmed.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = trimmed.strip_suffix('s') {
        (n, 1000.0)
    } else {
        (trimmed, 1.0)
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| DurationParseError::Invalid(raw.to_string()))?;
    millis_to_duration(value * millis_per_unit)
        .ok_or_else(|| DurationParseError::Invalid(raw.to_string()))
}

fn millis_to_duration(ms: f64) -> Option<Duration> {
    (ms.is_finite() && ms >= 0.0).then(|| Duration::from_nanos((ms * 1_000_000.0).round() as u64))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(u64),
    Fractional(f64),
    Text(String),
}

/// Deserialize an optional duration given as a string or a millisecond number.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDuration> = Option::deserialize(deserializer)?;
    raw.map(|raw| match raw {
        RawDuration::Millis(ms) => Ok(Duration::from_millis(ms)),
        RawDuration::Fractional(ms) => millis_to_duration(ms)
            .ok_or_else(|| D::Error::custom(format!("invalid duration: {ms}"))),
        RawDuration::Text(text) => parse_duration(&text).map_err(D::Error::custom),
    })
    .transpose()
}

fn serialize_duration<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match duration {
        Some(d) => serializer.serialize_str(&format!("{}ms", d.as_millis())),
        None => serializer.serialize_none(),
    }
}
