#![forbid(unsafe_code)]

//! Layer configuration.
//!
//! Configuration comes from code (builder methods), a JSON document, or
//! environment variables layered on top of either:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `LAYERKIT_LAYOUT` | `layoutType` (`slide`, `canvas`, `stack`) |
//! | `LAYERKIT_NATIVE_SCROLL` | `nativeScroll` (`true`/`false`/`1`/`0`) |
//! | `LAYERKIT_DEFAULT_DURATION` | `defaultDuration` (`"1s"`, `"250ms"`) |

use std::env;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use layerkit_core::gesture::DEFAULT_DISTANCE_THRESHOLD;
use layerkit_layout::LayoutKind;
use layerkit_layout::transition::{deserialize_duration, parse_duration};

use crate::error::ConfigError;

pub const LAYOUT_ENV: &str = "LAYERKIT_LAYOUT";
pub const NATIVE_SCROLL_ENV: &str = "LAYERKIT_NATIVE_SCROLL";
pub const DEFAULT_DURATION_ENV: &str = "LAYERKIT_DEFAULT_DURATION";

/// Duration used by transitions that do not declare one.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_secs(1);

/// Configuration for a [`Layer`](crate::Layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerConfig {
    pub layout_type: LayoutKind,
    /// Back scrolling with the platform scroll primitive.
    pub native_scroll: bool,
    /// Frame shown on attach. `None` means the first declared frame; the
    /// `!none` token selects the empty state.
    pub default_frame: Option<String>,
    #[serde(
        deserialize_with = "duration_or_default",
        serialize_with = "serialize_millis"
    )]
    pub default_duration: Duration,
    /// Manhattan distance a directionless gesture may travel and still be
    /// swallowed.
    pub gesture_distance_threshold: f64,
    /// Fall back to ordinal next/previous when a swipe has no neighbor.
    pub ordinal_gesture_fallback: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            layout_type: LayoutKind::Slide,
            native_scroll: true,
            default_frame: None,
            default_duration: DEFAULT_TRANSITION_DURATION,
            gesture_distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            ordinal_gesture_fallback: true,
        }
    }
}

impl LayerConfig {
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout_type = layout;
        self
    }

    #[must_use]
    pub fn with_native_scroll(mut self, native: bool) -> Self {
        self.native_scroll = native;
        self
    }

    #[must_use]
    pub fn with_default_frame(mut self, name: impl Into<String>) -> Self {
        self.default_frame = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    #[must_use]
    pub fn with_gesture_distance_threshold(mut self, threshold: f64) -> Self {
        self.gesture_distance_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_ordinal_gesture_fallback(mut self, enabled: bool) -> Self {
        self.ordinal_gesture_fallback = enabled;
        self
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `LAYERKIT_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let layout = env::var(LAYOUT_ENV).ok();
        let native = env::var(NATIVE_SCROLL_ENV).ok();
        let duration = env::var(DEFAULT_DURATION_ENV).ok();
        self.with_overrides(layout.as_deref(), native.as_deref(), duration.as_deref())
    }

    fn with_overrides(
        mut self,
        layout: Option<&str>,
        native_scroll: Option<&str>,
        duration: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(layout) = layout.filter(|v| !v.trim().is_empty()) {
            self.layout_type = layout.parse()?;
        }
        if let Some(raw) = native_scroll.filter(|v| !v.trim().is_empty()) {
            self.native_scroll = parse_flag(NATIVE_SCROLL_ENV, raw)?;
        }
        if let Some(raw) = duration.filter(|v| !v.trim().is_empty()) {
            self.default_duration = parse_duration(raw)?;
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let threshold = self.gesture_distance_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Parse(format!(
                "gestureDistanceThreshold must be a non-negative number, got {threshold}"
            )));
        }
        Ok(self)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    let value = raw.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        })
    }
}

fn duration_or_default<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_duration(deserializer)?.unwrap_or(DEFAULT_TRANSITION_DURATION))
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format!("{}ms", duration.as_millis()))
}
