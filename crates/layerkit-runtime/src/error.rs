#![forbid(unsafe_code)]

//! Error types for the layer API.

use std::fmt;

use layerkit_layout::{DurationParseError, ParseLayoutKindError};

/// A frame reference could not be resolved.
///
/// Raised before any state is touched: a failed request leaves the layer
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameResolutionError {
    /// No frame with this name is declared.
    UnknownFrame(String),
    /// An ordinal token was used but no frames are declared.
    NoFrames,
    /// A transition descriptor carried no frame name.
    MissingFrameName,
}

impl fmt::Display for FrameResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFrame(name) => write!(f, "unknown frame: {name:?}"),
            Self::NoFrames => write!(f, "no frames declared"),
            Self::MissingFrameName => write!(f, "transition has no frame name"),
        }
    }
}

impl std::error::Error for FrameResolutionError {}

/// Invalid layer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed configuration document.
    Parse(String),
    InvalidDuration(DurationParseError),
    UnknownLayout(String),
    /// A boolean setting had a value other than true/false/1/0.
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid layer config: {msg}"),
            Self::InvalidDuration(err) => write!(f, "invalid default duration: {err}"),
            Self::UnknownLayout(name) => write!(f, "unknown layout type: {name:?}"),
            Self::InvalidFlag { key, value } => write!(f, "{key}: expected a boolean, got {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDuration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DurationParseError> for ConfigError {
    fn from(err: DurationParseError) -> Self {
        Self::InvalidDuration(err)
    }
}

impl From<ParseLayoutKindError> for ConfigError {
    fn from(err: ParseLayoutKindError) -> Self {
        Self::UnknownLayout(err.0)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Any error surfaced by the layer API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    Frame(FrameResolutionError),
    Config(ConfigError),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(err) => fmt::Display::fmt(err, f),
            Self::Config(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Frame(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<FrameResolutionError> for LayerError {
    fn from(err: FrameResolutionError) -> Self {
        Self::Frame(err)
    }
}

impl From<ConfigError> for LayerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages() {
        assert_eq!(
            FrameResolutionError::UnknownFrame("x".into()).to_string(),
            "unknown frame: \"x\""
        );
        assert_eq!(
            LayerError::from(FrameResolutionError::NoFrames).to_string(),
            "no frames declared"
        );
    }

    #[test]
    fn conversions_keep_the_cause() {
        let err = LayerError::from(ConfigError::from(DurationParseError::Empty));
        assert!(matches!(err, LayerError::Config(ConfigError::InvalidDuration(_))));
        assert!(err.source().is_some());

        let err = ConfigError::from(ParseLayoutKindError("grid".into()));
        assert_eq!(err, ConfigError::UnknownLayout("grid".into()));
    }
}
