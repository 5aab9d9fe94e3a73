#![forbid(unsafe_code)]

//! Frame resolution.
//!
//! [`FrameGraph`] holds the declared frames in child order and turns frame
//! references (names or special tokens) into frames.
//!
//! # Tokens
//!
//! `none`, `next`, `previous` (alias `prev`), `left`, `right`, `top`, and
//! `bottom` are recognized with or without a leading `!`. Tokens win over a
//! frame that happens to carry the same name.
//!
//! # Invariants
//!
//! 1. Ordinal navigation wraps: `next` of the last frame is the first and
//!    `previous` of the first is the last.
//! 2. `next` followed by `previous` returns to the starting frame.
//! 3. Directional tokens never resolve to an error while frames exist: a
//!    missing neighbor falls back to an ordinal step chosen from the
//!    transition type.

use layerkit_layout::{Frame, NeighborSide, TransitionType};

use crate::error::FrameResolutionError;

/// A parsed frame reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRef {
    /// The explicit empty state.
    None,
    Next,
    Previous,
    /// Neighbor of the current frame on this side.
    Side(NeighborSide),
    /// A frame name.
    Named(String),
}

impl FrameRef {
    pub fn parse(raw: &str) -> Self {
        let token = raw.strip_prefix('!').unwrap_or(raw);
        match token {
            "none" => Self::None,
            "next" => Self::Next,
            "previous" | "prev" => Self::Previous,
            "left" => Self::Side(NeighborSide::Left),
            "right" => Self::Side(NeighborSide::Right),
            "top" => Self::Side(NeighborSide::Top),
            "bottom" => Self::Side(NeighborSide::Bottom),
            _ => Self::Named(raw.to_string()),
        }
    }

    /// Whether this reference is one of the special tokens.
    pub fn is_token(&self) -> bool {
        !matches!(self, Self::Named(_))
    }
}

impl From<&str> for FrameRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Declared frames in child order.
#[derive(Debug, Clone, Default)]
pub struct FrameGraph {
    frames: Vec<Frame>,
}

impl FrameGraph {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.frames.iter().position(|f| f.name == name)
    }

    /// Frame after `current` in child order, wrapping to the first.
    ///
    /// From the empty state this is the last frame.
    pub fn next(&self, current: Option<&str>) -> Result<&Frame, FrameResolutionError> {
        let len = self.frames.len();
        let last = len.checked_sub(1).ok_or(FrameResolutionError::NoFrames)?;
        let index = match current.and_then(|name| self.index_of(name)) {
            Some(i) => (i + 1) % len,
            None => last,
        };
        Ok(&self.frames[index])
    }

    /// Frame before `current` in child order, wrapping to the last.
    ///
    /// From the empty state this is the first frame.
    pub fn previous(&self, current: Option<&str>) -> Result<&Frame, FrameResolutionError> {
        let len = self.frames.len();
        let last = len.checked_sub(1).ok_or(FrameResolutionError::NoFrames)?;
        let index = match current.and_then(|name| self.index_of(name)) {
            Some(0) => last,
            Some(i) => i - 1,
            None => 0,
        };
        Ok(&self.frames[index])
    }

    /// Declared neighbor of `current` on `side`, if it exists.
    pub fn neighbor(&self, current: Option<&str>, side: NeighborSide) -> Option<&Frame> {
        let name = self.get(current?)?.neighbors.get(side)?;
        self.get(name)
    }

    /// Resolve a frame reference relative to `current`.
    ///
    /// `Ok(None)` is the empty state. `hint` is the type of the transition
    /// that will be used; it steers the fallback of directional tokens.
    pub fn resolve(
        &self,
        reference: &FrameRef,
        current: Option<&str>,
        hint: Option<TransitionType>,
    ) -> Result<Option<&Frame>, FrameResolutionError> {
        match reference {
            FrameRef::None => Ok(None),
            FrameRef::Next => self.next(current).map(Some),
            FrameRef::Previous => self.previous(current).map(Some),
            FrameRef::Side(side) => {
                if current.is_none() {
                    return self.next(None).map(Some);
                }
                if let Some(frame) = self.neighbor(current, *side) {
                    return Ok(Some(frame));
                }
                if ordinal_fallback_is_next(*side, hint.unwrap_or_default()) {
                    self.next(current).map(Some)
                } else {
                    self.previous(current).map(Some)
                }
            }
            FrameRef::Named(name) => self
                .get(name)
                .map(Some)
                .ok_or_else(|| FrameResolutionError::UnknownFrame(name.clone())),
        }
    }

    /// Whether a swipe towards `side` can go anywhere from `current`.
    pub fn has_target(&self, current: Option<&str>, side: NeighborSide, ordinal_fallback: bool) -> bool {
        self.neighbor(current, side).is_some() || (ordinal_fallback && self.frames.len() > 1)
    }
}

/// Token that resolves to the neighbor on `side`.
pub fn side_token(side: NeighborSide) -> &'static str {
    match side {
        NeighborSide::Left => "!left",
        NeighborSide::Right => "!right",
        NeighborSide::Top => "!top",
        NeighborSide::Bottom => "!bottom",
    }
}

/// Ordinal direction used when the neighbor on `side` is missing.
///
/// A transition moving content the same way as the requested side would
/// reveal the following frame; everything else steps back for `left`/`top`
/// and forward for `right`/`bottom`.
fn ordinal_fallback_is_next(side: NeighborSide, kind: TransitionType) -> bool {
    match side {
        NeighborSide::Left => kind == TransitionType::Left,
        NeighborSide::Right => kind != TransitionType::Right,
        NeighborSide::Top => kind == TransitionType::Up,
        NeighborSide::Bottom => kind != TransitionType::Down,
    }
}
