//! Card actions and their mapping to sliding directions.

use serde::{Deserialize, Serialize};

use super::direction::SlidingDirection;

/// User-facing deck actions, whether triggered by a drag or a control-bar
/// button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Rewind,
    Nope,
    SuperLike,
    Like,
    Refresh,
}

impl CardAction {
    pub const ALL: [Self; 5] = [
        Self::Rewind,
        Self::Nope,
        Self::SuperLike,
        Self::Like,
        Self::Refresh,
    ];

    /// Action a committed swipe direction resolves to, if any.
    pub fn from_direction(direction: SlidingDirection) -> Option<Self> {
        match direction {
            SlidingDirection::ToLeft => Some(Self::Nope),
            SlidingDirection::ToRight => Some(Self::Like),
            SlidingDirection::ToTop => Some(Self::SuperLike),
            SlidingDirection::BackToIdentity | SlidingDirection::None => None,
        }
    }

    /// Direction a programmatic action drives the top card towards.
    ///
    /// Refresh has no card to move (`None`); Rewind moves nothing forward
    /// and resolves to a snap-back.
    pub fn direction(self) -> SlidingDirection {
        match self {
            Self::Like => SlidingDirection::ToRight,
            Self::Nope => SlidingDirection::ToLeft,
            Self::SuperLike => SlidingDirection::ToTop,
            Self::Refresh => SlidingDirection::None,
            Self::Rewind => SlidingDirection::BackToIdentity,
        }
    }
}
