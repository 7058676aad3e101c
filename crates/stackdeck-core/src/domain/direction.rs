//! Sliding direction and the pure threshold rules that derive it.
//!
//! Two distinct rules live here on purpose:
//! - [`slide_direction`] — the live rule, applied on every drag sample to
//!   drive continuous feedback (labels, control-bar highlights).
//! - [`swipe_away_direction`] — the commit rule, applied once on release to
//!   decide between a directional dismissal and a snap-back.
//!
//! Both are pure functions of the translation, so the decision logic is
//! testable without any rendering surface.

use serde::{Deserialize, Serialize};

use super::gesture::Translation;

/// Thresholds, in the same translation units as gesture samples.
pub mod thresholds {
    /// Horizontal displacement needed to commit a swipe on release.
    pub const COMMIT_X: f64 = 80.0;
    /// Vertical displacement needed to commit a super-like on release.
    /// Larger than the horizontal one: a super-like takes a longer pull.
    pub const COMMIT_Y: f64 = 140.0;
    /// Epsilon below which a displacement reads as "no direction yet".
    pub const DIRECTION_EPSILON: f64 = 15.0;
    /// Horizontal cap above which a vertical drag stops reading as up.
    pub const VERTICAL_X_CAP: f64 = 100.0;
}

/// Where a card is sliding, or where it should go on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlidingDirection {
    ToLeft,
    ToRight,
    ToTop,
    /// Terminal decision when no commit threshold was crossed: snap back.
    BackToIdentity,
    /// No direction at all (idle, or a programmatic refresh).
    None,
}

impl SlidingDirection {
    /// True for the three directions that dismiss the top card.
    pub fn is_swipe_away(self) -> bool {
        matches!(self, Self::ToLeft | Self::ToRight | Self::ToTop)
    }

    /// The fly-out translation the host should animate towards when a card
    /// is dismissed in this direction.
    pub fn fly_out_translation(self) -> Translation {
        match self {
            Self::ToRight => Translation::new(700.0, 0.0),
            Self::ToLeft => Translation::new(-300.0, 0.0),
            Self::ToTop => Translation::new(0.0, -300.0),
            Self::BackToIdentity | Self::None => Translation::ZERO,
        }
    }

    /// Rotation hint (degrees) for the fly-out animation. Horizontal
    /// dismissals tilt the card; vertical ones keep it straight.
    pub fn fly_out_rotation_degrees(self) -> f64 {
        match self {
            Self::ToLeft => 15.0,
            Self::ToRight => -15.0,
            _ => 0.0,
        }
    }
}

/// Live direction rule, applied on every drag sample.
///
/// Vertical wins whenever its own condition holds (y above the epsilon,
/// x under the cap), regardless of how large x is below that cap.
pub fn slide_direction(translation: Translation) -> SlidingDirection {
    use thresholds::{DIRECTION_EPSILON, VERTICAL_X_CAP};

    if translation.y < -DIRECTION_EPSILON && translation.x.abs() < VERTICAL_X_CAP {
        return SlidingDirection::ToTop;
    }
    if translation.x > DIRECTION_EPSILON {
        return SlidingDirection::ToRight;
    }
    if translation.x < -DIRECTION_EPSILON {
        return SlidingDirection::ToLeft;
    }
    SlidingDirection::BackToIdentity
}

/// Commit rule, applied once against the final translation on release.
///
/// Commits iff either axis crossed its commit threshold; the committed
/// direction then comes from the live rule. Otherwise the card snaps back.
pub fn swipe_away_direction(translation: Translation) -> SlidingDirection {
    use thresholds::{COMMIT_X, COMMIT_Y};

    let should_dismiss =
        translation.x.abs() > COMMIT_X || translation.y.abs() > COMMIT_Y;
    if should_dismiss {
        return slide_direction(translation);
    }
    SlidingDirection::BackToIdentity
}
