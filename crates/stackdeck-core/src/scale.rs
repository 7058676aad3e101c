//! Derived visual feedback: next-card scale and control-bar highlights.
//!
//! Everything here is a function of (presented list, live translation); the
//! only state with a time component is the eased grow-to-full of a freshly
//! promoted top card, and even that is expressed as a command for the host
//! to animate, not animated here.

use std::time::Duration;

use crate::domain::{CardAction, HandleId, SlideStatus, SlidingEvent, Translation};

/// Scale applied to waiting (non-top) cards, and the lower interpolation bound.
pub const MINIMUM_SCALE: f64 = 0.95;
/// Drag distance divisor for the second card's grow-while-dragging.
const DRAG_DISTANCE_DIVISOR: f64 = 1000.0;
/// Eased transition length when a new top card grows to full size.
pub const PROMOTE_DURATION: Duration = Duration::from_millis(150);

/// A scale the host should apply to one presented view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleCommand {
    /// Apply immediately.
    Set { handle: HandleId, scale: f64 },
    /// Ease to the target over the given duration.
    AnimateTo {
        handle: HandleId,
        scale: f64,
        duration: Duration,
    },
}

/// Computes scale commands from the live drag signal.
///
/// Holds nothing but the current presented handle list (topmost first),
/// which the deck refreshes after every scheduling change.
#[derive(Debug, Default)]
pub struct ScaleCoordinator {
    presented: Vec<HandleId>,
}

impl ScaleCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_presented(&mut self, presented: Vec<HandleId>) {
        self.presented = presented;
    }

    /// Settle commands for an idle deck: every waiting card at the minimum.
    pub fn settle_waiting(&self) -> Vec<ScaleCommand> {
        self.presented
            .iter()
            .skip(1)
            .map(|&handle| ScaleCommand::Set {
                handle,
                scale: MINIMUM_SCALE,
            })
            .collect()
    }

    /// While dragging, the second card grows with drag distance, clamped to
    /// [minimum, 1.0]. Cards further back stay at the minimum.
    pub fn on_drag(&self, translation: Translation) -> Vec<ScaleCommand> {
        let Some(&next) = self.presented.get(1) else {
            return Vec::new();
        };
        vec![ScaleCommand::Set {
            handle: next,
            scale: drag_scale(translation),
        }]
    }

    /// After a commit or snap-back completes: ease the (possibly new) top
    /// card to full size and pin the rest back to the minimum.
    pub fn settle_top(&self) -> Vec<ScaleCommand> {
        let mut commands = Vec::with_capacity(self.presented.len());
        if let Some(&top) = self.presented.first() {
            commands.push(ScaleCommand::AnimateTo {
                handle: top,
                scale: 1.0,
                duration: PROMOTE_DURATION,
            });
        }
        commands.extend(self.settle_waiting());
        commands
    }
}

/// Scale for the second card at the given drag distance.
fn drag_scale(translation: Translation) -> f64 {
    let raw = MINIMUM_SCALE + translation.distance() / DRAG_DISTANCE_DIVISOR;
    raw.clamp(MINIMUM_SCALE, 1.0)
}

/// Highlight of one control-bar button. Hidden is alpha 0 at scale 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonHighlight {
    pub alpha: f64,
    pub scale: f64,
}

impl ButtonHighlight {
    pub const HIDDEN: Self = Self {
        alpha: 0.0,
        scale: 1.0,
    };
}

/// Control-bar highlight state for the three swipe buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBarState {
    pub nope: ButtonHighlight,
    pub like: ButtonHighlight,
    pub super_like: ButtonHighlight,
}

impl ControlBarState {
    pub const HIDDEN: Self = Self {
        nope: ButtonHighlight::HIDDEN,
        like: ButtonHighlight::HIDDEN,
        super_like: ButtonHighlight::HIDDEN,
    };

    /// Derive the highlight state for a sliding event.
    ///
    /// Only live `Sliding` samples with a resolvable action light a button;
    /// every other status resets the bar.
    pub fn from_event(event: &SlidingEvent) -> Self {
        if event.status != SlideStatus::Sliding {
            return Self::HIDDEN;
        }
        let Some(action) = event.action() else {
            return Self::HIDDEN;
        };

        let tx = event.translation.x;
        let ty = event.translation.y;
        let alpha = match action {
            CardAction::SuperLike => (-ty - tx.abs()) / 100.0,
            CardAction::Like => tx / 100.0,
            CardAction::Nope => -tx / 100.0,
            CardAction::Rewind | CardAction::Refresh => 0.0,
        }
        .clamp(0.0, 1.0);
        let highlight = ButtonHighlight {
            alpha,
            scale: (1.0 + alpha).clamp(1.0, 2.0),
        };

        let mut state = Self::HIDDEN;
        match action {
            CardAction::Nope => state.nope = highlight,
            CardAction::Like => state.like = highlight,
            CardAction::SuperLike => state.super_like = highlight,
            CardAction::Rewind | CardAction::Refresh => {}
        }
        state
    }
}
