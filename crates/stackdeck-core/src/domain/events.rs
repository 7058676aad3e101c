//! Events published by the gesture engine and the scheduler.

use serde::{Deserialize, Serialize};

use super::action::CardAction;
use super::card::Card;
use super::direction::{self, SlidingDirection};
use super::gesture::Translation;
use super::ids::HandleId;

/// Where in its lifecycle a slide currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideStatus {
    /// A drag sample arrived; `translation` is the live cumulative value.
    Sliding,
    /// The finger lifted; `translation` is the final cumulative value.
    EndSlide,
    /// A terminal decision was made; the exit/return animation is starting.
    /// `translation` is the decision's fly-out value (zero for snap-back).
    WillPerformAction,
    /// The exit/return animation completed.
    DidPerformAction,
}

/// The value fanned out to every sliding-event subscriber.
///
/// Direction and action are derived from the translation on demand rather
/// than stored, so an event can never carry an inconsistent pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidingEvent {
    pub status: SlideStatus,
    pub translation: Translation,
}

impl SlidingEvent {
    pub fn new(status: SlideStatus, translation: Translation) -> Self {
        Self { status, translation }
    }

    /// Live direction of this event's translation.
    pub fn direction(&self) -> SlidingDirection {
        direction::slide_direction(self.translation)
    }

    /// Action the live direction resolves to, if any.
    pub fn action(&self) -> Option<CardAction> {
        CardAction::from_direction(self.direction())
    }
}

/// What the scheduler tells the embedding layer after a mutation.
///
/// Returned (not pushed) so the deck facade decides how to fan them out;
/// the scheduler itself stays synchronous and easily testable.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    /// A backlog card was pulled into the window and bound to `handle`.
    /// The host should insert the view; the image loader should start
    /// fetching the card's remote images.
    CardReady { card: Card, handle: HandleId },
    /// Backlog and presented window are both empty. Emitted exactly once
    /// per drain, by the pop that removed the last presented card.
    Exhausted,
}
