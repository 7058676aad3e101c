//! Card repository: backlog, presented window, dismissed history.
//!
//! Design:
//! - This is the single source of truth for where every card lives. A card
//!   is in exactly one of the three collections, and only ever moves
//!   backlog -> presented -> dismissed.
//! - No interior locking: the scheduler is the sole caller and guarantees
//!   single-threaded access.

use std::collections::VecDeque;

use crate::domain::Card;
use crate::error::DeckError;

#[derive(Debug, Default)]
pub struct CardRepository {
    /// Unpresented cards, insertion order = presentation order.
    backlog: VecDeque<Card>,
    /// Currently presented cards, front = topmost.
    presented: Vec<Card>,
    /// Append-only dismissal history.
    dismissed: Vec<Card>,
}

impl CardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append cards to the backlog tail. Presented/dismissed are untouched.
    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.backlog.extend(cards);
    }

    /// Move the backlog head to the presented tail and return a copy of it.
    pub fn take_next_from_backlog(&mut self) -> Result<Card, DeckError> {
        let card = self.backlog.pop_front().ok_or(DeckError::EmptyBacklog)?;
        self.presented.push(card.clone());
        Ok(card)
    }

    /// Move the presented head (the topmost card) to the dismissed tail.
    pub fn dismiss_top_presented(&mut self) -> Result<Card, DeckError> {
        if self.presented.is_empty() {
            return Err(DeckError::EmptyPresented);
        }
        let card = self.presented.remove(0);
        self.dismissed.push(card.clone());
        Ok(card)
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn presented(&self) -> &[Card] {
        &self.presented
    }

    pub fn dismissed(&self) -> &[Card] {
        &self.dismissed
    }

    /// True once every card has been presented and dismissed.
    pub fn is_drained(&self) -> bool {
        self.backlog.is_empty() && self.presented.is_empty()
    }
}
