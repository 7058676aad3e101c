//! Card stack scheduler: keeps the presented window full from the backlog.
//!
//! Design intent:
//! - The scheduler is the only component that mutates the repository and the
//!   pool skeleton underneath it; everyone else goes through it.
//! - Mutations return the [`DeckEvent`]s they produced instead of pushing
//!   them, so the deck facade controls fan-out and tests stay synchronous.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Card, CardUid, DeckEvent, HandleId, ViewTypeId};
use crate::error::DeckError;
use crate::pool::ViewPool;
use crate::registry::ViewTypeRegistry;
use crate::repo::CardRepository;
use crate::view::CardView;

/// Default number of simultaneously presented cards.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

pub struct CardStackScheduler {
    repo: CardRepository,
    pool: ViewPool,
    registry: Arc<ViewTypeRegistry>,
    /// Views currently on screen, index-aligned with `repo.presented()`.
    presented_views: Vec<Box<dyn CardView>>,
    window_size: usize,
}

impl CardStackScheduler {
    pub fn new(window_size: usize, registry: Arc<ViewTypeRegistry>) -> Self {
        Self {
            repo: CardRepository::new(),
            pool: ViewPool::new(window_size),
            registry,
            presented_views: Vec::new(),
            window_size,
        }
    }

    /// Append cards to the backlog and refill the presentation window.
    ///
    /// Each distinct view type gets its fixed-size pool the first time it is
    /// seen. An unknown view type fails the whole batch before any card is
    /// added, so the repository never holds cards the pool cannot serve.
    pub fn add_new_cards(&mut self, cards: Vec<Card>) -> Result<Vec<DeckEvent>, DeckError> {
        for card in &cards {
            self.pool.ensure_type(&card.view_type, &self.registry)?;
        }
        info!(count = cards.len(), "adding cards to backlog");
        self.repo.add_cards(cards);
        self.refill()
    }

    /// Dismiss the top card after the host removed its view from display.
    ///
    /// Checks the card's handle back into the pool, refills the window, and
    /// reports [`DeckEvent::Exhausted`] iff this pop drained the deck
    /// completely. Callers must check exhaustion before calling again.
    pub fn pop_top(&mut self) -> Result<Vec<DeckEvent>, DeckError> {
        if self.presented_views.is_empty() {
            return Err(DeckError::EmptyPresented);
        }
        let card = self.repo.dismiss_top_presented()?;
        let view = self.presented_views.remove(0);
        debug!(card = %card.uid, handle = %view.handle_id(), "recycling top card view");
        self.pool.checkin(&card.view_type, view);

        let mut events = self.refill()?;
        if self.repo.is_drained() {
            info!("deck exhausted");
            events.push(DeckEvent::Exhausted);
        }
        Ok(events)
    }

    /// Apply fetched image bytes to every presented view bound to the card.
    ///
    /// Idempotent by `(uid, index)`: updates may arrive in any order and be
    /// re-delivered without changing the final state. Unknown uids and
    /// out-of-range indices are silently ignored — the card may already have
    /// been dismissed by the time its image lands.
    pub fn update_card_image(&mut self, uid: &CardUid, index: usize, bytes: &[u8]) {
        for view in &mut self.presented_views {
            let bound = view.bound_card().map(|c| c.uid == *uid).unwrap_or(false);
            if bound {
                view.set_image(index, bytes.to_vec());
            }
        }
    }

    fn refill(&mut self) -> Result<Vec<DeckEvent>, DeckError> {
        let mut events = Vec::new();
        while self.repo.backlog_len() > 0 && self.presented_views.len() < self.window_size {
            let card = self.repo.take_next_from_backlog()?;
            let mut view = self.pool.checkout(&card.view_type)?;
            view.bind(card.clone());
            let handle = view.handle_id();
            self.presented_views.push(view);
            events.push(DeckEvent::CardReady { card, handle });
        }
        Ok(events)
    }

    pub fn presented_cards(&self) -> &[Card] {
        self.repo.presented()
    }

    pub fn dismissed_cards(&self) -> &[Card] {
        self.repo.dismissed()
    }

    pub fn backlog_len(&self) -> usize {
        self.repo.backlog_len()
    }

    pub fn presented_count(&self) -> usize {
        self.presented_views.len()
    }

    /// True once everything has been presented and dismissed.
    pub fn is_exhausted(&self) -> bool {
        self.repo.is_drained()
    }

    pub fn presented_handles(&self) -> Vec<HandleId> {
        self.presented_views.iter().map(|v| v.handle_id()).collect()
    }

    /// Read access to a presented view, topmost at index 0.
    pub fn presented_view(&self, index: usize) -> Option<&dyn CardView> {
        self.presented_views.get(index).map(AsRef::as_ref)
    }

    pub fn free_handles(&self, id: &ViewTypeId) -> usize {
        self.pool.free_count(id)
    }
}
