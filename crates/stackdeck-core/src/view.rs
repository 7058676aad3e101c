//! Card view handles: recycled render targets bound to at most one card.
//!
//! The core never renders anything. A [`CardView`] is the capability set the
//! scheduler needs from whatever the host uses to draw a card: bind a card,
//! reset for recycling, accept image bytes for a slot. Hosts plug their own
//! implementations in through the registry; [`BasicCardView`] is the stock
//! one and enough for headless use and tests.

use crate::domain::{Card, CardUid, HandleId};

/// A reusable, stateful render target for one card at a time.
///
/// Lifecycle: created once at pool initialization, bound when checked out of
/// the pool, reset when checked back in. Never destroyed during a session.
/// Ownership transfers between the pool's free list and the presented list;
/// a handle is never shared.
pub trait CardView: Send {
    /// Handle identity, stable across the handle's lifetime.
    fn handle_id(&self) -> HandleId;

    /// The card currently displayed, if any.
    fn bound_card(&self) -> Option<&Card>;

    /// Index of the image currently shown, if any image is loaded.
    fn current_image_index(&self) -> Option<usize>;

    /// Bind a card: allocate one image slot per image the card references
    /// and show the first slot if there is one.
    fn bind(&mut self, card: Card);

    /// Unbind and clear all per-card state, making the handle safe to hand
    /// to the next card.
    fn reset(&mut self);

    /// Put decoded image bytes into a slot. Out-of-range indices are
    /// ignored; re-delivery of the same slot just overwrites it, so image
    /// application is idempotent and order-independent.
    fn set_image(&mut self, index: usize, bytes: Vec<u8>);
}

/// Factory the registry stores per view type id.
pub type ViewFactory = Box<dyn Fn() -> Box<dyn CardView> + Send + Sync>;

/// Stock card view: holds image bytes per slot, nothing else.
#[derive(Debug)]
pub struct BasicCardView {
    id: HandleId,
    card: Option<Card>,
    current_image_index: Option<usize>,
    /// One slot per referenced image; `None` is the placeholder.
    images: Vec<Option<Vec<u8>>>,
}

impl BasicCardView {
    pub fn new() -> Self {
        Self {
            id: HandleId::generate(),
            card: None,
            current_image_index: None,
            images: Vec::new(),
        }
    }

    /// Bytes for a slot, if they have arrived.
    pub fn image(&self, index: usize) -> Option<&[u8]> {
        self.images.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn image_slot_count(&self) -> usize {
        self.images.len()
    }

    /// Uid of the bound card, handy for presenters keying off cards.
    pub fn bound_uid(&self) -> Option<&CardUid> {
        self.card.as_ref().map(|c| &c.uid)
    }

    /// Step the shown image forward or backward, saturating at the ends.
    /// Returns the new index if it moved.
    pub fn advance_image(&mut self, forward: bool) -> Option<usize> {
        let current = self.current_image_index?;
        let next = if forward {
            current.checked_add(1).filter(|&i| i < self.images.len())?
        } else {
            current.checked_sub(1)?
        };
        self.current_image_index = Some(next);
        Some(next)
    }
}

impl Default for BasicCardView {
    fn default() -> Self {
        Self::new()
    }
}

impl CardView for BasicCardView {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    fn bound_card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    fn current_image_index(&self) -> Option<usize> {
        self.current_image_index
    }

    fn bind(&mut self, card: Card) {
        let slots = card.image_slot_count();
        self.images = vec![None; slots];
        self.current_image_index = if slots > 0 { Some(0) } else { None };
        self.card = Some(card);
    }

    fn reset(&mut self) {
        self.card = None;
        self.current_image_index = None;
        self.images.clear();
    }

    fn set_image(&mut self, index: usize, bytes: Vec<u8>) {
        if let Some(slot) = self.images.get_mut(index) {
            *slot = Some(bytes);
        }
    }
}
