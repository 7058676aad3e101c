//! View pool: per-type free lists of recycled card-view handles.
//!
//! Handles are created once per type (window-size many, when the scheduler
//! first sees the type) and then only move between a free list and the
//! presented list. Checkout binds nothing by itself; the scheduler binds the
//! card after taking ownership. Checkin resets the handle so it is clean for
//! whichever card comes next.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::domain::ViewTypeId;
use crate::error::DeckError;
use crate::registry::ViewTypeRegistry;
use crate::view::CardView;

pub struct ViewPool {
    free: HashMap<ViewTypeId, VecDeque<Box<dyn CardView>>>,
    /// Fixed number of handles minted per type, equal to the window size.
    handles_per_type: usize,
}

impl ViewPool {
    pub fn new(handles_per_type: usize) -> Self {
        Self {
            free: HashMap::new(),
            handles_per_type,
        }
    }

    /// Lazily create the free list for a type the first time it is seen.
    /// The pool never grows after that.
    pub fn ensure_type(
        &mut self,
        id: &ViewTypeId,
        registry: &ViewTypeRegistry,
    ) -> Result<(), DeckError> {
        if self.free.contains_key(id) {
            return Ok(());
        }
        let mut handles = VecDeque::with_capacity(self.handles_per_type);
        for _ in 0..self.handles_per_type {
            handles.push_back(registry.make_view(id)?);
        }
        debug!(view_type = %id, count = self.handles_per_type, "created view pool");
        self.free.insert(id.clone(), handles);
        Ok(())
    }

    /// Take ownership of a free handle of the given type.
    pub fn checkout(&mut self, id: &ViewTypeId) -> Result<Box<dyn CardView>, DeckError> {
        let list = self
            .free
            .get_mut(id)
            .ok_or_else(|| DeckError::UnknownViewType(id.clone()))?;
        list.pop_front()
            .ok_or_else(|| DeckError::PoolExhausted(id.clone()))
    }

    /// Reset a handle and return it to its type's free list.
    pub fn checkin(&mut self, id: &ViewTypeId, mut view: Box<dyn CardView>) {
        view.reset();
        // ensure_type ran before any checkout of this type, so the list
        // exists; tolerate a missing one anyway rather than dropping a handle.
        self.free.entry(id.clone()).or_default().push_back(view);
    }

    pub fn free_count(&self, id: &ViewTypeId) -> usize {
        self.free.get(id).map_or(0, VecDeque::len)
    }
}
