//! View-type registry: string key -> card view factory.
//!
//! Host apps plug custom card renderers in by id; the pool asks the registry
//! for fresh handles when it first sees a type. Built during initialization
//! (mutable), read-only afterwards, so no locking is needed.

use std::collections::HashMap;

use crate::domain::ViewTypeId;
use crate::error::DeckError;
use crate::view::{CardView, ViewFactory};

#[derive(Default)]
pub struct ViewTypeRegistry {
    factories: HashMap<ViewTypeId, ViewFactory>,
}

impl ViewTypeRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for a view type id.
    ///
    /// Double registration is an error rather than last-wins: silently
    /// replacing a renderer mid-session would strand already-pooled handles
    /// of the old type.
    pub fn register<F>(&mut self, id: ViewTypeId, factory: F) -> Result<(), DeckError>
    where
        F: Fn() -> Box<dyn CardView> + Send + Sync + 'static,
    {
        if self.factories.contains_key(&id) {
            return Err(DeckError::DuplicateViewType(id));
        }
        self.factories.insert(id, Box::new(factory));
        Ok(())
    }

    /// Build one fresh handle for the given type.
    pub fn make_view(&self, id: &ViewTypeId) -> Result<Box<dyn CardView>, DeckError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| DeckError::UnknownViewType(id.clone()))?;
        Ok(factory())
    }

    pub fn contains(&self, id: &ViewTypeId) -> bool {
        self.factories.contains_key(id)
    }

    pub fn registered_types(&self) -> Vec<ViewTypeId> {
        self.factories.keys().cloned().collect()
    }
}
