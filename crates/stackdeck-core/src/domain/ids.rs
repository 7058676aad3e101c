//! Identifier for pooled view handles.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identity of a reusable card-view handle.
///
/// Minted once when the handle is created at pool initialization and stable
/// for the whole session, across every card the handle is bound to. ULIDs
/// keep handle ids unique without coordination and sortable by creation
/// time, which makes pool logs readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(Ulid);

impl HandleId {
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_sortable() {
        let a = HandleId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = HandleId::generate();
        assert_ne!(a, b);
        assert!(a < b);
        assert!(a.to_string().starts_with("handle-"));
    }
}
