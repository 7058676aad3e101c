//! Card model: the value type the deck shuffles around.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Stable, unique identity of a card.
///
/// Two cards are the same card iff their uids are equal; every other field is
/// ignored by equality. Uniqueness is a caller contract — the repository and
/// the pool both assume it and do not deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardUid(String);

impl CardUid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// String key that selects which view implementation renders a card.
///
/// Host apps register a factory per id with the view-type registry; the core
/// only ever resolves handles by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewTypeId(String);

impl ViewTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card waiting to be (or being) presented. Immutable after creation.
///
/// `image_names` are bundled-asset identifiers resolved by the host;
/// `image_urls` are remote images fetched through the image pipeline. A card
/// with any `image_names` renders from assets and skips the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub uid: CardUid,
    pub view_type: ViewTypeId,
    #[serde(default)]
    pub image_names: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Card {
    pub fn new(uid: impl Into<String>, view_type: impl Into<String>) -> Self {
        Self {
            uid: CardUid::new(uid),
            view_type: ViewTypeId::new(view_type),
            image_names: Vec::new(),
            image_urls: Vec::new(),
        }
    }

    pub fn with_image_names(mut self, names: Vec<String>) -> Self {
        self.image_names = names;
        self
    }

    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self {
        self.image_urls = urls;
        self
    }

    /// Number of image slots a view bound to this card must hold.
    pub fn image_slot_count(&self) -> usize {
        self.image_names.len().max(self.image_urls.len())
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_compares_uid_only() {
        let a = Card::new("c1", "basic").with_image_names(vec!["sunset".into()]);
        let b = Card::new("c1", "fancy").with_image_urls(vec!["https://x/y.png".into()]);
        let c = Card::new("c2", "basic").with_image_names(vec!["sunset".into()]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        // reflexive / symmetric
        assert_eq!(a, a);
        assert_eq!(b, a);
    }

    #[test]
    fn image_slot_count_takes_the_longer_list() {
        let card = Card::new("c1", "basic")
            .with_image_names(vec!["a".into()])
            .with_image_urls(vec!["u1".into(), "u2".into(), "u3".into()]);
        assert_eq!(card.image_slot_count(), 3);
    }

    #[test]
    fn card_round_trips_through_json() {
        let card = Card::new("c1", "basic").with_image_urls(vec!["https://x/1.jpg".into()]);
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uid, card.uid);
        assert_eq!(back.view_type, card.view_type);
        assert_eq!(back.image_urls, card.image_urls);
    }
}
