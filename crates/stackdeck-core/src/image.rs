//! Card photo pipeline: cache-first loading behind host-provided ports.
//!
//! Design:
//! - [`ImageFetcher`] and [`ImageStore`] keep transport and persistence out
//!   of the core; hosts plug in their own network and disk layers.
//! - [`ImageRepository`] reads through the store first and only falls back
//!   to the network on a miss. A failed cache write never fails the load.
//! - [`CardImageLoader`] fans a card's URLs out to background tasks under a
//!   shared concurrency cap and reports finished slots on a channel. Image
//!   failures are logged and swallowed; the deck keeps scheduling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore, mpsc};
use tracing::{debug, warn};

use crate::domain::{Card, CardUid};
use crate::error::ImageError;

/// Cap on simultaneous in-flight fetches across all cards.
pub const DEFAULT_CONCURRENT_FETCHES: usize = 10;

/// Host-provided network loader.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// Host-provided byte cache, keyed by image id.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Returns [`ImageError::CacheMiss`] when the id is unknown.
    async fn load(&self, id: &str) -> Result<Vec<u8>, ImageError>;

    async fn save(&self, id: &str, bytes: &[u8]) -> Result<(), ImageError>;
}

/// Cache key for a URL: its path with the slashes removed.
///
/// Query and fragment are not part of the identity, so two URLs that differ
/// only there share one cache entry.
pub fn image_id_from_url(url: &str) -> Result<String, ImageError> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest
        .split_once(['?', '#'])
        .map_or(rest, |(before, _)| before);
    let path = rest.find('/').map_or("", |slash| &rest[slash..]);
    let id: String = path.chars().filter(|&ch| ch != '/').collect();
    if id.is_empty() {
        return Err(ImageError::InvalidUrl(url.to_string()));
    }
    Ok(id)
}

/// Cache-first image access over the two ports.
pub struct ImageRepository {
    store: Arc<dyn ImageStore>,
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImageRepository {
    pub fn new(store: Arc<dyn ImageStore>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Bytes for the URL, from cache when possible.
    ///
    /// On a miss the fetched bytes are written back to the store; a store
    /// failure is logged and the bytes are still returned.
    pub async fn image(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let id = image_id_from_url(url)?;
        match self.store.load(&id).await {
            Ok(bytes) => {
                debug!(id, "image served from cache");
                Ok(bytes)
            }
            Err(ImageError::CacheMiss(_)) => {
                let bytes = self.fetcher.fetch(url).await?;
                if let Err(error) = self.store.save(&id, &bytes).await {
                    warn!(%error, id, "image cache write failed");
                }
                Ok(bytes)
            }
            Err(other) => Err(other),
        }
    }
}

/// A finished image slot, ready to be applied to the owning card's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpdate {
    pub card_uid: CardUid,
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// Fans card URLs out to background fetch tasks.
///
/// Updates arrive on the receiver returned by [`CardImageLoader::new`] in
/// completion order, not slot order.
pub struct CardImageLoader {
    repository: Arc<ImageRepository>,
    permits: Arc<Semaphore>,
    updates: mpsc::UnboundedSender<ImageUpdate>,
}

impl CardImageLoader {
    pub fn new(
        store: Arc<dyn ImageStore>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> (Self, mpsc::UnboundedReceiver<ImageUpdate>) {
        Self::with_concurrency(store, fetcher, DEFAULT_CONCURRENT_FETCHES)
    }

    pub fn with_concurrency(
        store: Arc<dyn ImageStore>,
        fetcher: Arc<dyn ImageFetcher>,
        max_in_flight: usize,
    ) -> (Self, mpsc::UnboundedReceiver<ImageUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let loader = Self {
            repository: Arc::new(ImageRepository::new(store, fetcher)),
            permits: Arc::new(Semaphore::new(max_in_flight)),
            updates,
        };
        (loader, receiver)
    }

    /// Start a background load for every URL slot of the card.
    ///
    /// Returns immediately; each slot reports through the update channel
    /// when its bytes arrive. A slot whose URL is invalid or whose fetch
    /// fails is logged and produces no update.
    pub fn load_card_images(&self, card: &Card) {
        for (index, url) in card.image_urls.iter().enumerate() {
            let repository = Arc::clone(&self.repository);
            let permits = Arc::clone(&self.permits);
            let updates = self.updates.clone();
            let card_uid = card.uid.clone();
            let url = url.clone();

            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                match repository.image(&url).await {
                    Ok(bytes) => {
                        // Receiver gone means the deck shut down; nothing to do.
                        let _ = updates.send(ImageUpdate { card_uid, index, bytes });
                    }
                    Err(error) => {
                        warn!(%error, %card_uid, index, "card image load failed");
                    }
                }
            });
        }
    }
}

/// In-memory [`ImageStore`], for tests and headless hosts.
#[derive(Default)]
pub struct MemoryImageStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn load(&self, id: &str) -> Result<Vec<u8>, ImageError> {
        self.entries
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ImageError::CacheMiss(id.to_string()))
    }

    async fn save(&self, id: &str, bytes: &[u8]) -> Result<(), ImageError> {
        self.entries
            .lock()
            .await
            .insert(id.to_string(), bytes.to_vec());
        Ok(())
    }
}
