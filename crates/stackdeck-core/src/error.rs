use thiserror::Error;

use crate::domain::ViewTypeId;

/// Errors the deck core can produce.
///
/// The repository/pool variants indicate caller-contract violations rather
/// than runtime conditions: the scheduler checks exhaustion before popping
/// and sizes pools to the window, so hitting one in production means a bug
/// in the embedding code, not bad user input.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("backlog is empty")]
    EmptyBacklog,

    #[error("no card is currently presented")]
    EmptyPresented,

    /// Structurally impossible while pool size == window size per type;
    /// firing means a pool-sizing bug.
    #[error("view pool exhausted for view type '{0}'")]
    PoolExhausted(ViewTypeId),

    #[error("no card view factory registered for view type '{0}'")]
    UnknownViewType(ViewTypeId),

    #[error("card view factory already registered for view type '{0}'")]
    DuplicateViewType(ViewTypeId),

    #[error("deck is not fully wired: {0}")]
    NotConfigured(&'static str),
}

/// Errors from the image pipeline. Always recoverable: the affected card
/// keeps its placeholder and scheduling is never blocked.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image url '{0}' has no usable path")]
    InvalidUrl(String),

    #[error("network fetch failed for '{path}': {reason}")]
    Fetch { path: String, reason: String },

    #[error("cache store rejected '{id}': {reason}")]
    Store { id: String, reason: String },

    #[error("image cache miss for '{0}'")]
    CacheMiss(String),
}
