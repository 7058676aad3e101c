//! stackdeck-core
//!
//! Core building blocks for a swipeable card deck.
//!
//! # Module map
//! - **domain**: value types (card, gesture, direction, action, ids, events)
//! - **view**: the `CardView` handle trait and the basic implementation
//! - **registry**: view-type id to view factory mapping
//! - **repo** / **pool** / **scheduler**: backlog, recycled view handles and
//!   the fixed-size presentation window on top of them
//! - **engine**: gesture samples in, swipe decisions out
//! - **bus**: sliding-event fan-out with drop-token subscriptions
//! - **queue**: serial task queue, one card action in flight at a time
//! - **scale**: next-card scale and control-bar highlight derivation
//! - **image**: cache-first image pipeline behind fetcher/store ports
//! - **haptics**: impact feedback port
//! - **deck**: the facade hosts actually talk to

pub mod bus;
pub mod deck;
pub mod domain;
pub mod engine;
pub mod error;
pub mod haptics;
pub mod image;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod repo;
pub mod scale;
pub mod scheduler;
pub mod view;

pub use deck::{CardBatch, CardDataSource, CardDeck, DeckBuilder, Presenter};
pub use error::{DeckError, ImageError};
