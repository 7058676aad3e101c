//! Domain model (cards, directions, actions, gesture samples, events).

pub mod action;
pub mod card;
pub mod direction;
pub mod events;
pub mod gesture;
pub mod ids;

pub use action::CardAction;
pub use card::{Card, CardUid, ViewTypeId};
pub use direction::{SlidingDirection, slide_direction, swipe_away_direction, thresholds};
pub use events::{DeckEvent, SlideStatus, SlidingEvent};
pub use gesture::{GesturePhase, GestureSample, Translation};
pub use ids::HandleId;
