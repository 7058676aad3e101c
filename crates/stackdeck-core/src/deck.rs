//! Deck facade: one object wiring scheduler, gesture engine, queue, scale
//! coordinator and image pipeline behind a host-facing surface.
//!
//! Design:
//! - The host owns the deck and drives it from its UI context: raw gesture
//!   samples in via [`CardDeck::handle_gesture`], button presses via
//!   [`CardDeck::perform_action`], animation completions via
//!   [`CardDeck::notify_action_finished`].
//! - All rendering goes through the [`Presenter`] port; the deck never
//!   draws, it only says what to draw.
//! - Programmatic actions are serialized on the [`TaskQueue`]: the queue's
//!   head task marks its action runnable, and the deck drains runnable
//!   actions after every queue interaction. An action's effects therefore
//!   never interleave with the previous action's animation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bus::SlidingEventBus;
use crate::domain::{
    Card, CardAction, DeckEvent, GesturePhase, GestureSample, HandleId, SlideStatus, SlidingEvent,
    ViewTypeId,
};
use crate::engine::{
    AnimationSource, DragTransform, GestureDecisionEngine, GestureOutcome, SwipeDecision,
};
use crate::error::DeckError;
use crate::haptics::{Haptics, ImpactStyle, NoopHaptics};
use crate::image::{CardImageLoader, ImageFetcher, ImageStore, ImageUpdate, MemoryImageStore};
use crate::queue::TaskQueue;
use crate::registry::ViewTypeRegistry;
use crate::scale::{ControlBarState, ScaleCommand, ScaleCoordinator};
use crate::scheduler::{CardStackScheduler, DEFAULT_WINDOW_SIZE};
use crate::view::{BasicCardView, CardView};

/// View type every deck registers out of the box.
pub const BASIC_VIEW_TYPE: &str = "basic";

/// One pull's worth of cards, plus the base URL relative image paths are
/// resolved against.
#[derive(Debug, Clone, Default)]
pub struct CardBatch {
    pub cards: Vec<Card>,
    pub domain_url: Option<String>,
}

impl CardBatch {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            domain_url: None,
        }
    }

    pub fn with_domain_url(mut self, url: impl Into<String>) -> Self {
        self.domain_url = Some(url.into());
        self
    }
}

/// Where new cards come from. Pulled on demand: once at startup and again on
/// every Refresh action.
pub trait CardDataSource: Send {
    fn pull_new_cards(&mut self) -> CardBatch;
}

/// Host-side rendering port. The deck calls these synchronously from
/// whichever thread drives it.
pub trait Presenter: Send {
    /// A card entered the presented window; put its view on screen behind
    /// the existing ones.
    fn insert_card(&mut self, card: &Card, handle: HandleId);

    /// The top card was dismissed; take its view off screen.
    fn remove_card(&mut self, handle: HandleId);

    /// Everything has been presented and dismissed.
    fn deck_exhausted(&mut self);

    /// Live drag: move the top view with the finger.
    fn apply_drag(&mut self, handle: HandleId, transform: DragTransform);

    /// Animate the top view out along the decision's fly-out, then call
    /// [`CardDeck::notify_action_finished`].
    fn animate_decision(&mut self, handle: HandleId, decision: SwipeDecision);

    /// Animate the top view back to rest, then call
    /// [`CardDeck::notify_action_finished`].
    fn snap_back(&mut self, handle: HandleId);

    /// Apply or animate a scale on one presented view.
    fn apply_scale(&mut self, command: ScaleCommand);

    /// Refresh the control-bar buttons.
    fn set_control_bar(&mut self, state: ControlBarState);

    /// New image bytes landed in the given slot of a presented view.
    fn card_image_updated(&mut self, handle: HandleId, index: usize);
}

/// Builder for [`CardDeck`]. Fails fast on missing collaborators.
pub struct DeckBuilder {
    window_size: usize,
    registry: ViewTypeRegistry,
    haptics: Box<dyn Haptics>,
    fetcher: Option<Arc<dyn ImageFetcher>>,
    store: Arc<dyn ImageStore>,
    data_source: Option<Box<dyn CardDataSource>>,
    presenter: Option<Box<dyn Presenter>>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        let mut registry = ViewTypeRegistry::new();
        // new() is the only registration, so the id cannot collide
        let _ = registry.register(ViewTypeId::new(BASIC_VIEW_TYPE), || {
            Box::new(BasicCardView::new())
        });
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            registry,
            haptics: Box::new(NoopHaptics),
            fetcher: None,
            store: Arc::new(MemoryImageStore::new()),
            data_source: None,
            presenter: None,
        }
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    pub fn haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    pub fn image_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Replace the default in-memory image store.
    pub fn image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.store = store;
        self
    }

    pub fn data_source(mut self, source: impl CardDataSource + 'static) -> Self {
        self.data_source = Some(Box::new(source));
        self
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// Register an additional view type next to the built-in basic one.
    pub fn register_view_type<F>(mut self, id: ViewTypeId, factory: F) -> Result<Self, DeckError>
    where
        F: Fn() -> Box<dyn CardView> + Send + Sync + 'static,
    {
        self.registry.register(id, factory)?;
        Ok(self)
    }

    pub fn build(self) -> Result<CardDeck, DeckError> {
        let fetcher = self
            .fetcher
            .ok_or(DeckError::NotConfigured("image fetcher"))?;
        let data_source = self
            .data_source
            .ok_or(DeckError::NotConfigured("card data source"))?;
        let presenter = self.presenter.ok_or(DeckError::NotConfigured("presenter"))?;

        let bus = SlidingEventBus::new();
        let (loader, image_updates) = CardImageLoader::new(self.store, fetcher);
        Ok(CardDeck {
            scheduler: CardStackScheduler::new(self.window_size, Arc::new(self.registry)),
            engine: GestureDecisionEngine::new(bus.clone()),
            bus,
            queue: TaskQueue::new(),
            runnable: Arc::new(Mutex::new(VecDeque::new())),
            scale: ScaleCoordinator::new(),
            haptics: self.haptics,
            data_source,
            presenter,
            loader,
            image_updates,
            domain_url: None,
        })
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CardDeck {
    scheduler: CardStackScheduler,
    engine: GestureDecisionEngine,
    bus: SlidingEventBus,
    queue: TaskQueue,
    /// Actions whose queue slot has started and are waiting to be executed.
    runnable: Arc<Mutex<VecDeque<CardAction>>>,
    scale: ScaleCoordinator,
    haptics: Box<dyn Haptics>,
    data_source: Box<dyn CardDataSource>,
    presenter: Box<dyn Presenter>,
    loader: CardImageLoader,
    image_updates: mpsc::UnboundedReceiver<ImageUpdate>,
    /// Base URL of the most recent batch, for relative image paths.
    domain_url: Option<String>,
}

impl CardDeck {
    pub fn builder() -> DeckBuilder {
        DeckBuilder::new()
    }

    /// Event bus for additional host listeners (control bars, analytics).
    pub fn events(&self) -> &SlidingEventBus {
        &self.bus
    }

    /// Pull a batch from the data source and schedule it.
    pub fn add_new_cards(&mut self) -> Result<(), DeckError> {
        let batch = self.data_source.pull_new_cards();
        if let Some(url) = batch.domain_url {
            self.domain_url = Some(url);
        }
        if batch.cards.is_empty() {
            info!("data source returned no new cards");
            return Ok(());
        }
        let events = self.scheduler.add_new_cards(batch.cards)?;
        self.apply_deck_events(events);
        for command in self.scale.settle_waiting() {
            self.presenter.apply_scale(command);
        }
        Ok(())
    }

    /// Feed one raw gesture sample through the decision engine and render
    /// its consequences. Samples with no presented card are ignored.
    pub fn handle_gesture(&mut self, sample: GestureSample) -> Option<GestureOutcome> {
        let top = self.scheduler.presented_handles().first().copied()?;
        if sample.phase == GesturePhase::Began {
            self.haptics.prepare();
        }
        let outcome = self.engine.handle_sample(sample)?;
        match &outcome {
            GestureOutcome::Drag(transform) => {
                self.presenter.apply_drag(top, *transform);
                for command in self.scale.on_drag(transform.translation) {
                    self.presenter.apply_scale(command);
                }
                let event = SlidingEvent::new(SlideStatus::Sliding, transform.translation);
                self.presenter
                    .set_control_bar(ControlBarState::from_event(&event));
            }
            GestureOutcome::Decision(decision) => {
                self.presenter.set_control_bar(ControlBarState::HIDDEN);
                if decision.direction.is_swipe_away() {
                    self.haptics.impact(ImpactStyle::Medium);
                    self.presenter.animate_decision(top, *decision);
                } else {
                    self.presenter.snap_back(top);
                }
            }
        }
        Some(outcome)
    }

    /// Submit a programmatic action (control-bar press).
    ///
    /// Actions run strictly one at a time: a second press waits until the
    /// first action's animation has reported back.
    pub fn perform_action(&mut self, action: CardAction) {
        debug!(?action, "action submitted");
        let runnable = Arc::clone(&self.runnable);
        self.queue.enqueue(move || {
            runnable
                .lock()
                .expect("runnable action lock poisoned")
                .push_back(action);
        });
        self.run_ready_actions();
    }

    /// Host callback: the oldest in-flight exit or snap-back animation
    /// completed.
    ///
    /// Completions are attributed in the order animations were started, so a
    /// snap-back finishing under a later control-bar exit settles only the
    /// snap-back. On a committed swipe this dismisses the top card and
    /// refills the window; a control-bar completion additionally frees the
    /// action queue for the next submission. A no-op when no animation was
    /// in flight.
    pub fn notify_action_finished(&mut self) -> Result<(), DeckError> {
        let Some(finished) = self.engine.animation_finished() else {
            debug!("animation completion with no action in flight");
            return Ok(());
        };
        if finished.direction.is_swipe_away() {
            debug_assert!(
                self.scheduler.presented_count() > 0,
                "swipe animation finished with nothing presented"
            );
            let top = self.scheduler.presented_handles().first().copied();
            let events = self.scheduler.pop_top()?;
            if let Some(handle) = top {
                self.presenter.remove_card(handle);
            }
            self.apply_deck_events(events);
        }
        for command in self.scale.settle_top() {
            self.presenter.apply_scale(command);
        }
        if finished.source == AnimationSource::ControlBar {
            self.queue.mark_current_task_finished();
            self.run_ready_actions();
        }
        Ok(())
    }

    /// Apply every image that has finished loading since the last call.
    pub fn drain_image_updates(&mut self) {
        while let Ok(update) = self.image_updates.try_recv() {
            let handle = self
                .scheduler
                .presented_cards()
                .iter()
                .position(|card| card.uid == update.card_uid)
                .and_then(|i| self.scheduler.presented_handles().get(i).copied());
            self.scheduler
                .update_card_image(&update.card_uid, update.index, &update.bytes);
            if let Some(handle) = handle {
                self.presenter.card_image_updated(handle, update.index);
            }
        }
    }

    pub fn presented_cards(&self) -> &[Card] {
        self.scheduler.presented_cards()
    }

    pub fn dismissed_cards(&self) -> &[Card] {
        self.scheduler.dismissed_cards()
    }

    pub fn backlog_len(&self) -> usize {
        self.scheduler.backlog_len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.scheduler.is_exhausted()
    }

    /// Actions queued behind the one currently in flight.
    pub fn pending_actions(&self) -> usize {
        self.queue.pending_count()
    }

    /// Read access to a presented view, topmost at index 0.
    pub fn presented_view(&self, index: usize) -> Option<&dyn CardView> {
        self.scheduler.presented_view(index)
    }

    fn apply_deck_events(&mut self, events: Vec<DeckEvent>) {
        for event in events {
            match event {
                DeckEvent::CardReady { card, handle } => {
                    if !card.image_urls.is_empty() {
                        self.loader.load_card_images(&self.resolved_for_images(&card));
                    }
                    self.presenter.insert_card(&card, handle);
                }
                DeckEvent::Exhausted => {
                    // pending actions have nothing left to act on
                    self.queue.reset();
                    self.presenter.deck_exhausted();
                }
            }
        }
        self.scale.set_presented(self.scheduler.presented_handles());
    }

    /// Copy of the card with relative image paths resolved against the
    /// batch's domain URL. Absolute URLs pass through untouched.
    fn resolved_for_images(&self, card: &Card) -> Card {
        let Some(base) = &self.domain_url else {
            return card.clone();
        };
        let urls = card
            .image_urls
            .iter()
            .map(|url| {
                if url.contains("://") {
                    url.clone()
                } else {
                    format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
                }
            })
            .collect();
        card.clone().with_image_urls(urls)
    }

    fn run_ready_actions(&mut self) {
        loop {
            let next = self
                .runnable
                .lock()
                .expect("runnable action lock poisoned")
                .pop_front();
            let Some(action) = next else { break };
            self.execute_action(action);
        }
    }

    fn execute_action(&mut self, action: CardAction) {
        match action {
            CardAction::Refresh => {
                info!("refreshing deck from data source");
                if let Err(error) = self.add_new_cards() {
                    warn!(%error, "refresh failed");
                }
                self.queue.mark_current_task_finished();
            }
            CardAction::Rewind => {
                warn!("rewind requested but not supported");
                self.queue.mark_current_task_finished();
            }
            CardAction::Like | CardAction::Nope | CardAction::SuperLike => {
                let Some(top) = self.scheduler.presented_handles().first().copied() else {
                    warn!(?action, "action submitted with no presented card");
                    self.queue.mark_current_task_finished();
                    return;
                };
                self.haptics.prepare();
                let decision = self.engine.perform_action(action.direction());
                self.haptics.impact(ImpactStyle::Medium);
                self.presenter.animate_decision(top, decision);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::{GesturePhase, SlidingDirection, Translation};
    use crate::error::ImageError;
    use async_trait::async_trait;

    /// What the presenter was asked to do, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Insert(String),
        Remove,
        Exhausted,
        Drag(f64, f64),
        Animate(SlidingDirection),
        SnapBack,
        ImageSlot(usize),
    }

    #[derive(Clone, Default)]
    struct RecordingPresenter {
        log: Arc<Mutex<Vec<Shown>>>,
    }

    impl RecordingPresenter {
        fn shown(&self) -> Vec<Shown> {
            self.log.lock().unwrap().clone()
        }

        fn push(&self, entry: Shown) {
            self.log.lock().unwrap().push(entry);
        }
    }

    impl Presenter for RecordingPresenter {
        fn insert_card(&mut self, card: &Card, _handle: HandleId) {
            self.push(Shown::Insert(card.uid.as_str().to_string()));
        }

        fn remove_card(&mut self, _handle: HandleId) {
            self.push(Shown::Remove);
        }

        fn deck_exhausted(&mut self) {
            self.push(Shown::Exhausted);
        }

        fn apply_drag(&mut self, _handle: HandleId, transform: DragTransform) {
            self.push(Shown::Drag(
                transform.translation.x,
                transform.translation.y,
            ));
        }

        fn animate_decision(&mut self, _handle: HandleId, decision: SwipeDecision) {
            self.push(Shown::Animate(decision.direction));
        }

        fn snap_back(&mut self, _handle: HandleId) {
            self.push(Shown::SnapBack);
        }

        fn apply_scale(&mut self, _command: ScaleCommand) {}

        fn set_control_bar(&mut self, _state: ControlBarState) {}

        fn card_image_updated(&mut self, _handle: HandleId, index: usize) {
            self.push(Shown::ImageSlot(index));
        }
    }

    struct StaticSource {
        batches: Vec<CardBatch>,
    }

    impl CardDataSource for StaticSource {
        fn pull_new_cards(&mut self) -> CardBatch {
            if self.batches.is_empty() {
                CardBatch::default()
            } else {
                self.batches.remove(0)
            }
        }
    }

    struct EchoFetcher;

    #[async_trait]
    impl ImageFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    fn cards(uids: &[&str]) -> Vec<Card> {
        uids.iter().map(|uid| Card::new(*uid, "basic")).collect()
    }

    fn deck_with(batches: Vec<Vec<Card>>) -> (CardDeck, RecordingPresenter) {
        let batches = batches.into_iter().map(CardBatch::new).collect();
        let presenter = RecordingPresenter::default();
        let deck = CardDeck::builder()
            .image_fetcher(Arc::new(EchoFetcher))
            .data_source(StaticSource { batches })
            .presenter(presenter.clone())
            .build()
            .unwrap();
        (deck, presenter)
    }

    fn drag_commit(deck: &mut CardDeck, x: f64, y: f64) {
        deck.handle_gesture(GestureSample::new(GesturePhase::Began, Translation::ZERO));
        deck.handle_gesture(GestureSample::new(
            GesturePhase::Ended,
            Translation::new(x, y),
        ));
    }

    #[test]
    fn builder_requires_its_collaborators() {
        let result = CardDeck::builder()
            .presenter(RecordingPresenter::default())
            .data_source(StaticSource { batches: vec![] })
            .build();
        assert!(matches!(result, Err(DeckError::NotConfigured("image fetcher"))));
    }

    #[test]
    fn startup_presents_the_window_in_order() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1", "c2", "c3", "c4"])]);
        deck.add_new_cards().unwrap();

        assert_eq!(
            presenter.shown(),
            vec![
                Shown::Insert("c1".into()),
                Shown::Insert("c2".into()),
                Shown::Insert("c3".into()),
            ]
        );
        assert_eq!(deck.backlog_len(), 1);
    }

    #[test]
    fn committed_drag_dismisses_and_refills() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1", "c2", "c3", "c4"])]);
        deck.add_new_cards().unwrap();

        drag_commit(&mut deck, 120.0, 0.0);
        assert_eq!(
            presenter.shown().last(),
            Some(&Shown::Animate(SlidingDirection::ToRight))
        );

        deck.notify_action_finished().unwrap();
        assert_eq!(
            deck.dismissed_cards()
                .iter()
                .map(|c| c.uid.as_str())
                .collect::<Vec<_>>(),
            vec!["c1"]
        );
        let tail = presenter.shown()[4..].to_vec();
        assert_eq!(tail, vec![Shown::Remove, Shown::Insert("c4".into())]);
    }

    #[test]
    fn under_threshold_release_snaps_back_without_dismissing() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1", "c2"])]);
        deck.add_new_cards().unwrap();

        drag_commit(&mut deck, 30.0, 10.0);
        assert_eq!(presenter.shown().last(), Some(&Shown::SnapBack));

        deck.notify_action_finished().unwrap();
        assert!(deck.dismissed_cards().is_empty());
        assert_eq!(deck.presented_cards()[0].uid.as_str(), "c1");
    }

    #[test]
    fn actions_wait_for_the_previous_animation() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1", "c2", "c3"])]);
        deck.add_new_cards().unwrap();

        deck.perform_action(CardAction::Like);
        deck.perform_action(CardAction::Nope);

        // only the first action has reached the presenter
        let animations: Vec<_> = presenter
            .shown()
            .into_iter()
            .filter(|s| matches!(s, Shown::Animate(_)))
            .collect();
        assert_eq!(animations, vec![Shown::Animate(SlidingDirection::ToRight)]);
        assert_eq!(deck.pending_actions(), 1);

        deck.notify_action_finished().unwrap();
        let animations: Vec<_> = presenter
            .shown()
            .into_iter()
            .filter(|s| matches!(s, Shown::Animate(_)))
            .collect();
        assert_eq!(
            animations,
            vec![
                Shown::Animate(SlidingDirection::ToRight),
                Shown::Animate(SlidingDirection::ToLeft),
            ]
        );
    }

    #[test]
    fn snap_back_completion_does_not_release_a_pressed_action() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1", "c2", "c3"])]);
        deck.add_new_cards().unwrap();

        // under-threshold release leaves a snap-back animation running
        drag_commit(&mut deck, 30.0, 10.0);
        assert_eq!(presenter.shown().last(), Some(&Shown::SnapBack));

        // two presses while the snap-back is still in flight
        deck.perform_action(CardAction::Like);
        deck.perform_action(CardAction::Nope);

        // the snap-back finishing settles only the snap-back: nothing is
        // dismissed and the nope stays queued behind the running like
        deck.notify_action_finished().unwrap();
        assert!(deck.dismissed_cards().is_empty());
        assert_eq!(deck.pending_actions(), 1);
        let animations: Vec<_> = presenter
            .shown()
            .into_iter()
            .filter(|s| matches!(s, Shown::Animate(_)))
            .collect();
        assert_eq!(animations, vec![Shown::Animate(SlidingDirection::ToRight)]);

        // the like finishing dismisses c1 and releases the nope
        deck.notify_action_finished().unwrap();
        assert_eq!(deck.dismissed_cards()[0].uid.as_str(), "c1");
        let animations: Vec<_> = presenter
            .shown()
            .into_iter()
            .filter(|s| matches!(s, Shown::Animate(_)))
            .collect();
        assert_eq!(
            animations,
            vec![
                Shown::Animate(SlidingDirection::ToRight),
                Shown::Animate(SlidingDirection::ToLeft),
            ]
        );
    }

    #[test]
    fn refresh_pulls_the_next_batch_and_frees_its_slot() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1"]), cards(&["c2"])]);
        deck.add_new_cards().unwrap();

        deck.perform_action(CardAction::Refresh);
        assert!(presenter.shown().contains(&Shown::Insert("c2".into())));
        assert_eq!(deck.pending_actions(), 0);
    }

    #[test]
    fn rewind_is_a_logged_no_op_that_frees_its_slot() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1"])]);
        deck.add_new_cards().unwrap();

        deck.perform_action(CardAction::Rewind);
        deck.perform_action(CardAction::Like);

        // rewind changed nothing but the like still ran
        assert_eq!(
            presenter.shown().last(),
            Some(&Shown::Animate(SlidingDirection::ToRight))
        );
    }

    #[test]
    fn exhaustion_reports_once_and_clears_pending_actions() {
        let (mut deck, presenter) = deck_with(vec![cards(&["c1"])]);
        deck.add_new_cards().unwrap();

        deck.perform_action(CardAction::Like);
        deck.perform_action(CardAction::Nope); // will be discarded on exhaustion
        deck.notify_action_finished().unwrap();

        assert!(deck.is_exhausted());
        assert_eq!(deck.pending_actions(), 0);
        let exhausted: Vec<_> = presenter
            .shown()
            .into_iter()
            .filter(|s| *s == Shown::Exhausted)
            .collect();
        assert_eq!(exhausted.len(), 1);
    }

    #[test]
    fn gestures_on_an_empty_deck_are_ignored() {
        let (mut deck, presenter) = deck_with(vec![]);
        deck.add_new_cards().unwrap();

        let outcome = deck.handle_gesture(GestureSample::new(
            GesturePhase::Began,
            Translation::ZERO,
        ));
        assert!(outcome.is_none());
        assert!(presenter.shown().is_empty());
    }

    #[tokio::test]
    async fn relative_image_paths_resolve_against_the_domain_url() {
        #[derive(Default)]
        struct UrlRecorder {
            urls: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl ImageFetcher for UrlRecorder {
            async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
                self.urls.lock().unwrap().push(url.to_string());
                Ok(Vec::new())
            }
        }

        let fetcher = Arc::new(UrlRecorder::default());
        let batch = CardBatch::new(vec![
            Card::new("c1", "basic").with_image_urls(vec!["photos/1.png".into()]),
        ])
        .with_domain_url("https://cdn.example.com/");
        let mut deck = CardDeck::builder()
            .image_fetcher(Arc::clone(&fetcher) as _)
            .data_source(StaticSource { batches: vec![batch] })
            .presenter(RecordingPresenter::default())
            .build()
            .unwrap();
        deck.add_new_cards().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://cdn.example.com/photos/1.png".to_string()]
        );
    }

    #[tokio::test]
    async fn fetched_images_land_in_their_slots() {
        let (mut deck, presenter) = deck_with(vec![vec![
            Card::new("c1", "basic")
                .with_image_urls(vec!["https://cdn.example.com/photos/1.png".into()]),
        ]]);
        deck.add_new_cards().unwrap();

        // let the spawned fetch task run to completion
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        deck.drain_image_updates();

        assert!(presenter.shown().contains(&Shown::ImageSlot(0)));
    }
}
