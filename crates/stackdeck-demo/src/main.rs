//! Headless walkthrough of the card deck: scripted gestures and control-bar
//! presses against a console presenter, with a fake image backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::info;

use stackdeck_core::deck::{CardBatch, CardDataSource, CardDeck, Presenter};
use stackdeck_core::domain::{Card, GesturePhase, GestureSample, HandleId, Translation};
use stackdeck_core::engine::{DragTransform, SwipeDecision};
use stackdeck_core::image::{ImageFetcher, MemoryImageStore};
use stackdeck_core::scale::{ControlBarState, ScaleCommand};
use stackdeck_core::{domain::CardAction, ImageError};

/// Network stand-in: "fetches" a placeholder after a short delay.
struct FakeFetcher;

#[async_trait]
impl ImageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        sleep(Duration::from_millis(30)).await;
        Ok(format!("bytes-of:{url}").into_bytes())
    }
}

#[derive(Debug, Deserialize)]
struct BatchFile {
    #[serde(default)]
    domain_url: Option<String>,
    cards: Vec<Card>,
}

/// Serves one JSON batch, then an extra batch on the first refresh.
struct JsonSource {
    batches: Vec<BatchFile>,
}

impl CardDataSource for JsonSource {
    fn pull_new_cards(&mut self) -> CardBatch {
        if self.batches.is_empty() {
            return CardBatch::default();
        }
        let file = self.batches.remove(0);
        let batch = CardBatch::new(file.cards);
        match file.domain_url {
            Some(url) => batch.with_domain_url(url),
            None => batch,
        }
    }
}

/// Prints every rendering instruction the deck issues.
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn insert_card(&mut self, card: &Card, handle: HandleId) {
        println!("  [present] {} on {handle}", card.uid);
    }

    fn remove_card(&mut self, handle: HandleId) {
        println!("  [remove]  {handle}");
    }

    fn deck_exhausted(&mut self) {
        println!("  [deck]    exhausted");
    }

    fn apply_drag(&mut self, handle: HandleId, transform: DragTransform) {
        println!(
            "  [drag]    {handle} -> ({:.0}, {:.0}) tilt {:.1}°",
            transform.translation.x, transform.translation.y, transform.rotation_degrees
        );
    }

    fn animate_decision(&mut self, handle: HandleId, decision: SwipeDecision) {
        println!(
            "  [fly-out] {handle} {:?} to ({:.0}, {:.0})",
            decision.direction, decision.fly_out.x, decision.fly_out.y
        );
    }

    fn snap_back(&mut self, handle: HandleId) {
        println!("  [snap]    {handle} back to rest");
    }

    fn apply_scale(&mut self, command: ScaleCommand) {
        match command {
            ScaleCommand::Set { handle, scale } => {
                println!("  [scale]   {handle} = {scale:.3}");
            }
            ScaleCommand::AnimateTo { handle, scale, duration } => {
                println!("  [scale]   {handle} -> {scale:.3} over {duration:?}");
            }
        }
    }

    fn set_control_bar(&mut self, state: ControlBarState) {
        if state != ControlBarState::HIDDEN {
            println!(
                "  [bar]     nope {:.2} / like {:.2} / super {:.2}",
                state.nope.alpha, state.like.alpha, state.super_like.alpha
            );
        }
    }

    fn card_image_updated(&mut self, handle: HandleId, index: usize) {
        println!("  [image]   {handle} slot {index} ready");
    }
}

fn batch(json: &str) -> BatchFile {
    serde_json::from_str(json).expect("demo batch is valid JSON")
}

fn drag(deck: &mut CardDeck, x: f64, y: f64) {
    deck.handle_gesture(GestureSample::new(GesturePhase::Began, Translation::ZERO));
    deck.handle_gesture(GestureSample::new(
        GesturePhase::Changed,
        Translation::new(x / 2.0, y / 2.0),
    ));
    deck.handle_gesture(GestureSample::new(
        GesturePhase::Ended,
        Translation::new(x, y),
    ));
    // the host animation completes immediately in this headless demo
    deck.notify_action_finished().expect("animation callback");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let first = batch(
        r#"{ "domain_url": "https://pics.example",
           "cards": [
            { "uid": "dog-1", "view_type": "basic",
              "image_urls": ["dogs/rex.png"] },
            { "uid": "dog-2", "view_type": "basic" },
            { "uid": "dog-3", "view_type": "basic" },
            { "uid": "dog-4", "view_type": "basic" }
        ] }"#,
    );
    let refresh = batch(
        r#"{ "cards": [
            { "uid": "cat-1", "view_type": "basic" },
            { "uid": "cat-2", "view_type": "basic" }
        ] }"#,
    );

    let mut deck = CardDeck::builder()
        .image_fetcher(Arc::new(FakeFetcher))
        .image_store(Arc::new(MemoryImageStore::new()))
        .data_source(JsonSource { batches: vec![first, refresh] })
        .presenter(ConsolePresenter)
        .build()
        .expect("deck wiring");

    println!("-- initial load --");
    deck.add_new_cards().expect("initial batch");

    println!("-- image pipeline --");
    sleep(Duration::from_millis(80)).await;
    deck.drain_image_updates();

    println!("-- swipe right (commit) --");
    drag(&mut deck, 120.0, 0.0);

    println!("-- half-hearted drag (snap back) --");
    drag(&mut deck, 40.0, 10.0);

    println!("-- nope via control bar --");
    deck.perform_action(CardAction::Nope);
    deck.notify_action_finished().expect("animation callback");

    println!("-- refresh pulls the second batch --");
    deck.perform_action(CardAction::Refresh);

    println!("-- swipe everything away --");
    while !deck.is_exhausted() {
        drag(&mut deck, 0.0, -160.0);
    }

    info!(
        dismissed = deck.dismissed_cards().len(),
        "demo finished"
    );
}
