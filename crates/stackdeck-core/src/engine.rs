//! Gesture decision engine: raw drag samples in, discrete decisions out.
//!
//! Phase machine: idle -> dragging -> {committing, resetting} -> idle.
//! The engine owns no view state. It publishes [`SlidingEvent`]s on the deck
//! bus as the sole continuous feedback channel and hands the caller a
//! transform hint (while dragging) or a terminal decision (on release); the
//! host runs the actual animations and reports back through
//! [`animation_finished`](GestureDecisionEngine::animation_finished).
//!
//! The threshold rules themselves live in [`crate::domain::direction`] as
//! pure functions; this type only sequences phases and events around them.

use std::collections::VecDeque;

use tracing::debug;

use crate::bus::SlidingEventBus;
use crate::domain::{
    GesturePhase, GestureSample, SlideStatus, SlidingDirection, SlidingEvent, Translation,
    swipe_away_direction,
};

/// Transform the host should apply to the top view for the current sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransform {
    pub translation: Translation,
    /// Slight tilt proportional to horizontal displacement.
    pub rotation_degrees: f64,
}

/// Terminal decision for a finished drag (or a programmatic action).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeDecision {
    pub direction: SlidingDirection,
    /// Where the exit animation should take the view; zero for snap-back.
    pub fly_out: Translation,
    pub rotation_degrees: f64,
}

impl SwipeDecision {
    fn for_direction(direction: SlidingDirection) -> Self {
        Self {
            direction,
            fly_out: direction.fly_out_translation(),
            rotation_degrees: direction.fly_out_rotation_degrees(),
        }
    }
}

/// What a processed sample asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Drag in progress: apply this transform, nothing decided yet.
    Drag(DragTransform),
    /// Drag over: start the exit or snap-back animation for this decision.
    Decision(SwipeDecision),
}

/// Who started an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSource {
    /// A finished drag on the top card.
    Gesture,
    /// A programmatic action driven through [`GestureDecisionEngine::perform_action`].
    ControlBar,
}

/// A completed animation, reported back in the order animations were started.
///
/// Several animations can be in flight at once (a snap-back still running
/// when a control-bar press starts an exit), so each completion carries the
/// direction and source it was started with rather than whatever the engine
/// started last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedAnimation {
    pub direction: SlidingDirection,
    pub source: AnimationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging,
    /// Exit animation running for a committed swipe.
    Committing,
    /// Snap-back animation running.
    Resetting,
}

pub struct GestureDecisionEngine {
    bus: SlidingEventBus,
    phase: Phase,
    /// Animations started and not yet reported finished, oldest first.
    /// Completions are attributed in this order.
    in_flight: VecDeque<FinishedAnimation>,
    /// Last observed instantaneous velocity. Tracked for hosts that want it;
    /// not part of the commit decision.
    last_velocity: Translation,
}

impl GestureDecisionEngine {
    pub fn new(bus: SlidingEventBus) -> Self {
        Self {
            bus,
            phase: Phase::Idle,
            in_flight: VecDeque::new(),
            last_velocity: Translation::ZERO,
        }
    }

    /// Feed one raw sample through the phase machine.
    ///
    /// Stray `Changed`/`Ended` samples with no preceding `Began` are ignored
    /// (recognizers can deliver them after a cancellation).
    pub fn handle_sample(&mut self, sample: GestureSample) -> Option<GestureOutcome> {
        self.last_velocity = sample.velocity;
        match sample.phase {
            GesturePhase::Began => {
                self.begin();
                None
            }
            GesturePhase::Changed => self.changed(sample.translation),
            GesturePhase::Ended => self.ended(sample.translation),
            GesturePhase::Cancelled => self.ended(Translation::ZERO),
        }
    }

    /// New touch: cancels an in-flight snap-back on the same view.
    ///
    /// A running exit animation is not cancellable — the card is already
    /// committed and the new touch belongs to the next card.
    fn begin(&mut self) {
        if self.phase == Phase::Resetting {
            // The host cancels the snap-back, so its completion never
            // arrives; drop its slot in the attribution order.
            if let Some(pos) = self
                .in_flight
                .iter()
                .rposition(|a| a.direction == SlidingDirection::BackToIdentity)
            {
                self.in_flight.remove(pos);
            }
            debug!("new drag cancelled in-flight snap-back");
        }
        if self.phase != Phase::Committing {
            self.phase = Phase::Dragging;
        }
    }

    fn changed(&mut self, translation: Translation) -> Option<GestureOutcome> {
        if self.phase != Phase::Dragging {
            return None;
        }
        self.bus
            .publish(SlidingEvent::new(SlideStatus::Sliding, translation));
        Some(GestureOutcome::Drag(DragTransform {
            translation,
            rotation_degrees: -translation.x / 20.0,
        }))
    }

    fn ended(&mut self, translation: Translation) -> Option<GestureOutcome> {
        if self.phase != Phase::Dragging {
            return None;
        }
        self.bus
            .publish(SlidingEvent::new(SlideStatus::EndSlide, translation));

        let direction = swipe_away_direction(translation);
        Some(GestureOutcome::Decision(
            self.start_action(direction, AnimationSource::Gesture),
        ))
    }

    /// Drive a programmatic swipe (control-bar press) through the same
    /// commit path a real drag takes.
    pub fn perform_action(&mut self, direction: SlidingDirection) -> SwipeDecision {
        self.start_action(direction, AnimationSource::ControlBar)
    }

    fn start_action(
        &mut self,
        direction: SlidingDirection,
        source: AnimationSource,
    ) -> SwipeDecision {
        let decision = SwipeDecision::for_direction(direction);
        self.phase = if direction.is_swipe_away() {
            Phase::Committing
        } else {
            Phase::Resetting
        };
        self.in_flight.push_back(FinishedAnimation { direction, source });
        self.bus.publish(SlidingEvent::new(
            SlideStatus::WillPerformAction,
            decision.fly_out,
        ));
        decision
    }

    /// Host callback: the oldest in-flight exit/snap-back animation completed.
    ///
    /// Publishes `DidPerformAction` and returns the direction and source that
    /// animation was started with, so the caller knows whether to pop the top
    /// card and whose turn it was. A no-op when no animation was in flight.
    pub fn animation_finished(&mut self) -> Option<FinishedAnimation> {
        let finished = self.in_flight.pop_front()?;
        self.bus.publish(SlidingEvent::new(
            SlideStatus::DidPerformAction,
            finished.direction.fly_out_translation(),
        ));
        if self.in_flight.is_empty()
            && matches!(self.phase, Phase::Committing | Phase::Resetting)
        {
            self.phase = Phase::Idle;
        }
        Some(finished)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn last_velocity(&self) -> Translation {
        self.last_velocity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::SlideStatus;

    fn engine_with_log() -> (GestureDecisionEngine, Arc<Mutex<Vec<SlidingEvent>>>) {
        let bus = SlidingEventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let token = bus.subscribe(move |e| log_clone.lock().unwrap().push(*e));
        // keep the subscription alive for the test's duration
        std::mem::forget(token);
        (GestureDecisionEngine::new(bus), log)
    }

    fn sample(phase: GesturePhase, x: f64, y: f64) -> GestureSample {
        GestureSample::new(phase, Translation::new(x, y))
    }

    fn statuses(log: &Arc<Mutex<Vec<SlidingEvent>>>) -> Vec<SlideStatus> {
        log.lock().unwrap().iter().map(|e| e.status).collect()
    }

    #[test]
    fn drag_publishes_sliding_on_every_sample() {
        let (mut engine, log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        engine.handle_sample(sample(GesturePhase::Changed, 10.0, 0.0));
        engine.handle_sample(sample(GesturePhase::Changed, 40.0, 0.0));

        assert_eq!(
            statuses(&log),
            vec![SlideStatus::Sliding, SlideStatus::Sliding]
        );
    }

    #[test]
    fn committed_release_emits_end_slide_then_will_perform() {
        let (mut engine, log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        let outcome = engine
            .handle_sample(sample(GesturePhase::Ended, 120.0, 0.0))
            .unwrap();

        let GestureOutcome::Decision(decision) = outcome else {
            panic!("expected a decision");
        };
        assert_eq!(decision.direction, SlidingDirection::ToRight);
        assert_eq!(decision.fly_out, Translation::new(700.0, 0.0));
        assert_eq!(decision.rotation_degrees, -15.0);
        assert_eq!(
            statuses(&log),
            vec![SlideStatus::EndSlide, SlideStatus::WillPerformAction]
        );

        // host finishes the animation
        assert_eq!(
            engine.animation_finished(),
            Some(FinishedAnimation {
                direction: SlidingDirection::ToRight,
                source: AnimationSource::Gesture,
            })
        );
        assert!(engine.is_idle());
        assert_eq!(statuses(&log).last(), Some(&SlideStatus::DidPerformAction));
    }

    #[test]
    fn under_threshold_release_snaps_back() {
        let (mut engine, _log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        let outcome = engine
            .handle_sample(sample(GesturePhase::Ended, 30.0, 10.0))
            .unwrap();

        let GestureOutcome::Decision(decision) = outcome else {
            panic!("expected a decision");
        };
        assert_eq!(decision.direction, SlidingDirection::BackToIdentity);
        assert_eq!(decision.fly_out, Translation::ZERO);
    }

    #[test]
    fn new_drag_cancels_in_flight_snap_back() {
        let (mut engine, _log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        engine.handle_sample(sample(GesturePhase::Ended, 5.0, 0.0)); // snap-back starts

        // finger comes down again before the snap-back finishes
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        let outcome = engine.handle_sample(sample(GesturePhase::Changed, 20.0, 0.0));
        assert!(matches!(outcome, Some(GestureOutcome::Drag(_))));

        // the cancelled snap-back never reports completion
        engine.handle_sample(sample(GesturePhase::Ended, 120.0, 0.0));
        assert_eq!(
            engine.animation_finished().map(|a| a.direction),
            Some(SlidingDirection::ToRight)
        );
        assert_eq!(engine.animation_finished(), None);
    }

    #[test]
    fn overlapping_animations_finish_in_start_order() {
        let (mut engine, _log) = engine_with_log();
        // under-threshold release leaves a snap-back running
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        engine.handle_sample(sample(GesturePhase::Ended, 30.0, 10.0));
        // control-bar press before the snap-back completes
        engine.perform_action(SlidingDirection::ToRight);

        // first completion belongs to the snap-back, not the exit
        assert_eq!(
            engine.animation_finished(),
            Some(FinishedAnimation {
                direction: SlidingDirection::BackToIdentity,
                source: AnimationSource::Gesture,
            })
        );
        assert!(!engine.is_idle());

        assert_eq!(
            engine.animation_finished(),
            Some(FinishedAnimation {
                direction: SlidingDirection::ToRight,
                source: AnimationSource::ControlBar,
            })
        );
        assert!(engine.is_idle());
        assert_eq!(engine.animation_finished(), None);
    }

    #[test]
    fn stray_samples_without_began_are_ignored() {
        let (mut engine, log) = engine_with_log();
        assert!(
            engine
                .handle_sample(sample(GesturePhase::Changed, 50.0, 0.0))
                .is_none()
        );
        assert!(
            engine
                .handle_sample(sample(GesturePhase::Ended, 200.0, 0.0))
                .is_none()
        );
        assert!(statuses(&log).is_empty());
        assert!(engine.is_idle());
    }

    #[test]
    fn cancelled_gesture_behaves_as_snap_back() {
        let (mut engine, log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        let outcome = engine
            .handle_sample(sample(GesturePhase::Cancelled, 500.0, 0.0))
            .unwrap();

        let GestureOutcome::Decision(decision) = outcome else {
            panic!("expected a decision");
        };
        // translation is discarded on cancellation; never commits
        assert_eq!(decision.direction, SlidingDirection::BackToIdentity);
        assert_eq!(
            statuses(&log),
            vec![SlideStatus::EndSlide, SlideStatus::WillPerformAction]
        );
    }

    #[test]
    fn drag_transform_tilts_against_horizontal_motion() {
        let (mut engine, _log) = engine_with_log();
        engine.handle_sample(sample(GesturePhase::Began, 0.0, 0.0));
        let outcome = engine
            .handle_sample(sample(GesturePhase::Changed, 100.0, 20.0))
            .unwrap();

        let GestureOutcome::Drag(transform) = outcome else {
            panic!("expected a drag transform");
        };
        assert_eq!(transform.translation, Translation::new(100.0, 20.0));
        assert_eq!(transform.rotation_degrees, -5.0);
    }
}
