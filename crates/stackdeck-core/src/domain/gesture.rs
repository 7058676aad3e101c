//! Raw gesture input: phases, translation vectors, samples.

use serde::{Deserialize, Serialize};

/// A 2D vector in translation units (points). Positive x is right, positive y
/// is down, matching the coordinate system the thresholds were tuned in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm, used for drag-distance interpolation.
    pub fn distance(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Lifecycle phase of a pan gesture, as reported by the host's recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One raw sample from the host's gesture recognizer.
///
/// `translation` is cumulative since `Began`; `velocity` is instantaneous.
/// Velocity is carried through the engine but does not participate in the
/// commit decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub phase: GesturePhase,
    pub translation: Translation,
    pub velocity: Translation,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation: Translation) -> Self {
        Self {
            phase,
            translation,
            velocity: Translation::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Translation) -> Self {
        self.velocity = velocity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(Translation::new(3.0, 4.0).distance(), 5.0);
        assert_eq!(Translation::ZERO.distance(), 0.0);
    }
}
