//! Haptic feedback port.
//!
//! The deck emits one impact per committed swipe. Hosts with a physical
//! actuator implement [`Haptics`]; everything else uses [`NoopHaptics`].

/// Strength of a haptic impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

/// Host-provided haptic actuator.
pub trait Haptics: Send {
    /// Warm up the actuator ahead of a likely impact.
    fn prepare(&mut self);

    /// Fire one impact.
    fn impact(&mut self, style: ImpactStyle);
}

/// Does nothing. Default for headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn prepare(&mut self) {}

    fn impact(&mut self, _style: ImpactStyle) {}
}
