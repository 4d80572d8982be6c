//! Constant-velocity solver

use crate::channel::ChannelState;
use crate::config::LinearOptions;
use crate::error::{MotionError, Result};

/// Relative slack for the final snap, covering f32 rounding of the inputs
const SNAP_TOLERANCE: f64 = 8.0 * f32::EPSILON as f64;

/// Moves toward the target at a fixed speed and stops exactly on it
///
/// Position is measured from an anchor rather than accumulated per step, so
/// a leg of distance `d` finishes in `ceil(d / (speed * dt))` steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearSolver {
    target: f32,
    speed: f32,

    start: f32,
    travelled: f64,
    /// Last value written; anything else means the channel was moved externally
    last: f32,
}

impl LinearSolver {
    pub fn new(target: f32, options: &LinearOptions) -> Result<Self> {
        let options = options.merged_over(&LinearOptions::DEFAULT);
        let speed = options.speed.unwrap_or(1.0);

        if !speed.is_finite() || speed <= 0.0 {
            return Err(MotionError::invalid(
                "speed",
                format!("must be positive and finite, got {speed}"),
            ));
        }
        if !target.is_finite() {
            return Err(MotionError::invalid("target", format!("must be finite, got {target}")));
        }

        Ok(Self {
            target,
            speed,
            start: 0.0,
            travelled: 0.0,
            last: f32::NAN,
        })
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Anchor the leg at the channel's current value
    pub fn install(&mut self, state: &ChannelState) {
        self.anchor(state.value);
    }

    pub fn step(&mut self, state: &mut ChannelState, dt: f32) {
        if state.value != self.last {
            self.anchor(state.value);
        }

        let distance = f64::from(self.target) - f64::from(self.start);
        self.travelled += f64::from(self.speed) * f64::from(dt);

        if distance.abs() - self.travelled <= distance.abs() * SNAP_TOLERANCE {
            state.value = self.target;
            state.velocity = Some(0.0);
            state.complete = true;
        } else {
            let direction = distance.signum();
            state.value = (f64::from(self.start) + direction * self.travelled) as f32;
            state.velocity = Some(direction as f32 * self.speed);
        }
        self.last = state.value;
    }

    fn anchor(&mut self, value: f32) {
        self.start = value;
        self.travelled = 0.0;
        self.last = value;
    }
}
