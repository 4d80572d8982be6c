//! Channel solvers
//!
//! A [`Solver`] owns the motion model of one channel. Installing it prepares
//! the channel state once; stepping it advances the state by `dt` seconds and
//! marks the channel complete when the model has settled.
//!
//! | Model     | Velocity | Completes when                         |
//! |-----------|----------|----------------------------------------|
//! | Immediate | no       | at install                             |
//! | Linear    | no       | the target is reached                  |
//! | Spring    | yes      | within both resting thresholds         |
//! | Tween     | no       | the last leg has played                |
//! | Custom    | yes      | the callback sets `complete`           |

mod linear;
mod spring;
mod tween;

pub use linear::LinearSolver;
pub use spring::{SpringParams, SpringSolver};
pub use tween::TweenSolver;

use crate::channel::{ChannelKey, ChannelState};
use crate::config::{LinearOptions, SpringOptions, TweenOptions};
use crate::error::{MotionError, Result};
use std::fmt;

/// Caller-supplied stepping function
pub type StepFn = dyn FnMut(&ChannelKey, &mut ChannelState, f32);

/// Wraps a caller step function
///
/// The function may write any field of the channel state, including
/// `teardown`. It must not call back into the motion that owns it.
pub struct CustomSolver(Box<StepFn>);

impl CustomSolver {
    pub fn new<F>(step: F) -> Self
    where
        F: FnMut(&ChannelKey, &mut ChannelState, f32) + 'static,
    {
        Self(Box::new(step))
    }
}

impl fmt::Debug for CustomSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomSolver(..)")
    }
}

/// Motion model of one channel
#[derive(Debug)]
pub enum Solver {
    Immediate(f32),
    Linear(LinearSolver),
    Spring(SpringSolver),
    Tween(TweenSolver),
    Custom(CustomSolver),
}

impl Solver {
    pub fn immediate(target: f32) -> Result<Self> {
        if !target.is_finite() {
            return Err(MotionError::invalid("target", format!("must be finite, got {target}")));
        }
        Ok(Solver::Immediate(target))
    }

    pub fn linear(target: f32, options: &LinearOptions) -> Result<Self> {
        LinearSolver::new(target, options).map(Solver::Linear)
    }

    pub fn spring(target: f32, options: &SpringOptions) -> Result<Self> {
        SpringSolver::new(target, options).map(Solver::Spring)
    }

    pub fn tween(target: f32, options: &TweenOptions) -> Result<Self> {
        TweenSolver::new(target, options).map(Solver::Tween)
    }

    pub fn custom<F>(step: F) -> Self
    where
        F: FnMut(&ChannelKey, &mut ChannelState, f32) + 'static,
    {
        Solver::Custom(CustomSolver::new(step))
    }

    /// Prepare `state` for this model
    ///
    /// Clears `complete` except for [`Solver::Immediate`], which finishes
    /// here.
    pub fn install(&mut self, state: &mut ChannelState) {
        state.complete = false;
        match self {
            Solver::Immediate(target) => {
                state.value = *target;
                state.velocity = Some(0.0);
                state.complete = true;
            }
            Solver::Linear(linear) => linear.install(state),
            Solver::Custom(_) => {}
            Solver::Spring(spring) => spring.install(state),
            Solver::Tween(tween) => tween.install(state),
        }
    }

    pub fn step(&mut self, key: &ChannelKey, state: &mut ChannelState, dt: f32) {
        match self {
            Solver::Immediate(target) => {
                state.value = *target;
                state.velocity = Some(0.0);
                state.complete = true;
            }
            Solver::Linear(linear) => linear.step(state, dt),
            Solver::Spring(spring) => spring.step(state, dt),
            Solver::Tween(tween) => tween.step(state, dt),
            Solver::Custom(CustomSolver(step)) => step(key, state, dt),
        }
    }

    /// Whether the model integrates velocity, and so responds to impulses
    pub fn tracks_velocity(&self) -> bool {
        matches!(self, Solver::Spring(_) | Solver::Custom(_))
    }

    /// Whether the solver has nothing left to do once installed
    pub fn is_transient(&self) -> bool {
        matches!(self, Solver::Immediate(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Solver::Immediate(_) => "immediate",
            Solver::Linear(_) => "linear",
            Solver::Spring(_) => "spring",
            Solver::Tween(_) => "tween",
            Solver::Custom(_) => "custom",
        }
    }

    /// Target value, where the model has one
    pub fn target(&self) -> Option<f32> {
        match self {
            Solver::Immediate(target) => Some(*target),
            Solver::Linear(linear) => Some(linear.target()),
            Solver::Spring(spring) => Some(spring.target()),
            Solver::Tween(tween) => Some(tween.target()),
            Solver::Custom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_immediate_completes_at_install() {
        let mut solver = Solver::immediate(4.0).unwrap();
        let mut state = ChannelState::at_rest(0.0);
        state.velocity = Some(9.0);
        solver.install(&mut state);

        assert_eq!(state.value, 4.0);
        assert_eq!(state.velocity, Some(0.0));
        assert!(state.complete);
        assert!(solver.is_transient());
    }

    #[test]
    fn test_install_clears_complete() {
        let mut solver = Solver::linear(1.0, &LinearOptions::new()).unwrap();
        let mut state = ChannelState::at_rest(0.0);
        solver.install(&mut state);
        assert!(!state.complete);
    }

    #[test]
    fn test_custom_receives_key_and_dt() {
        let seen = Rc::new(Cell::new(0.0f32));
        let sink = seen.clone();
        let mut solver = Solver::custom(move |key: &ChannelKey, state: &mut ChannelState, dt: f32| {
            assert_eq!(*key, ChannelKey::Index(1));
            sink.set(dt);
            state.value += 1.0;
            state.complete = true;
        });

        let mut state = ChannelState::at_rest(0.0);
        solver.install(&mut state);
        solver.step(&ChannelKey::Index(1), &mut state, 0.5);

        assert_eq!(seen.get(), 0.5);
        assert_eq!(state.value, 1.0);
        assert!(state.complete);
        assert_eq!(solver.target(), None);
    }

    #[test]
    fn test_velocity_models() {
        assert!(Solver::spring(0.0, &SpringOptions::new()).unwrap().tracks_velocity());
        assert!(!Solver::tween(0.0, &TweenOptions::new()).unwrap().tracks_velocity());
        assert!(!Solver::linear(0.0, &LinearOptions::new()).unwrap().tracks_velocity());
        assert!(Solver::custom(|_: &ChannelKey, _: &mut ChannelState, _: f32| {}).tracks_velocity());
    }

    #[test]
    fn test_constructor_errors_name_the_parameter() {
        let err = Solver::immediate(f32::NAN).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter `target`: must be finite, got NaN");
    }
}
