//! Ripple Motion
//!
//! Per-frame value animation: springs, constant-velocity moves and eased
//! tweens over scalars, sequences, mappings and structured values.
//!
//! # Features
//!
//! - **Channels**: every number inside a value animates independently, each
//!   with its own solver
//! - **Solvers**: immediate, linear, damped spring (semi-implicit Euler),
//!   eased tween with delay/repeat/reverse, and caller-supplied steppers
//! - **Interruptible**: retargeting a spring keeps its velocity
//! - **Clock-driven**: motions subscribe to a [`Clock`](ripple_core::Clock)
//!   and advance once per frame, or can be stepped by hand
//!
//! # Example
//!
//! ```rust
//! use ripple_core::{Heartbeat, Vec2};
//! use ripple_motion::{Motion, MotionOptions, SpringPreset};
//!
//! let clock = Heartbeat::new();
//! let position = Motion::with_options(Vec2::ZERO, MotionOptions::new().clock(clock.clone()));
//! position.spring(Vec2::new(100.0, 50.0), &SpringPreset::Stiff.into()).unwrap();
//! position.start().unwrap();
//!
//! while !position.is_complete() {
//!     clock.tick(1.0 / 60.0);
//! }
//! assert_eq!(position.get(), Vec2::new(100.0, 50.0));
//! ```

pub mod animatable;
pub mod channel;
pub mod config;
pub mod easing;
pub mod error;
pub mod goal;
pub mod motion;
pub mod solver;
pub mod structured;

pub use animatable::MotionGoal;
pub use channel::{ChannelKey, ChannelPatch, ChannelSnapshot, ChannelState, Teardown};
pub use config::{LinearOptions, Repeat, SpringOptions, SpringPreset, TweenOptions};
pub use easing::{Easing, EasingDirection, EasingStyle};
pub use error::{MotionError, Result};
pub use goal::{ChannelLayout, Container, ContainerKind, Field, Goal, GoalShape};
pub use motion::{Cleanup, CompleteCallback, Motion, MotionOptions, StepCallback};
pub use solver::{CustomSolver, LinearSolver, Solver, SpringParams, SpringSolver, TweenSolver};
pub use structured::Structured;
