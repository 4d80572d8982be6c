//! Damped spring solver
//!
//! Integrates `m·x'' = tension·(target − x) − friction·x'` with semi-implicit
//! Euler: velocity is updated first and the new velocity moves the position.
//! The result depends only on the sequence of `dt` values, so identical
//! frame sequences replay bit-identically.

use crate::channel::ChannelState;
use crate::config::{
    SpringOptions, SpringPreset, DEFAULT_MASS, DEFAULT_RESTING_POSITION, DEFAULT_RESTING_VELOCITY,
};
use crate::error::{MotionError, Result};

/// Validated spring constants in tension/friction form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub mass: f32,
    pub tension: f32,
    pub friction: f32,
    pub resting_position: f32,
    pub resting_velocity: f32,
}

impl SpringParams {
    /// Merge `options` over the default preset, convert the frequency form,
    /// and validate every field
    pub fn resolve(options: &SpringOptions) -> Result<Self> {
        if options.uses_frequency_form() && options.uses_tension_form() {
            return Err(MotionError::invalid(
                "frequency",
                "frequency/damping cannot be combined with tension/friction",
            ));
        }

        let merged = options.merged_over(&SpringPreset::Default.options());
        let mass = merged.mass.unwrap_or(DEFAULT_MASS);
        if !mass.is_finite() || mass <= 0.0 {
            return Err(MotionError::invalid(
                "mass",
                format!("must be positive and finite, got {mass}"),
            ));
        }

        let (tension, friction) = if merged.uses_frequency_form() {
            let base_tension = SpringPreset::Default.tension();
            let base_friction = SpringPreset::Default.friction();
            let frequency = non_negative(
                "frequency",
                merged.frequency.unwrap_or_else(|| (base_tension / mass).sqrt()),
            )?;
            let damping = non_negative(
                "damping",
                merged
                    .damping
                    .unwrap_or_else(|| base_friction / (2.0 * (base_tension * mass).sqrt())),
            )?;
            (
                mass * frequency * frequency,
                2.0 * mass * damping * frequency,
            )
        } else {
            (
                non_negative(
                    "tension",
                    merged.tension.unwrap_or(SpringPreset::Default.tension()),
                )?,
                non_negative(
                    "friction",
                    merged.friction.unwrap_or(SpringPreset::Default.friction()),
                )?,
            )
        };

        Ok(Self {
            mass,
            tension,
            friction,
            resting_position: non_negative(
                "resting_position",
                merged.resting_position.unwrap_or(DEFAULT_RESTING_POSITION),
            )?,
            resting_velocity: non_negative(
                "resting_velocity",
                merged.resting_velocity.unwrap_or(DEFAULT_RESTING_VELOCITY),
            )?,
        })
    }

    /// Angular natural frequency in rad/s
    pub fn natural_frequency(&self) -> f32 {
        (self.tension / self.mass).sqrt()
    }

    /// 1.0 is critically damped
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.tension * self.mass).sqrt();
        if critical > 0.0 {
            self.friction / critical
        } else {
            0.0
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MotionError::invalid(
            name,
            format!("must be non-negative and finite, got {value}"),
        ))
    }
}

/// Pulls a channel toward its target like a mass on a damped spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSolver {
    target: f32,
    params: SpringParams,
    position: Option<f32>,
    velocity: Option<f32>,
    impulse: Option<f32>,
}

impl SpringSolver {
    pub fn new(target: f32, options: &SpringOptions) -> Result<Self> {
        if !target.is_finite() {
            return Err(MotionError::invalid("target", format!("must be finite, got {target}")));
        }
        let params = SpringParams::resolve(options)?;
        for (name, value) in [
            ("position", options.position),
            ("velocity", options.velocity),
            ("impulse", options.impulse),
        ] {
            if value.is_some_and(|value| !value.is_finite()) {
                return Err(MotionError::invalid(name, "must be finite"));
            }
        }

        Ok(Self {
            target,
            params,
            position: options.position,
            velocity: options.velocity,
            impulse: options.impulse,
        })
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    /// Apply the one-shot start options; an existing velocity carries over
    pub fn install(&self, state: &mut ChannelState) {
        if let Some(position) = self.position {
            state.value = position;
        }
        let mut velocity = self.velocity.unwrap_or_else(|| state.velocity_or_zero());
        if let Some(impulse) = self.impulse {
            velocity += impulse;
        }
        state.velocity = Some(velocity);
    }

    pub fn step(&self, state: &mut ChannelState, dt: f32) {
        let SpringParams {
            mass,
            tension,
            friction,
            resting_position,
            resting_velocity,
        } = self.params;

        let mut position = state.value;
        let mut velocity = state.velocity_or_zero();

        let acceleration = (tension * (self.target - position) - friction * velocity) / mass;
        velocity += acceleration * dt;
        position += velocity * dt;

        if (position - self.target).abs() < resting_position && velocity.abs() < resting_velocity {
            state.value = self.target;
            state.velocity = Some(0.0);
            state.complete = true;
        } else {
            state.value = position;
            state.velocity = Some(velocity);
        }
    }
}
