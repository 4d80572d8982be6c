//! Time-keyed easing solver
//!
//! A tween plays one or more passes ("legs") of `time` seconds from the value
//! it was installed on to its target. With `reverses`, every repeat plays the
//! previous leg backwards.

use crate::channel::ChannelState;
use crate::config::{Repeat, TweenOptions};
use crate::easing::{Easing, EasingDirection, EasingStyle};
use crate::error::{MotionError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSolver {
    target: f32,
    time: f32,
    easing: Easing,
    repeat: Repeat,
    reverses: bool,
    delay: f32,

    start: f32,
    elapsed: f32,
    delay_remaining: f32,
    repeats_left: Repeat,
    reversed: bool,
    running: bool,
}

impl TweenSolver {
    pub fn new(target: f32, options: &TweenOptions) -> Result<Self> {
        let options = options.merged_over(&TweenOptions::DEFAULT);
        let time = options.time.unwrap_or(1.0);
        let delay = options.delay_time.unwrap_or(0.0);

        if !time.is_finite() || time <= 0.0 {
            return Err(MotionError::invalid(
                "time",
                format!("must be positive and finite, got {time}"),
            ));
        }
        if !delay.is_finite() || delay < 0.0 {
            return Err(MotionError::invalid(
                "delay_time",
                format!("must be non-negative and finite, got {delay}"),
            ));
        }
        if !target.is_finite() {
            return Err(MotionError::invalid("target", format!("must be finite, got {target}")));
        }

        let repeat = options.repeat_count.unwrap_or_default();
        Ok(Self {
            target,
            time,
            easing: Easing::new(
                options.style.unwrap_or(EasingStyle::Quad),
                options.direction.unwrap_or(EasingDirection::Out),
            ),
            repeat,
            reverses: options.reverses.unwrap_or(false),
            delay,
            start: 0.0,
            elapsed: 0.0,
            delay_remaining: delay,
            repeats_left: repeat,
            reversed: false,
            running: false,
        })
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Capture the start value and reset playback
    pub fn install(&mut self, state: &mut ChannelState) {
        self.elapsed = 0.0;
        self.delay_remaining = self.delay;
        self.repeats_left = self.repeat;
        self.reversed = false;
        self.running = self.delay <= 0.0;
        self.start = state.value;
    }

    pub fn step(&mut self, state: &mut ChannelState, dt: f32) {
        if !self.running {
            if self.delay_remaining > 0.0 {
                self.delay_remaining -= dt;
                state.velocity = Some(0.0);
                return;
            }
            self.running = true;
            self.elapsed = 0.0;
            self.start = state.value;
            state.value = self.sample();
            state.velocity = Some(0.0);
            return;
        }

        let previous = state.value;
        self.elapsed += dt;
        let mut restarted = false;

        if self.elapsed >= self.time {
            let next = match self.repeats_left {
                Repeat::Forever => Some(Repeat::Forever),
                Repeat::Count(0) => None,
                Repeat::Count(n) => Some(Repeat::Count(n - 1)),
            };
            match next {
                Some(remaining) => {
                    self.repeats_left = remaining;
                    self.elapsed = 0.0;
                    restarted = true;
                    if self.reverses {
                        self.reversed = !self.reversed;
                    }
                }
                None => {
                    state.value = if self.reversed { self.start } else { self.target };
                    state.velocity = Some(0.0);
                    state.complete = true;
                    return;
                }
            }
        }

        state.value = self.sample();
        // A leg restart jumps back to its start; that jump is not motion
        state.velocity = Some(if dt > 0.0 && !restarted {
            (state.value - previous) / dt
        } else {
            0.0
        });
    }

    fn sample(&self) -> f32 {
        let alpha = (self.elapsed / self.time).clamp(0.0, 1.0);
        let alpha = if self.reversed { 1.0 - alpha } else { alpha };
        self.start + (self.target - self.start) * self.easing.apply(alpha)
    }
}
