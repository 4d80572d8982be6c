//! Solver options and presets
//!
//! Options are plain data with every field optional. Installers merge the
//! caller's options over the model defaults field by field, so a caller only
//! names what differs:
//!
//! ```rust
//! use ripple_motion::config::{SpringOptions, SpringPreset};
//!
//! let bouncy = SpringOptions::from(SpringPreset::Wobbly).mass(2.0);
//! assert_eq!(bouncy.tension, Some(180.0));
//! assert_eq!(bouncy.mass, Some(2.0));
//! ```

use crate::easing::{Easing, EasingDirection, EasingStyle};

pub const DEFAULT_MASS: f32 = 1.0;
pub const DEFAULT_RESTING_POSITION: f32 = 1e-3;
pub const DEFAULT_RESTING_VELOCITY: f32 = 1e-3;

// ============================================================================
// Spring
// ============================================================================

/// Named tension/friction pairs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpringPreset {
    #[default]
    Default,
    Gentle,
    Wobbly,
    Stiff,
    Slow,
    Molasses,
}

impl SpringPreset {
    pub const fn tension(self) -> f32 {
        match self {
            SpringPreset::Default => 170.0,
            SpringPreset::Gentle => 120.0,
            SpringPreset::Wobbly => 180.0,
            SpringPreset::Stiff => 210.0,
            SpringPreset::Slow => 280.0,
            SpringPreset::Molasses => 280.0,
        }
    }

    pub const fn friction(self) -> f32 {
        match self {
            SpringPreset::Default => 26.0,
            SpringPreset::Gentle => 14.0,
            SpringPreset::Wobbly => 12.0,
            SpringPreset::Stiff => 20.0,
            SpringPreset::Slow => 60.0,
            SpringPreset::Molasses => 120.0,
        }
    }

    pub const fn options(self) -> SpringOptions {
        let mut options = SpringOptions::new();
        options.tension = Some(self.tension());
        options.friction = Some(self.friction());
        options
    }
}

/// Spring parameters
///
/// Stiffness may be given either as `tension`/`friction` or as
/// `frequency` (angular, rad/s) and `damping` (ratio, 1.0 = critical). The
/// two forms cannot be mixed in one set of options.
///
/// `position`, `velocity` and `impulse` are applied once when the spring is
/// installed: they override the start value, override the velocity, and add
/// to the velocity, respectively.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringOptions {
    pub mass: Option<f32>,
    pub tension: Option<f32>,
    pub friction: Option<f32>,
    pub frequency: Option<f32>,
    pub damping: Option<f32>,
    pub position: Option<f32>,
    pub velocity: Option<f32>,
    pub impulse: Option<f32>,
    pub resting_position: Option<f32>,
    pub resting_velocity: Option<f32>,
}

impl SpringOptions {
    pub const fn new() -> Self {
        Self {
            mass: None,
            tension: None,
            friction: None,
            frequency: None,
            damping: None,
            position: None,
            velocity: None,
            impulse: None,
            resting_position: None,
            resting_velocity: None,
        }
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn tension(mut self, tension: f32) -> Self {
        self.tension = Some(tension);
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn position(mut self, position: f32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn impulse(mut self, impulse: f32) -> Self {
        self.impulse = Some(impulse);
        self
    }

    pub fn resting_position(mut self, threshold: f32) -> Self {
        self.resting_position = Some(threshold);
        self
    }

    pub fn resting_velocity(mut self, threshold: f32) -> Self {
        self.resting_velocity = Some(threshold);
        self
    }

    /// Whether any natural-frequency field is set
    pub fn uses_frequency_form(&self) -> bool {
        self.frequency.is_some() || self.damping.is_some()
    }

    /// Whether any tension/friction field is set
    pub fn uses_tension_form(&self) -> bool {
        self.tension.is_some() || self.friction.is_some()
    }

    /// Fill every unset field from `base`
    ///
    /// Stiffness fields are inherited only in the form the caller uses: a
    /// caller's frequency/damping never picks up a preset's tension/friction,
    /// and the reverse.
    pub fn merged_over(&self, base: &SpringOptions) -> SpringOptions {
        let inherit_tension = !self.uses_frequency_form();
        let inherit_frequency = !self.uses_tension_form();

        SpringOptions {
            mass: self.mass.or(base.mass),
            tension: self.tension.or(base.tension.filter(|_| inherit_tension)),
            friction: self.friction.or(base.friction.filter(|_| inherit_tension)),
            frequency: self.frequency.or(base.frequency.filter(|_| inherit_frequency)),
            damping: self.damping.or(base.damping.filter(|_| inherit_frequency)),
            position: self.position.or(base.position),
            velocity: self.velocity.or(base.velocity),
            impulse: self.impulse.or(base.impulse),
            resting_position: self.resting_position.or(base.resting_position),
            resting_velocity: self.resting_velocity.or(base.resting_velocity),
        }
    }
}

impl From<SpringPreset> for SpringOptions {
    fn from(preset: SpringPreset) -> Self {
        preset.options()
    }
}

// ============================================================================
// Linear
// ============================================================================

/// Constant-velocity parameters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearOptions {
    /// Units per second
    pub speed: Option<f32>,
}

impl LinearOptions {
    pub const DEFAULT: LinearOptions = LinearOptions { speed: Some(1.0) };

    pub const fn new() -> Self {
        Self { speed: None }
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn merged_over(&self, base: &LinearOptions) -> LinearOptions {
        LinearOptions {
            speed: self.speed.or(base.speed),
        }
    }
}

// ============================================================================
// Tween
// ============================================================================

/// How many extra times a tween plays after the first pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeat {
    Count(u32),
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(0)
    }
}

/// Time-keyed easing parameters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TweenOptions {
    /// Duration of one pass in seconds
    pub time: Option<f32>,
    pub style: Option<EasingStyle>,
    pub direction: Option<EasingDirection>,
    pub repeat_count: Option<Repeat>,
    /// Play every repeat in the opposite direction of the previous pass
    pub reverses: Option<bool>,
    /// Seconds to hold the start value before the first pass
    pub delay_time: Option<f32>,
}

impl TweenOptions {
    pub const DEFAULT: TweenOptions = TweenOptions {
        time: Some(1.0),
        style: Some(EasingStyle::Quad),
        direction: Some(EasingDirection::Out),
        repeat_count: Some(Repeat::Count(0)),
        reverses: Some(false),
        delay_time: Some(0.0),
    };

    pub const fn new() -> Self {
        Self {
            time: None,
            style: None,
            direction: None,
            repeat_count: None,
            reverses: None,
            delay_time: None,
        }
    }

    pub fn time(mut self, seconds: f32) -> Self {
        self.time = Some(seconds);
        self
    }

    pub fn style(mut self, style: EasingStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn direction(mut self, direction: EasingDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn easing(self, easing: Easing) -> Self {
        self.style(easing.style).direction(easing.direction)
    }

    pub fn repeat_count(mut self, repeat: Repeat) -> Self {
        self.repeat_count = Some(repeat);
        self
    }

    pub fn reverses(mut self, reverses: bool) -> Self {
        self.reverses = Some(reverses);
        self
    }

    pub fn delay_time(mut self, seconds: f32) -> Self {
        self.delay_time = Some(seconds);
        self
    }

    pub fn merged_over(&self, base: &TweenOptions) -> TweenOptions {
        TweenOptions {
            time: self.time.or(base.time),
            style: self.style.or(base.style),
            direction: self.direction.or(base.direction),
            repeat_count: self.repeat_count.or(base.repeat_count),
            reverses: self.reverses.or(base.reverses),
            delay_time: self.delay_time.or(base.delay_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_match_table() {
        assert_eq!(SpringPreset::Default.options().tension, Some(170.0));
        assert_eq!(SpringPreset::Default.options().friction, Some(26.0));
        assert_eq!(SpringPreset::Molasses.friction(), 120.0);
        assert_eq!(SpringPreset::Gentle.tension(), 120.0);
    }

    #[test]
    fn test_caller_fields_override_preset() {
        let merged = SpringOptions::new()
            .friction(40.0)
            .mass(3.0)
            .merged_over(&SpringPreset::Stiff.options());
        assert_eq!(merged.friction, Some(40.0));
        assert_eq!(merged.tension, Some(210.0));
        assert_eq!(merged.mass, Some(3.0));
    }

    #[test]
    fn test_frequency_form_does_not_inherit_tension() {
        let merged = SpringOptions::new()
            .frequency(10.0)
            .damping(0.5)
            .merged_over(&SpringPreset::Default.options());
        assert_eq!(merged.tension, None);
        assert_eq!(merged.friction, None);
        assert_eq!(merged.frequency, Some(10.0));
    }

    #[test]
    fn test_empty_options_inherit_everything() {
        let merged = SpringOptions::new().merged_over(&SpringPreset::Wobbly.options());
        assert_eq!(merged, SpringPreset::Wobbly.options());

        let tween = TweenOptions::new().time(2.0).merged_over(&TweenOptions::DEFAULT);
        assert_eq!(tween.time, Some(2.0));
        assert_eq!(tween.style, Some(EasingStyle::Quad));
        assert_eq!(tween.repeat_count, Some(Repeat::Count(0)));

        let linear = LinearOptions::new().merged_over(&LinearOptions::DEFAULT);
        assert_eq!(linear.speed, Some(1.0));
    }
}
