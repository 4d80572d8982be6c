//! Easing curves for tweens
//!
//! A curve is a style (the shape) combined with a direction. Every style is
//! defined once as its "in" curve; `Out` and `InOut` are derived by
//! reflection, so all directions agree on the endpoints.

use std::f32::consts::PI;

/// Curve shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EasingStyle {
    Linear,
    Sine,
    #[default]
    Quad,
    Cubic,
    Quart,
    Quint,
    Exponential,
    Circular,
    Back,
    Elastic,
    Bounce,
}

/// Which end of the curve is eased
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EasingDirection {
    In,
    #[default]
    Out,
    InOut,
}

/// A complete easing curve (style × direction)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Easing {
    pub style: EasingStyle,
    pub direction: EasingDirection,
}

impl Easing {
    pub const LINEAR: Easing = Easing::new(EasingStyle::Linear, EasingDirection::In);

    pub const fn new(style: EasingStyle, direction: EasingDirection) -> Self {
        Self { style, direction }
    }

    /// Map progress (clamped to 0.0..=1.0) to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.direction {
            EasingDirection::In => ease_in(self.style, t),
            EasingDirection::Out => 1.0 - ease_in(self.style, 1.0 - t),
            EasingDirection::InOut => {
                if t < 0.5 {
                    ease_in(self.style, 2.0 * t) / 2.0
                } else {
                    1.0 - ease_in(self.style, 2.0 - 2.0 * t) / 2.0
                }
            }
        }
    }
}

fn ease_in(style: EasingStyle, t: f32) -> f32 {
    match style {
        EasingStyle::Linear => t,
        EasingStyle::Sine => 1.0 - (t * PI / 2.0).cos(),
        EasingStyle::Quad => t * t,
        EasingStyle::Cubic => t * t * t,
        EasingStyle::Quart => t * t * t * t,
        EasingStyle::Quint => t * t * t * t * t,
        EasingStyle::Exponential => {
            if t <= 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * t - 10.0)
            }
        }
        EasingStyle::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        EasingStyle::Back => {
            const C1: f32 = 1.70158;
            const C3: f32 = C1 + 1.0;
            C3 * t * t * t - C1 * t * t
        }
        EasingStyle::Elastic => {
            if t <= 0.0 {
                0.0
            } else if t >= 1.0 {
                1.0
            } else {
                let c4 = (2.0 * PI) / 3.0;
                -(2f32.powf(10.0 * t - 10.0)) * ((10.0 * t - 10.75) * c4).sin()
            }
        }
        EasingStyle::Bounce => 1.0 - bounce_out(1.0 - t),
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}
