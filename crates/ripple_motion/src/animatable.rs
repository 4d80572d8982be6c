//! Typed goals
//!
//! [`MotionGoal`] connects a Rust value type to the dynamic [`Goal`] form, so
//! a `Motion<Vec2>` hands out `Vec2`s while the engine works on channels.

use crate::goal::{Field, Goal};
use crate::structured::Structured;
use std::collections::BTreeMap;

/// A value type a [`Motion`](crate::Motion) can animate
pub trait MotionGoal: Clone + 'static {
    /// What the partial-goal methods accept: the same structure with only
    /// some channels present
    type Partial;

    fn to_goal(&self) -> Goal;

    fn partial_to_goal(partial: Self::Partial) -> Goal;

    /// Rebuild a value from a recomposed goal
    ///
    /// `template` is the motion's initial value; it fills anything the goal
    /// does not carry.
    fn from_goal(goal: Goal, template: &Self) -> Self;
}

impl MotionGoal for f32 {
    type Partial = f32;

    fn to_goal(&self) -> Goal {
        Goal::Scalar(*self)
    }

    fn partial_to_goal(partial: f32) -> Goal {
        Goal::Scalar(partial)
    }

    fn from_goal(goal: Goal, template: &Self) -> Self {
        match goal {
            Goal::Scalar(value) => value,
            _ => *template,
        }
    }
}

impl MotionGoal for Vec<f32> {
    type Partial = Vec<Option<f32>>;

    fn to_goal(&self) -> Goal {
        Goal::sequence(self.iter().copied())
    }

    fn partial_to_goal(partial: Vec<Option<f32>>) -> Goal {
        Goal::Sequence(partial.into_iter().map(Field::from).collect())
    }

    fn from_goal(goal: Goal, template: &Self) -> Self {
        match goal {
            Goal::Sequence(fields) => fields
                .iter()
                .zip(template)
                .map(|(field, fallback)| field.as_number().unwrap_or(*fallback))
                .collect(),
            _ => template.clone(),
        }
    }
}

impl<const N: usize> MotionGoal for [f32; N] {
    type Partial = [Option<f32>; N];

    fn to_goal(&self) -> Goal {
        Goal::sequence(self.iter().copied())
    }

    fn partial_to_goal(partial: [Option<f32>; N]) -> Goal {
        Goal::Sequence(partial.into_iter().map(Field::from).collect())
    }

    fn from_goal(goal: Goal, template: &Self) -> Self {
        let mut out = *template;
        if let Goal::Sequence(fields) = goal {
            for (slot, field) in out.iter_mut().zip(&fields) {
                if let Some(value) = field.as_number() {
                    *slot = value;
                }
            }
        }
        out
    }
}

impl MotionGoal for BTreeMap<String, f32> {
    /// Any subset of the keys
    type Partial = BTreeMap<String, f32>;

    fn to_goal(&self) -> Goal {
        Goal::mapping(self.iter().map(|(key, value)| (key.clone(), *value)))
    }

    fn partial_to_goal(partial: BTreeMap<String, f32>) -> Goal {
        Goal::mapping(partial)
    }

    fn from_goal(goal: Goal, template: &Self) -> Self {
        match goal {
            Goal::Mapping(entries) => entries
                .into_iter()
                .filter_map(|(key, field)| field.as_number().map(|value| (key, value)))
                .collect(),
            _ => template.clone(),
        }
    }
}

impl MotionGoal for Goal {
    type Partial = Goal;

    fn to_goal(&self) -> Goal {
        self.clone()
    }

    fn partial_to_goal(partial: Goal) -> Goal {
        partial
    }

    fn from_goal(goal: Goal, _template: &Self) -> Self {
        goal
    }
}

impl<T: Structured> MotionGoal for T {
    /// A full value; use a `Motion<Goal>` with a component mapping to
    /// address single components
    type Partial = T;

    fn to_goal(&self) -> Goal {
        Goal::Container(self.to_container())
    }

    fn partial_to_goal(partial: T) -> Goal {
        partial.to_goal()
    }

    fn from_goal(goal: Goal, template: &Self) -> Self {
        match goal {
            Goal::Container(container) if container.kind() == T::KIND => {
                T::construct(container.components())
            }
            _ => *template,
        }
    }
}
