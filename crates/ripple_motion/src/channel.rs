//! Channels
//!
//! A channel is one scalar degree of freedom of an animated value. Each
//! channel carries its own [`ChannelState`], which solvers mutate in place.

use std::fmt;

/// Cleanup action attached to a channel
///
/// Runs when the channel's solver is replaced or the motion is destroyed.
pub type Teardown = Box<dyn FnOnce()>;

/// Identifies one scalar leaf of a goal
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ChannelKey {
    /// The single channel of a plain number
    Value,
    /// A position in a sequence
    Index(usize),
    /// A key in a mapping
    Key(String),
    /// A named component of a structured container
    Component(&'static str),
}

impl ChannelKey {
    pub fn key(name: impl Into<String>) -> Self {
        ChannelKey::Key(name.into())
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKey::Value => write!(f, "value"),
            ChannelKey::Index(index) => write!(f, "[{index}]"),
            ChannelKey::Key(key) => write!(f, "\"{key}\""),
            ChannelKey::Component(name) => write!(f, ".{name}"),
        }
    }
}

impl From<usize> for ChannelKey {
    fn from(index: usize) -> Self {
        ChannelKey::Index(index)
    }
}

impl From<&str> for ChannelKey {
    fn from(key: &str) -> Self {
        ChannelKey::Key(key.to_owned())
    }
}

impl From<String> for ChannelKey {
    fn from(key: String) -> Self {
        ChannelKey::Key(key)
    }
}

/// Mutable per-channel state
pub struct ChannelState {
    pub value: f32,
    /// Only meaningful for models that track it
    pub velocity: Option<f32>,
    pub complete: bool,
    pub teardown: Option<Teardown>,
}

impl ChannelState {
    /// A settled channel at `value`
    pub fn at_rest(value: f32) -> Self {
        Self {
            value,
            velocity: Some(0.0),
            complete: true,
            teardown: None,
        }
    }

    /// Velocity, reading an untracked velocity as zero
    pub fn velocity_or_zero(&self) -> f32 {
        self.velocity.unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            value: self.value,
            velocity: self.velocity,
            complete: self.complete,
        }
    }
}

impl fmt::Debug for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelState")
            .field("value", &self.value)
            .field("velocity", &self.velocity)
            .field("complete", &self.complete)
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// Read-only copy of a channel's numeric state
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSnapshot {
    pub value: f32,
    pub velocity: Option<f32>,
    pub complete: bool,
}

/// Raw field overrides for [`Motion::patch`](crate::Motion::patch)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelPatch {
    pub value: Option<f32>,
    pub velocity: Option<f32>,
    pub complete: Option<bool>,
}

impl ChannelPatch {
    pub fn value(mut self, value: f32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = Some(complete);
        self
    }

    pub(crate) fn apply(&self, state: &mut ChannelState) {
        if let Some(value) = self.value {
            state.value = value;
        }
        if let Some(velocity) = self.velocity {
            state.velocity = Some(velocity);
        }
        if let Some(complete) = self.complete {
            state.complete = complete;
        }
    }
}

impl From<ChannelSnapshot> for ChannelPatch {
    fn from(snapshot: ChannelSnapshot) -> Self {
        Self {
            value: Some(snapshot.value),
            velocity: snapshot.velocity,
            complete: Some(snapshot.complete),
        }
    }
}
