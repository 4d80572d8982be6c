//! Motion error types

use crate::channel::ChannelKey;
use thiserror::Error;

/// Errors raised by goal decomposition, solver configuration, and disposed
/// motions
///
/// All of these are caller mistakes: they are reported before any channel
/// state is touched and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A solver option is out of range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A partial goal named a channel the motion does not have
    #[error("Unknown channel: {0}")]
    InvalidChannel(ChannelKey),

    /// A goal's structure does not match the motion's value
    #[error("Goal shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// The motion was destroyed
    #[error("Motion has been destroyed")]
    Disposed,
}

impl MotionError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        MotionError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        MotionError::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
