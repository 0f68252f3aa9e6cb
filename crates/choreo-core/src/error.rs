//! Error type for section composition.
//!
//! Every variant is a configuration mistake in how a page section was put
//! together. They surface synchronously from the call that received the bad
//! configuration; transient DOM conditions are never reported through here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChoreoError {
    #[error("degenerate window: end ({end}) must be greater than start ({start})")]
    DegenerateWindow { start: f64, end: f64 },

    #[error("region `{region}` has zero or negative scroll duration ({start}..{end})")]
    ZeroDuration { region: String, start: f64, end: f64 },

    #[error("active index reducer for `{region}` needs at least one item")]
    EmptyIndex { region: String },

    #[error("keyframes must be sorted by progress (key {index} at {at} follows {prev})")]
    UnsortedKeyframes { index: usize, at: f64, prev: f64 },

    #[error("property {property} cannot take a {found} value")]
    MixedValueKinds {
        property: &'static str,
        found: &'static str,
    },

    #[error("invalid trigger `{input}`: {reason}")]
    InvalidTrigger { input: String, reason: &'static str },

    #[error("unknown ease `{0}`")]
    UnknownEase(String),

    #[error("invalid colour `{0}`")]
    InvalidColor(String),

    #[error("child {index} out of range for a section with {count} children")]
    ChildOutOfRange { index: usize, count: usize },

    #[error("unknown section preset `{0}`")]
    UnknownPreset(String),

    #[error("runtime defaults already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, ChoreoError>;

impl ChoreoError {
    pub fn invalid_trigger(input: &str, reason: &'static str) -> Self {
        Self::InvalidTrigger {
            input: input.to_string(),
            reason,
        }
    }
}
