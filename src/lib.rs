//! Static sign-language recognition from 21-point hand landmarks.
//!
//! A frame of landmarks is reduced to per-finger states, matched against an
//! ordered rule table with a coarse fallback, and the per-frame labels are
//! debounced into stable gestures.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fingers;
pub mod geometry;
pub mod landmarks;
pub mod recognizer;
pub mod stabilizer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classifier::{ClassificationResult, Label, SignClassifier, Stage};
pub use config::RecognizerConfig;
pub use error::{SignError, SignResult};
pub use landmarks::{HandLandmarks, Landmark};
pub use recognizer::{FrameOutcome, SignRecognizer};
pub use stabilizer::{GestureEvent, StabilizedGesture, TemporalStabilizer};
