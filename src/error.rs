// src/error.rs
use thiserror::Error;

use crate::landmarks::LANDMARK_COUNT;

/// Errors raised by the recognizer pipeline.
///
/// An unmatched pose and a short history are not errors: they surface as
/// `Label::Unknown` and `None` respectively.
#[derive(Error, Debug)]
pub enum SignError {
    #[error("Invalid input: expected {expected} landmarks, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("Invalid input: landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    #[error("Invalid input: landmark index {index} is outside 0..{}", LANDMARK_COUNT)]
    LandmarkIndexOutOfRange { index: usize },

    #[error("Unsupported sign: {0}")]
    UnsupportedSign(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Corpus record {record}: {message}")]
    Corpus { record: u64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SignError {
    /// True for malformed-frame errors, as opposed to config or IO failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::NonFiniteLandmark { .. }
                | Self::LandmarkIndexOutOfRange { .. }
        )
    }
}

pub type SignResult<T> = Result<T, SignError>;
