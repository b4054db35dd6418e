// src/recognizer.rs - One stream's frame-by-frame recognition pipeline
use nalgebra::Vector3;
use serde::Serialize;
use tracing::debug;

use crate::classifier::{ClassificationResult, SignClassifier};
use crate::config::RecognizerConfig;
use crate::error::SignResult;
use crate::geometry::motion_level;
use crate::landmarks::HandLandmarks;
use crate::stabilizer::{GestureEvent, StabilizedGesture, TemporalStabilizer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub frame: u64,
    pub classification: ClassificationResult,
    pub stable: Option<StabilizedGesture>,
    pub event: Option<GestureEvent>,
    /// Movement since the previous accepted frame, 0 (still) to 1.
    pub motion_level: f64,
}

/// Landmarks in, debounced gestures out. Everything is built in `new`, so
/// the first frame runs against a ready rule table.
pub struct SignRecognizer {
    config: RecognizerConfig,
    classifier: SignClassifier,
    stabilizer: TemporalStabilizer,
    previous: Option<HandLandmarks>,
    frame_counter: u64,
}

impl SignRecognizer {
    pub fn new(config: RecognizerConfig) -> SignResult<Self> {
        let classifier = SignClassifier::new(&config)?;
        let stabilizer = TemporalStabilizer::new(&config.stabilizer)?;
        Ok(Self {
            config,
            classifier,
            stabilizer,
            previous: None,
            frame_counter: 0,
        })
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SignClassifier {
        &self.classifier
    }

    pub fn stabilizer(&self) -> &TemporalStabilizer {
        &self.stabilizer
    }

    /// Run one frame. A malformed frame is rejected before it reaches the
    /// history, so it neither counts toward nor breaks a stable run.
    pub fn process(&mut self, points: &[Vector3<f64>]) -> SignResult<FrameOutcome> {
        let hand = HandLandmarks::new(points)?;
        self.process_hand(hand)
    }

    pub fn process_points(&mut self, points: &[[f64; 3]]) -> SignResult<FrameOutcome> {
        let hand = HandLandmarks::from_points(points)?;
        self.process_hand(hand)
    }

    pub fn process_hand(&mut self, hand: HandLandmarks) -> SignResult<FrameOutcome> {
        let classification = self.classifier.classify(&hand)?;

        let motion = self
            .previous
            .as_ref()
            .map(|prev| motion_level(hand.points(), prev.points()))
            .unwrap_or(0.0);

        let event = self.stabilizer.update(classification.clone());
        let stable = self.stabilizer.detect_stable_gesture();

        self.frame_counter += 1;
        self.previous = Some(hand);

        debug!(
            frame = self.frame_counter,
            label = %classification.label,
            confidence = classification.confidence,
            stage = %classification.stage,
            motion,
            "Frame classified"
        );

        Ok(FrameOutcome {
            frame: self.frame_counter,
            classification,
            stable,
            event,
            motion_level: motion,
        })
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_counter
    }

    /// Start a new session: history, motion baseline and frame count.
    pub fn reset(&mut self) {
        self.stabilizer.clear();
        self.previous = None;
        self.frame_counter = 0;
    }
}
