// src/classifier/mod.rs - Letter/gesture classification
mod cascade;
mod coarse;
mod label;

pub use cascade::{default_rules, Predicate, Rule, RuleCascade};
pub use coarse::CoarseClassifier;
pub use label::{Label, MOTION_LETTERS};

use nalgebra::Vector3;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::config::RecognizerConfig;
use crate::error::SignResult;
use crate::fingers::{FingerEvaluator, HandPose};
use crate::landmarks::HandLandmarks;

/// Which part of the classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Named cascade rule.
    Cascade(&'static str),
    Coarse,
    NoMatch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Cascade(rule) => write!(f, "cascade:{}", rule),
            Stage::Coarse => write!(f, "coarse"),
            Stage::NoMatch => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Always within [0, 1]; zero for `Unknown`.
    pub confidence: f64,
    pub stage: Stage,
}

impl ClassificationResult {
    pub fn new(label: Label, confidence: f64, stage: Stage) -> Self {
        if label.is_unknown() {
            return Self::unknown();
        }
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
            stage,
        }
    }

    pub fn unknown() -> Self {
        Self {
            label: Label::Unknown,
            confidence: 0.0,
            stage: Stage::NoMatch,
        }
    }
}

/// Cascade with coarse fallback. Built once up front; classification is a
/// pure function of the frame.
#[derive(Debug, Clone)]
pub struct SignClassifier {
    evaluator: FingerEvaluator,
    cascade: RuleCascade,
    coarse: CoarseClassifier,
    cascade_preference: f64,
}

impl SignClassifier {
    pub fn new(config: &RecognizerConfig) -> SignResult<Self> {
        config.validate()?;
        let cascade = RuleCascade::new(config.classifier.clone());
        debug!(rules = cascade.rules().len(), "Classifier initialized");
        Ok(Self {
            evaluator: FingerEvaluator::new(config.fingers.clone()),
            cascade,
            coarse: CoarseClassifier,
            cascade_preference: config.classifier.cascade_preference,
        })
    }

    pub fn cascade(&self) -> &RuleCascade {
        &self.cascade
    }

    pub fn evaluate(&self, hand: &HandLandmarks) -> SignResult<HandPose> {
        self.evaluator.evaluate(hand)
    }

    pub fn classify(&self, hand: &HandLandmarks) -> SignResult<ClassificationResult> {
        let pose = self.evaluator.evaluate(hand)?;
        Ok(self.classify_pose(&pose))
    }

    pub fn classify_points(&self, points: &[Vector3<f64>]) -> SignResult<ClassificationResult> {
        self.classify(&HandLandmarks::new(points)?)
    }

    /// Confident cascade matches win; anything else defers to the coarse
    /// reading, `Unknown` included.
    pub fn classify_pose(&self, pose: &HandPose) -> ClassificationResult {
        let primary = self.cascade.classify(pose);
        if primary.confidence > self.cascade_preference {
            return primary;
        }

        let fallback = self.coarse.classify(pose);
        debug!(
            cascade = %primary.label,
            label = %fallback.label,
            "Coarse fallback"
        );
        fallback
    }
}
