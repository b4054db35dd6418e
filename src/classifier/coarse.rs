// src/classifier/coarse.rs - Low-confidence fallback for shapes the cascade misses
use super::{ClassificationResult, Label, Stage};
use crate::fingers::HandPose;
use crate::geometry::Pointing;

const DIGIT_CONFIDENCE: f64 = 0.6;

/// Pattern-only classifier. Every confidence it returns stays below the
/// default cascade preference so a real cascade match always wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoarseClassifier;

impl CoarseClassifier {
    pub fn classify(&self, pose: &HandPose) -> ClassificationResult {
        let m = &pose.metrics;
        let hit = |label, confidence| ClassificationResult::new(label, confidence, Stage::Coarse);

        match pose.extended() {
            [true, false, false, false, false] => match m.thumb_direction {
                Pointing::Up => hit(Label::ThumbsUp, 0.7),
                Pointing::Down => hit(Label::ThumbsDown, 0.65),
                _ => ClassificationResult::unknown(),
            },
            [false, true, true, false, false] => hit(Label::PeaceV, 0.7),
            [false, true, false, false, true] => hit(Label::RockOn, 0.7),
            [true, true, false, false, true] => hit(Label::ILoveYou, 0.7),
            _ if m.hand_direction == Pointing::Up => {
                match Label::digit(pose.fingers.extended_count()) {
                    Some(digit) => hit(digit, DIGIT_CONFIDENCE),
                    None => ClassificationResult::unknown(),
                }
            }
            _ => ClassificationResult::unknown(),
        }
    }
}
