// src/classifier/cascade.rs - Ordered letter/gesture rule table
//
// Rules are evaluated top-down and the first match wins, so order encodes
// priority between visually adjacent shapes (B before 4, R before U before V,
// T before E before M/N/S, and so on).
use tracing::debug;

use super::{ClassificationResult, Label, Stage};
use crate::config::ClassifierThresholds;
use crate::fingers::{HandPose, ThumbPosition};
use crate::geometry::Pointing;

pub type Predicate = fn(&HandPose, &ClassifierThresholds) -> bool;

/// One row of the cascade.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub label: Label,
    pub confidence: f64,
    predicate: Predicate,
}

impl Rule {
    pub fn new(name: &'static str, label: Label, confidence: f64, predicate: Predicate) -> Self {
        Self {
            name,
            label,
            confidence,
            predicate,
        }
    }

    pub fn matches(&self, pose: &HandPose, thresholds: &ClassifierThresholds) -> bool {
        (self.predicate)(pose, thresholds)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .finish()
    }
}

// Extended flags, thumb first.
const T: bool = true;
const F: bool = false;

fn pattern(pose: &HandPose) -> [bool; 5] {
    pose.extended()
}

// Positions within `four`.
const MIDDLE: usize = 1;

/// Index, middle, ring, pinky only.
fn four(pose: &HandPose) -> [bool; 4] {
    let [_, i, m, r, p] = pose.extended();
    [i, m, r, p]
}

fn thumb_folded(pose: &HandPose) -> bool {
    !pose.fingers.thumb.extended
}

fn fist(pose: &HandPose) -> bool {
    pose.fingers.is_fist()
}

/// Rounded rather than folded flat: not extended, tip still reaching out.
fn curved(pose: &HandPose, t: &ClassifierThresholds, finger: usize) -> bool {
    !four(pose)[finger] && pose.metrics.tip_reach[finger] >= t.curve_ratio
}

fn all_curved(pose: &HandPose, t: &ClassifierThresholds) -> bool {
    (0..4).all(|finger| curved(pose, t, finger))
}

fn two_up(pose: &HandPose) -> bool {
    four(pose) == [T, T, F, F] && pose.metrics.index_direction == Pointing::Up
}

fn index_up(pose: &HandPose) -> bool {
    four(pose) == [T, F, F, F] && pose.metrics.index_direction == Pointing::Up
}

fn rounded_hand(pose: &HandPose, t: &ClassifierThresholds) -> bool {
    four(pose) == [F; 4] && thumb_folded(pose) && all_curved(pose, t)
}

fn tucked_fist(pose: &HandPose) -> bool {
    fist(pose) && pose.thumb == ThumbPosition::AcrossPalm && pose.metrics.thumb_tucked
}

/// The full priority-ordered table.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("open_hand", Label::OpenHand, 0.95, |p, t| {
            pattern(p) == [T; 5] && p.metrics.mean_fingertip_gap >= t.spread_distance
        }),
        Rule::new("b", Label::B, 0.9, |p, t| {
            pattern(p) == [F, T, T, T, T] && p.metrics.mean_fingertip_gap < t.spread_distance
        }),
        Rule::new("four", Label::Four, 0.85, |p, t| {
            pattern(p) == [F, T, T, T, T] && p.metrics.mean_fingertip_gap >= t.spread_distance
        }),
        Rule::new("f", Label::F, 0.85, |p, t| {
            four(p) == [F, T, T, T] && p.metrics.thumb_index_tip < t.touch_distance
        }),
        Rule::new("w", Label::W, 0.8, |p, _| four(p) == [T, T, T, F] && thumb_folded(p)),
        Rule::new("three", Label::Three, 0.8, |p, _| pattern(p) == [T, T, T, F, F]),
        Rule::new("i_love_you", Label::ILoveYou, 0.9, |p, _| pattern(p) == [T, T, F, F, T]),
        Rule::new("rock_on", Label::RockOn, 0.85, |p, _| pattern(p) == [F, T, F, F, T]),
        Rule::new("y", Label::Y, 0.9, |p, _| pattern(p) == [T, F, F, F, T]),
        Rule::new("i", Label::I, 0.9, |p, _| pattern(p) == [F, F, F, F, T]),
        Rule::new("p", Label::P, 0.75, |p, _| {
            four(p) == [T, T, F, F] && p.metrics.index_direction == Pointing::Down
        }),
        Rule::new("h", Label::H, 0.8, |p, _| {
            four(p) == [T, T, F, F] && p.metrics.index_direction.is_sideways()
        }),
        Rule::new("r", Label::R, 0.85, |p, _| two_up(p) && p.metrics.index_middle_crossed),
        Rule::new("k", Label::K, 0.8, |p, t| {
            two_up(p) && p.metrics.thumb_middle_pip < t.touch_distance
        }),
        Rule::new("u", Label::U, 0.85, |p, t| {
            two_up(p) && thumb_folded(p) && p.metrics.index_middle_tip < t.spread_distance
        }),
        Rule::new("v", Label::V, 0.85, |p, t| {
            two_up(p) && thumb_folded(p) && p.metrics.index_middle_tip >= t.spread_distance
        }),
        Rule::new("l", Label::L, 0.9, |p, t| {
            pattern(p) == [T, T, F, F, F]
                && p.metrics.index_direction == Pointing::Up
                && (t.l_angle_min_deg..=t.l_angle_max_deg).contains(&p.metrics.thumb_index_angle)
        }),
        Rule::new("q", Label::Q, 0.75, |p, _| {
            four(p) == [T, F, F, F] && p.metrics.index_direction == Pointing::Down
        }),
        Rule::new("g", Label::G, 0.8, |p, _| {
            four(p) == [T, F, F, F] && p.metrics.index_direction.is_sideways()
        }),
        Rule::new("d", Label::D, 0.85, |p, t| {
            index_up(p) && p.metrics.thumb_middle_tip < t.touch_distance
        }),
        Rule::new("one", Label::One, 0.9, |p, _| {
            pattern(p) == [F, T, F, F, F] && p.metrics.index_direction == Pointing::Up
        }),
        Rule::new("thumbs_up", Label::ThumbsUp, 0.9, |p, _| {
            pattern(p) == [T, F, F, F, F] && p.metrics.thumb_direction == Pointing::Up
        }),
        Rule::new("thumbs_down", Label::ThumbsDown, 0.85, |p, _| {
            pattern(p) == [T, F, F, F, F] && p.metrics.thumb_direction == Pointing::Down
        }),
        Rule::new("o", Label::O, 0.85, |p, t| {
            rounded_hand(p, t) && p.metrics.thumb_index_tip < t.touch_distance
        }),
        Rule::new("c", Label::C, 0.8, |p, t| {
            rounded_hand(p, t)
                && (t.touch_distance..=t.c_gap_max).contains(&p.metrics.thumb_index_tip)
        }),
        Rule::new("x", Label::X, 0.8, |p, t| {
            fist(p)
                && thumb_folded(p)
                && p.metrics.index_pip_raise >= t.hook_raise
                // A rounded O-shaped hand raises the index PIP too.
                && !curved(p, t, MIDDLE)
        }),
        Rule::new("t", Label::T, 0.8, |p, t| {
            fist(p) && thumb_folded(p) && p.metrics.thumb_index_pip < t.touch_distance
        }),
        Rule::new("e", Label::E, 0.8, |p, t| {
            let resting = (p.metrics.thumb_index_tip + p.metrics.thumb_middle_tip) / 2.0;
            fist(p) && thumb_folded(p) && resting < t.touch_distance
        }),
        Rule::new("m", Label::M, 0.75, |p, t| {
            tucked_fist(p) && p.metrics.thumb_palm_position >= t.m_position_min
        }),
        Rule::new("n", Label::N, 0.75, |p, t| {
            tucked_fist(p)
                && (t.n_position_min..t.m_position_min).contains(&p.metrics.thumb_palm_position)
        }),
        Rule::new("s", Label::S, 0.85, |p, _| {
            fist(p) && p.thumb == ThumbPosition::AcrossPalm && !p.metrics.thumb_tucked
        }),
        Rule::new("a", Label::A, 0.85, |p, _| fist(p) && p.thumb == ThumbPosition::AtSide),
    ]
}

/// First-match-wins evaluation over the rule table.
#[derive(Debug, Clone)]
pub struct RuleCascade {
    rules: Vec<Rule>,
    thresholds: ClassifierThresholds,
}

impl RuleCascade {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self::with_rules(default_rules(), thresholds)
    }

    pub fn with_rules(rules: Vec<Rule>, thresholds: ClassifierThresholds) -> Self {
        Self { rules, thresholds }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, pose: &HandPose) -> ClassificationResult {
        match self.rules.iter().find(|rule| rule.matches(pose, &self.thresholds)) {
            Some(rule) => {
                debug!(rule = rule.name, label = %rule.label, "Cascade match");
                ClassificationResult::new(rule.label, rule.confidence, Stage::Cascade(rule.name))
            }
            None => ClassificationResult::unknown(),
        }
    }

    /// Every rule the pose satisfies, in priority order.
    pub fn matching_rules(&self, pose: &HandPose) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(pose, &self.thresholds))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerThresholds;
    use crate::fingers::FingerEvaluator;
    use crate::fixtures::{canonical, FingerPose, HandBuilder, THUMB_OUT};
    use std::collections::HashSet;

    fn cascade() -> RuleCascade {
        RuleCascade::new(ClassifierThresholds::default())
    }

    fn pose_for(label: Label) -> HandPose {
        let hand = canonical(label)
            .unwrap_or_else(|| panic!("no fixture for {}", label))
            .build();
        FingerEvaluator::new(FingerThresholds::default())
            .evaluate(&hand)
            .unwrap()
    }

    fn cascade_labels() -> Vec<Label> {
        default_rules().iter().map(|r| r.label).collect()
    }

    #[test]
    fn test_table_shape() {
        let rules = default_rules();
        assert_eq!(rules.len(), 32);
        let names: HashSet<_> = rules.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), rules.len(), "rule names must be unique");
        for rule in &rules {
            assert!(
                (0.75..=0.95).contains(&rule.confidence),
                "{} has confidence {}",
                rule.name,
                rule.confidence
            );
        }
        assert_eq!(rules[0].label, Label::OpenHand);
        assert_eq!(rules[31].label, Label::A);
    }

    #[test]
    fn test_each_rule_on_its_own_shape() {
        let cascade = cascade();
        for label in cascade_labels() {
            let result = cascade.classify(&pose_for(label));
            assert_eq!(result.label, label, "fixture for {} classified as {}", label, result.label);
            assert!(matches!(result.stage, Stage::Cascade(_)));
        }
    }

    #[test]
    fn test_adjacent_pairs_resolve() {
        // Each pair differs by one refinement; both sides must win on their own fixture.
        let pairs = [
            (Label::U, Label::V),
            (Label::R, Label::U),
            (Label::D, Label::One),
            (Label::G, Label::One),
            (Label::Q, Label::One),
            (Label::B, Label::Four),
            (Label::O, Label::C),
            (Label::A, Label::S),
            (Label::S, Label::E),
            (Label::M, Label::N),
            (Label::ThumbsUp, Label::A),
            (Label::K, Label::V),
            (Label::P, Label::V),
            (Label::L, Label::One),
            (Label::T, Label::E),
        ];
        let cascade = cascade();
        for (a, b) in pairs {
            assert_eq!(cascade.classify(&pose_for(a)).label, a, "{} vs {}", a, b);
            assert_eq!(cascade.classify(&pose_for(b)).label, b, "{} vs {}", b, a);
        }
    }

    #[test]
    fn test_priority_decides_overlaps() {
        // The K hand is also a V hand; K sits higher in the table.
        let pose = pose_for(Label::K);
        let matched: Vec<Label> = cascade().matching_rules(&pose).iter().map(|r| r.label).collect();
        assert!(!matched.is_empty());
        assert_eq!(matched[0], Label::K);
    }

    #[test]
    fn test_hook_versus_fist() {
        let cascade = cascade();
        let x = cascade.classify(&pose_for(Label::X));
        assert_eq!(x.label, Label::X);

        let plain_fist = HandBuilder::new().build();
        let pose = FingerEvaluator::default().evaluate(&plain_fist).unwrap();
        assert_eq!(cascade.classify(&pose).label, Label::A);
    }

    #[test]
    fn test_no_match_is_unknown() {
        let result = cascade().classify(&pose_for(Label::Unknown));
        assert_eq!(result.label, Label::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.stage, Stage::NoMatch);
    }

    #[test]
    fn test_unspread_three_fingers_fall_through() {
        let hand = HandBuilder::new()
            .fingers([
                FingerPose::Extended(-15.0),
                FingerPose::Extended(0.0),
                FingerPose::Extended(15.0),
                FingerPose::Curled,
            ])
            .thumb(THUMB_OUT)
            .build();
        let pose = FingerEvaluator::default().evaluate(&hand).unwrap();
        assert!(cascade().matching_rules(&pose).is_empty());
    }

    #[test]
    fn test_thresholds_shift_decisions() {
        // Widening the spread distance turns the V fixture into a U.
        let loose = RuleCascade::new(ClassifierThresholds {
            spread_distance: 0.5,
            ..ClassifierThresholds::default()
        });
        assert_eq!(loose.classify(&pose_for(Label::V)).label, Label::U);
    }
}
