// src/fingers.rs - Finger State Evaluator
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::FingerThresholds;
use crate::error::SignResult;
use crate::geometry::{angle, distance, planar_angle_between, pointing, Pointing};
use crate::landmarks::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Joint chain for the four uniform fingers; the thumb has none.
    pub fn joints(&self) -> Option<FingerJoints> {
        match self {
            Self::Thumb => None,
            Self::Index => Some(FingerJoints::INDEX),
            Self::Middle => Some(FingerJoints::MIDDLE),
            Self::Ring => Some(FingerJoints::RING),
            Self::Pinky => Some(FingerJoints::PINKY),
        }
    }
}

/// Per-frame pose of one digit.
///
/// Both flags use strict comparisons against the joint threshold, so a joint
/// sitting exactly on it makes the finger neither extended nor curled. The
/// two are never true together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerState {
    pub extended: bool,
    pub curled: bool,
}

/// Refined thumb state. Collapses to extended/curled for the generic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThumbPosition {
    Extended,
    AtSide,
    AcrossPalm,
}

impl ThumbPosition {
    pub fn as_finger_state(&self) -> FingerState {
        let extended = *self == ThumbPosition::Extended;
        FingerState {
            extended,
            curled: !extended,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerStates {
    pub thumb: FingerState,
    pub index: FingerState,
    pub middle: FingerState,
    pub ring: FingerState,
    pub pinky: FingerState,
}

impl FingerStates {
    pub fn get(&self, finger: Finger) -> FingerState {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    /// Extended flags in thumb, index, middle, ring, pinky order.
    pub fn extended(&self) -> [bool; 5] {
        [
            self.thumb.extended,
            self.index.extended,
            self.middle.extended,
            self.ring.extended,
            self.pinky.extended,
        ]
    }

    pub fn extended_count(&self) -> usize {
        self.extended().iter().filter(|e| **e).count()
    }

    /// True when the four non-thumb fingers are all explicitly curled.
    pub fn is_fist(&self) -> bool {
        self.index.curled && self.middle.curled && self.ring.curled && self.pinky.curled
    }
}

/// Measurements the classifier refines finger states with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandMetrics {
    pub thumb_index_tip: f64,
    pub thumb_middle_tip: f64,
    pub thumb_index_pip: f64,
    pub thumb_middle_pip: f64,
    pub index_middle_tip: f64,
    /// Mean distance between neighbouring fingertips, index to pinky.
    pub mean_fingertip_gap: f64,
    /// Image-plane angle between the thumb and index directions (degrees).
    pub thumb_index_angle: f64,
    /// Index and middle tips swapped sides relative to their knuckles.
    pub index_middle_crossed: bool,
    pub index_direction: Pointing,
    pub thumb_direction: Pointing,
    /// Wrist to middle MCP: which way the whole hand points.
    pub hand_direction: Pointing,
    /// How far the index PIP sits above the index MCP (positive = higher).
    pub index_pip_raise: f64,
    /// Tip-to-wrist over mcp-to-wrist for index, middle, ring, pinky.
    pub tip_reach: [f64; 4],
    /// Thumb tip sits deeper than the index PIP, i.e. under the fingers.
    pub thumb_tucked: bool,
    /// Thumb tip projected onto the index-to-pinky knuckle line.
    pub thumb_palm_position: f64,
}

/// Everything the classifier needs from one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    pub fingers: FingerStates,
    pub thumb: ThumbPosition,
    pub metrics: HandMetrics,
    landmarks: HandLandmarks,
}

impl HandPose {
    pub fn landmarks(&self) -> &HandLandmarks {
        &self.landmarks
    }

    pub fn extended(&self) -> [bool; 5] {
        self.fingers.extended()
    }
}

fn joint_angles(hand: &HandLandmarks, joints: FingerJoints) -> SignResult<(f64, f64)> {
    let mcp = hand.get(joints.mcp)?;
    let pip = hand.get(joints.pip)?;
    let dip = hand.get(joints.dip)?;
    let tip = hand.get(joints.tip)?;
    Ok((angle(mcp, pip, dip), angle(pip, dip, tip)))
}

/// Straight at both PIP and DIP, and reaching further from the wrist than the knuckle.
pub fn is_finger_extended(
    hand: &HandLandmarks,
    joints: FingerJoints,
    thresholds: &FingerThresholds,
) -> SignResult<bool> {
    let (pip_angle, dip_angle) = joint_angles(hand, joints)?;
    let straight = pip_angle > thresholds.straight_joint_angle_deg
        && dip_angle > thresholds.straight_joint_angle_deg;

    let wrist = hand.wrist();
    let tip_reach = distance(hand.get(joints.tip)?, wrist);
    let mcp_reach = distance(hand.get(joints.mcp)?, wrist);

    Ok(straight && tip_reach >= thresholds.extension_ratio * mcp_reach)
}

/// Bent at either the PIP or the DIP.
pub fn is_finger_curled(
    hand: &HandLandmarks,
    joints: FingerJoints,
    thresholds: &FingerThresholds,
) -> SignResult<bool> {
    let (pip_angle, dip_angle) = joint_angles(hand, joints)?;
    Ok(pip_angle < thresholds.straight_joint_angle_deg
        || dip_angle < thresholds.straight_joint_angle_deg)
}

pub fn finger_state(
    hand: &HandLandmarks,
    joints: FingerJoints,
    thresholds: &FingerThresholds,
) -> SignResult<FingerState> {
    Ok(FingerState {
        extended: is_finger_extended(hand, joints, thresholds)?,
        curled: is_finger_curled(hand, joints, thresholds)?,
    })
}

pub fn is_thumb_extended(hand: &HandLandmarks, thresholds: &FingerThresholds) -> bool {
    let index_mcp = hand.point(INDEX_MCP);
    let tip_to_index = distance(hand.point(THUMB_TIP), index_mcp);
    let base_to_index = distance(hand.point(THUMB_CMC), index_mcp);
    tip_to_index > base_to_index * thresholds.thumb_extension_ratio
}

pub fn is_thumb_across_palm(hand: &HandLandmarks, thresholds: &FingerThresholds) -> bool {
    let tip = hand.point(THUMB_TIP);
    let to_pinky = distance(tip, hand.point(PINKY_MCP));
    let to_index = distance(tip, hand.point(INDEX_MCP));
    to_pinky < to_index * thresholds.thumb_across_ratio
}

pub fn thumb_position(hand: &HandLandmarks, thresholds: &FingerThresholds) -> ThumbPosition {
    if is_thumb_extended(hand, thresholds) {
        ThumbPosition::Extended
    } else if is_thumb_across_palm(hand, thresholds) {
        ThumbPosition::AcrossPalm
    } else {
        ThumbPosition::AtSide
    }
}

fn thumb_palm_position(hand: &HandLandmarks) -> f64 {
    let index_mcp = hand.point(INDEX_MCP);
    let axis = hand.point(PINKY_MCP) - index_mcp;
    let axis = Vector3::new(axis.x, axis.y, 0.0);
    let length_sq = axis.norm_squared();
    if length_sq < 1e-12 {
        return 0.0;
    }
    let rel = hand.point(THUMB_TIP) - index_mcp;
    Vector3::new(rel.x, rel.y, 0.0).dot(&axis) / length_sq
}

fn measure(hand: &HandLandmarks) -> HandMetrics {
    let p = |i: usize| hand.point(i);
    let wrist = hand.wrist();

    let tips = [p(INDEX_TIP), p(MIDDLE_TIP), p(RING_TIP), p(PINKY_TIP)];
    let mean_fingertip_gap = tips.windows(2).map(|w| distance(w[0], w[1])).sum::<f64>() / 3.0;

    let reach = |joints: FingerJoints| {
        let mcp_reach = distance(p(joints.mcp), wrist);
        if mcp_reach < 1e-12 {
            0.0
        } else {
            distance(p(joints.tip), wrist) / mcp_reach
        }
    };

    HandMetrics {
        thumb_index_tip: distance(p(THUMB_TIP), p(INDEX_TIP)),
        thumb_middle_tip: distance(p(THUMB_TIP), p(MIDDLE_TIP)),
        thumb_index_pip: distance(p(THUMB_TIP), p(INDEX_PIP)),
        thumb_middle_pip: distance(p(THUMB_TIP), p(MIDDLE_PIP)),
        index_middle_tip: distance(p(INDEX_TIP), p(MIDDLE_TIP)),
        mean_fingertip_gap,
        thumb_index_angle: planar_angle_between(
            &(p(THUMB_TIP) - p(THUMB_MCP)),
            &(p(INDEX_TIP) - p(INDEX_MCP)),
        ),
        index_middle_crossed: (p(INDEX_TIP).x - p(MIDDLE_TIP).x)
            * (p(INDEX_MCP).x - p(MIDDLE_MCP).x)
            < 0.0,
        index_direction: pointing(p(INDEX_MCP), p(INDEX_TIP)),
        thumb_direction: pointing(p(THUMB_MCP), p(THUMB_TIP)),
        hand_direction: pointing(wrist, p(MIDDLE_MCP)),
        index_pip_raise: p(INDEX_MCP).y - p(INDEX_PIP).y,
        tip_reach: [
            reach(FingerJoints::INDEX),
            reach(FingerJoints::MIDDLE),
            reach(FingerJoints::RING),
            reach(FingerJoints::PINKY),
        ],
        thumb_tucked: p(THUMB_TIP).z > p(INDEX_PIP).z,
        thumb_palm_position: thumb_palm_position(hand),
    }
}

/// Converts a validated frame into finger states and refinement metrics.
#[derive(Debug, Clone, Default)]
pub struct FingerEvaluator {
    thresholds: FingerThresholds,
}

impl FingerEvaluator {
    pub fn new(thresholds: FingerThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FingerThresholds {
        &self.thresholds
    }

    pub fn evaluate(&self, hand: &HandLandmarks) -> SignResult<HandPose> {
        let thumb = thumb_position(hand, &self.thresholds);
        let fingers = FingerStates {
            thumb: thumb.as_finger_state(),
            index: finger_state(hand, FingerJoints::INDEX, &self.thresholds)?,
            middle: finger_state(hand, FingerJoints::MIDDLE, &self.thresholds)?,
            ring: finger_state(hand, FingerJoints::RING, &self.thresholds)?,
            pinky: finger_state(hand, FingerJoints::PINKY, &self.thresholds)?,
        };

        Ok(HandPose {
            fingers,
            thumb,
            metrics: measure(hand),
            landmarks: hand.clone(),
        })
    }

    /// Validate raw points and evaluate them in one step.
    pub fn evaluate_points(&self, points: &[Vector3<f64>]) -> SignResult<HandPose> {
        self.evaluate(&HandLandmarks::new(points)?)
    }
}
