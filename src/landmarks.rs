// src/landmarks.rs - Validated 21-point hand skeleton
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{SignError, SignResult};

pub const LANDMARK_COUNT: usize = 21;

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Wire form of one landmark, as emitted by the upstream detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Landmark> for Vector3<f64> {
    fn from(lm: Landmark) -> Self {
        Vector3::new(lm.x, lm.y, lm.z)
    }
}

impl From<Vector3<f64>> for Landmark {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Joint indices of one non-thumb finger, base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerJoints {
    pub mcp: usize,
    pub pip: usize,
    pub dip: usize,
    pub tip: usize,
}

impl FingerJoints {
    pub const INDEX: Self = Self { mcp: INDEX_MCP, pip: INDEX_PIP, dip: INDEX_DIP, tip: INDEX_TIP };
    pub const MIDDLE: Self = Self { mcp: MIDDLE_MCP, pip: MIDDLE_PIP, dip: MIDDLE_DIP, tip: MIDDLE_TIP };
    pub const RING: Self = Self { mcp: RING_MCP, pip: RING_PIP, dip: RING_DIP, tip: RING_TIP };
    pub const PINKY: Self = Self { mcp: PINKY_MCP, pip: PINKY_PIP, dip: PINKY_DIP, tip: PINKY_TIP };
}

/// One hand frame: exactly 21 finite landmarks in anatomical order.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Vector3<f64>; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Validate and copy a detector frame. Wrong lengths are rejected, never
    /// truncated or padded.
    pub fn new(points: &[Vector3<f64>]) -> SignResult<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(SignError::InvalidInput {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        let mut validated = [Vector3::zeros(); LANDMARK_COUNT];
        for (i, p) in points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(SignError::NonFiniteLandmark { index: i });
            }
            validated[i] = *p;
        }

        Ok(Self { points: validated })
    }

    pub fn from_points(points: &[[f64; 3]]) -> SignResult<Self> {
        let vectors: Vec<Vector3<f64>> = points
            .iter()
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        Self::new(&vectors)
    }

    pub fn from_landmarks(landmarks: &[Landmark]) -> SignResult<Self> {
        let vectors: Vec<Vector3<f64>> = landmarks.iter().map(|&lm| lm.into()).collect();
        Self::new(&vectors)
    }

    /// Checked access for caller-supplied indices.
    pub fn get(&self, index: usize) -> SignResult<&Vector3<f64>> {
        self.points
            .get(index)
            .ok_or(SignError::LandmarkIndexOutOfRange { index })
    }

    /// Access by one of the named index constants. Panics past
    /// `LANDMARK_COUNT`, so callers outside the crate go through `get`.
    pub(crate) fn point(&self, index: usize) -> &Vector3<f64> {
        &self.points[index]
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn wrist(&self) -> &Vector3<f64> {
        &self.points[WRIST]
    }
}
