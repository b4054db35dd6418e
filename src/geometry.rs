// src/geometry.rs - Pure 3D helpers over landmark points
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-9;

/// Euclidean distance between two points.
pub fn distance(p1: &Vector3<f64>, p2: &Vector3<f64>) -> f64 {
    (p1 - p2).norm()
}

/// Angle at vertex `p2` between the rays `p2 -> p1` and `p2 -> p3`, in degrees.
///
/// Returns a value in [0, 180]. A zero-length ray yields 0 so that a
/// collapsed joint never reads as straight.
pub fn angle(p1: &Vector3<f64>, p2: &Vector3<f64>, p3: &Vector3<f64>) -> f64 {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let mag1 = v1.norm();
    let mag2 = v2.norm();

    if mag1 < EPSILON || mag2 < EPSILON {
        return 0.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Angle between two direction vectors projected onto the image plane.
pub fn planar_angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let flat1 = Vector3::new(v1.x, v1.y, 0.0);
    let flat2 = Vector3::new(v2.x, v2.y, 0.0);
    angle(&flat1, &Vector3::zeros(), &flat2)
}

/// Coarse image-plane direction of a ray. Image y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pointing {
    Up,
    Down,
    Left,
    Right,
}

impl Pointing {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn is_sideways(&self) -> bool {
        !self.is_vertical()
    }
}

/// Direction of the ray `from -> to`; the dominant axis wins and ties go vertical.
pub fn pointing(from: &Vector3<f64>, to: &Vector3<f64>) -> Pointing {
    let delta = to - from;
    if delta.y.abs() >= delta.x.abs() {
        if delta.y < 0.0 {
            Pointing::Up
        } else {
            Pointing::Down
        }
    } else if delta.x < 0.0 {
        Pointing::Left
    } else {
        Pointing::Right
    }
}

/// Mean per-landmark displacement between two frames, scaled into [0, 1].
///
/// Compares up to the shorter of the two slices; an empty frame has no motion.
pub fn motion_level(current: &[Vector3<f64>], previous: &[Vector3<f64>]) -> f64 {
    let count = current.len().min(previous.len());
    if count == 0 {
        return 0.0;
    }

    let total: f64 = current
        .iter()
        .zip(previous.iter())
        .map(|(curr, prev)| distance(curr, prev))
        .sum();

    ((total / count as f64) * 10.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_3d() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 2.0, 2.0);
        assert!((distance(&a, &b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_straight_angle() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.5, 0.0, 0.0);
        let c = Vector3::new(1.0, 0.0, 0.0);
        assert!((angle(&a, &b, &c) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.5, 0.0, 0.0);
        let c = Vector3::new(0.5, 0.0, 0.5);
        assert!((angle(&a, &b, &c) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_overshoot_is_clamped() {
        // Nearly collinear points can push the cosine a hair past -1.
        let a = Vector3::new(0.1, 0.1, 0.1);
        let b = Vector3::new(0.2, 0.2, 0.2);
        let c = Vector3::new(0.3, 0.3, 0.3);
        let result = angle(&a, &b, &c);
        assert!(result.is_finite());
        assert!((result - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_angle_is_zero() {
        let a = Vector3::new(0.3, 0.3, 0.0);
        assert_eq!(angle(&a, &a, &Vector3::new(0.5, 0.5, 0.0)), 0.0);
    }

    #[test]
    fn test_pointing_axes() {
        let origin = Vector3::new(0.5, 0.5, 0.0);
        assert_eq!(pointing(&origin, &Vector3::new(0.5, 0.3, 0.0)), Pointing::Up);
        assert_eq!(pointing(&origin, &Vector3::new(0.5, 0.7, 0.0)), Pointing::Down);
        assert_eq!(pointing(&origin, &Vector3::new(0.3, 0.45, 0.0)), Pointing::Left);
        assert_eq!(pointing(&origin, &Vector3::new(0.7, 0.55, 0.0)), Pointing::Right);
        // Diagonal ties resolve to the vertical axis
        assert_eq!(pointing(&origin, &Vector3::new(0.75, 0.25, 0.0)), Pointing::Up);
    }

    #[test]
    fn test_planar_angle_ignores_depth() {
        let up = Vector3::new(0.0, -1.0, 0.7);
        let left = Vector3::new(-1.0, 0.0, -0.3);
        assert!((planar_angle_between(&up, &left) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_motion_level() {
        let still = vec![Vector3::new(0.5, 0.5, 0.0); 21];
        assert_eq!(motion_level(&still, &still), 0.0);

        let moved: Vec<_> = still.iter().map(|p| p + Vector3::new(0.01, 0.0, 0.0)).collect();
        assert!((motion_level(&moved, &still) - 0.1).abs() < 1e-9);

        let far: Vec<_> = still.iter().map(|p| p + Vector3::new(0.5, 0.0, 0.0)).collect();
        assert_eq!(motion_level(&far, &still), 1.0);
        assert_eq!(motion_level(&[], &still), 0.0);
    }
}
