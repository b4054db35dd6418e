// src/fixtures.rs - Synthetic right hands for unit tests
//
// Palm facing the camera, fingers up, image y growing downward. Negative z is
// toward the camera.
use nalgebra::Vector3;

use crate::classifier::Label;
use crate::landmarks::HandLandmarks;

const WRIST: [f64; 3] = [0.5, 0.85, 0.0];
const THUMB_CMC: [f64; 3] = [0.43, 0.80, 0.0];
const FINGER_MCPS: [[f64; 3]; 4] = [
    [0.44, 0.62, 0.0],
    [0.49, 0.60, 0.0],
    [0.54, 0.61, 0.0],
    [0.58, 0.64, 0.0],
];
// mcp-pip, pip-dip, dip-tip
const SEGMENTS: [[f64; 3]; 4] = [
    [0.05, 0.03, 0.025],
    [0.055, 0.035, 0.025],
    [0.05, 0.03, 0.025],
    [0.04, 0.025, 0.02],
];

pub(crate) const THUMB_OUT: [f64; 3] = [0.29, 0.76, 0.0];
pub(crate) const THUMB_SIDE: [f64; 3] = [0.40, 0.60, 0.0];
pub(crate) const THUMB_ACROSS: [f64; 3] = [0.52, 0.66, -0.06];
const THUMB_FLAT: [f64; 3] = [0.52, 0.70, -0.02];
const THUMB_RAISED: [f64; 3] = [0.40, 0.45, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FingerPose {
    /// Straight, tilted this many degrees clockwise from vertical.
    Extended(f64),
    /// Folded into the palm.
    Curled,
    /// Raised at the knuckle, bent at both upper joints.
    Hooked,
    /// Rounded, as when holding a ball.
    Curved,
}

pub(crate) const INDEX: usize = 0;
pub(crate) const MIDDLE: usize = 1;

fn v(p: [f64; 3]) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

/// MCP, PIP, DIP and tip of one finger before any hand rotation.
pub(crate) fn finger_chain(finger: usize, pose: FingerPose) -> [Vector3<f64>; 4] {
    let mcp = v(FINGER_MCPS[finger]);
    let [l1, l2, l3] = SEGMENTS[finger];

    let (a, b, c) = match pose {
        FingerPose::Extended(deg) => {
            let r = deg.to_radians();
            let d = Vector3::new(r.sin(), -r.cos(), 0.0);
            (d * l1, d * l2, d * l3)
        }
        FingerPose::Curled => (
            Vector3::new(0.0, 0.0, -l1),
            Vector3::new(0.0, l2, 0.0),
            Vector3::new(0.0, 0.0, l3),
        ),
        FingerPose::Hooked => (
            Vector3::new(0.0, -l1, 0.0),
            Vector3::new(0.0, 0.0, -l2),
            Vector3::new(0.0, l3, 0.0),
        ),
        FingerPose::Curved => {
            let seg = |deg: f64, l: f64| {
                let t = deg.to_radians();
                Vector3::new(0.0, -t.cos() * l, -t.sin() * l)
            };
            (seg(30.0, l1), seg(75.0, l2), seg(120.0, l3))
        }
    };

    let pip = mcp + a;
    let dip = pip + b;
    let tip = dip + c;
    [mcp, pip, dip, tip]
}

#[derive(Debug, Clone)]
pub(crate) struct HandBuilder {
    fingers: [FingerPose; 4],
    thumb_tip: Vector3<f64>,
    rotation_deg: f64,
}

impl Default for HandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HandBuilder {
    /// Fist with the thumb resting at the side.
    pub(crate) fn new() -> Self {
        Self {
            fingers: [FingerPose::Curled; 4],
            thumb_tip: v(THUMB_SIDE),
            rotation_deg: 0.0,
        }
    }

    pub(crate) fn fingers(mut self, poses: [FingerPose; 4]) -> Self {
        self.fingers = poses;
        self
    }

    pub(crate) fn index(mut self, pose: FingerPose) -> Self {
        self.fingers[INDEX] = pose;
        self
    }

    pub(crate) fn thumb(mut self, tip: [f64; 3]) -> Self {
        self.thumb_tip = v(tip);
        self
    }

    pub(crate) fn thumb_at(mut self, tip: Vector3<f64>) -> Self {
        self.thumb_tip = tip;
        self
    }

    /// Rotate the whole hand about the wrist in the image plane.
    pub(crate) fn rotated(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }

    pub(crate) fn points(&self) -> Vec<Vector3<f64>> {
        let wrist = v(WRIST);
        let cmc = v(THUMB_CMC);
        let thumb_span = self.thumb_tip - cmc;

        let mut points = vec![
            wrist,
            cmc,
            cmc + thumb_span * 0.4,
            cmc + thumb_span * 0.7,
            self.thumb_tip,
        ];
        for (finger, pose) in self.fingers.iter().enumerate() {
            points.extend(finger_chain(finger, *pose));
        }

        if self.rotation_deg != 0.0 {
            let r = self.rotation_deg.to_radians();
            let (s, c) = r.sin_cos();
            for p in points.iter_mut() {
                let dx = p.x - wrist.x;
                let dy = p.y - wrist.y;
                p.x = wrist.x + c * dx - s * dy;
                p.y = wrist.y + s * dx + c * dy;
            }
        }
        points
    }

    pub(crate) fn build(&self) -> HandLandmarks {
        HandLandmarks::new(&self.points()).expect("fixture hands are always valid")
    }
}

pub(crate) fn open_hand() -> HandLandmarks {
    canonical(Label::OpenHand).expect("open hand fixture").build()
}

/// A hand shaped for `label`, or None when no cascade rule produces it.
/// `Label::Unknown` yields a pose nothing recognizes.
pub(crate) fn canonical(label: Label) -> Option<HandBuilder> {
    use FingerPose::{Curled as C, Curved as Cv, Extended as E, Hooked};

    let spread = [E(-20.0), E(-5.0), E(10.0), E(25.0)];
    let v_shape = [E(-15.0), E(15.0), C, C];
    let u_shape = [E(8.0), E(-8.0), C, C];
    let one = [E(0.0), C, C, C];
    let fist = [C; 4];
    let hand = HandBuilder::new();

    let curved_index_tip = finger_chain(INDEX, Cv)[3];

    let builder = match label {
        Label::OpenHand => hand.fingers(spread).thumb(THUMB_OUT),
        Label::B => hand.fingers([E(6.0), E(0.0), E(-4.0), E(-10.0)]).thumb(THUMB_FLAT),
        Label::Four => hand.fingers(spread).thumb(THUMB_FLAT),
        Label::F => hand
            .fingers([Cv, E(-5.0), E(10.0), E(25.0)])
            .thumb_at(curved_index_tip + Vector3::new(0.01, 0.01, 0.0)),
        Label::W => hand.fingers([E(-15.0), E(0.0), E(15.0), C]).thumb(THUMB_ACROSS),
        Label::Three => hand.fingers(v_shape).thumb(THUMB_OUT),
        Label::ILoveYou => hand.fingers([E(-10.0), C, C, E(15.0)]).thumb(THUMB_OUT),
        Label::RockOn => hand.fingers([E(-10.0), C, C, E(15.0)]).thumb(THUMB_ACROSS),
        Label::Y => hand.fingers([C, C, C, E(15.0)]).thumb(THUMB_OUT),
        Label::I => hand.fingers([C, C, C, E(5.0)]).thumb(THUMB_ACROSS),
        Label::P => hand.fingers(v_shape).thumb(THUMB_ACROSS).rotated(180.0),
        Label::H => hand.fingers(u_shape).thumb(THUMB_ACROSS).rotated(90.0),
        Label::R => hand.fingers([E(20.0), E(-15.0), C, C]).thumb(THUMB_ACROSS),
        Label::K => {
            let mut pip = finger_chain(MIDDLE, E(15.0))[1];
            pip += Vector3::new(-0.005, 0.005, 0.0);
            pip.z = -0.01;
            hand.fingers(v_shape).thumb_at(pip)
        }
        Label::U => hand.fingers(u_shape).thumb(THUMB_ACROSS),
        Label::V => hand.fingers(v_shape).thumb(THUMB_ACROSS),
        Label::L => hand.fingers(one).thumb(THUMB_OUT),
        Label::Q => hand.fingers(one).thumb(THUMB_ACROSS).rotated(180.0),
        Label::G => hand.fingers(one).thumb(THUMB_ACROSS).rotated(90.0),
        Label::D => {
            let middle_tip = finger_chain(MIDDLE, C)[3];
            hand.fingers(one)
                .thumb_at(middle_tip + Vector3::new(-0.01, 0.01, -0.01))
        }
        Label::One => hand.fingers(one).thumb(THUMB_SIDE),
        Label::ThumbsUp => hand.fingers(fist).thumb(THUMB_RAISED),
        Label::ThumbsDown => hand.fingers(fist).thumb(THUMB_RAISED).rotated(180.0),
        Label::O => hand
            .fingers([Cv; 4])
            .thumb_at(curved_index_tip + Vector3::new(0.01, 0.01, 0.0)),
        Label::C => hand.fingers([Cv; 4]).thumb([0.42, 0.66, -0.06]),
        Label::X => hand.fingers([Hooked, C, C, C]).thumb(THUMB_SIDE),
        Label::T => hand.fingers(fist).thumb([0.45, 0.615, -0.06]),
        Label::E => hand.fingers(fist).thumb([0.465, 0.655, -0.03]),
        Label::M => hand.fingers(fist).thumb([0.56, 0.66, -0.02]),
        Label::N => hand.fingers(fist).thumb([0.515, 0.66, -0.02]),
        Label::S => hand.fingers(fist).thumb(THUMB_ACROSS),
        Label::A => hand.fingers(fist).thumb(THUMB_SIDE),
        Label::Unknown => hand
            .fingers([C, E(0.0), E(0.0), C])
            .thumb(THUMB_SIDE)
            .rotated(90.0),
        _ => return None,
    };
    Some(builder)
}
