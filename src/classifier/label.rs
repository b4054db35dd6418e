// src/classifier/label.rs - Closed recognition vocabulary
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SignError, SignResult};

/// Letters that need motion to sign and are never produced from a single frame.
pub const MOTION_LETTERS: [char; 2] = ['J', 'Z'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    OpenHand,
    ThumbsUp,
    ThumbsDown,
    PeaceV,
    RockOn,
    ILoveYou,
    Unknown,
}

impl Label {
    /// Every label the classifier can emit, `Unknown` last.
    pub const ALL: [Label; 37] = [
        Label::A,
        Label::B,
        Label::C,
        Label::D,
        Label::E,
        Label::F,
        Label::G,
        Label::H,
        Label::I,
        Label::K,
        Label::L,
        Label::M,
        Label::N,
        Label::O,
        Label::P,
        Label::Q,
        Label::R,
        Label::S,
        Label::T,
        Label::U,
        Label::V,
        Label::W,
        Label::X,
        Label::Y,
        Label::Zero,
        Label::One,
        Label::Two,
        Label::Three,
        Label::Four,
        Label::Five,
        Label::OpenHand,
        Label::ThumbsUp,
        Label::ThumbsDown,
        Label::PeaceV,
        Label::RockOn,
        Label::ILoveYou,
        Label::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::OpenHand => "Open hand",
            Self::ThumbsUp => "Thumbs up",
            Self::ThumbsDown => "Thumbs down",
            Self::PeaceV => "Peace/V",
            Self::RockOn => "Rock on",
            Self::ILoveYou => "I love you",
            Self::Unknown => "Unknown",
        }
    }

    /// Fingerspelled letter for `c` (case-insensitive).
    pub fn letter(c: char) -> SignResult<Self> {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_alphabetic() {
            return Err(SignError::UnsupportedSign(format!("'{}' is not a letter", c)));
        }
        if MOTION_LETTERS.contains(&upper) {
            return Err(SignError::UnsupportedSign(format!(
                "{} requires motion and cannot be recognized from a single frame",
                upper
            )));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().len() == 1 && l.as_str().starts_with(upper))
            .ok_or_else(|| SignError::UnsupportedSign(format!("'{}' is not a letter", c)))
    }

    /// Digit label for 0..=5.
    pub fn digit(n: usize) -> Option<Self> {
        match n {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::Unknown
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SignError;

    /// Parses the display form, so `"Open hand"` and `"3"` round-trip.
    /// Single letters are case-insensitive; J and Z are unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Self::letter(c);
            }
        }
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SignError::UnsupportedSign(format!("'{}' is not in the vocabulary", trimmed)))
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.as_str().to_string()
    }
}

impl TryFrom<String> for Label {
    type Error = SignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
