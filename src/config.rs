// src/config.rs - Named, overridable recognizer thresholds
//
// Every distance here is in the detector's normalized image coordinates, so
// the defaults only hold for frame-relative x/y in [0, 1].
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{SignError, SignResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub fingers: FingerThresholds,
    pub classifier: ClassifierThresholds,
    pub stabilizer: StabilizerConfig,
}

/// Finger State Evaluator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerThresholds {
    /// A joint straighter than this (degrees) counts as straight.
    pub straight_joint_angle_deg: f64,
    /// Minimum tip-to-wrist over mcp-to-wrist ratio for an extended finger.
    pub extension_ratio: f64,
    /// Minimum thumb-tip-to-index-MCP over CMC-to-index-MCP ratio.
    pub thumb_extension_ratio: f64,
    /// Thumb is across the palm when its tip is nearer the pinky MCP than
    /// this fraction of its distance to the index MCP.
    pub thumb_across_ratio: f64,
}

impl Default for FingerThresholds {
    fn default() -> Self {
        Self {
            straight_joint_angle_deg: 160.0,
            extension_ratio: 1.1,
            thumb_extension_ratio: 0.8,
            thumb_across_ratio: 1.0,
        }
    }
}

/// Rule cascade refinements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Two tips closer than this are touching.
    pub touch_distance: f64,
    /// Adjacent fingertips at least this far apart are spread.
    pub spread_distance: f64,
    /// Thumb-to-index angle window for "L" (degrees).
    pub l_angle_min_deg: f64,
    pub l_angle_max_deg: f64,
    /// Widest thumb-to-index gap still read as a "C".
    pub c_gap_max: f64,
    /// Curved (not fisted) when tip-to-wrist is at least this fraction of mcp-to-wrist.
    pub curve_ratio: f64,
    /// How far the index PIP must rise above its MCP for a hook ("X").
    pub hook_raise: f64,
    /// Thumb-tip position along the index-to-pinky knuckle line, 0 at the
    /// index MCP and 1 at the pinky MCP.
    pub n_position_min: f64,
    pub m_position_min: f64,
    /// Cascade results above this confidence win over the coarse fallback.
    pub cascade_preference: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            touch_distance: 0.04,
            spread_distance: 0.06,
            l_angle_min_deg: 60.0,
            l_angle_max_deg: 120.0,
            c_gap_max: 0.15,
            curve_ratio: 1.0,
            hook_raise: 0.03,
            n_position_min: 0.35,
            m_position_min: 0.65,
            cascade_preference: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Frames kept in the sequence buffer (30 is about one second at 30 fps).
    pub capacity: usize,
    /// Trailing frames that must agree before a gesture is stable.
    pub stability_window: usize,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            stability_window: 10,
        }
    }
}

impl StabilizerConfig {
    /// The window must fit inside the buffer, or nothing ever stabilizes.
    pub fn validate(&self) -> SignResult<()> {
        if self.stability_window == 0 {
            return Err(SignError::Config("stability_window must be > 0".to_string()));
        }
        if self.stability_window > self.capacity {
            return Err(SignError::Config(format!(
                "stability_window ({}) cannot exceed capacity ({})",
                self.stability_window, self.capacity
            )));
        }
        Ok(())
    }
}

impl RecognizerConfig {
    /// Check value ranges; returns the first problem found.
    pub fn validate(&self) -> SignResult<()> {
        let f = &self.fingers;
        if !(f.straight_joint_angle_deg > 0.0 && f.straight_joint_angle_deg < 180.0) {
            return Err(SignError::Config(format!(
                "straight_joint_angle_deg must be in (0, 180), got {}",
                f.straight_joint_angle_deg
            )));
        }
        for (name, value) in [
            ("extension_ratio", f.extension_ratio),
            ("thumb_extension_ratio", f.thumb_extension_ratio),
            ("thumb_across_ratio", f.thumb_across_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SignError::Config(format!("{} must be > 0, got {}", name, value)));
            }
        }

        let c = &self.classifier;
        for (name, value) in [
            ("touch_distance", c.touch_distance),
            ("spread_distance", c.spread_distance),
            ("c_gap_max", c.c_gap_max),
            ("curve_ratio", c.curve_ratio),
            ("hook_raise", c.hook_raise),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SignError::Config(format!("{} must be > 0, got {}", name, value)));
            }
        }
        if c.c_gap_max <= c.touch_distance {
            return Err(SignError::Config(format!(
                "c_gap_max ({}) must exceed touch_distance ({})",
                c.c_gap_max, c.touch_distance
            )));
        }
        if !(0.0 <= c.l_angle_min_deg && c.l_angle_min_deg < c.l_angle_max_deg && c.l_angle_max_deg <= 180.0) {
            return Err(SignError::Config(format!(
                "L angle window must satisfy 0 <= min < max <= 180, got [{}, {}]",
                c.l_angle_min_deg, c.l_angle_max_deg
            )));
        }
        if !(0.0 <= c.n_position_min && c.n_position_min < c.m_position_min) {
            return Err(SignError::Config(format!(
                "n_position_min ({}) must be >= 0 and below m_position_min ({})",
                c.n_position_min, c.m_position_min
            )));
        }
        if !(0.0..=1.0).contains(&c.cascade_preference) {
            return Err(SignError::Config(format!(
                "cascade_preference must be in [0, 1], got {}",
                c.cascade_preference
            )));
        }

        self.stabilizer.validate()
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> SignResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded recognizer config");
        Ok(config)
    }

    /// Load from the default location, falling back to built-in defaults.
    pub fn load_default() -> SignResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> SignResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "signrecognizer", "sign_recognizer")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("sign_recognizer.json"))
    }

    pub fn to_json(&self) -> SignResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
