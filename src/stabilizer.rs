// src/stabilizer.rs - Debounces the per-frame label stream
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::classifier::{ClassificationResult, Label};
use crate::config::StabilizerConfig;
use crate::error::SignResult;

/// Fixed-capacity FIFO of recent per-frame results, oldest first.
#[derive(Debug, Clone)]
pub struct SequenceBuffer {
    entries: VecDeque<ClassificationResult>,
    capacity: usize,
}

impl SequenceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, result: ClassificationResult) {
        self.entries.push_back(result);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The newest `count` entries, oldest first. Shorter if the buffer is.
    pub fn trailing(&self, count: usize) -> impl Iterator<Item = &ClassificationResult> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilizedGesture {
    pub label: Label,
    /// Mean confidence over the trailing window.
    pub confidence: f64,
}

/// Onset and release of a stable run. Each fires exactly once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GestureEvent {
    Started { label: Label, confidence: f64 },
    Released { label: Label },
}

impl GestureEvent {
    pub fn label(&self) -> Label {
        match self {
            Self::Started { label, .. } | Self::Released { label } => *label,
        }
    }
}

impl std::fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started { label, confidence } => write!(f, "started {} ({:.2})", label, confidence),
            Self::Released { label } => write!(f, "released {}", label),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    buffer: SequenceBuffer,
    window: usize,
    active: Option<Label>,
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self::with_window(&StabilizerConfig::default())
    }
}

impl TemporalStabilizer {
    pub fn new(config: &StabilizerConfig) -> SignResult<Self> {
        config.validate()?;
        Ok(Self::with_window(config))
    }

    fn with_window(config: &StabilizerConfig) -> Self {
        Self {
            buffer: SequenceBuffer::new(config.capacity),
            window: config.stability_window,
            active: None,
        }
    }

    pub fn push(&mut self, result: ClassificationResult) {
        self.buffer.push(result);
    }

    pub fn buffer(&self) -> &SequenceBuffer {
        &self.buffer
    }

    /// A gesture is stable when the newest `window` entries share one label
    /// other than `Unknown`. Older history never contributes.
    pub fn detect_stable_gesture(&self) -> Option<StabilizedGesture> {
        if self.window == 0 || self.buffer.len() < self.window {
            return None;
        }

        let recent: Vec<&ClassificationResult> = self.buffer.trailing(self.window).collect();
        let label = recent.first()?.label;
        if label.is_unknown() || recent.iter().any(|r| r.label != label) {
            return None;
        }

        let total: f64 = recent.iter().map(|r| r.confidence).sum();
        Some(StabilizedGesture {
            label,
            confidence: total / recent.len() as f64,
        })
    }

    /// Push one frame and report a change in the stable run, if any.
    ///
    /// A run that gives way directly to a different stable label is released
    /// first; the new run starts on the following frame.
    pub fn update(&mut self, result: ClassificationResult) -> Option<GestureEvent> {
        self.push(result);
        let stable = self.detect_stable_gesture();

        match (self.active, stable) {
            (None, Some(gesture)) => {
                info!(label = %gesture.label, confidence = gesture.confidence, "Gesture started");
                self.active = Some(gesture.label);
                Some(GestureEvent::Started {
                    label: gesture.label,
                    confidence: gesture.confidence,
                })
            }
            (Some(label), None) => {
                info!(label = %label, "Gesture released");
                self.active = None;
                Some(GestureEvent::Released { label })
            }
            (Some(label), Some(gesture)) if gesture.label != label => {
                debug!(from = %label, to = %gesture.label, "Stable label switched");
                self.active = None;
                Some(GestureEvent::Released { label })
            }
            _ => None,
        }
    }

    /// The label of the run in progress, if any.
    pub fn active(&self) -> Option<Label> {
        self.active
    }

    /// Session boundary: forget history and any run in progress.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.active = None;
    }
}
