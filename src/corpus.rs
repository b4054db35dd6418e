// src/corpus.rs - Regression corpus evaluation and per-frame CSV export
use chrono::Local;
use csv::{ReaderBuilder, Writer};
use nalgebra::Vector3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::classifier::{Label, SignClassifier};
use crate::error::{SignError, SignResult};
use crate::landmarks::LANDMARK_COUNT;
use crate::recognizer::FrameOutcome;

const COORDINATE_COUNT: usize = LANDMARK_COUNT * 3;

/// One labeled frame. The label is kept as written so motion letters can
/// be reported rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusSample {
    pub label: String,
    pub points: Vec<Vector3<f64>>,
}

fn corpus_header() -> Vec<String> {
    let mut header = vec!["label".to_string()];
    for i in 0..LANDMARK_COUNT {
        header.push(format!("x{}", i));
        header.push(format!("y{}", i));
        header.push(format!("z{}", i));
    }
    header
}

/// Parse `label,x0,y0,z0,...,x20,y20,z20` rows after a header line.
pub fn read_corpus<R: Read>(reader: R) -> SignResult<Vec<CorpusSample>> {
    let mut rows = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut samples = Vec::new();

    for (i, row) in rows.records().enumerate() {
        let row = row?;
        let record = i as u64 + 1;
        if row.len() != COORDINATE_COUNT + 1 {
            return Err(SignError::Corpus {
                record,
                message: format!("expected {} columns, got {}", COORDINATE_COUNT + 1, row.len()),
            });
        }

        let mut coords = Vec::with_capacity(COORDINATE_COUNT);
        for (col, field) in row.iter().enumerate().skip(1) {
            let value: f64 = field.parse().map_err(|_| SignError::Corpus {
                record,
                message: format!("column {} is not a number: '{}'", col, field),
            })?;
            coords.push(value);
        }

        samples.push(CorpusSample {
            label: row[0].to_string(),
            points: coords.chunks(3).map(|c| Vector3::new(c[0], c[1], c[2])).collect(),
        });
    }

    Ok(samples)
}

pub fn load_corpus(path: &Path) -> SignResult<Vec<CorpusSample>> {
    let samples = read_corpus(File::open(path)?)?;
    info!(path = %path.display(), samples = samples.len(), "Loaded corpus");
    Ok(samples)
}

pub fn write_corpus<W: Write>(writer: W, samples: &[CorpusSample]) -> SignResult<()> {
    let mut out = Writer::from_writer(writer);
    out.write_record(corpus_header())?;
    for sample in samples {
        let mut row = vec![sample.label.clone()];
        for p in &sample.points {
            row.push(p.x.to_string());
            row.push(p.y.to_string());
            row.push(p.z.to_string());
        }
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

pub fn save_corpus(path: &Path, samples: &[CorpusSample]) -> SignResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_corpus(File::create(path)?, samples)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelScore {
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub expected: Label,
    pub predicted: Label,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Scored samples; unsupported ones are excluded.
    pub total: usize,
    pub correct: usize,
    /// Labels outside the static vocabulary (J, Z, typos), as written.
    pub unsupported: Vec<String>,
    pub per_label: BTreeMap<Label, LabelScore>,
    pub confusions: Vec<Confusion>,
}

impl EvaluationReport {
    pub fn record(&mut self, expected: Label, predicted: Label) {
        self.total += 1;
        let score = self.per_label.entry(expected).or_default();
        score.total += 1;

        if expected == predicted {
            self.correct += 1;
            score.correct += 1;
            return;
        }

        match self
            .confusions
            .iter_mut()
            .find(|c| c.expected == expected && c.predicted == predicted)
        {
            Some(confusion) => confusion.count += 1,
            None => self.confusions.push(Confusion {
                expected,
                predicted,
                count: 1,
            }),
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Accuracy: {}/{} ({:.1}%)",
            self.correct,
            self.total,
            self.accuracy() * 100.0
        )?;
        for (label, score) in &self.per_label {
            writeln!(f, "  {:<12} {}/{}", label.as_str(), score.correct, score.total)?;
        }
        if !self.confusions.is_empty() {
            writeln!(f, "Confusions:")?;
            let mut sorted = self.confusions.clone();
            sorted.sort_by(|a, b| b.count.cmp(&a.count));
            for c in sorted {
                writeln!(f, "  {} -> {}: {}", c.expected, c.predicted, c.count)?;
            }
        }
        if !self.unsupported.is_empty() {
            writeln!(f, "Unsupported (not scored): {}", self.unsupported.join(", "))?;
        }
        Ok(())
    }
}

/// Classify every sample and compare against its label.
pub fn evaluate(classifier: &SignClassifier, samples: &[CorpusSample]) -> SignResult<EvaluationReport> {
    let mut report = EvaluationReport::default();

    for sample in samples {
        let expected = match sample.label.parse::<Label>() {
            Ok(label) => label,
            Err(e) => {
                debug!(label = %sample.label, error = %e, "Skipping unsupported sample");
                report.unsupported.push(sample.label.clone());
                continue;
            }
        };
        let result = classifier.classify_points(&sample.points)?;
        report.record(expected, result.label);
    }

    info!(
        total = report.total,
        correct = report.correct,
        unsupported = report.unsupported.len(),
        "Evaluation complete"
    );
    Ok(report)
}

#[derive(Debug, Clone, Serialize)]
struct FrameRecord {
    frame: u64,
    label: String,
    confidence: f64,
    stage: String,
    stable_label: Option<String>,
    stable_confidence: Option<f64>,
    event: Option<String>,
    motion: f64,
}

/// Accumulates per-frame outcomes of one session for CSV export.
pub struct FrameLog {
    session_name: String,
    records: Vec<FrameRecord>,
}

impl FrameLog {
    pub fn new(session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));
        Self {
            session_name,
            records: Vec::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn add(&mut self, outcome: &FrameOutcome) {
        self.records.push(FrameRecord {
            frame: outcome.frame,
            label: outcome.classification.label.to_string(),
            confidence: outcome.classification.confidence,
            stage: outcome.classification.stage.to_string(),
            stable_label: outcome.stable.as_ref().map(|g| g.label.to_string()),
            stable_confidence: outcome.stable.as_ref().map(|g| g.confidence),
            event: outcome.event.as_ref().map(|e| e.to_string()),
            motion: outcome.motion_level,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> SignResult<()> {
        let mut out = Writer::from_writer(writer);
        for record in &self.records {
            out.serialize(record)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> SignResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.write_csv(File::create(path)?)?;
        info!(path = %path.display(), frames = self.records.len(), "Exported frame log");
        Ok(())
    }

    /// Write to `<dir>/<session>/frames.csv` and return that path.
    pub fn export_to_dir(&self, dir: &Path) -> SignResult<PathBuf> {
        let path = dir.join(&self.session_name).join("frames.csv");
        self.export_csv(&path)?;
        Ok(path)
    }
}
