//! Export - the persisted record of a session
//!
//! Confidences and emotion weights are written as rounded integer
//! percentages; timestamps as ISO-8601 UTC.

use std::path::{Path, PathBuf};

use poise_core::{Emotion, PoiseError, PoiseResult, StateTime};
use poise_window::{percent, CycleSummary, SummaryHistory};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Exported session document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: String,
    /// Whole seconds the session ran
    pub session_duration: u64,
    pub total_cycles: usize,
    pub summaries: Vec<ExportedCycle>,
}

/// One exported cycle summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCycle {
    /// 1-based cycle index
    pub cycle: usize,
    pub timestamp: String,
    pub expression: String,
    pub expression_confidence: i64,
    pub posture: String,
    pub posture_confidence: i64,
    pub eye_contact: String,
    pub eye_contact_confidence: i64,
    pub emotions: EmotionPercentages,
    pub face_detected: bool,
    pub hands_detected: u8,
    pub dominant_hand: String,
    pub pose_confidence: i64,
}

/// Emotion weights as integer percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionPercentages {
    pub happy: i64,
    pub sad: i64,
    pub angry: i64,
    pub surprised: i64,
    pub fearful: i64,
    pub disgusted: i64,
    pub neutral: i64,
}

impl ExportedCycle {
    fn from_summary(index: usize, summary: &CycleSummary) -> Self {
        let emotion = |e: Emotion| percent(summary.emotions.get(e));

        ExportedCycle {
            cycle: index + 1,
            timestamp: summary.timestamp.to_rfc3339(),
            expression: summary.expression.to_string(),
            expression_confidence: percent(summary.expression_confidence),
            posture: summary.posture.to_string(),
            posture_confidence: percent(summary.posture_confidence),
            eye_contact: summary.eye_contact.to_string(),
            eye_contact_confidence: percent(summary.eye_contact_confidence),
            emotions: EmotionPercentages {
                happy: emotion(Emotion::Happy),
                sad: emotion(Emotion::Sad),
                angry: emotion(Emotion::Angry),
                surprised: emotion(Emotion::Surprised),
                fearful: emotion(Emotion::Fearful),
                disgusted: emotion(Emotion::Disgusted),
                neutral: emotion(Emotion::Neutral),
            },
            face_detected: summary.face_detected,
            hands_detected: summary.hands_detected,
            dominant_hand: summary.dominant_hand.to_string(),
            pose_confidence: percent(summary.pose_confidence),
        }
    }
}

impl ExportDocument {
    /// Build the document for a history exported at `now`
    pub fn from_history(history: &SummaryHistory, session_duration: u64, now: StateTime) -> Self {
        let summaries: Vec<ExportedCycle> = history
            .iter()
            .enumerate()
            .map(|(i, s)| ExportedCycle::from_summary(i, s))
            .collect();

        ExportDocument {
            export_date: now.to_rfc3339(),
            session_duration,
            total_cycles: summaries.len(),
            summaries,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> PoiseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PoiseError::ExportFailed(e.to_string()))
    }

    /// File name for an export taken at `now`
    pub fn file_name(prefix: &str, now: StateTime) -> String {
        format!("{}-{}.json", prefix, now.as_millis())
    }

    /// Write the document as `<prefix>-<epoch ms>.json` under `dir`
    pub fn write_to_dir(&self, dir: &Path, prefix: &str, now: StateTime) -> PoiseResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(prefix, now));
        std::fs::write(&path, self.to_json_pretty()?)?;

        info!(
            "exported {} cycles to {}",
            self.total_cycles,
            path.display()
        );
        Ok(path)
    }
}
