//! Cycle summary - one reduction of the current window

use poise_core::{Hand, StateTime};
use poise_visual::{
    EmotionDistribution, ExpressionLabel, EyeContactStatus, FrameRecord, PostureLabel,
};
use tracing::debug;

use crate::{majority, SlidingWindowBuffer};

/// Fraction of face-present frames above which a cycle counts as face-present
pub const FACE_PRESENCE_RATE: f64 = 0.5;

/// One periodic reduction of recent frames
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub timestamp: StateTime,
    /// Number of frames folded into this summary
    pub frames: usize,
    pub pose_confidence: f32,
    pub face_detected: bool,
    pub hands_detected: u8,
    pub dominant_hand: Hand,
    pub expression: ExpressionLabel,
    pub expression_confidence: f32,
    pub emotions: EmotionDistribution,
    pub posture: PostureLabel,
    pub posture_confidence: f32,
    pub eye_contact: EyeContactStatus,
    pub eye_contact_confidence: f32,
}

/// Integer percentage of a [0, 1] value, rounded half up
pub fn percent(value: f32) -> i64 {
    (f64::from(value) * 100.0).round() as i64
}

/// Folds a window of frame records into a [`CycleSummary`]
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Summarize the buffer as of `now`; an empty buffer yields nothing
    pub fn aggregate(buffer: &SlidingWindowBuffer, now: StateTime) -> Option<CycleSummary> {
        let records: Vec<&FrameRecord> = buffer.iter().collect();
        let summary = Self::aggregate_records(&records, now)?;

        debug!(
            frames = summary.frames,
            expression = %summary.expression,
            posture = %summary.posture,
            eye_contact = %summary.eye_contact,
            "cycle aggregated"
        );
        Some(summary)
    }

    /// Summarize an explicit record sequence
    pub fn aggregate_records(records: &[&FrameRecord], now: StateTime) -> Option<CycleSummary> {
        if records.is_empty() {
            return None;
        }

        let faces = records.iter().filter(|r| r.face_detected).count();
        let face_rate = faces as f64 / records.len() as f64;
        let hands = mean(records, |r| f32::from(r.hands_detected));

        let expressions: Vec<ExpressionLabel> = records.iter().map(|r| r.expression).collect();
        let postures: Vec<PostureLabel> = records.iter().map(|r| r.posture).collect();
        let eye_contacts: Vec<EyeContactStatus> = records.iter().map(|r| r.eye_contact).collect();

        Some(CycleSummary {
            timestamp: now,
            frames: records.len(),
            pose_confidence: mean(records, |r| r.pose_confidence),
            face_detected: face_rate > FACE_PRESENCE_RATE,
            hands_detected: f64::from(hands).round() as u8,
            dominant_hand: Self::dominant_hand(records),
            expression: majority(&expressions).unwrap_or(ExpressionLabel::NotDetected),
            expression_confidence: mean(records, |r| r.expression_confidence),
            emotions: EmotionDistribution::mean(records.iter().map(|r| &r.emotions)),
            posture: majority(&postures).unwrap_or(PostureLabel::NotDetected),
            posture_confidence: mean(records, |r| r.posture_confidence),
            eye_contact: majority(&eye_contacts).unwrap_or(EyeContactStatus::NotDetected),
            eye_contact_confidence: mean(records, |r| r.eye_contact_confidence),
        })
    }

    /// Hand dominant in more frames; a left/right tie is no hand
    fn dominant_hand(records: &[&FrameRecord]) -> Hand {
        let left = records.iter().filter(|r| r.dominant_hand == Hand::Left).count();
        let right = records.iter().filter(|r| r.dominant_hand == Hand::Right).count();

        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Hand::Left,
            std::cmp::Ordering::Less => Hand::Right,
            std::cmp::Ordering::Equal => Hand::None,
        }
    }
}

fn mean(records: &[&FrameRecord], field: impl Fn(&FrameRecord) -> f32) -> f32 {
    let sum: f64 = records.iter().map(|r| f64::from(field(*r))).sum();
    (sum / records.len() as f64) as f32
}
