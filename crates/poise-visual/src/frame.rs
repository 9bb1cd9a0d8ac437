//! Frame record - the behavioral state of one video frame
//!
//! This is NOT the landmark data. It is what the landmarks MEAN:
//! one immutable snapshot of every classifier's verdict.

use poise_core::{Hand, HolisticFrame, StateTime};

use crate::{
    EmotionDistribution, ExpressionClassifier, ExpressionLabel, EyeContactClassifier,
    EyeContactStatus, HandednessResolver, PostureClassifier, PostureLabel,
};

/// Classified state of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub timestamp: StateTime,
    /// Mean world-landmark visibility [0.0 - 1.0]
    pub pose_confidence: f32,
    pub face_detected: bool,
    /// 0, 1 or 2
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

/// Runs every classifier over one frame
pub struct FrameAnalyzer;

impl FrameAnalyzer {
    /// Classify a frame observed at `timestamp`
    pub fn analyze(frame: &HolisticFrame, timestamp: StateTime) -> FrameRecord {
        let face = frame.detected_face();
        let expression = ExpressionClassifier::classify(face);
        let posture = PostureClassifier::classify(frame.detected_pose());
        let eye_contact = EyeContactClassifier::classify(face);
        let dominant_hand =
            HandednessResolver::resolve(frame.detected_left_hand(), frame.detected_right_hand());

        FrameRecord {
            timestamp,
            pose_confidence: frame.pose_confidence(),
            face_detected: face.is_some(),
            hands_detected: frame.hands_detected(),
            dominant_hand,
            expression: expression.label,
            expression_confidence: expression.confidence,
            emotions: expression.emotions,
            posture: posture.label,
            posture_confidence: posture.confidence,
            eye_contact: eye_contact.status,
            eye_contact_confidence: eye_contact.confidence,
        }
    }
}
