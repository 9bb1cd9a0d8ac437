//! Posture - torso lean class with a sitting/standing qualifier

use std::fmt;

use poise_core::{LandmarkSet, NOT_DETECTED};

use crate::PoseFeatures;

/// Torso lean class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureClass {
    Straight,
    LeanForward,
    Slouched,
    LeanBack,
}

impl PostureClass {
    pub fn as_str(self) -> &'static str {
        match self {
            PostureClass::Straight => "STRAIGHT",
            PostureClass::LeanForward => "LEAN_FORWARD",
            PostureClass::Slouched => "SLOUCHED",
            PostureClass::LeanBack => "LEAN_BACK",
        }
    }
}

/// Sitting/standing qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    Sitting,
    Standing,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Stance::Sitting => "SITTING",
            Stance::Standing => "STANDING",
        }
    }
}

/// Full posture label, e.g. `SITTING_STRAIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureLabel {
    Classified { stance: Stance, class: PostureClass },
    NotDetected,
}

impl fmt::Display for PostureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostureLabel::Classified { stance, class } => {
                write!(f, "{}_{}", stance.as_str(), class.as_str())
            }
            PostureLabel::NotDetected => f.write_str(NOT_DETECTED),
        }
    }
}

/// Posture classification result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureResult {
    pub label: PostureLabel,
    pub confidence: f32,
}

impl PostureResult {
    pub fn not_detected() -> Self {
        Self {
            label: PostureLabel::NotDetected,
            confidence: 0.0,
        }
    }
}

/// Knees closer to the hips than this fraction of the torso read as sitting
pub const SITTING_KNEE_RATIO: f32 = 0.8;

/// Classifies torso geometry
pub struct PostureClassifier;

impl PostureClassifier {
    /// Classify a pose, `None` meaning no body in the frame
    pub fn classify(pose: Option<&LandmarkSet>) -> PostureResult {
        match pose.and_then(PoseFeatures::extract) {
            Some(features) => Self::classify_features(&features),
            None => PostureResult::not_detected(),
        }
    }

    pub fn classify_features(features: &PoseFeatures) -> PostureResult {
        let (class, confidence) = Self::base_class(features.torso_height, features.shoulder_tilt);
        let stance = Self::stance(features.hip_knee_height, features.torso_height);

        PostureResult {
            label: PostureLabel::Classified { stance, class },
            confidence,
        }
    }

    /// Lean class from torso height and shoulder tilt, first match wins
    pub fn base_class(torso_height: f32, shoulder_tilt: f32) -> (PostureClass, f32) {
        if torso_height > 0.30 && shoulder_tilt < 0.10 {
            (PostureClass::Straight, 0.90)
        } else if torso_height > 0.20 {
            (PostureClass::LeanForward, 0.80)
        } else if torso_height > 0.10 {
            (PostureClass::Slouched, 0.85)
        } else {
            (PostureClass::LeanBack, 0.80)
        }
    }

    /// Stance from the hip-knee drop; untracked knees default to sitting
    pub fn stance(hip_knee_height: Option<f32>, torso_height: f32) -> Stance {
        match hip_knee_height {
            Some(hk) if hk < torso_height * SITTING_KNEE_RATIO => Stance::Sitting,
            Some(_) => Stance::Standing,
            None => Stance::Sitting,
        }
    }
}
