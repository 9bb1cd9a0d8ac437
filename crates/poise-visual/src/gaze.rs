//! Eye contact - eye openness, head pose and iris position
//!
//! Staged, first terminal result wins:
//! 1. Eye aspect ratio below threshold: eyes closed
//! 2. Nose tip far from the face center: looking away
//! 3. Accumulate a gaze score from iris centering, eye level and
//!    eye-nose alignment
//! 4. Map the score to a status band

use std::fmt;

use poise_core::{Landmark, LandmarkSet, NOT_DETECTED};

use crate::{EyeGeometry, FacePoint, EPSILON};

/// Mean eye aspect ratio under which the eyes count as closed
pub const EYES_CLOSED_EAR: f32 = 0.20;
/// Maximum nose offset from the face center, as a fraction of face width
pub const HEAD_TURN_LIMIT: f32 = 0.15;
/// Maximum vertical nose offset from the face center
pub const HEAD_TILT_LIMIT: f32 = 0.15;

/// Eye contact status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeContactStatus {
    Strong,
    Maintained,
    Moderate,
    NotMaintained,
    LookingAway,
    EyesClosed,
    NotDetected,
}

impl EyeContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EyeContactStatus::Strong => "strong eye contact",
            EyeContactStatus::Maintained => "maintained",
            EyeContactStatus::Moderate => "moderate",
            EyeContactStatus::NotMaintained => "not maintained",
            EyeContactStatus::LookingAway => "looking away",
            EyeContactStatus::EyesClosed => "eyes closed",
            EyeContactStatus::NotDetected => NOT_DETECTED,
        }
    }
}

impl fmt::Display for EyeContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eye contact classification result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeContactResult {
    pub status: EyeContactStatus,
    pub confidence: f32,
}

impl EyeContactResult {
    fn new(status: EyeContactStatus, confidence: f32) -> Self {
        Self { status, confidence }
    }

    pub fn not_detected() -> Self {
        Self::new(EyeContactStatus::NotDetected, 0.0)
    }
}

/// Gaze score in tenths, so band thresholds compare exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct GazeScore(pub u8);

impl GazeScore {
    /// Iris well centered in both sockets
    pub const IRIS_CENTERED: u8 = 5;
    /// Iris roughly centered
    pub const IRIS_NEAR_CENTER: u8 = 3;
    /// Both eyes at the same height
    pub const EYES_LEVEL: u8 = 2;
    /// Eyes straddle the nose
    pub const EYES_OVER_NOSE: u8 = 3;

    #[inline]
    pub fn value(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    fn add(&mut self, points: u8) {
        self.0 = self.0.saturating_add(points);
    }
}

/// Landmarks needed before any eye contact judgement
struct FaceFrame {
    left_eye: EyeGeometry,
    right_eye: EyeGeometry,
    nose_tip: Landmark,
    nose_bridge: Landmark,
    chin: Landmark,
    left_cheek: Landmark,
    right_cheek: Landmark,
}

impl FaceFrame {
    fn extract(face: &LandmarkSet) -> Option<Self> {
        Some(Self {
            left_eye: EyeGeometry::left(face)?,
            right_eye: EyeGeometry::right(face)?,
            nose_tip: FacePoint::NoseTip.in_set(face)?,
            nose_bridge: FacePoint::NoseBridge.in_set(face)?,
            chin: FacePoint::Chin.in_set(face)?,
            left_cheek: FacePoint::LeftCheek.in_set(face)?,
            right_cheek: FacePoint::RightCheek.in_set(face)?,
        })
    }

    fn mean_aspect_ratio(&self) -> f32 {
        (self.left_eye.aspect_ratio() + self.right_eye.aspect_ratio()) / 2.0
    }

    /// Is the head turned or tilted away from the camera?
    fn head_turned(&self) -> bool {
        let center_x = (self.left_cheek.x + self.right_cheek.x) / 2.0;
        let center_y = (self.nose_bridge.y + self.chin.y) / 2.0;
        let face_width = (self.right_cheek.x - self.left_cheek.x).abs();

        let horizontal = (self.nose_tip.x - center_x).abs();
        let vertical = (self.nose_tip.y - center_y).abs();

        horizontal > HEAD_TURN_LIMIT * face_width || vertical > HEAD_TILT_LIMIT
    }
}

/// Classifies eye contact from the face mesh
pub struct EyeContactClassifier;

impl EyeContactClassifier {
    /// Classify a face, `None` meaning no face in the frame
    pub fn classify(face: Option<&LandmarkSet>) -> EyeContactResult {
        let Some(face) = face else {
            return EyeContactResult::not_detected();
        };
        let Some(frame) = FaceFrame::extract(face) else {
            return EyeContactResult::not_detected();
        };

        if frame.mean_aspect_ratio() < EYES_CLOSED_EAR {
            return EyeContactResult::new(EyeContactStatus::EyesClosed, 0.95);
        }

        if frame.head_turned() {
            return EyeContactResult::new(EyeContactStatus::LookingAway, 0.85);
        }

        let irises = FacePoint::LeftIris
            .in_set(face)
            .zip(FacePoint::RightIris.in_set(face));
        Self::status_for(Self::gaze_score(&frame.left_eye, &frame.right_eye, frame.nose_tip, irises))
    }

    /// Accumulate gaze evidence for an open, frontal face
    pub fn gaze_score(
        left_eye: &EyeGeometry,
        right_eye: &EyeGeometry,
        nose_tip: Landmark,
        irises: Option<(Landmark, Landmark)>,
    ) -> GazeScore {
        let mut score = GazeScore::default();

        if let Some((left_iris, right_iris)) = irises {
            let deviation =
                (iris_deviation(left_eye, &left_iris) + iris_deviation(right_eye, &right_iris)) / 2.0;
            if deviation < 0.15 {
                score.add(GazeScore::IRIS_CENTERED);
            } else if deviation < 0.25 {
                score.add(GazeScore::IRIS_NEAR_CENTER);
            }
        }

        let left_center = left_eye.center();
        let right_center = right_eye.center();

        if (left_center.y - right_center.y).abs() < 0.02 {
            score.add(GazeScore::EYES_LEVEL);
        }

        let eyes_mid_x = (left_center.x + right_center.x) / 2.0;
        if (eyes_mid_x - nose_tip.x).abs() < 0.03 {
            score.add(GazeScore::EYES_OVER_NOSE);
        }

        score
    }

    /// Map a gaze score to a status band and confidence
    pub fn status_for(score: GazeScore) -> EyeContactResult {
        let s = score.value();
        match score.0 {
            7..=u8::MAX => EyeContactResult::new(EyeContactStatus::Strong, (0.75 + s * 0.2).min(0.95)),
            5..=6 => EyeContactResult::new(EyeContactStatus::Maintained, (0.70 + s * 0.15).min(0.90)),
            3..=4 => EyeContactResult::new(EyeContactStatus::Moderate, 0.65 + s * 0.10),
            _ => EyeContactResult::new(EyeContactStatus::NotMaintained, 0.50 + s * 0.20),
        }
    }
}

/// Horizontal iris offset from the corner midpoint, relative to eye width
fn iris_deviation(eye: &EyeGeometry, iris: &Landmark) -> f32 {
    let mid_x = (eye.inner.x + eye.outer.x) / 2.0;
    (iris.x - mid_x).abs() / (eye.width() + EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::*;
    use proptest::prelude::*;

    fn close_eyes(face: LandmarkSet, gap: f32) -> LandmarkSet {
        face.with(FacePoint::LeftEyeTop.index(), point(0.40, 0.40 - gap / 2.0))
            .with(FacePoint::LeftEyeBottom.index(), point(0.40, 0.40 + gap / 2.0))
            .with(FacePoint::RightEyeTop.index(), point(0.60, 0.40 - gap / 2.0))
            .with(FacePoint::RightEyeBottom.index(), point(0.60, 0.40 + gap / 2.0))
    }

    #[test]
    fn test_frontal_face_is_strong_contact() {
        let result = EyeContactClassifier::classify(Some(&frontal_face()));

        assert_eq!(result.status, EyeContactStatus::Strong);
        assert!((result.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_low_ear_is_eyes_closed() {
        // Eye width 0.08, gap 0.0081 gives EAR 0.10
        let face = close_eyes(frontal_face(), 0.0081);
        let result = EyeContactClassifier::classify(Some(&face));

        assert_eq!(result.status, EyeContactStatus::EyesClosed);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_eyes_closed_beats_turned_head() {
        let face = close_eyes(frontal_face(), 0.0081)
            .with(FacePoint::NoseTip.index(), point(0.65, 0.55));
        let result = EyeContactClassifier::classify(Some(&face));

        assert_eq!(result.status, EyeContactStatus::EyesClosed);
    }

    #[test]
    fn test_turned_head_is_looking_away() {
        // Face width 0.4, limit 0.06
        let face = frontal_face().with(FacePoint::NoseTip.index(), point(0.58, 0.55));
        let result = EyeContactClassifier::classify(Some(&face));

        assert_eq!(result.status, EyeContactStatus::LookingAway);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_tilted_head_is_looking_away() {
        let face = frontal_face().with(FacePoint::NoseTip.index(), point(0.50, 0.75));
        let result = EyeContactClassifier::classify(Some(&face));

        assert_eq!(result.status, EyeContactStatus::LookingAway);
    }

    #[test]
    fn test_off_center_irises_lower_the_band() {
        // Irises pushed 0.2 of eye width off center, eyes level, nose aligned
        let face = frontal_face()
            .with(FacePoint::LeftIris.index(), point(0.416, 0.40))
            .with(FacePoint::RightIris.index(), point(0.616, 0.40));
        let result = EyeContactClassifier::classify(Some(&face));

        // 0.3 + 0.2 + 0.3
        assert_eq!(result.status, EyeContactStatus::Strong);

        let face = face
            .with(FacePoint::LeftIris.index(), point(0.44, 0.40))
            .with(FacePoint::RightIris.index(), point(0.64, 0.40));
        let result = EyeContactClassifier::classify(Some(&face));

        // 0.0 + 0.2 + 0.3
        assert_eq!(result.status, EyeContactStatus::Maintained);
        assert!((result.confidence - 0.775).abs() < 1e-6);
    }

    #[test]
    fn test_missing_irises_skip_iris_stage() {
        let mut face = LandmarkSet::new();
        for (i, l) in frontal_face().iter().enumerate() {
            if let Some(l) = l {
                if i != FacePoint::LeftIris.index() && i != FacePoint::RightIris.index() {
                    face.set(i, *l);
                }
            }
        }
        let result = EyeContactClassifier::classify(Some(&face));

        assert_eq!(result.status, EyeContactStatus::Maintained);
    }

    #[test]
    fn test_missing_eye_corner_is_not_detected() {
        let face = LandmarkSet::new().with(FacePoint::NoseTip.index(), point(0.5, 0.5));

        assert_eq!(EyeContactClassifier::classify(Some(&face)), EyeContactResult::not_detected());
        assert_eq!(EyeContactClassifier::classify(None).status.to_string(), "not detected");
    }

    #[test]
    fn test_status_bands() {
        let band = |tenths| EyeContactClassifier::status_for(GazeScore(tenths));

        assert_eq!(band(10).status, EyeContactStatus::Strong);
        assert!((band(10).confidence - 0.95).abs() < 1e-6);
        assert!((band(7).confidence - 0.89).abs() < 1e-6);
        assert_eq!(band(5).status, EyeContactStatus::Maintained);
        assert!((band(5).confidence - 0.775).abs() < 1e-6);
        assert_eq!(band(3).status, EyeContactStatus::Moderate);
        assert!((band(3).confidence - 0.68).abs() < 1e-6);
        assert_eq!(band(2).status, EyeContactStatus::NotMaintained);
        assert!((band(2).confidence - 0.54).abs() < 1e-6);
        assert!((band(0).confidence - 0.50).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_low_ear_always_closed(
            gap_ratio in 0.0f32..0.19,
            nose_x in 0.0f32..1.0,
            nose_y in 0.0f32..1.0,
            iris_x in 0.0f32..1.0,
        ) {
            // Eye width 0.08 plus epsilon; EAR stays below 0.19
            let face = close_eyes(frontal_face(), gap_ratio * 0.081)
                .with(FacePoint::NoseTip.index(), point(nose_x, nose_y))
                .with(FacePoint::LeftIris.index(), point(iris_x, 0.4));
            let result = EyeContactClassifier::classify(Some(&face));

            prop_assert_eq!(result.status, EyeContactStatus::EyesClosed);
            prop_assert_eq!(result.confidence, 0.95);
        }
    }
}
