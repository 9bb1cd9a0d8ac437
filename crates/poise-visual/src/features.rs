//! Geometric features - named measurements over raw landmarks
//!
//! Extraction is a pure function of one landmark set. When any landmark
//! a feature needs is absent, the whole feature group is unavailable
//! (`None`) and the classifier downstream reports "not detected".

use poise_core::{Landmark, LandmarkSet};

/// Guard for ratios whose denominator can collapse to zero
pub const EPSILON: f32 = 0.001;

/// Face mesh indices the classifiers rely on
///
/// Left/right follow image space: the "left" eye is the one on the
/// left of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacePoint {
    MouthCenter = 0,
    NoseTip = 1,
    NoseBridge = 6,
    UpperLip = 13,
    LowerLip = 14,
    LeftNostril = 31,
    LeftEyeOuter = 33,
    RightNostril = 35,
    MouthLeftCorner = 61,
    LeftBrowOuter = 63,
    LeftBrowInner = 70,
    LeftEyeInner = 133,
    LeftEyeBottom = 145,
    Chin = 152,
    LeftEyeTop = 159,
    LeftCheek = 234,
    RightEyeOuter = 263,
    MouthRightCorner = 291,
    RightBrowOuter = 293,
    RightBrowInner = 300,
    RightEyeInner = 362,
    RightEyeBottom = 374,
    RightEyeTop = 386,
    RightCheek = 454,
    LeftIris = 468,
    RightIris = 473,
}

impl FacePoint {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look this point up in a face set
    #[inline]
    pub fn in_set(self, face: &LandmarkSet) -> Option<Landmark> {
        face.get(self.index()).copied()
    }
}

/// Body pose indices the classifiers rely on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosePoint {
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
}

impl PosePoint {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn in_set(self, pose: &LandmarkSet) -> Option<Landmark> {
        pose.get(self.index()).copied()
    }
}

/// One eye outlined by its four extreme points
#[derive(Debug, Clone, Copy)]
pub struct EyeGeometry {
    pub inner: Landmark,
    pub outer: Landmark,
    pub top: Landmark,
    pub bottom: Landmark,
}

impl EyeGeometry {
    pub fn left(face: &LandmarkSet) -> Option<Self> {
        Some(Self {
            inner: FacePoint::LeftEyeInner.in_set(face)?,
            outer: FacePoint::LeftEyeOuter.in_set(face)?,
            top: FacePoint::LeftEyeTop.in_set(face)?,
            bottom: FacePoint::LeftEyeBottom.in_set(face)?,
        })
    }

    pub fn right(face: &LandmarkSet) -> Option<Self> {
        Some(Self {
            inner: FacePoint::RightEyeInner.in_set(face)?,
            outer: FacePoint::RightEyeOuter.in_set(face)?,
            top: FacePoint::RightEyeTop.in_set(face)?,
            bottom: FacePoint::RightEyeBottom.in_set(face)?,
        })
    }

    /// Vertical lid gap
    #[inline]
    pub fn opening(&self) -> f32 {
        (self.top.y - self.bottom.y).abs()
    }

    /// Horizontal corner-to-corner width
    #[inline]
    pub fn width(&self) -> f32 {
        (self.outer.x - self.inner.x).abs()
    }

    /// Eye aspect ratio: opening over width
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.opening() / (self.width() + EPSILON)
    }

    /// Corner midpoint horizontally, lid midpoint vertically
    pub fn center(&self) -> Landmark {
        Landmark::new(
            (self.inner.x + self.outer.x) / 2.0,
            (self.top.y + self.bottom.y) / 2.0,
        )
    }
}

/// Facial measurements feeding the expression scores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceFeatures {
    /// Gap between upper and lower lip
    pub mouth_opening: f32,
    /// Distance between mouth corners
    pub mouth_width: f32,
    /// Mean corner height minus mouth-center height
    pub mouth_curvature: f32,
    /// Lid gap averaged over both eyes
    pub eye_opening: f32,
    /// Inner brow height minus eye-top height, averaged over both sides
    pub eyebrow_height: f32,
    /// Distance between nostrils
    pub nose_width: f32,
    /// Height difference between the two ends of the left brow
    pub brow_slant: f32,
    /// Height difference between nose tip and upper lip
    pub nose_lip_gap: f32,
}

impl FaceFeatures {
    /// Extract all facial features, or `None` if any landmark is missing
    pub fn extract(face: &LandmarkSet) -> Option<Self> {
        let upper_lip = FacePoint::UpperLip.in_set(face)?;
        let lower_lip = FacePoint::LowerLip.in_set(face)?;
        let left_corner = FacePoint::MouthLeftCorner.in_set(face)?;
        let right_corner = FacePoint::MouthRightCorner.in_set(face)?;
        let mouth_center = FacePoint::MouthCenter.in_set(face)?;

        let left_eye = EyeGeometry::left(face)?;
        let right_eye = EyeGeometry::right(face)?;

        let left_brow_inner = FacePoint::LeftBrowInner.in_set(face)?;
        let left_brow_outer = FacePoint::LeftBrowOuter.in_set(face)?;
        let right_brow_inner = FacePoint::RightBrowInner.in_set(face)?;

        let nose_tip = FacePoint::NoseTip.in_set(face)?;
        let left_nostril = FacePoint::LeftNostril.in_set(face)?;
        let right_nostril = FacePoint::RightNostril.in_set(face)?;

        let left_brow_height = left_brow_inner.y - left_eye.top.y;
        let right_brow_height = right_brow_inner.y - right_eye.top.y;

        Some(Self {
            mouth_opening: (upper_lip.y - lower_lip.y).abs(),
            mouth_width: (right_corner.x - left_corner.x).abs(),
            mouth_curvature: (left_corner.y + right_corner.y) / 2.0 - mouth_center.y,
            eye_opening: (left_eye.opening() + right_eye.opening()) / 2.0,
            eyebrow_height: (left_brow_height + right_brow_height) / 2.0,
            nose_width: (right_nostril.x - left_nostril.x).abs(),
            brow_slant: (left_brow_inner.y - left_brow_outer.y).abs(),
            nose_lip_gap: (nose_tip.y - upper_lip.y).abs(),
        })
    }
}

/// Torso measurements feeding the posture class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFeatures {
    pub shoulder_center: Landmark,
    pub hip_center: Landmark,
    /// Vertical shoulder-center to hip-center distance
    pub torso_height: f32,
    /// Vertical difference between the two shoulders
    pub shoulder_tilt: f32,
    /// Vertical hip-center to knee-center distance, when both knees are tracked
    pub hip_knee_height: Option<f32>,
}

impl PoseFeatures {
    /// Extract torso features; shoulders and hips on both sides are required
    pub fn extract(pose: &LandmarkSet) -> Option<Self> {
        let left_shoulder = PosePoint::LeftShoulder.in_set(pose)?;
        let right_shoulder = PosePoint::RightShoulder.in_set(pose)?;
        let left_hip = PosePoint::LeftHip.in_set(pose)?;
        let right_hip = PosePoint::RightHip.in_set(pose)?;

        let shoulder_center = left_shoulder.midpoint(&right_shoulder);
        let hip_center = left_hip.midpoint(&right_hip);

        let hip_knee_height = match (
            PosePoint::LeftKnee.in_set(pose),
            PosePoint::RightKnee.in_set(pose),
        ) {
            (Some(left_knee), Some(right_knee)) => {
                let knee_y = (left_knee.y + right_knee.y) / 2.0;
                Some((hip_center.y - knee_y).abs())
            }
            _ => None,
        };

        Some(Self {
            shoulder_center,
            hip_center,
            torso_height: (shoulder_center.y - hip_center.y).abs(),
            shoulder_tilt: (left_shoulder.y - right_shoulder.y).abs(),
            hip_knee_height,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_face_features_from_frontal_face() {
        let features = FaceFeatures::extract(&frontal_face()).unwrap();

        assert!((features.mouth_opening - 0.01).abs() < 1e-5);
        assert!((features.mouth_width - 0.12).abs() < 1e-5);
        assert!((features.mouth_curvature - 0.02).abs() < 1e-5);
        assert!((features.eye_opening - 0.02).abs() < 1e-5);
        assert!((features.eyebrow_height + 0.04).abs() < 1e-5);
        assert!((features.nose_width - 0.04).abs() < 1e-5);
        assert!(features.brow_slant.abs() < 1e-6);
    }

    #[test]
    fn test_face_features_missing_landmark() {
        let mut face = LandmarkSet::new();
        for (i, l) in frontal_face().iter().enumerate() {
            if let Some(l) = l {
                if i != FacePoint::RightNostril.index() {
                    face.set(i, *l);
                }
            }
        }
        assert!(FaceFeatures::extract(&face).is_none());
    }

    #[test]
    fn test_eye_geometry() {
        let face = frontal_face();
        let eye = EyeGeometry::left(&face).unwrap();

        assert!((eye.width() - 0.08).abs() < 1e-5);
        assert!((eye.opening() - 0.02).abs() < 1e-5);
        assert!((eye.aspect_ratio() - 0.02 / 0.081).abs() < 1e-4);
        assert!((eye.center().x - 0.40).abs() < 1e-5);
    }

    #[test]
    fn test_pose_features() {
        let features = PoseFeatures::extract(&torso(0.35, 0.05, Some(0.1))).unwrap();

        assert!((features.torso_height - 0.35).abs() < 1e-5);
        assert!((features.shoulder_tilt - 0.05).abs() < 1e-5);
        assert!((features.hip_knee_height.unwrap() - 0.1).abs() < 1e-5);

        let without_knees = PoseFeatures::extract(&torso(0.35, 0.05, None)).unwrap();
        assert!(without_knees.hip_knee_height.is_none());
    }

    #[test]
    fn test_pose_features_require_both_hips() {
        let pose = LandmarkSet::new()
            .with(PosePoint::LeftShoulder.index(), point(0.4, 0.3))
            .with(PosePoint::RightShoulder.index(), point(0.6, 0.3))
            .with(PosePoint::LeftHip.index(), point(0.4, 0.7));
        assert!(PoseFeatures::extract(&pose).is_none());
    }
}
