//! Synthetic recording - scripted landmark frames for demos
//!
//! The subject cycles through four 5-second scenes: attentive, smiling,
//! glancing away and eyes closed. Every point gets a little jitter.

use std::time::Duration;

use poise_core::{
    HolisticFrame, Landmark, LandmarkSet, StateTime, FACE_LANDMARK_COUNT, POSE_LANDMARK_COUNT,
};
use poise_visual::{FacePoint, PosePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 30 frames per second
pub const FRAME_PERIOD: Duration = Duration::from_micros(33_333);

const SCENE_LENGTH_SECS: u64 = 5;
const JITTER: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scene {
    Attentive,
    Smiling,
    GlancingAway,
    EyesClosed,
}

impl Scene {
    fn at(elapsed: Duration) -> Self {
        match (elapsed.as_secs() / SCENE_LENGTH_SECS) % 4 {
            0 => Scene::Attentive,
            1 => Scene::Smiling,
            2 => Scene::GlancingAway,
            _ => Scene::EyesClosed,
        }
    }
}

/// Iterator of timestamped synthetic frames
pub struct SyntheticRecording {
    rng: StdRng,
    start: StateTime,
    remaining: usize,
    index: u32,
}

impl SyntheticRecording {
    pub fn new(frames: usize, start: StateTime, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            start,
            remaining: frames,
            index: 0,
        }
    }

    fn jitter(&mut self, x: f32, y: f32) -> Landmark {
        Landmark::new(
            x + self.rng.gen_range(-JITTER..=JITTER),
            y + self.rng.gen_range(-JITTER..=JITTER),
        )
        .with_visibility(self.rng.gen_range(0.85..=1.0))
    }

    fn face(&mut self, scene: Scene) -> LandmarkSet {
        let (corner_y, brow_y) = match scene {
            Scene::Smiling => (0.78, 0.40),
            _ => (0.72, 0.35),
        };
        let (lid_top, lid_bottom) = match scene {
            Scene::EyesClosed => (0.398, 0.402),
            _ => (0.39, 0.41),
        };
        let nose_x = match scene {
            Scene::GlancingAway => 0.58,
            _ => 0.50,
        };

        let layout = [
            (FacePoint::MouthCenter, 0.50, 0.70),
            (FacePoint::UpperLip, 0.50, 0.72),
            (FacePoint::LowerLip, 0.50, 0.73),
            (FacePoint::MouthLeftCorner, 0.44, corner_y),
            (FacePoint::MouthRightCorner, 0.56, corner_y),
            (FacePoint::NoseTip, nose_x, 0.55),
            (FacePoint::NoseBridge, 0.50, 0.40),
            (FacePoint::LeftNostril, nose_x - 0.02, 0.60),
            (FacePoint::RightNostril, nose_x + 0.02, 0.60),
            (FacePoint::LeftEyeOuter, 0.36, 0.40),
            (FacePoint::LeftEyeInner, 0.44, 0.40),
            (FacePoint::LeftEyeTop, 0.40, lid_top),
            (FacePoint::LeftEyeBottom, 0.40, lid_bottom),
            (FacePoint::RightEyeInner, 0.56, 0.40),
            (FacePoint::RightEyeOuter, 0.64, 0.40),
            (FacePoint::RightEyeTop, 0.60, lid_top),
            (FacePoint::RightEyeBottom, 0.60, lid_bottom),
            (FacePoint::LeftBrowInner, 0.43, brow_y),
            (FacePoint::LeftBrowOuter, 0.37, brow_y),
            (FacePoint::RightBrowInner, 0.57, brow_y),
            (FacePoint::RightBrowOuter, 0.63, brow_y),
            (FacePoint::LeftCheek, 0.30, 0.55),
            (FacePoint::RightCheek, 0.70, 0.55),
            (FacePoint::Chin, 0.50, 0.70),
            (FacePoint::LeftIris, 0.40, 0.40),
            (FacePoint::RightIris, 0.60, 0.40),
        ];

        let mut face = LandmarkSet::with_len(FACE_LANDMARK_COUNT);
        for (point, x, y) in layout {
            let landmark = self.jitter(x, y);
            face.set(point.index(), landmark);
        }
        face
    }

    fn pose(&mut self, slouching: bool) -> LandmarkSet {
        let hip_y = if slouching { 0.45 } else { 0.66 };
        let layout = [
            (PosePoint::LeftShoulder, 0.40, 0.30),
            (PosePoint::RightShoulder, 0.60, 0.30),
            (PosePoint::LeftHip, 0.42, hip_y),
            (PosePoint::RightHip, 0.58, hip_y),
        ];

        let mut pose = LandmarkSet::with_len(POSE_LANDMARK_COUNT);
        for (point, x, y) in layout {
            let landmark = self.jitter(x, y);
            pose.set(point.index(), landmark);
        }
        pose
    }

    fn world(&mut self) -> LandmarkSet {
        let visibility = self.rng.gen_range(0.6..=0.95);
        LandmarkSet::from_points(
            (0..POSE_LANDMARK_COUNT).map(|_| Landmark::new(0.0, 0.0).with_visibility(visibility)),
        )
    }

    fn hand(&mut self, x: f32) -> Option<LandmarkSet> {
        if !self.rng.gen_bool(0.6) {
            return None;
        }
        let visibility = self.rng.gen_range(0.5..=1.0);
        Some(LandmarkSet::from_points(
            (0..poise_core::HAND_LANDMARK_COUNT)
                .map(|i| Landmark::new(x, 0.6 + i as f32 * 0.01).with_visibility(visibility)),
        ))
    }
}

impl Iterator for SyntheticRecording {
    type Item = HolisticFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let elapsed = FRAME_PERIOD * self.index;
        self.index += 1;
        let scene = Scene::at(elapsed);

        // The tracker drops the face now and then
        let face = if self.rng.gen_bool(0.05) {
            None
        } else {
            Some(self.face(scene))
        };
        let slouching = scene == Scene::EyesClosed;
        let pose = self.pose(slouching);
        let world = self.world();
        let left = self.hand(0.25);
        let right = self.hand(0.75);

        let mut frame = HolisticFrame::empty()
            .with_timestamp(self.start + elapsed)
            .with_pose(pose)
            .with_pose_world(world)
            .with_hands(left, right);
        frame.face = face;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_visual::{EyeContactStatus, FrameAnalyzer};

    #[test]
    fn test_frame_count_and_cadence() {
        let start = StateTime::from_millis(1_000);
        let frames: Vec<HolisticFrame> = SyntheticRecording::new(31, start, Some(1)).collect();

        assert_eq!(frames.len(), 31);
        assert_eq!(frames[0].captured_at(), Some(start));
        // 30 frames later is just under one second
        assert_eq!(frames[30].timestamp, Some(1_999));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a: Vec<_> = SyntheticRecording::new(10, StateTime::ZERO, Some(42))
            .map(|f| f.hands_detected())
            .collect();
        let b: Vec<_> = SyntheticRecording::new(10, StateTime::ZERO, Some(42))
            .map(|f| f.hands_detected())
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scenes_classify() {
        let start = StateTime::ZERO;
        let frames: Vec<HolisticFrame> = SyntheticRecording::new(600, start, Some(3)).collect();
        let status_at = |secs: usize| {
            frames[secs * 30..]
                .iter()
                .find(|f| f.face_detected())
                .map(|f| FrameAnalyzer::analyze(f, start).eye_contact)
        };

        assert_eq!(status_at(2), Some(EyeContactStatus::Strong));
        assert_eq!(status_at(12), Some(EyeContactStatus::LookingAway));
        assert_eq!(status_at(17), Some(EyeContactStatus::EyesClosed));
    }
}
