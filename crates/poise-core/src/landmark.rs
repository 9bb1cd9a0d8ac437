//! Landmark input - per-frame keypoints from an external tracker
//!
//! Coordinates are normalized to [0, 1] with y growing downwards.
//! Index meaning is fixed by the tracker's face/pose/hand topologies;
//! an absent entry means the point was not detected.

use serde::{Deserialize, Serialize};

use crate::{PoiseError, PoiseResult, StateTime};

/// Face mesh size including the refined iris points
pub const FACE_LANDMARK_COUNT: usize = 478;
/// Body pose topology size
pub const POSE_LANDMARK_COUNT: usize = 33;
/// Hand topology size
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A single tracked point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Visibility/confidence [0.0 - 1.0]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Midpoint between two landmarks (2-D)
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Fixed-index, possibly sparse landmark sequence for one region
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Option<Landmark>>,
}

impl LandmarkSet {
    /// Empty set (nothing detected)
    pub fn new() -> Self {
        Self::default()
    }

    /// Dense set with every index present
    pub fn from_points(points: impl IntoIterator<Item = Landmark>) -> Self {
        Self {
            points: points.into_iter().map(Some).collect(),
        }
    }

    /// Sparse set with `len` absent slots
    pub fn with_len(len: usize) -> Self {
        Self {
            points: vec![None; len],
        }
    }

    /// Set a landmark, growing the set with absent slots as needed
    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if index >= self.points.len() {
            self.points.resize(index + 1, None);
        }
        self.points[index] = Some(landmark);
    }

    /// Builder form of [`LandmarkSet::set`]
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        self.set(index, landmark);
        self
    }

    /// Landmark at `index`, `None` if absent or out of range
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).and_then(Option::as_ref)
    }

    /// Number of slots (present or not)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Is at least one landmark present?
    pub fn is_detected(&self) -> bool {
        self.points.iter().any(Option::is_some)
    }

    /// Iterate over slots
    pub fn iter(&self) -> impl Iterator<Item = Option<&Landmark>> {
        self.points.iter().map(Option::as_ref)
    }

    /// Mean visibility over all slots; missing points and missing
    /// visibility count as 0. An empty set yields 0.
    pub fn mean_visibility(&self) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .points
            .iter()
            .map(|p| p.and_then(|l| l.visibility).unwrap_or(0.0))
            .sum();
        total / self.points.len() as f32
    }
}

/// Everything the tracker reports for one video frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticFrame {
    /// Capture time in epoch milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Screen-space pose landmarks
    #[serde(default)]
    pub pose: Option<LandmarkSet>,
    /// World-space pose landmarks, used only for pose confidence
    #[serde(default)]
    pub pose_world: Option<LandmarkSet>,
    #[serde(default)]
    pub face: Option<LandmarkSet>,
    #[serde(default)]
    pub left_hand: Option<LandmarkSet>,
    #[serde(default)]
    pub right_hand: Option<LandmarkSet>,
}

impl HolisticFrame {
    /// Frame with no detections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode one line of a JSON-lines recording
    pub fn from_json_line(line: &str) -> PoiseResult<Self> {
        serde_json::from_str(line).map_err(|e| PoiseError::InvalidFrame(e.to_string()))
    }

    pub fn with_timestamp(mut self, at: StateTime) -> Self {
        self.timestamp = Some(at.as_millis());
        self
    }

    pub fn with_face(mut self, face: LandmarkSet) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_pose(mut self, pose: LandmarkSet) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_pose_world(mut self, pose_world: LandmarkSet) -> Self {
        self.pose_world = Some(pose_world);
        self
    }

    pub fn with_hands(mut self, left: Option<LandmarkSet>, right: Option<LandmarkSet>) -> Self {
        self.left_hand = left;
        self.right_hand = right;
        self
    }

    /// Capture time, if the tracker stamped the frame
    pub fn captured_at(&self) -> Option<StateTime> {
        self.timestamp.map(StateTime::from_millis)
    }

    /// Face landmarks, only when something was detected
    pub fn detected_face(&self) -> Option<&LandmarkSet> {
        detected(&self.face)
    }

    /// Pose landmarks, only when something was detected
    pub fn detected_pose(&self) -> Option<&LandmarkSet> {
        detected(&self.pose)
    }

    pub fn detected_left_hand(&self) -> Option<&LandmarkSet> {
        detected(&self.left_hand)
    }

    pub fn detected_right_hand(&self) -> Option<&LandmarkSet> {
        detected(&self.right_hand)
    }

    pub fn face_detected(&self) -> bool {
        self.detected_face().is_some()
    }

    /// Number of detected hands (0, 1 or 2)
    pub fn hands_detected(&self) -> u8 {
        u8::from(self.detected_left_hand().is_some()) + u8::from(self.detected_right_hand().is_some())
    }

    /// Mean world-landmark visibility, 0 when absent
    pub fn pose_confidence(&self) -> f32 {
        self.pose_world
            .as_ref()
            .map(LandmarkSet::mean_visibility)
            .unwrap_or(0.0)
    }
}

fn detected(set: &Option<LandmarkSet>) -> Option<&LandmarkSet> {
    set.as_ref().filter(|s| s.is_detected())
}
