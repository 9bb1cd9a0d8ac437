//! Fuzz classifiers and aggregation with arbitrary sparse landmark sets

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use poise_core::{HolisticFrame, Landmark, LandmarkSet, StateTime};
use poise_visual::FrameAnalyzer;
use poise_window::{SlidingWindowBuffer, SummaryAggregator};

#[derive(Debug, Arbitrary)]
struct Point {
    index: u16,
    x: f32,
    y: f32,
    visibility: Option<f32>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    face: Vec<Point>,
    pose: Vec<Point>,
    left_hand: Vec<Point>,
    right_hand: Vec<Point>,
    timestamps: Vec<i32>,
}

fn set(points: &[Point], limit: usize) -> Option<LandmarkSet> {
    if points.is_empty() {
        return None;
    }
    let mut set = LandmarkSet::new();
    for p in points {
        let mut landmark = Landmark::new(p.x, p.y);
        landmark.visibility = p.visibility;
        set.set(usize::from(p.index) % limit, landmark);
    }
    Some(set)
}

fuzz_target!(|input: Input| {
    let mut frame = HolisticFrame::empty().with_hands(
        set(&input.left_hand, poise_core::HAND_LANDMARK_COUNT),
        set(&input.right_hand, poise_core::HAND_LANDMARK_COUNT),
    );
    frame.face = set(&input.face, poise_core::FACE_LANDMARK_COUNT);
    frame.pose = set(&input.pose, poise_core::POSE_LANDMARK_COUNT);

    let mut buffer = SlidingWindowBuffer::default();
    for ms in input.timestamps.iter().take(64) {
        let at = StateTime::from_millis(i64::from(*ms));
        let record = FrameAnalyzer::analyze(&frame, at);
        assert!((0.0..=1.0).contains(&record.expression_confidence));
        buffer.push(record, at);
    }

    let summary = SummaryAggregator::aggregate(&buffer, StateTime::ZERO);
    assert_eq!(summary.is_some(), !buffer.is_empty());
});
