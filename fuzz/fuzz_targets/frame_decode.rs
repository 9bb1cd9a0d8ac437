//! Fuzz the JSON-lines frame decoder and the per-frame pipeline
//!
//! Any line either fails to decode or classifies without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use poise_core::{HolisticFrame, StateTime};
use poise_visual::FrameAnalyzer;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(frame) = HolisticFrame::from_json_line(line) {
        let at = frame.captured_at().unwrap_or(StateTime::ZERO);
        let record = FrameAnalyzer::analyze(&frame, at);
        assert!(record.hands_detected <= 2);
    }
});
