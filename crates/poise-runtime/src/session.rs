//! Analysis session - one start/stop lifecycle over the frame window
//!
//! Every entry point takes `now` explicitly; the session never reads
//! the clock itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use poise_core::{HolisticFrame, PoiseResult, StateTime};
use poise_visual::{FrameAnalyzer, FrameRecord};
use poise_window::{CycleSummary, SlidingWindowBuffer, SummaryAggregator, SummaryHistory};
use tracing::{debug, info};

use crate::{ExportDocument, SessionConfig};

/// Session shared between the frame path and the scheduler
pub type SharedSession = Arc<Mutex<AnalysisSession>>;

/// Lifetime counters
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub frames_processed: u64,
    /// Frames that arrived while the session was stopped
    pub frames_ignored: u64,
    pub cycles: u64,
    /// Summary ticks that found the window empty
    pub empty_ticks: u64,
}

/// Owns the frame window, the summary history and the run state
#[derive(Debug)]
pub struct AnalysisSession {
    config: SessionConfig,
    buffer: SlidingWindowBuffer,
    history: SummaryHistory,
    running: bool,
    started_at: Option<StateTime>,
    elapsed_secs: u64,
    frame_count: u64,
    /// Frames processed since the last summary tick
    pending_frames: u64,
    last_update: Option<StateTime>,
    stats: SessionStats,
}

impl AnalysisSession {
    /// Create a stopped session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            buffer: SlidingWindowBuffer::new(config.window),
            history: SummaryHistory::new(),
            running: false,
            started_at: None,
            elapsed_secs: 0,
            frame_count: 0,
            pending_frames: 0,
            last_update: None,
            stats: SessionStats::default(),
            config,
        }
    }

    /// Wrap in a [`SharedSession`]
    pub fn shared(config: SessionConfig) -> SharedSession {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// Start processing frames; no-op if already running
    pub fn start(&mut self, now: StateTime) {
        if self.running {
            return;
        }
        self.running = true;
        self.started_at = Some(now);
        self.frame_count = 0;
        self.pending_frames = 0;
        self.elapsed_secs = 0;

        info!("analysis session started ({})", self.config);
    }

    /// Classify a frame and push it into the window
    ///
    /// Returns `None` while stopped. The record is stamped with the
    /// frame's capture time, or `now` when the tracker gave none; the
    /// window is trimmed against `now` either way.
    pub fn process_frame(&mut self, frame: &HolisticFrame, now: StateTime) -> Option<FrameRecord> {
        if !self.running {
            self.stats.frames_ignored += 1;
            debug!("frame ignored, session stopped");
            return None;
        }

        let at = frame.captured_at().unwrap_or(now);
        let record = FrameAnalyzer::analyze(frame, at);
        self.buffer.push(record.clone(), now);
        self.frame_count += 1;
        self.pending_frames += 1;
        self.stats.frames_processed += 1;

        Some(record)
    }

    /// Aggregation step
    ///
    /// Appends one summary to the history, or does nothing when stopped
    /// or when the window is empty.
    pub fn tick(&mut self, now: StateTime) -> Option<CycleSummary> {
        if !self.running {
            return None;
        }
        self.pending_frames = 0;

        let Some(summary) = SummaryAggregator::aggregate(&self.buffer, now) else {
            self.stats.empty_ticks += 1;
            debug!("summary tick skipped, window empty");
            return None;
        };

        let summary = self.history.append(summary).clone();
        self.last_update = Some(now);
        self.stats.cycles += 1;
        Some(summary)
    }

    /// Elapsed-time step: whole seconds since start
    pub fn advance_clock(&mut self, now: StateTime) {
        if !self.running {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed_secs = (now - started_at).as_secs();
        }
    }

    /// Stop processing and drop the window; history and elapsed time stay
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.started_at = None;
        self.buffer.clear();
        self.frame_count = 0;
        self.pending_frames = 0;

        info!(
            "analysis session stopped after {}s, {} cycles recorded",
            self.elapsed_secs,
            self.history.len()
        );
    }

    /// Forget every recorded cycle
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.last_update = None;
    }

    /// Export document for the current history
    pub fn export(&self, now: StateTime) -> ExportDocument {
        ExportDocument::from_history(&self.history, self.elapsed_secs, now)
    }

    /// Export and write under `dir` using the configured prefix
    pub fn export_to_dir(&self, dir: &Path, now: StateTime) -> PoiseResult<PathBuf> {
        self.export(now).write_to_dir(dir, &self.config.export_prefix, now)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &SummaryHistory {
        &self.history
    }

    /// Records currently in the window
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Frames processed since the last start
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames processed since the last summary tick, not yet part of any cycle
    pub fn pending_frames(&self) -> u64 {
        self.pending_frames
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Time of the last appended summary
    pub fn last_update(&self) -> Option<StateTime> {
        self.last_update
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_core::{Hand, Landmark, LandmarkSet};
    use poise_visual::{ExpressionLabel, PostureLabel};
    use proptest::prelude::*;
    use std::time::Duration;

    fn at(ms: i64) -> StateTime {
        StateTime::from_millis(ms)
    }

    fn frame_with_hand(ms: i64) -> HolisticFrame {
        let hand = LandmarkSet::from_points([Landmark::new(0.5, 0.5).with_visibility(0.9)]);
        HolisticFrame::empty()
            .with_timestamp(at(ms))
            .with_hands(Some(hand), None)
    }

    #[test]
    fn test_session_creation() {
        let session = AnalysisSession::default();

        assert!(!session.is_running());
        assert!(session.history().is_empty());
        assert_eq!(session.buffer_len(), 0);
        assert_eq!(session.last_update(), None);
    }

    #[test]
    fn test_frames_ignored_while_stopped() {
        let mut session = AnalysisSession::default();

        assert!(session.process_frame(&frame_with_hand(0), at(0)).is_none());
        assert_eq!(session.buffer_len(), 0);
        assert_eq!(session.stats().frames_ignored, 1);
        assert!(session.tick(at(10_000)).is_none());
    }

    #[test]
    fn test_process_and_tick() {
        let mut session = AnalysisSession::default();
        session.start(at(0));

        for ms in [100, 200, 300] {
            let record = session.process_frame(&frame_with_hand(ms), at(ms + 5)).unwrap();
            assert_eq!(record.timestamp, at(ms));
            assert_eq!(record.dominant_hand, Hand::Left);
            assert_eq!(record.expression, ExpressionLabel::NotDetected);
        }
        assert_eq!(session.frame_count(), 3);
        assert_eq!(session.buffer_len(), 3);

        let summary = session.tick(at(10_000)).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.hands_detected, 1);
        assert_eq!(summary.dominant_hand, Hand::Left);
        assert_eq!(summary.posture, PostureLabel::NotDetected);
        assert!(!summary.face_detected);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.last_update(), Some(at(10_000)));

        // The window is not consumed by a tick
        assert!(session.tick(at(20_000)).is_some());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_untimestamped_frame_uses_now() {
        let mut session = AnalysisSession::default();
        session.start(at(0));

        let record = session.process_frame(&HolisticFrame::empty(), at(4_242)).unwrap();
        assert_eq!(record.timestamp, at(4_242));
    }

    #[test]
    fn test_empty_tick_is_noop() {
        let mut session = AnalysisSession::default();
        session.start(at(0));

        assert!(session.tick(at(10_000)).is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.last_update(), None);
        assert_eq!(session.stats().empty_ticks, 1);
    }

    #[test]
    fn test_window_trims_old_frames() {
        let config = SessionConfig::default().with_window(Duration::from_secs(2));
        let mut session = AnalysisSession::new(config);
        session.start(at(0));

        for ms in (0..=5_000).step_by(500) {
            session.process_frame(&frame_with_hand(ms), at(ms));
        }
        // [3 s, 5 s] at 500 ms spacing
        assert_eq!(session.buffer_len(), 5);
        assert_eq!(session.frame_count(), 11);
    }

    #[test]
    fn test_late_frame_is_trimmed_against_now() {
        let mut session = AnalysisSession::default();
        session.start(at(0));

        // Captured 20 s before it reached the session
        let record = session.process_frame(&frame_with_hand(0), at(20_000)).unwrap();
        assert_eq!(record.timestamp, at(0));
        assert_eq!(session.buffer_len(), 0);
        assert_eq!(session.frame_count(), 1);
        assert!(session.tick(at(20_000)).is_none());
        assert!(session.history().is_empty());

        // Within the window of now it is kept
        session.process_frame(&frame_with_hand(12_000), at(21_000));
        assert_eq!(session.buffer_len(), 1);
        assert_eq!(session.tick(at(21_000)).map(|s| s.frames), Some(1));
    }

    #[test]
    fn test_pending_frames_reset_on_tick() {
        let mut session = AnalysisSession::default();
        session.start(at(0));

        for ms in [100, 200, 300] {
            session.process_frame(&frame_with_hand(ms), at(ms));
        }
        assert_eq!(session.pending_frames(), 3);

        session.tick(at(1_000));
        assert_eq!(session.pending_frames(), 0);

        // The window still holds the summarized frames
        session.process_frame(&frame_with_hand(1_100), at(1_100));
        assert_eq!(session.buffer_len(), 4);
        assert_eq!(session.pending_frames(), 1);

        session.stop();
        assert_eq!(session.pending_frames(), 0);
    }

    #[test]
    fn test_clock_floors_seconds() {
        let mut session = AnalysisSession::default();
        session.advance_clock(at(5_000));
        assert_eq!(session.elapsed_secs(), 0);

        session.start(at(1_000));
        session.advance_clock(at(3_999));
        assert_eq!(session.elapsed_secs(), 2);
        session.advance_clock(at(4_000));
        assert_eq!(session.elapsed_secs(), 3);
    }

    #[test]
    fn test_stop_keeps_history_and_elapsed() {
        let mut session = AnalysisSession::default();
        session.start(at(0));
        session.process_frame(&frame_with_hand(100), at(100));
        session.tick(at(10_000));
        session.advance_clock(at(12_000));

        session.stop();

        assert!(!session.is_running());
        assert_eq!(session.buffer_len(), 0);
        assert_eq!(session.frame_count(), 0);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.elapsed_secs(), 12);

        // Clock no longer moves after stop
        session.advance_clock(at(20_000));
        assert_eq!(session.elapsed_secs(), 12);

        // Restart resets the counters
        session.start(at(30_000));
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.history().len(), 1);

        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.last_update(), None);
    }

    #[test]
    fn test_start_twice_keeps_origin() {
        let mut session = AnalysisSession::default();
        session.start(at(0));
        session.start(at(5_000));
        session.advance_clock(at(6_000));
        assert_eq!(session.elapsed_secs(), 6);
    }

    #[test]
    fn test_export() {
        let mut session = AnalysisSession::default();
        session.start(at(1_714_557_600_000));
        session.process_frame(&frame_with_hand(1_714_557_605_000), at(1_714_557_605_000));
        session.tick(at(1_714_557_610_000));
        session.process_frame(&frame_with_hand(1_714_557_615_000), at(1_714_557_615_000));
        session.tick(at(1_714_557_620_000));
        session.advance_clock(at(1_714_557_621_500));

        let doc = session.export(at(1_714_557_622_000));
        assert_eq!(doc.total_cycles, 2);
        assert_eq!(doc.session_duration, 21);
        assert_eq!(doc.summaries[1].timestamp, "2024-05-01T10:00:20.000Z");
        assert_eq!(doc.summaries[1].dominant_hand, "left");
        assert_eq!(doc.summaries[1].hands_detected, 1);
    }

    proptest! {
        #[test]
        fn prop_summary_only_covers_window_of_now(
            frames in proptest::collection::vec((0i64..1_000, 0i64..25_000), 1..100),
        ) {
            let mut session = AnalysisSession::default();
            session.start(at(0));

            let mut now = 0;
            let mut stamps = Vec::new();
            for (advance, lag) in &frames {
                now += advance;
                let stamp = now - lag;
                stamps.push(stamp);
                session.process_frame(&frame_with_hand(stamp), at(now));
            }

            let in_window = stamps.iter().filter(|ms| **ms >= now - 10_000).count();
            prop_assert_eq!(session.buffer_len(), in_window);
            let summarized = session.tick(at(now)).map_or(0, |s| s.frames);
            prop_assert_eq!(summarized, in_window);
        }
    }
}
