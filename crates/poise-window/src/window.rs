//! Sliding window - the trailing span of classified frames
//!
//! Records are kept in timestamp order. Every push trims whatever fell
//! out of the window relative to the caller's `now`; nothing is trimmed
//! lazily on read.

use std::collections::VecDeque;
use std::time::Duration;

use poise_core::{ObservationWindow, StateTime};
use poise_visual::FrameRecord;

/// Default window length
pub const WINDOW_LENGTH: Duration = Duration::from_secs(10);

/// Time-bounded buffer of frame records
#[derive(Debug, Clone)]
pub struct SlidingWindowBuffer {
    /// Records ordered by timestamp
    records: VecDeque<FrameRecord>,

    /// How far back from `now` to keep
    window: Duration,
}

impl SlidingWindowBuffer {
    /// Create a buffer with the given window length
    pub fn new(window: Duration) -> Self {
        Self {
            records: VecDeque::new(),
            window,
        }
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Add a record observed at `now` and trim everything older than
    /// `now - window`
    ///
    /// Out-of-order records are inserted at their timestamp position. A
    /// record already older than the window is dropped by the same trim.
    pub fn push(&mut self, record: FrameRecord, now: StateTime) {
        let pos = self
            .records
            .iter()
            .rposition(|r| r.timestamp <= record.timestamp)
            .map_or(0, |p| p + 1);

        self.records.insert(pos, record);
        self.trim(now);
    }

    fn trim(&mut self, now: StateTime) {
        let window = ObservationWindow::new(now, self.window);

        while let Some(front) = self.records.front() {
            if window.retains(front.timestamp) {
                break;
            }
            self.records.pop_front();
        }
    }

    /// Timestamp of the newest record
    pub fn newest(&self) -> Option<StateTime> {
        self.records.back().map(|r| r.timestamp)
    }

    /// Records in timestamp order
    pub fn iter(&self) -> impl Iterator<Item = &FrameRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for SlidingWindowBuffer {
    fn default() -> Self {
        Self::new(WINDOW_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use proptest::prelude::*;

    fn at(ms: i64) -> StateTime {
        StateTime::from_millis(ms)
    }

    fn oldest(buffer: &SlidingWindowBuffer) -> Option<StateTime> {
        buffer.iter().next().map(|r| r.timestamp)
    }

    #[test]
    fn test_push_keeps_trailing_window() {
        let mut buffer = SlidingWindowBuffer::default();

        for ms in (0..=15_000).step_by(1_000) {
            buffer.push(record_at(ms), at(ms));
        }

        // Now at 15 s keeps [5 s, 15 s]
        assert_eq!(buffer.len(), 11);
        assert_eq!(oldest(&buffer), Some(at(5_000)));
        assert_eq!(buffer.newest(), Some(at(15_000)));
    }

    #[test]
    fn test_boundary_record_is_kept() {
        let mut buffer = SlidingWindowBuffer::default();
        buffer.push(record_at(0), at(0));
        buffer.push(record_at(10_000), at(10_000));
        assert_eq!(buffer.len(), 2);

        buffer.push(record_at(10_001), at(10_001));
        assert_eq!(buffer.len(), 2);
        assert_eq!(oldest(&buffer), Some(at(10_000)));
    }

    #[test]
    fn test_trim_follows_now_not_newest_record() {
        let mut buffer = SlidingWindowBuffer::default();
        buffer.push(record_at(0), at(0));
        buffer.push(record_at(1_000), at(1_000));

        // Late arrival captured 9 s ago pushes the clock past both older records
        buffer.push(record_at(12_000), at(21_000));
        assert_eq!(buffer.len(), 1);
        assert_eq!(oldest(&buffer), Some(at(12_000)));

        // Captured more than a window before now: never retained
        buffer.push(record_at(0), at(20_000));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_out_of_order_record_is_sorted_in() {
        let mut buffer = SlidingWindowBuffer::default();
        buffer.push(record_at(1_000), at(1_000));
        buffer.push(record_at(3_000), at(3_000));
        buffer.push(record_at(2_000), at(3_100));

        let order: Vec<i64> = buffer.iter().map(|r| r.timestamp.as_millis()).collect();
        assert_eq!(order, vec![1_000, 2_000, 3_000]);

        buffer.push(record_at(-20_000), at(3_200));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut buffer = SlidingWindowBuffer::new(Duration::from_secs(2));
        buffer.push(blank_at(0), at(0));
        buffer.push(blank_at(500), at(500));
        assert_eq!(buffer.window(), Duration::from_secs(2));

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.newest(), None);
    }

    proptest! {
        #[test]
        fn prop_window_never_holds_stale_records(
            frames in proptest::collection::vec((0i64..60_000, 0i64..15_000), 1..200),
        ) {
            let mut buffer = SlidingWindowBuffer::default();
            let mut now = 0;
            let mut stamps = Vec::new();
            for (advance, lag) in &frames {
                now = now.max(*advance);
                let stamp = now - lag;
                stamps.push(stamp);
                buffer.push(record_at(stamp), at(now));

                let left = at(now) - WINDOW_LENGTH;
                prop_assert!(buffer.iter().all(|r| r.timestamp >= left));
                prop_assert!(buffer
                    .iter()
                    .zip(buffer.iter().skip(1))
                    .all(|(a, b)| a.timestamp <= b.timestamp));
            }

            // Everything inside the final window survived
            let expected = stamps.iter().filter(|ms| **ms >= now - 10_000).count();
            prop_assert_eq!(buffer.len(), expected);
        }
    }
}
