//! Poise Window - From frames to cycles
//!
//! A single frame is noise. This crate reduces the recent past into
//! something a person can read:
//!
//! - [`SlidingWindowBuffer`] keeps the trailing 10 s of [`FrameRecord`]s
//! - [`SummaryAggregator`] folds that window into one [`CycleSummary`]
//! - [`SummaryHistory`] keeps every cycle, in time order, for display and export
//!
//! [`FrameRecord`]: poise_visual::FrameRecord

pub mod history;
pub mod summary;
pub mod vote;
pub mod window;

pub use history::*;
pub use summary::*;
pub use vote::*;
pub use window::*;
