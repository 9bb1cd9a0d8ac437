//! Poise Visual - Behavioral state from landmarks
//!
//! Landmarks are geometry. This crate turns them into MEANING:
//! what the face expresses, how the body sits, whether the eyes
//! meet the camera, which hand leads.
//!
//! # Per-frame pipeline
//!
//! ```text
//! HolisticFrame ──► features ──► ExpressionClassifier ──┐
//!                            ├─► PostureClassifier ─────┤
//!                            ├─► EyeContactClassifier ──┼─► FrameRecord
//!                            └─► HandednessResolver ────┘
//! ```
//!
//! Every classifier is total: missing landmarks degrade to a
//! "not detected" result with zero confidence, never an error.

pub mod expression;
pub mod features;
pub mod frame;
pub mod gaze;
pub mod hands;
pub mod posture;

pub use expression::*;
pub use features::*;
pub use frame::*;
pub use gaze::*;
pub use hands::*;
pub use posture::*;
