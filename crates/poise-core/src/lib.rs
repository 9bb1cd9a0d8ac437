//! Poise Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every Poise layer:
//! - Time primitives (StateTime, ObservationWindow)
//! - Landmark input (Landmark, LandmarkSet, HolisticFrame)
//! - Behavioral labels (Emotion, Hand)
//! - Boundary errors

pub mod error;
pub mod label;
pub mod landmark;
pub mod time;

pub use error::*;
pub use label::*;
pub use landmark::*;
pub use time::*;
