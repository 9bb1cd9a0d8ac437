//! Poise Runtime - Session orchestration
//!
//! Two paths share one session:
//! 1. Frame path: every tracker frame is classified and pushed into the window
//! 2. Cycle path: a fixed-period timer folds the window into the history
//!
//! [`AnalysisSession`] owns the window, the history and the start/stop
//! state. [`SummaryScheduler`] drives the cycle path from a tokio task,
//! holding the session lock for each whole step.

pub mod config;
pub mod export;
pub mod logging;
pub mod scheduler;
pub mod session;

pub use config::*;
pub use export::*;
pub use logging::{init as init_logging, LogFormat};
pub use scheduler::*;
pub use session::*;
