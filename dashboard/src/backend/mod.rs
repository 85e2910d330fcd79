//! Frame loop backends.

pub mod headless;

pub use headless::{install_signal_handlers, run, ExitReason, LoopConfig, LoopSummary};
