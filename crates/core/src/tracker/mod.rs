//! Request lifecycle tracking.
//!
//! The tracker polls the dispatch backend for one booking/report and drives
//! the session through {Idle, Polling, Succeeded, Cancelled, Failed}, with a
//! free-running cosmetic phase rotation and a guarded one-shot cancel
//! action.

mod cancel;
mod config;
mod poller;
mod types;

pub use cancel::*;
pub use config::*;
pub use poller::*;
pub use types::*;
