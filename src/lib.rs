//! Sandglass - A state-managed hourglass countdown timer server
//!
//! This library provides the countdown engine (start, pause, resume, reset,
//! add-time, presets and chained presets), the scheduler abstraction it runs
//! on, and the HTTP surface that exposes a single timer session.

pub mod config;
pub mod engine;
pub mod hourglass;
pub mod scheduler;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{Action, Status, TimerEngine, TimerError, TimerSnapshot};
pub use state::AppState;
pub use api::create_router;
pub use tasks::spawn_engine;
pub use utils::signals::shutdown_signal;
