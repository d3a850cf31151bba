//! Background tasks module
//!
//! This module contains the task that owns the timer engine alongside the
//! HTTP server.

pub mod engine_driver;

// Re-export main functions
pub use engine_driver::{engine_driver_task, spawn_engine, ActionRequest, EngineHandle};
