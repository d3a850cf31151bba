//! Collaborator implementations module
//!
//! This module contains the presenter and alarm used by the running service.
//! Both only observe the engine; neither can change its state.

pub mod alarm;
pub mod presenter;

// Re-export main types
pub use alarm::{AlarmConfig, HookAlarm};
pub use presenter::LogPresenter;
