//! State management module
//!
//! This module contains the shared application state handed to every HTTP
//! handler and the errors raised while talking to the engine task.

pub mod app_state;
pub mod error;

// Re-export main types
pub use app_state::AppState;
pub use error::DispatchError;
