//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use super::DispatchError;
use crate::{
    config::Config,
    engine::{Action, TimerSnapshot},
    tasks::ActionRequest,
};

/// Shared state handed to every HTTP handler. The engine itself lives in
/// the driver task; this only holds the channels into it.
#[derive(Debug)]
pub struct AppState {
    /// Action queue into the engine driver
    action_tx: mpsc::Sender<ActionRequest>,
    /// Latest published timer snapshot
    snapshot_rx: watch::Receiver<TimerSnapshot>,
    /// Presets offered to clients
    pub presets: Vec<u32>,
    pub chain_first: u32,
    pub chain_second: u32,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState connected to a running engine driver
    pub fn new(
        config: &Config,
        action_tx: mpsc::Sender<ActionRequest>,
        snapshot_rx: watch::Receiver<TimerSnapshot>,
    ) -> Self {
        Self {
            action_tx,
            snapshot_rx,
            presets: config.presets.clone(),
            chain_first: config.chain_first,
            chain_second: config.chain_second,
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send an action to the engine and wait for its outcome
    pub async fn dispatch(&self, action: Action) -> Result<TimerSnapshot, DispatchError> {
        let (reply, reply_rx) = oneshot::channel();
        self.action_tx
            .send(ActionRequest { action, reply })
            .await
            .map_err(|_| DispatchError::EngineUnavailable)?;

        let snapshot = reply_rx
            .await
            .map_err(|_| DispatchError::EngineUnavailable)??;

        self.record_action(action.name());
        Ok(snapshot)
    }

    /// Get the most recently published snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_rx.clone()
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        debug!("Recorded last action: {}", action);
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            "Timer {} at {} (configured {}m {}s), presets {:?}, chain {}m -> {}m",
            snapshot.status,
            snapshot.display,
            snapshot.configured.minutes,
            snapshot.configured.seconds,
            self.presets,
            self.chain_first,
            self.chain_second
        );
    }
}
