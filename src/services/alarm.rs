//! Completion alarm: shell hook plus terminal bell

use std::io::Write;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::AlarmNotifier;

/// Alarm configuration for the running service
#[derive(Debug, Clone, Default)]
pub struct AlarmConfig {
    /// Shell command run on every completion, e.g. `notify-send "Time is up"`
    pub hook: Option<String>,
    /// Ring the terminal bell
    pub bell: bool,
}

/// Runs the configured hook in the background and rings the bell.
/// Nothing here can fail the engine; errors are only logged.
#[derive(Debug, Clone)]
pub struct HookAlarm {
    config: AlarmConfig,
}

impl HookAlarm {
    pub fn new(config: AlarmConfig) -> Self {
        Self { config }
    }
}

impl AlarmNotifier for HookAlarm {
    fn on_complete(&mut self) {
        info!("Timer complete, sounding alarm");

        if let Some(hook) = &self.config.hook {
            spawn_hook(hook.clone());
        }

        if self.config.bell {
            ring_bell();
        }
    }
}

/// Run `command` through `sh -c` without waiting on the caller
pub fn spawn_hook(command: String) {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        debug!("Alarm hook is empty, skipping");
        return;
    }
    if trimmed.starts_with('#') {
        debug!("Alarm hook is commented out: {}", trimmed);
        return;
    }

    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            warn!("No async runtime available for alarm hook: {}", e);
            return;
        }
    };

    handle.spawn(async move {
        debug!("Running alarm hook: {}", command);
        match Command::new("sh").arg("-c").arg(&command).output().await {
            Ok(output) if output.status.success() => {
                debug!("Alarm hook finished");
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    "Alarm hook exited with {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                );
            }
            Err(e) => warn!("Failed to execute alarm hook: {}", e),
        }
    });
}

fn ring_bell() {
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        warn!("Failed to ring terminal bell: {}", e);
    }
}
