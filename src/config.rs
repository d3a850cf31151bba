//! Configuration and CLI argument handling

use clap::Parser;

use crate::{engine::DurationSetting, services::AlarmConfig};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "sandglass")]
#[command(about = "A state-managed hourglass countdown timer server")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial timer duration, minutes part
    #[arg(short, long, default_value = "5")]
    pub minutes: u32,

    /// Initial timer duration, seconds part
    #[arg(short, long, default_value = "0")]
    pub seconds: u32,

    /// Preset durations in minutes offered to clients
    #[arg(long, value_delimiter = ',', default_value = "1,3,5,10")]
    pub presets: Vec<u32>,

    /// First run of the chained preset, in minutes
    #[arg(long, default_value = "4")]
    pub chain_first: u32,

    /// Second run of the chained preset, in minutes
    #[arg(long, default_value = "2")]
    pub chain_second: u32,

    /// Shell command to run whenever a run completes
    #[arg(long)]
    pub alarm_hook: Option<String>,

    /// Do not ring the terminal bell on completion
    #[arg(long)]
    pub no_bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn default_duration(&self) -> DurationSetting {
        DurationSetting::new(self.minutes, self.seconds)
    }

    pub fn alarm_config(&self) -> AlarmConfig {
        AlarmConfig {
            hook: self.alarm_hook.clone(),
            bell: !self.no_bell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["sandglass"]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.default_duration().total_seconds(), 300);
        assert_eq!(config.presets, vec![1, 3, 5, 10]);
        assert_eq!((config.chain_first, config.chain_second), (4, 2));
        assert_eq!(config.log_level(), "info");
        assert!(config.alarm_config().bell);
        assert!(config.alarm_config().hook.is_none());
    }

    #[test]
    fn overrides() {
        let config = Config::parse_from([
            "sandglass",
            "--minutes",
            "1",
            "--seconds",
            "30",
            "--presets",
            "2,15",
            "--alarm-hook",
            "notify-send done",
            "--no-bell",
            "-v",
        ]);
        assert_eq!(config.default_duration(), DurationSetting::new(1, 30));
        assert_eq!(config.presets, vec![2, 15]);
        assert_eq!(config.alarm_config().hook.as_deref(), Some("notify-send done"));
        assert!(!config.alarm_config().bell);
        assert_eq!(config.log_level(), "debug");
    }
}
