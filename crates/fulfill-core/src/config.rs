//! Coordinator configuration.
//!
//! Defaults match the classic timeline (10 s per item, 100 ms idle poll).
//! `from_env` lets a deployment override each knob; unset vars keep the default.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FulfillError, Result};

pub const DEFAULT_PROCESSING_TIME: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_OUTPUT_PATH: &str = "result.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// How long a worker spends on one item.
    pub processing_time: Duration,
    /// Upper bound on how long an idle worker waits before re-checking the queue.
    pub poll_interval: Duration,
    /// Where `Coordinator::open` writes the event log.
    pub output_path: PathBuf,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            processing_time: DEFAULT_PROCESSING_TIME,
            poll_interval: DEFAULT_POLL_INTERVAL,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl CoordinatorConfig {
    /// Load from `FULFILL_PROCESSING_MS`, `FULFILL_POLL_MS` and `FULFILL_OUTPUT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(ms) = millis_var(&lookup, "FULFILL_PROCESSING_MS")? {
            config.processing_time = ms;
        }
        if let Some(ms) = millis_var(&lookup, "FULFILL_POLL_MS")? {
            config.poll_interval = ms;
        }
        if let Some(path) = lookup("FULFILL_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time = processing_time;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Zero durations would turn the worker loop into a busy spin.
    pub fn validate(&self) -> Result<()> {
        if self.processing_time.is_zero() {
            return Err(FulfillError::Config(
                "processing_time must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(FulfillError::Config(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn millis_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let ms = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| FulfillError::Config(format!("{name}={raw:?} is not a millisecond count: {e}")))?;
    Ok(Some(Duration::from_millis(ms)))
}
