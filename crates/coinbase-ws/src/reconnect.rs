//! Reconnection configuration with exponential backoff

use std::time::Duration;

/// Exponential backoff settings for automatic reconnection
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
    /// Growth factor per attempt
    pub multiplier: f64,
    /// Random jitter factor (0.0 to 1.0) to avoid thundering herd
    pub jitter: f64,
    /// Maximum number of attempts (None = unlimited)
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: None,
        }
    }
}

impl ReconnectConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of attempts
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the jitter factor
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Disable reconnection entirely
    pub fn disabled() -> Self {
        Self {
            max_attempts: Some(0),
            ..Default::default()
        }
    }

    /// Whether another attempt is allowed
    pub fn should_retry(&self, attempt: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempt < max,
            None => true,
        }
    }

    /// Backoff delay for the given attempt (1-indexed), jitter applied
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let base_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let base_ms = base_ms.min(self.max_delay.as_millis() as f64);

        if self.jitter == 0.0 {
            return Duration::from_millis(base_ms as u64);
        }

        let spread = base_ms * self.jitter;
        let offset = rand::random::<f64>() * 2.0 * spread - spread;
        Duration::from_millis((base_ms + offset).max(0.0) as u64)
    }
}
