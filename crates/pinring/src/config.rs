use crate::RingError;

/// Configuration for a [`Ring`](crate::Ring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of slots (fixed for the lifetime of the ring).
    pub capacity: usize,
    /// Enable metrics collection (counters updated under the ring lock)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Sets the number of slots.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Turns metrics collection on or off.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Checks that the configuration describes a usable ring.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.capacity == 0 {
            return Err(RingError::InvalidConfiguration {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 16,
            enable_metrics: false,
        }
    }
}

/// Small ring for "latest value" style consumers (double buffering plus slack)
pub const LATEST_VALUE_CONFIG: Config = Config::new(4, false);

/// Larger ring for consumers that hold long windows of history
pub const HISTORY_CONFIG: Config = Config::new(64, true);
