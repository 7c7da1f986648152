/// Counters describing how the producer found its slots.
///
/// Only updated when [`Config::enable_metrics`](crate::Config) is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub slots_acquired: u64,
    pub slots_published: u64,
    pub buffer_full: u64,
    pub skip_set_hits: u64,
    pub slots_parked: u64,
    pub pins_taken: u64,
    pub pins_released: u64,
}

impl MetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins currently outstanding according to the counters.
    pub fn outstanding_pins(&self) -> u64 {
        self.pins_taken.saturating_sub(self.pins_released)
    }
}
