use crate::{Config, Ring, RingError};

/// Collects slot values one by one, then wires them into a [`Ring`].
///
/// Useful when the payloads are expensive to build or need per-slot setup
/// (pre-sized buffers, pooled allocations). The first value pushed becomes
/// the oldest slot.
///
/// ```
/// use pinring_rs::RingBuilder;
///
/// let mut builder = RingBuilder::new();
/// for i in 0..16 {
///     builder.push(vec![i]);
/// }
/// let ring = builder.connect().unwrap();
///
/// assert_eq!(ring.capacity(), 16);
/// assert_eq!(ring.current().unwrap()[0], 15);
/// ```
#[derive(Debug)]
pub struct RingBuilder<T> {
    values: Vec<T>,
    enable_metrics: bool,
}

impl<T> RingBuilder<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            enable_metrics: false,
        }
    }

    /// Adds one slot holding `value`.
    pub fn push(&mut self, value: T) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Adds one slot per value.
    pub fn extend_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.values.extend(values);
        self
    }

    /// Turns metrics collection on or off for the built ring.
    pub fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Number of slots pushed so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Links the pushed slots into a ring. Fails if nothing was pushed.
    pub fn connect(self) -> Result<Ring<T>, RingError> {
        let config = Config::new(self.values.len(), self.enable_metrics);
        config.validate()?;
        Ring::from_parts(self.values, config)
    }
}

impl<T> Default for RingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
