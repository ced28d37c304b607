use crate::ecs::{entity, event};

/// Construction settings for a [`World`](super::World).
///
/// ```rust,ignore
/// let world = World::with_config(Config::default().with_entity_limit(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Exclusive upper bound on entity ids.
    entity_limit: u32,

    /// Initial reservation for each event queue. Queues grow past it as needed.
    event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_limit: entity::Id::INVALID.get(),
            event_capacity: event::DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Limit entity ids to `0..limit`. Clamped to the reserved sentinel id.
    #[inline]
    pub fn with_entity_limit(mut self, limit: u32) -> Self {
        self.entity_limit = limit.min(entity::Id::INVALID.get());
        self
    }

    /// Reserve room for `capacity` events in each queue of every event bus.
    #[inline]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    #[inline]
    pub fn entity_limit(&self) -> u32 {
        self.entity_limit
    }

    #[inline]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.entity_limit(), u32::MAX);
        assert_eq!(config.event_capacity(), 64);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default()
            .with_entity_limit(100)
            .with_event_capacity(8);

        assert_eq!(config.entity_limit(), 100);
        assert_eq!(config.event_capacity(), 8);
    }
}
