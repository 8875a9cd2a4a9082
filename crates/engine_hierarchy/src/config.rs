//! World configuration.

/// Configuration for a [`World`](crate::World).
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Number of entity records to reserve up front.
    pub initial_capacity: usize,
    /// Refuse links that would make an entity its own ancestor.
    ///
    /// Costs one walk up the new parent's ancestry per link. With the check
    /// off, a cycle can still not loop a destroy cascade (each entity is
    /// destroyed at most once), but the hierarchy is no longer a forest.
    pub prevent_cycles: bool,
}

impl WorldConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_capacity: 0,
            prevent_cycles: true,
        }
    }

    /// Reserve room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable or disable the ancestry cycle check.
    #[must_use]
    pub fn with_cycle_check(mut self, enabled: bool) -> Self {
        self.prevent_cycles = enabled;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
