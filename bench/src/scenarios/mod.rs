//! Realistic workload scenarios.
//!
//! These scenarios simulate real-world ECS usage patterns with representative
//! entity counts, component combinations, and system workloads.
//!
//! # Scenarios
//!
//! - **Particles**: High entity count, simple components, short lifetimes, event-driven respawn
//! - **Sparse**: Few components scattered over a wide id range, inserted in random order

pub mod particles;
pub mod sparse;

pub use particles::{ParticleConfig, ParticleScenario};
pub use sparse::{SparseConfig, SparseScenario};

use sprig::ecs::schedule::TickReport;

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of live entities in this scenario.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (allocate entities, add systems).
    fn setup(&mut self);

    /// Run one tick of the scenario.
    fn update(&mut self) -> TickReport;

    /// Clean up the scenario.
    fn teardown(&mut self);
}
