//! Sparse-id benchmark scenario.
//!
//! Components are scattered over a wide entity id range and written in a shuffled order, so the
//! stores see out-of-order inserts into partially filled pages. Each tick joins the overlapping
//! component sets and churns a slice of the population (strip one component, re-add it elsewhere).
//!
//! This scenario tests:
//! - Sorted insertion into the middle of a page
//! - Joins where one side is much sparser than the other
//! - Page allocation and release as pages empty and refill

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use sprig::ecs::{Scheduler, System, World, entity, schedule::TickReport};

use crate::{
    components::{Health, Position, Transform, Velocity},
    scenarios::Scenario,
};

/// Configuration for the sparse benchmark.
pub struct SparseConfig {
    /// Size of the entity id range.
    pub id_span: u32,
    /// Fraction of ids that get a `Position`.
    pub position_density: f64,
    /// Fraction of ids that get a `Velocity`.
    pub velocity_density: f64,
    /// Fraction of ids that get a `Transform`.
    pub transform_density: f64,
    /// Ids churned per tick.
    pub churn: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for SparseConfig {
    fn default() -> Self {
        Self {
            id_span: 200_000,
            position_density: 0.5,
            velocity_density: 0.1,
            transform_density: 0.02,
            churn: 500,
            seed: 42,
        }
    }
}

/// Moves everything with a position and a velocity.
struct Integrate;

impl System for Integrate {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
            pos.x += vel.x;
            pos.y += vel.y;
            pos.z += vel.z;
        });
    }
}

/// Copies positions into the rare transforms.
struct SyncTransforms;

impl System for SyncTransforms {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<(Transform, Position)>(|_, (transform, pos)| {
            transform.matrix[3] = [pos.x, pos.y, pos.z, 1.0];
        });
    }
}

/// Moves velocities to random ids, creating and emptying page slots.
struct Churn {
    rng: ChaCha8Rng,
    span: u32,
    count: usize,
}

impl System for Churn {
    fn update(&mut self, world: &mut World) {
        for _ in 0..self.count {
            let from = entity::Id::new(self.rng.gen_range(0..self.span));
            let to = entity::Id::new(self.rng.gen_range(0..self.span));

            let Some(velocity) = world.components_mut().remove::<Velocity>(from) else {
                continue;
            };
            if let Some(mut entity) = world.entity_mut(to) {
                entity.set(velocity);
            }
        }
    }
}

/// Tracks a health pool on a small subset of ids.
struct Regenerate;

impl System for Regenerate {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<Health>(|_, health| {
            health.current = (health.current + 1.0).min(health.max);
        });
    }
}

pub struct SparseScenario {
    config: SparseConfig,
    world: World,
    scheduler: Scheduler,
}

impl SparseScenario {
    pub fn new() -> Self {
        Self::with_config(SparseConfig::default())
    }

    pub fn with_config(config: SparseConfig) -> Self {
        Self {
            config,
            world: World::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for SparseScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for SparseScenario {
    fn name(&self) -> &'static str {
        "sparse"
    }

    fn description(&self) -> &'static str {
        "Components scattered over a wide id range, inserted in random order, with per-tick churn"
    }

    fn entity_count(&self) -> usize {
        self.world.len()
    }

    fn setup(&mut self) {
        let config = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        for _ in 0..config.id_span {
            if self.world.allocate().is_err() {
                break;
            }
        }

        let mut ids: Vec<u32> = (0..config.id_span).collect();
        ids.shuffle(&mut rng);

        for id in ids {
            let Some(mut entity) = self.world.entity_mut(entity::Id::new(id)) else {
                continue;
            };
            if rng.gen_bool(config.position_density) {
                entity.add(Position {
                    x: rng.gen_range(-100.0..100.0),
                    y: rng.gen_range(-100.0..100.0),
                    z: 0.0,
                });
            }
            if rng.gen_bool(config.velocity_density) {
                entity.add(Velocity {
                    x: rng.gen_range(-1.0..1.0),
                    y: rng.gen_range(-1.0..1.0),
                    z: 0.0,
                });
            }
            if rng.gen_bool(config.transform_density) {
                entity.add(Transform::default());
                entity.add(Health {
                    current: 0.0,
                    max: 100.0,
                });
            }
        }

        let churn = Churn {
            rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1)),
            span: config.id_span,
            count: config.churn,
        };

        let world = &mut self.world;
        let scheduler = &mut self.scheduler;
        scheduler.add_system(world, churn);
        scheduler
            .add_system(world, Integrate)
            .depends_on::<Churn>();
        scheduler
            .add_system(world, SyncTransforms)
            .depends_on::<Integrate>();
        scheduler.add_system(world, Regenerate);
    }

    fn update(&mut self) -> TickReport {
        self.scheduler.tick(&mut self.world)
    }

    fn teardown(&mut self) {
        self.world = World::new();
        self.scheduler = Scheduler::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SparseConfig {
        SparseConfig {
            id_span: 2_000,
            churn: 50,
            ..Default::default()
        }
    }

    #[test]
    fn churn_preserves_velocity_count() {
        // Given
        let mut scenario = SparseScenario::with_config(small());
        scenario.setup();
        let before = scenario.world().components().len::<Velocity>();

        // When
        for _ in 0..10 {
            let report = scenario.update();
            assert_eq!(report.ran, 4);
        }

        // Then - a move onto an id that already has one overwrites it, so the count can only drop
        let after = scenario.world().components().len::<Velocity>();
        assert!(after <= before);
        assert!(after > 0);
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = SparseScenario::with_config(small());
        let mut b = SparseScenario::with_config(small());
        a.setup();
        b.setup();

        let mut left = Vec::new();
        let mut right = Vec::new();
        a.world().join::<Position>(|id, pos| left.push((id, pos.x)));
        b.world().join::<Position>(|id, pos| right.push((id, pos.x)));

        assert_eq!(left, right);
    }
}
