//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Simple components: Position, Velocity, Lifetime, Color
//! - Systems: movement, lifetime decay, fade, expiry, and an event-driven respawner
//!
//! This scenario tests:
//! - High entity count join performance
//! - Dependency-ordered ticks
//! - Allocate/deallocate churn with id reuse
//! - Event throughput (every expiry is an event handled the next tick)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sprig::ecs::{Entity, Handler, Scheduler, System, World, schedule::TickReport};

use crate::{
    components::{Color, Expired, Lifetime, Position, Velocity},
    scenarios::Scenario,
};

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Number of particles spawned at setup.
    pub particle_count: usize,
    /// Simulated delta time per tick.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

/// Spawns particles with random attributes.
struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn spawn(&mut self, world: &mut World) -> Option<Entity> {
        let entity = world.allocate().ok()?;
        let rng = &mut self.0;
        let mut particle = world.entity_mut(entity)?;
        particle.add(Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        });
        particle.add(Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        });
        particle.add(Lifetime {
            remaining: rng.gen_range(1.0..5.0),
            total: 5.0,
        });
        particle.add(Color {
            r: rng.gen_range(0.0..1.0),
            g: rng.gen_range(0.0..1.0),
            b: rng.gen_range(0.0..1.0),
            a: 1.0,
        });
        Some(entity)
    }
}

/// Integrates positions.
struct Movement {
    dt: f32,
}

impl System for Movement {
    fn update(&mut self, world: &mut World) {
        let dt = self.dt;
        world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
            pos.x += vel.x * dt;
            pos.y += vel.y * dt;
            pos.z += vel.z * dt;
        });
    }
}

/// Decays lifetimes.
struct Decay {
    dt: f32,
}

impl System for Decay {
    fn update(&mut self, world: &mut World) {
        let dt = self.dt;
        world.join_mut::<Lifetime>(|_, lifetime| lifetime.remaining -= dt);
    }
}

/// Fades particles based on remaining lifetime.
struct Fade;

impl System for Fade {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<(Lifetime, Color)>(|_, (lifetime, color)| {
            color.a = (lifetime.remaining / lifetime.total).max(0.0);
        });
    }
}

/// Deallocates particles whose lifetime ran out and announces them.
struct Expiry {
    dead: Vec<sprig::ecs::entity::Id>,
}

impl System for Expiry {
    fn update(&mut self, world: &mut World) {
        let dead = &mut self.dead;
        world.join::<Lifetime>(|id, lifetime| {
            if lifetime.remaining <= 0.0 {
                dead.push(id);
            }
        });

        for id in self.dead.drain(..) {
            if world.deallocate(id) {
                world.push_event(Expired(Entity::new(id)));
            }
        }
    }
}

/// Replaces every expired particle with a fresh one.
struct Respawner {
    factory: ParticleFactory,
    respawned: usize,
}

impl System for Respawner {
    fn update(&mut self, _world: &mut World) {}
}

impl Handler<Expired> for Respawner {
    fn handle(&mut self, _event: &Expired, world: &mut World) {
        if self.factory.spawn(world).is_some() {
            self.respawned += 1;
        }
    }
}

/// The particle scenario: a world, its scheduler and the settings they were built from.
pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
    scheduler: Scheduler,
}

impl ParticleScenario {
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            config,
            world: World::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Particles respawned so far.
    pub fn respawned(&self) -> usize {
        self.scheduler
            .get::<Respawner>()
            .map_or(0, |respawner| respawner.respawned)
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High entity count with simple components, short lifetimes and event-driven respawn"
    }

    fn entity_count(&self) -> usize {
        self.world.len()
    }

    fn setup(&mut self) {
        let dt = self.config.delta_time;
        let mut factory = ParticleFactory(ChaCha8Rng::seed_from_u64(self.config.seed));
        for _ in 0..self.config.particle_count {
            factory.spawn(&mut self.world);
        }

        let world = &mut self.world;
        let scheduler = &mut self.scheduler;
        scheduler.add_system(world, Movement { dt });
        scheduler
            .add_system(world, Decay { dt })
            .depends_on::<Movement>();
        scheduler.add_system(world, Fade).depends_on::<Decay>();
        scheduler
            .add_system(world, Expiry { dead: Vec::new() })
            .depends_on::<Fade>();
        scheduler
            .add_system(
                world,
                Respawner {
                    factory,
                    respawned: 0,
                },
            )
            .handles::<Expired>();
    }

    fn update(&mut self) -> TickReport {
        self.scheduler.tick(&mut self.world)
    }

    fn teardown(&mut self) {
        self.world = World::new();
        self.scheduler = Scheduler::new();
    }
}
