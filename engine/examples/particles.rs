//! A small particle simulation.
//!
//! An emitter spawns particles, gravity and movement integrate them, and particles that live too
//! long or fall below the floor are reaped. A stats system counts spawn and expiry events, which
//! always trail the systems that raised them by one tick.
//!
//! Run with `RUST_LOG=debug cargo run --example particles` to see the scheduler's logging.

use sprig::ecs::{Component, Entity, Event, Handler, Scheduler, System, World};

const TICKS: u64 = 40;
const FLOOR: f32 = -20.0;
const MAX_AGE: u32 = 25;

#[derive(Component, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component)]
struct Age(u32);

#[derive(Event)]
struct Emitted(Entity);

#[derive(Event)]
struct Expired {
    entity: Entity,
    age: u32,
}

struct Emitter {
    per_tick: u32,
    spin: f32,
}

impl System for Emitter {
    fn update(&mut self, world: &mut World) {
        for _ in 0..self.per_tick {
            let entity = match world.allocate() {
                Ok(entity) => entity,
                Err(err) => {
                    log::error!("emitter stopped: {err}");
                    return;
                }
            };

            self.spin += 0.7;
            if let Some(mut particle) = world.entity_mut(entity) {
                particle.add(Position { x: 0.0, y: 0.0 });
                particle.add(Velocity {
                    dx: self.spin.cos() * 2.0,
                    dy: 4.0 + self.spin.sin(),
                });
                particle.add(Age(0));
            }
            world.push_event(Emitted(entity));
        }
    }
}

struct Gravity;

impl System for Gravity {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<Velocity>(|_, vel| vel.dy -= 0.5);
    }
}

struct Movement;

impl System for Movement {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<(Position, Velocity, Age)>(|_, (pos, vel, age)| {
            pos.x += vel.dx;
            pos.y += vel.dy;
            age.0 += 1;
        });
    }
}

struct Reaper;

impl System for Reaper {
    fn update(&mut self, world: &mut World) {
        let mut expired = Vec::new();
        world.join::<(Position, Age)>(|id, (pos, age)| {
            if pos.y < FLOOR || age.0 > MAX_AGE {
                expired.push((id, age.0));
            }
        });

        for (id, age) in expired {
            if world.deallocate(id) {
                world.push_event(Expired {
                    entity: Entity::new(id),
                    age,
                });
            }
        }
    }
}

#[derive(Default)]
struct Stats {
    emitted: u32,
    expired: u32,
    total_age: u64,
}

impl System for Stats {
    fn update(&mut self, _world: &mut World) {}
}

impl Handler<Emitted> for Stats {
    fn handle(&mut self, event: &Emitted, _world: &mut World) {
        log::trace!("{:?} emitted", event.0);
        self.emitted += 1;
    }
}

impl Handler<Expired> for Stats {
    fn handle(&mut self, event: &Expired, _world: &mut World) {
        log::trace!("{:?} expired at age {}", event.entity, event.age);
        self.expired += 1;
        self.total_age += u64::from(event.age);
    }
}

fn main() {
    env_logger::init();

    println!("=============================================================");
    println!("Particles");
    println!("=============================================================");

    let mut world = World::new();
    let mut scheduler = Scheduler::new();

    scheduler.add_system(
        &mut world,
        Emitter {
            per_tick: 3,
            spin: 0.0,
        },
    );
    scheduler
        .add_system(&mut world, Gravity)
        .depends_on::<Emitter>();
    scheduler
        .add_system(&mut world, Movement)
        .depends_on::<Gravity>();
    scheduler
        .add_system(&mut world, Reaper)
        .depends_on::<Movement>();
    scheduler
        .add_system(&mut world, Stats::default())
        .handles::<(Emitted, Expired)>();

    for _ in 0..TICKS {
        let report = scheduler.tick(&mut world);

        if report.tick % 10 == 0 {
            let stats = scheduler.get::<Stats>();
            println!(
                "tick {:>3}: {:>3} live, {:>4} emitted, {:>4} expired",
                report.tick,
                world.len(),
                stats.map_or(0, |s| s.emitted),
                stats.map_or(0, |s| s.expired),
            );
        }
    }

    let Some(stats) = scheduler.get::<Stats>() else {
        return;
    };
    if stats.expired > 0 {
        println!(
            "average lifetime: {:.1} ticks",
            stats.total_age as f64 / f64::from(stats.expired)
        );
    }
}
