//! ECS microbenchmarks using Criterion.
//!
//! These benchmarks measure individual ECS operations in isolation:
//! - Entity allocate/deallocate
//! - Paged store insertion, sequential and shuffled
//! - Joins over one, two and three component types
//! - Event push and flush
//! - Dependency-ordered ticks

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use sprig::ecs::{
    Handler, Scheduler, System, World, entity,
    storage::PagedStore,
};
use sprig_bench::components::*;

const COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn shuffled_ids(count: usize, seed: u64) -> Vec<entity::Id> {
    let mut ids: Vec<entity::Id> = (0..count as u32).map(entity::Id::new).collect();
    ids.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    ids
}

fn populated_world(count: usize) -> World {
    let mut world = World::new();
    for i in 0..count {
        let Ok(entity) = world.allocate() else {
            break;
        };
        let Some(mut e) = world.entity_mut(entity) else {
            continue;
        };
        e.add(Position::default());
        if i % 2 == 0 {
            e.add(Velocity {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            });
        }
        if i % 10 == 0 {
            e.add(Transform::default());
        }
    }
    world
}

// =============================================================================
// Entity Benchmarks
// =============================================================================

fn bench_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("allocate", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..n {
                    black_box(world.allocate().ok());
                }
            });
        });

        // Deallocation strips every component store an entity is in.
        group.bench_with_input(BenchmarkId::new("deallocate", count), &count, |b, &n| {
            b.iter_batched(
                || populated_world(n),
                |mut world| {
                    for i in 0..n as u32 {
                        black_box(world.deallocate(entity::Id::new(i)));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Storage Benchmarks
// =============================================================================

fn bench_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("insert_sequential", count), &count, |b, &n| {
            b.iter(|| {
                let mut store = PagedStore::<Position>::new();
                for i in 0..n as u32 {
                    store.insert_or_get(entity::Id::new(i), Position::default());
                }
                black_box(store.len())
            });
        });

        // Random order forces inserts into the middle of each page's dense array.
        let ids = shuffled_ids(count, 7);
        group.bench_with_input(BenchmarkId::new("insert_shuffled", count), &ids, |b, ids| {
            b.iter(|| {
                let mut store = PagedStore::<Position>::new();
                for id in ids {
                    store.insert_or_get(*id, Position::default());
                }
                black_box(store.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("get", count), &ids, |b, ids| {
            let mut store = PagedStore::<Position>::new();
            for id in ids {
                store.insert_or_get(*id, Position::default());
            }
            b.iter(|| {
                for id in ids {
                    black_box(store.get(*id));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("take_shuffled", count), &ids, |b, ids| {
            b.iter_batched(
                || {
                    let mut store = PagedStore::<Position>::new();
                    for i in 0..ids.len() as u32 {
                        store.insert_or_get(entity::Id::new(i), Position::default());
                    }
                    store
                },
                |mut store| {
                    for id in ids {
                        black_box(store.take(*id));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Join Benchmarks
// =============================================================================

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));
        let mut world = populated_world(count);

        group.bench_function(BenchmarkId::new("single", count), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                world.join::<Position>(|_, pos| sum += pos.x);
                black_box(sum)
            });
        });

        group.bench_function(BenchmarkId::new("pair", count), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                world.join::<(Position, Velocity)>(|_, (pos, vel)| sum += pos.x + vel.x);
                black_box(sum)
            });
        });

        // Transform is on one entity in ten, so most of the range is skipped.
        group.bench_function(BenchmarkId::new("triple_sparse", count), |b| {
            b.iter(|| {
                let mut rows = 0usize;
                world.join::<(Position, Velocity, Transform)>(|_, _| rows += 1);
                black_box(rows)
            });
        });

        group.bench_function(BenchmarkId::new("pair_mut", count), |b| {
            b.iter(|| {
                world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
                    pos.x += vel.x;
                    pos.y += vel.y;
                    pos.z += vel.z;
                });
            });
        });
    }

    group.finish();
}

// =============================================================================
// Event Benchmarks
// =============================================================================

#[derive(Default)]
struct DamageSink {
    total: f32,
}

impl System for DamageSink {
    fn update(&mut self, _world: &mut World) {}
}

impl Handler<Damage> for DamageSink {
    fn handle(&mut self, event: &Damage, _world: &mut World) {
        self.total += event.amount;
    }
}

fn bench_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("events");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("push_flush", count), &count, |b, &n| {
            let mut world = World::new();
            let mut scheduler = Scheduler::new();
            scheduler
                .add_system(&mut world, DamageSink::default())
                .handles::<Damage>();
            let target = sprig::ecs::Entity::new(entity::Id::new(0));

            b.iter(|| {
                for i in 0..n {
                    world.push_event(Damage {
                        target,
                        amount: i as f32,
                    });
                }
                black_box(scheduler.tick(&mut world))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Scheduler Benchmarks
// =============================================================================

macro_rules! chain_systems {
    ($first: ident $(, $name: ident => $dependency: ident)*) => {
        struct $first;

        impl System for $first {
            fn update(&mut self, world: &mut World) {
                black_box(world.len());
            }
        }

        $(
            struct $name;

            impl System for $name {
                fn update(&mut self, world: &mut World) {
                    black_box(world.len());
                }
            }
        )*

        fn add_chain(scheduler: &mut Scheduler, world: &mut World) {
            // Dependents are added before the systems they wait for.
            $(scheduler.add_system(world, $name).depends_on::<$dependency>();)*
            scheduler.add_system(world, $first);
        }
    };
}

chain_systems!(S0, S1 => S0, S2 => S1, S3 => S2, S4 => S3, S5 => S4, S6 => S5, S7 => S6);

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");

    group.bench_function("tick_chain_8", |b| {
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        add_chain(&mut scheduler, &mut world);

        b.iter(|| black_box(scheduler.tick(&mut world)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_entities,
    bench_storage,
    bench_join,
    bench_events,
    bench_scheduler,
);

criterion_main!(benches);
