use std::{cell::RefCell, rc::Rc};

use sprig::{
    ecs::{Component, Entity, Event, Handler, Scheduler, System, World, entity},
    logging::ChannelLogger,
};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: i32,
    dy: i32,
}

#[derive(Component, Debug, PartialEq)]
struct Name(&'static str);

#[derive(Event, Debug)]
struct Spawned(Entity);

#[derive(Event, Debug)]
struct Despawned(Entity);

/// Spawns one moving entity per tick until `remaining` reaches zero.
struct Spawner {
    remaining: u32,
}

impl System for Spawner {
    fn update(&mut self, world: &mut World) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;

        let entity = world.allocate().unwrap();
        let mut e = world.entity_mut(entity).unwrap();
        e.add(Position { x: 0, y: 0 });
        e.add(Velocity { dx: 1, dy: 2 });
        world.push_event(Spawned(entity));
    }
}

struct Movement;

impl System for Movement {
    fn update(&mut self, world: &mut World) {
        world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
            pos.x += vel.dx;
            pos.y += vel.dy;
        });
    }
}

/// Deallocates entities that have moved `limit` steps.
struct Reaper {
    limit: i32,
}

impl System for Reaper {
    fn update(&mut self, world: &mut World) {
        let mut expired = Vec::new();
        world.join::<Position>(|id, pos| {
            if pos.x >= self.limit {
                expired.push(id);
            }
        });

        for id in expired {
            if world.deallocate(id) {
                world.push_event(Despawned(Entity::new(id)));
            }
        }
    }
}

#[derive(Default)]
struct Census {
    spawned: Vec<Entity>,
    despawned: Vec<Entity>,
}

impl System for Census {
    fn update(&mut self, _world: &mut World) {}
}

impl Handler<Spawned> for Census {
    fn handle(&mut self, event: &Spawned, _world: &mut World) {
        self.spawned.push(event.0);
    }
}

impl Handler<Despawned> for Census {
    fn handle(&mut self, event: &Despawned, _world: &mut World) {
        self.despawned.push(event.0);
    }
}

#[test]
fn spawn_move_reap() {
    // Given
    let mut world = World::new();
    let mut scheduler = Scheduler::new();
    scheduler
        .add_system(&mut world, Reaper { limit: 3 })
        .depends_on::<Movement>();
    scheduler
        .add_system(&mut world, Movement)
        .depends_on::<Spawner>();
    scheduler.add_system(&mut world, Spawner { remaining: 2 });
    scheduler
        .add_system(&mut world, Census::default())
        .handles::<(Spawned, Despawned)>();

    // When - tick 1: spawn #0 and move it once
    scheduler.tick(&mut world);

    // Then
    let first = Entity::new(entity::Id::new(0));
    assert_eq!(
        world.entity(first).unwrap().get::<Position>(),
        Some(&Position { x: 1, y: 2 })
    );
    assert!(scheduler.get::<Census>().unwrap().spawned.is_empty());

    // When - ticks 2 and 3: #0 reaches the limit on tick 3
    scheduler.tick(&mut world);
    scheduler.tick(&mut world);

    // Then
    assert!(!world.is_alive(first));
    assert_eq!(world.len(), 1);
    let census = scheduler.get::<Census>().unwrap();
    assert_eq!(census.spawned.len(), 2);
    assert!(census.despawned.is_empty());

    // When - tick 4: despawn of #0 is delivered; spawner is done, so a new
    // allocation would reuse id 0.
    scheduler.tick(&mut world);

    // Then
    let census = scheduler.get::<Census>().unwrap();
    assert_eq!(census.despawned, vec![first]);
    assert_eq!(world.allocate().unwrap(), first);
    assert!(world.entity(first).unwrap().get::<Velocity>().is_none());
}

#[test]
fn stalled_tick_keeps_updated_flags() {
    type Log = Rc<RefCell<Vec<&'static str>>>;

    macro_rules! recording_system {
        ($($name: ident),*) => {
            $(
                struct $name(Log);

                impl System for $name {
                    fn update(&mut self, _world: &mut World) {
                        self.0.borrow_mut().push(stringify!($name));
                    }
                }
            )*
        };
    }

    recording_system!(A, D, X, Y);

    // Given D -> A, and an unrelated X <-> Y cycle
    let log = Log::default();
    let mut world = World::new();
    let mut scheduler = Scheduler::new();
    scheduler
        .add_system(&mut world, D(log.clone()))
        .depends_on::<A>();
    scheduler.add_system(&mut world, A(log.clone()));
    scheduler
        .add_system(&mut world, X(log.clone()))
        .depends_on::<Y>();
    scheduler
        .add_system(&mut world, Y(log.clone()))
        .depends_on::<X>();

    // When
    let first = scheduler.tick(&mut world);

    // Then
    assert_eq!(*log.borrow(), vec!["A", "D"]);
    assert_eq!(first.stalled, 2);
    log.borrow_mut().clear();

    // When - A's flag survived the stall, so D no longer waits for it
    let second = scheduler.tick(&mut world);

    // Then
    assert_eq!(*log.borrow(), vec!["D", "A"]);
    assert_eq!(second.tick, 2);
    assert!(second.is_stalled());
}

#[derive(Event)]
struct First(u32);

#[derive(Event)]
struct Second(u32);

/// Turns every `First` into a `Second`.
struct Relay;

impl System for Relay {
    fn update(&mut self, _world: &mut World) {}
}

impl Handler<First> for Relay {
    fn handle(&mut self, event: &First, world: &mut World) {
        world.push_event(Second(event.0 * 10));
    }
}

#[derive(Default)]
struct Sink {
    received: Vec<(u64, u32)>,
    tick: u64,
}

impl System for Sink {
    fn update(&mut self, _world: &mut World) {
        self.tick += 1;
    }
}

impl Handler<Second> for Sink {
    fn handle(&mut self, event: &Second, _world: &mut World) {
        // Flush runs before updates, so this is the tick being flushed.
        self.received.push((self.tick + 1, event.0));
    }
}

#[test]
fn events_pushed_by_handlers_wait_a_tick() {
    // Given - First is registered before Second, so its bus flushes first
    let mut world = World::new();
    let mut scheduler = Scheduler::new();
    scheduler.add_system(&mut world, Relay).handles::<First>();
    scheduler.add_system(&mut world, Sink::default()).handles::<Second>();

    // When
    world.push_event(First(1));
    world.push_event(First(2));
    scheduler.tick(&mut world);

    // Then - relayed during tick 1's flush, not delivered until tick 2
    assert!(scheduler.get::<Sink>().unwrap().received.is_empty());
    assert_eq!(world.events().pending::<Second>(), 2);

    // When
    scheduler.tick(&mut world);

    // Then
    assert_eq!(
        scheduler.get::<Sink>().unwrap().received,
        vec![(2, 10), (2, 20)]
    );
}

#[test]
fn joins_span_pages_in_id_order() {
    // Given - ids spread over several pages, written in a scrambled order
    let mut world = World::new();
    for _ in 0..400 {
        world.allocate().unwrap();
    }
    let mut ids: Vec<u32> = (0..400).filter(|i| i % 7 == 0 || i % 11 == 0).collect();
    ids.sort_by_key(|i| (i * 37) % 401);

    for &i in &ids {
        let mut e = world.entity_mut(entity::Id::new(i)).unwrap();
        e.add(Position { x: i as i32, y: 0 });
        if i % 7 == 0 {
            e.add(Velocity { dx: 1, dy: 0 });
        }
        if i % 77 == 0 {
            e.add(Name("both"));
        }
    }

    // When
    let mut seen = Vec::new();
    world.join::<(Position, Velocity)>(|id, (pos, _)| {
        assert_eq!(pos.x, id.get() as i32);
        seen.push(id.get());
    });
    let mut named = Vec::new();
    world.join::<(Name, Position, Velocity)>(|id, _| named.push(id.get()));

    // Then
    let expected: Vec<u32> = (0..400).filter(|i| i % 7 == 0).collect();
    assert_eq!(seen, expected);
    assert_eq!(named, vec![0, 77, 154, 231, 308, 385]);
}

#[test]
fn stalled_tick_is_logged() {
    struct Left;
    struct Right;

    impl System for Left {
        fn update(&mut self, _world: &mut World) {}
    }
    impl System for Right {
        fn update(&mut self, _world: &mut World) {}
    }

    // Given
    let receiver = ChannelLogger::install(log::LevelFilter::Warn).unwrap();
    let mut world = World::new();
    let mut scheduler = Scheduler::new();
    scheduler
        .add_system(&mut world, Left)
        .depends_on::<Right>();
    scheduler
        .add_system(&mut world, Right)
        .depends_on::<Left>();

    // When
    scheduler.tick(&mut world);

    // Then
    let stalls: Vec<_> = receiver
        .try_iter()
        .filter(|m| m.level == log::Level::Warn && m.message.contains("stalled"))
        .collect();
    assert!(!stalls.is_empty());
}
