//! `sprig` is a small, single-threaded Entity-Component-System runtime.
//!
//! Components live in paged sparse stores that keep every page's dense array sorted by entity id,
//! so multi-component joins walk ids in ascending order. Systems run once per tick in an order
//! derived from declared dependencies and talk to each other through double-buffered events that
//! are delivered exactly one tick after they are pushed.
//!
//! ```rust,ignore
//! use sprig::ecs::{Component, Scheduler, System, World};
//!
//! #[derive(Component)]
//! struct Position(f32);
//!
//! #[derive(Component)]
//! struct Velocity(f32);
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn update(&mut self, world: &mut World) {
//!         world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| pos.0 += vel.0);
//!     }
//! }
//!
//! let mut world = World::new();
//! let mut scheduler = Scheduler::new();
//! scheduler.add_system(&mut world, Movement);
//!
//! let entity = world.allocate()?;
//! world.entity_mut(entity).unwrap().add(Position(0.0));
//! world.entity_mut(entity).unwrap().add(Velocity(1.0));
//!
//! scheduler.tick(&mut world);
//! ```

// Lets the derive macros emit `::sprig::...` paths that also resolve inside this crate.
extern crate self as sprig;

pub mod ecs;
pub mod logging;
