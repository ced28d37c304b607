//! Systems: the per-tick logic of the ECS.
//!
//! # Overview
//!
//! A system is a value implementing [`System`]. The [`Scheduler`](crate::ecs::Scheduler) owns
//! every system, keyed by its Rust type, and calls [`System::update`] once per tick with exclusive
//! access to the [`World`]:
//!
//! ```rust,ignore
//! use sprig::ecs::{Component, System, World};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn update(&mut self, world: &mut World) {
//!         world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
//!             pos.x += vel.dx;
//!             pos.y += vel.dy;
//!         });
//!     }
//! }
//! ```
//!
//! # Events
//!
//! A system that implements [`Handler<E>`] can subscribe to events of type `E` when it is
//! registered. Events pushed during tick `N` are handed to every enabled subscriber at the start of
//! tick `N + 1`, before any system updates:
//!
//! ```rust,ignore
//! impl Handler<Collision> for Movement {
//!     fn handle(&mut self, event: &Collision, world: &mut World) {
//!         if let Some(mut entity) = world.entity_mut(event.entity) {
//!             entity.remove::<Velocity>();
//!         }
//!     }
//! }
//!
//! scheduler.add_system(&mut world, Movement).handles::<Collision>();
//! ```
//!
//! # Ordering
//!
//! Systems declare dependencies on other system types through
//! [`Configurator::depends_on`](crate::ecs::schedule::Configurator::depends_on). A system runs
//! only once every enabled dependency has run in the same tick; see
//! [`schedule`](crate::ecs::schedule) for the full readiness rule.

mod registry;
mod set;

use std::any::Any;

pub use registry::Registry;
pub use set::{EventSet, SystemSet};

use crate::ecs::{
    event::Event,
    registry::{TypeKind, type_index},
    world::World,
};

type_index!(
    /// A system type identifier, assigned sequentially on first use of the type.
    ///
    /// Doubles as the index of the system in the scheduler's arena.
    Id,
    TypeKind::System
);

/// A unit of per-tick logic.
pub trait System: 'static {
    /// Run one tick of this system.
    fn update(&mut self, world: &mut World);
}

/// A system that reacts to events of type `E`.
pub trait Handler<E: Event>: System {
    /// Handle one event. Called during the event flush at the start of a tick, once per event and
    /// in the order the events were pushed.
    fn handle(&mut self, event: &E, world: &mut World);
}

/// Object-safe form of [`System`] stored in the scheduler's arena.
pub(crate) trait ErasedSystem: 'static {
    fn run(&mut self, world: &mut World);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> ErasedSystem for S {
    #[inline]
    fn run(&mut self, world: &mut World) {
        self.update(world);
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Deliver one event to an erased system of concrete type `S`.
///
/// Stored as a plain function pointer in the event bus, one per subscription.
pub(crate) fn handle_erased<S: Handler<E>, E: Event>(
    system: &mut dyn Any,
    event: &E,
    world: &mut World,
) {
    if let Some(system) = system.downcast_mut::<S>() {
        system.handle(event, world);
    }
}
