//! The World is the central container for all entities, components and events in the ECS.
//!
//! A `World` manages the lifecycle of entities and their associated component data. It provides
//! the primary API for allocating and deallocating entities, attaching and reading their
//! components, joining over component sets, and pushing events.
//!
//! # Architecture
//!
//! The World coordinates three subsystems:
//! - **Entity Allocator**: Manages entity id allocation and FIFO reuse
//! - **Component Table**: One paged sparse store per component type
//! - **Event Broker**: One double-buffered bus per event type
//!
//! Systems are not part of the world. They live in the
//! [`Scheduler`](crate::ecs::Scheduler), which borrows the world mutably for each tick.
//!
//! # Example
//!
//! ```ignore
//! use sprig::ecs::world::World;
//!
//! let mut world = World::new();
//!
//! let entity = world.allocate()?;
//! if let Some(mut e) = world.entity_mut(entity) {
//!     e.add(Position { x: 0.0, y: 0.0 });
//!     e.add(Velocity { dx: 1.0, dy: 0.0 });
//! }
//!
//! world.join::<(Position, Velocity)>(|id, (pos, vel)| {
//!     println!("{id:?}: ({}, {}) + ({}, {})", pos.x, pos.y, vel.dx, vel.dy);
//! });
//!
//! // Strips every component and recycles the id.
//! world.deallocate(entity);
//! ```

mod config;

use std::marker::PhantomData;

pub use config::Config;

use crate::ecs::{
    component::{self, Join},
    entity::{self, Entity},
    error::Result,
    event::{self, Event},
};

/// The World is the central container for all entities, components, and their relationships.
///
/// Each world is isolated from other worlds and maintains its own set of entities, components and
/// event buses.
pub struct World {
    /// The settings this world was built with.
    config: Config,

    /// The world's entity allocator.
    entity_allocator: entity::Allocator,

    /// The storage for components in the world.
    components: component::Table,

    /// The event buses of the world.
    events: event::Broker,

    /// Marker to make World !Send. World must stay on the thread that created it.
    _not_send: PhantomData<*mut ()>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a world with the given settings.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            entity_allocator: entity::Allocator::with_limit(config.entity_limit()),
            components: component::Table::new(),
            events: event::Broker::with_capacity(config.event_capacity()),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Allocate a new entity, reusing the oldest deallocated id if there is one.
    ///
    /// Fails with [`Error::EntitiesExhausted`](crate::ecs::Error::EntitiesExhausted) when every id
    /// below the configured limit is live.
    #[inline]
    pub fn allocate(&mut self) -> Result<Entity> {
        self.entity_allocator.alloc()
    }

    /// Strip every component from an entity and return its id for reuse.
    ///
    /// Deallocating an id that is already free, or that was never allocated, does nothing and
    /// returns `false`.
    pub fn deallocate(&mut self, entity: impl Into<entity::Id>) -> bool {
        let id = entity.into();
        if !self.entity_allocator.free(id) {
            return false;
        }
        self.components.remove_all(id);
        true
    }

    /// Returns `true` if the entity is currently allocated.
    #[inline]
    pub fn is_alive(&self, entity: impl Into<entity::Id>) -> bool {
        self.entity_allocator.is_alive(entity.into())
    }

    /// The number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entity_allocator.len()
    }

    /// Returns `true` if no entity is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entity_allocator.is_empty()
    }

    /// Get a shared view of a live entity's components.
    pub fn entity(&self, entity: impl Into<entity::Id>) -> Option<entity::Ref<'_>> {
        let id = entity.into();
        self.entity_allocator
            .is_alive(id)
            .then(|| entity::Ref::new(Entity::new(id), &self.components))
    }

    /// Get an exclusive view of a live entity's components.
    pub fn entity_mut(&mut self, entity: impl Into<entity::Id>) -> Option<entity::RefMut<'_>> {
        let id = entity.into();
        if !self.entity_allocator.is_alive(id) {
            return None;
        }
        Some(entity::RefMut::new(Entity::new(id), &mut self.components))
    }

    /// Call `f` for every entity holding every component in `Q`, in ascending id order.
    #[inline]
    pub fn join<'a, Q: Join>(&'a self, f: impl FnMut(entity::Id, Q::Item<'a>)) {
        self.components.join::<Q>(f);
    }

    /// Call `f` with exclusive access for every entity holding every component in `Q`, in
    /// ascending id order.
    #[inline]
    pub fn join_mut<'a, Q: Join>(&'a mut self, f: impl FnMut(entity::Id, Q::ItemMut<'a>)) {
        self.components.join_mut::<Q>(f);
    }

    /// Queue an event. Subscribers receive it during the next tick's flush.
    #[inline]
    pub fn push_event<E: Event>(&mut self, event: E) {
        self.events.push(event);
    }

    #[inline]
    pub fn components(&self) -> &component::Table {
        &self.components
    }

    #[inline]
    pub fn components_mut(&mut self) -> &mut component::Table {
        &mut self.components
    }

    #[inline]
    pub fn events(&self) -> &event::Broker {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut event::Broker {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use sprig_macros::Component;

    use super::*;
    use crate::ecs::Error;

    #[derive(Component, Debug, PartialEq)]
    struct Position(i32, i32);

    #[derive(Component, Debug, PartialEq)]
    struct Velocity(i32, i32);

    #[test]
    fn allocate_then_attach() {
        // Given
        let mut world = World::new();
        let entity = world.allocate().unwrap();

        // When
        let mut e = world.entity_mut(entity).unwrap();
        e.add(Position(1, 2));
        e.add(Velocity(3, 4));

        // Then
        let e = world.entity(entity).unwrap();
        assert_eq!(e.get::<Position>(), Some(&Position(1, 2)));
        assert_eq!(e.get::<Velocity>(), Some(&Velocity(3, 4)));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn deallocate_strips_components_and_recycles_id() {
        // Given
        let mut world = World::new();
        let first = world.allocate().unwrap();
        world.entity_mut(first).unwrap().add(Position(0, 0));

        // When
        let freed = world.deallocate(first);
        let second = world.allocate().unwrap();

        // Then - same id, no leftover component
        assert!(freed);
        assert_eq!(first, second);
        assert!(world.entity(second).unwrap().get::<Position>().is_none());
    }

    #[test]
    fn double_deallocate_is_noop() {
        // Given
        let mut world = World::new();
        let a = world.allocate().unwrap();
        let _b = world.allocate().unwrap();

        // When
        assert!(world.deallocate(a));
        assert!(!world.deallocate(a));

        // Then - a is handed out once, then fresh ids
        assert_eq!(world.allocate().unwrap(), a);
        assert_eq!(world.allocate().unwrap().id(), entity::Id::new(2));
    }

    #[test]
    fn deallocate_of_unknown_id_keeps_components() {
        // Given
        let mut world = World::new();
        world.components_mut().add(entity::Id::new(50), Position(5, 5));

        // When
        let freed = world.deallocate(entity::Id::new(50));

        // Then
        assert!(!freed);
        assert!(world.components().contains::<Position>(entity::Id::new(50)));
    }

    #[test]
    fn views_of_dead_entities_are_none() {
        // Given
        let mut world = World::new();
        let entity = world.allocate().unwrap();
        world.deallocate(entity);

        // Then
        assert!(!world.is_alive(entity));
        assert!(world.entity(entity).is_none());
        assert!(world.entity_mut(entity).is_none());
        assert!(world.entity(entity::Id::new(99)).is_none());
    }

    #[test]
    fn entity_limit_from_config() {
        // Given
        let mut world = World::with_config(Config::default().with_entity_limit(2));
        world.allocate().unwrap();
        world.allocate().unwrap();

        // When
        let result = world.allocate();

        // Then
        assert_eq!(result, Err(Error::EntitiesExhausted { limit: 2 }));
    }

    #[test]
    fn join_through_world() {
        // Given
        let mut world = World::new();
        for i in 0..6 {
            let entity = world.allocate().unwrap();
            let mut e = world.entity_mut(entity).unwrap();
            e.add(Position(i, 0));
            if i % 3 == 0 {
                e.add(Velocity(1, 1));
            }
        }

        // When
        world.join_mut::<(Position, Velocity)>(|_, (pos, vel)| {
            pos.0 += vel.0;
            pos.1 += vel.1;
        });

        // Then
        let mut moved = Vec::new();
        world.join::<Position>(|id, pos| {
            if pos.1 != 0 {
                moved.push((id.get(), pos.0));
            }
        });
        assert_eq!(moved, vec![(0, 1), (3, 4)]);
    }

    #[test]
    fn push_event_waits_for_flush() {
        #[derive(sprig_macros::Event)]
        struct Spawned;

        let mut world = World::new();
        world.push_event(Spawned);

        assert_eq!(world.events().pending::<Spawned>(), 1);
    }
}
