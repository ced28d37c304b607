//! Component management for the ECS.
//!
//! Components are plain data attached to entities. Each component type is stored in its own
//! [`PagedStore`](crate::ecs::storage::PagedStore), and the [`Table`] keeps one such store per type,
//! erased behind a common trait so that stores of every type can live in a single vector:
//!
//! ```text
//! Table
//!   types:  Position → 0, Velocity → 1, Health → 2
//!   stores: [ Some(PagedStore<Position>), Some(PagedStore<Velocity>), None ]
//!                                                                     ▲
//!                                       registered, nothing stored yet
//! ```
//!
//! ## Joins
//!
//! A [`Join`] visits every entity that holds all of a set of component types, in ascending entity
//! id order. A join is declared as a single component type or a tuple of them:
//!
//! ```ignore
//! use sprig::ecs::{Component, component::Table};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! table.join::<(Position, Velocity)>(|id, (pos, vel)| {
//!     println!("{id:?} at ({}, {}) moving ({}, {})", pos.x, pos.y, vel.dx, vel.dy);
//! });
//! ```

mod join;
mod table;

pub use join::Join;
pub use table::Table;

use crate::ecs::registry::{TypeKind, type_index};

type_index!(
    /// A component type identifier, assigned sequentially on first use of the type.
    Id,
    TypeKind::Component
);

/// A trait representing a component in the ECS (Entity Component System).
///
/// At present this only sets the required trait bounds for a type to be used as a component.
pub trait Component: 'static + Sized {}
