//! Entity management for the ECS.
//!
//! Entities are plain integer ids. They carry no data of their own: components are attached to an
//! id through the world's component table, and an [`Entity`] is only a handle used to reach them.
//!
//! # Allocation
//!
//! The [`Allocator`] hands ids out from a FIFO free list first, then from a monotonic counter:
//!
//! ```rust,ignore
//! let mut allocator = Allocator::new();
//! let a = allocator.alloc()?; // id 0
//! let b = allocator.alloc()?; // id 1
//! allocator.free(a.id());
//! let c = allocator.alloc()?; // id 0 again
//! ```
//!
//! An id is `Free` or `Allocated`. Freeing an id that is already free is a no-op, so a double free
//! can never put the same id in the free list twice and later hand it to two live entities.
//!
//! # References
//!
//! [`Ref`] and [`RefMut`] borrow the world's component table for one entity and expose the
//! per-entity component API (`add`, `get`, `set`, `remove`, ...).

mod reference;

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::ecs::error::{Error, Result};

pub use reference::{Ref, RefMut};

/// An entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// The reserved sentinel. It is never handed out by an [`Allocator`] and marks the bounds of
    /// an empty store.
    pub const INVALID: Self = Self(u32::MAX);

    /// Construct an id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this id.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Get the index of this id if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `true` unless this is the [`INVALID`](Self::INVALID) sentinel.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the ECS.
///
/// Identity is the id alone: two handles with the same id refer to the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: Id,
}

impl Entity {
    /// Construct an entity handle for an id.
    #[inline]
    pub const fn new(id: Id) -> Self {
        Self { id }
    }

    /// Get the id of this entity.
    #[inline]
    pub const fn id(&self) -> Id {
        self.id
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.id.index()
    }
}

impl From<Entity> for Id {
    fn from(entity: Entity) -> Self {
        entity.id
    }
}

impl From<Id> for Entity {
    fn from(id: Id) -> Self {
        Self::new(id)
    }
}

/// An allocator for entity ids.
///
/// Reuses freed ids in FIFO order before drawing new ones from the counter. The counter never
/// reaches `limit`; once every id below it is live, [`alloc`](Self::alloc) fails with
/// [`Error::EntitiesExhausted`].
#[derive(Debug)]
pub struct Allocator {
    /// Ids available for reuse, oldest first.
    free: VecDeque<Id>,

    /// Membership of `free`, so double frees are detected in O(1).
    is_free: FixedBitSet,

    /// Next fresh id to hand out.
    next_id: u32,

    /// Exclusive upper bound on ids.
    limit: u32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    /// Construct an allocator that may use every id below the reserved sentinel.
    #[inline]
    pub fn new() -> Self {
        Self::with_limit(Id::INVALID.get())
    }

    /// Construct an allocator that hands out ids strictly below `limit`.
    ///
    /// The limit is clamped to the reserved sentinel.
    #[inline]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            free: VecDeque::new(),
            is_free: FixedBitSet::new(),
            next_id: 0,
            limit: limit.min(Id::INVALID.get()),
        }
    }

    /// Allocate an entity, reusing the oldest freed id if there is one.
    pub fn alloc(&mut self) -> Result<Entity> {
        if let Some(id) = self.free.pop_front() {
            self.is_free.set(id.index(), false);
            return Ok(Entity::new(id));
        }

        if self.next_id >= self.limit {
            log::error!("entity ids exhausted (limit: {})", self.limit);
            return Err(Error::EntitiesExhausted { limit: self.limit });
        }

        let id = Id(self.next_id);
        self.next_id += 1;
        Ok(Entity::new(id))
    }

    /// Return an id to the free list.
    ///
    /// Returns `false`, and does nothing, if the id is already free or was never allocated.
    pub fn free(&mut self, id: Id) -> bool {
        if id.get() >= self.next_id {
            log::warn!("attempted to free entity {id:?} which was never allocated");
            return false;
        }
        if self.is_free.contains(id.index()) {
            log::debug!("entity {id:?} is already free");
            return false;
        }

        self.is_free.grow(id.index() + 1);
        self.is_free.insert(id.index());
        self.free.push_back(id);
        true
    }

    /// Returns `true` if the id is currently allocated.
    #[inline]
    pub fn is_alive(&self, id: Id) -> bool {
        id.get() < self.next_id && !self.is_free.contains(id.index())
    }

    /// The number of currently allocated ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id as usize - self.free.len()
    }

    /// Returns `true` if no id is currently allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The exclusive upper bound on ids.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
