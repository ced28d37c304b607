//! Paged sparse storage for component values.
//!
//! Every component type gets one [`PagedStore`], a map from entity id to value that keeps its values
//! packed and sorted by id. The id space is cut into fixed-size pages, and a page only exists while
//! at least one of its ids holds a value:
//!
//! ```text
//! ids:      0 ........ 63 | 64 ....... 127 | 128 ...... 191 | 192 ...
//!
//! pages:   ┌─────────────┐ ┌──────────────┐ ┌──────────────┐
//!          │ Page 0      │ │ None         │ │ Page 2       │  ...
//!          │  index      │ │              │ │  index       │
//!          │  back_index │ │  (no values, │ │  back_index  │
//!          │  data[..]   │ │   no memory) │ │  data[..]    │
//!          └─────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! Inside a page, values are kept in a dense vector ordered by slot, so iterating a store walks
//! memory front to back and yields ids in ascending order.
//!
//! # Operations
//!
//! | Operation | Time | Notes |
//! |-----------|------|-------|
//! | `exists` / `get` | O(1) | Page lookup then slot lookup |
//! | insert at tail of page | O(1) | Append to the dense vector |
//! | insert in page interior | O(N) | Shift tail of one page |
//! | `erase` | O(N) | Shift tail of one page, free page if empty |
//! | `index_range` | O(P) | Scan pages from each end |
//!
//! `N` is the page size ([`PAGE_SIZE`] by default) and `P` the number of page slots.
//!
//! # Bounds
//!
//! [`PagedStore::index_range`] returns the smallest and largest live id as a [`Bounds`]. Joins
//! combine the bounds of every requested store and scan that inclusive range.

mod page;
mod paged;

pub use paged::PagedStore;

use crate::ecs::entity;

/// Default number of ids per page.
pub const PAGE_SIZE: usize = 64;

/// An inclusive range of entity ids, `min..=max`.
///
/// [`Bounds::EMPTY`] uses the reserved [`entity::Id::INVALID`] for both ends and contains no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min: entity::Id,
    max: entity::Id,
}

impl Bounds {
    /// The bounds of a store holding no values.
    pub const EMPTY: Self = Self {
        min: entity::Id::INVALID,
        max: entity::Id::INVALID,
    };

    /// Construct bounds covering `min..=max`.
    #[inline]
    pub const fn new(min: entity::Id, max: entity::Id) -> Self {
        Self { min, max }
    }

    /// The smallest id in range.
    #[inline]
    pub const fn min(&self) -> entity::Id {
        self.min
    }

    /// The largest id in range.
    #[inline]
    pub const fn max(&self) -> entity::Id {
        self.max
    }

    /// Returns `true` for the empty sentinel.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !self.min.is_valid()
    }

    /// The smallest bounds covering both `self` and `other`. Empty bounds are ignored.
    pub fn union(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (_, true) => self,
            _ => Self {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
            },
        }
    }

    /// Returns `true` if `id` lies in range.
    #[inline]
    pub fn contains(&self, id: entity::Id) -> bool {
        !self.is_empty() && self.min <= id && id <= self.max
    }

    /// The number of ids in range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max.get() - self.min.get()) as usize + 1
        }
    }

    /// Iterate every id in range in ascending order.
    pub fn ids(self) -> impl Iterator<Item = entity::Id> {
        let range = if self.is_empty() {
            1..=0
        } else {
            self.min.get()..=self.max.get()
        };
        range.map(entity::Id::new)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}
