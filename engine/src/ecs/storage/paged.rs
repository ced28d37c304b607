use crate::ecs::entity;

use super::{Bounds, PAGE_SIZE, page::Page};

/// A sparse map from entity id to `T`, packed into pages of `N` ids.
///
/// Pages are created on the first insert into their id range and dropped again when their last
/// value is erased, so memory follows the live ids rather than the largest id ever used.
///
/// ```rust,ignore
/// let mut store = PagedStore::<Position>::new();
/// store.set(entity::Id::new(10), Position::default());
/// store.set(entity::Id::new(9), Position::default());
///
/// assert_eq!(store.index_range(), Bounds::new(9.into(), 10.into()));
/// ```
pub struct PagedStore<T, const N: usize = PAGE_SIZE> {
    /// Page slots, indexed by `id / N`.
    pages: Vec<Option<Box<Page<T, N>>>>,

    /// The number of live values across every page.
    len: usize,
}

impl<T, const N: usize> Default for PagedStore<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> PagedStore<T, N> {
    /// Create an empty store. No page is allocated until the first insert.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            len: 0,
        }
    }

    /// Get the value for `id`, placing `value` first if there is none. An existing value is left
    /// untouched and `value` is dropped.
    #[inline]
    pub fn insert_or_get(&mut self, id: entity::Id, value: T) -> &mut T {
        self.emplace(id, || value)
    }

    /// Get the value for `id`, constructing it with `make` first if there is none.
    ///
    /// `make` only runs when the slot is empty.
    pub fn emplace(&mut self, id: entity::Id, make: impl FnOnce() -> T) -> &mut T {
        debug_assert!(id.is_valid(), "cannot store a value for the invalid id");
        let (page, slot) = Self::locate(id);
        let len = &mut self.len;
        let page = Self::page_or_alloc(&mut self.pages, page);
        if !page.exists(slot) {
            *len += 1;
        }
        page.get_or_place(slot, make)
    }

    /// Store `value` for `id`, overwriting any existing value.
    ///
    /// `id` must not be [`entity::Id::INVALID`]. That id marks empty [`Bounds`], so a value stored
    /// under it would never be joined.
    pub fn set(&mut self, id: entity::Id, value: T) -> &mut T {
        debug_assert!(id.is_valid(), "cannot store a value for the invalid id");
        let (page, slot) = Self::locate(id);
        let len = &mut self.len;
        let page = Self::page_or_alloc(&mut self.pages, page);
        if !page.exists(slot) {
            *len += 1;
        }
        page.set(slot, value)
    }

    /// Remove the value for `id`, if any.
    #[inline]
    pub fn erase(&mut self, id: entity::Id) {
        self.take(id);
    }

    /// Remove and return the value for `id`, if any. The page holding it is freed when it becomes
    /// empty.
    pub fn take(&mut self, id: entity::Id) -> Option<T> {
        let (index, slot) = Self::locate(id);
        let page = self.pages.get_mut(index)?.as_mut()?;
        let value = page.remove(slot)?;
        self.len -= 1;

        if page.is_empty() {
            log::trace!("freeing page {index} ({} ids)", N);
            self.pages[index] = None;
        }

        Some(value)
    }

    /// Returns `true` if `id` holds a value.
    #[inline]
    pub fn exists(&self, id: entity::Id) -> bool {
        let (page, slot) = Self::locate(id);
        self.page(page).is_some_and(|page| page.exists(slot))
    }

    /// Get the value for `id`.
    #[inline]
    pub fn get(&self, id: entity::Id) -> Option<&T> {
        let (page, slot) = Self::locate(id);
        self.page(page)?.get(slot)
    }

    /// Get the value for `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: entity::Id) -> Option<&mut T> {
        let (page, slot) = Self::locate(id);
        self.pages.get_mut(page)?.as_mut()?.get_mut(slot)
    }

    /// Get the value for an id known to be present.
    ///
    /// # Panics
    /// - if `id` holds no value
    #[inline]
    pub fn get_existing(&self, id: entity::Id) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("no value stored for entity {id:?}"),
        }
    }

    /// The smallest and largest id holding a value, or [`Bounds::EMPTY`].
    pub fn index_range(&self) -> Bounds {
        let min = self
            .pages
            .iter()
            .enumerate()
            .find_map(|(index, page)| Some(Self::id_of(index, page.as_ref()?.min_slot()?)));
        let max = self
            .pages
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, page)| Some(Self::id_of(index, page.as_ref()?.max_slot()?)));

        match (min, max) {
            (Some(min), Some(max)) => Bounds::new(min, max),
            _ => Bounds::EMPTY,
        }
    }

    /// The number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no value is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every value and page.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.len = 0;
    }

    /// Eagerly allocate the pages that would hold ids `0..count`.
    pub fn reserve(&mut self, count: usize) {
        for index in 0..count.div_ceil(N) {
            Self::page_or_alloc(&mut self.pages, index);
        }
    }

    /// The number of allocated pages.
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Iterate over `(id, value)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (entity::Id, &T)> {
        self.pages
            .iter()
            .enumerate()
            .filter_map(|(index, page)| Some((index, page.as_deref()?)))
            .flat_map(|(index, page)| {
                page.iter()
                    .map(move |(slot, value)| (Self::id_of(index, slot), value))
            })
    }

    /// Iterate mutably over `(id, value)` in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (entity::Id, &mut T)> {
        self.pages
            .iter_mut()
            .enumerate()
            .filter_map(|(index, page)| Some((index, page.as_deref_mut()?)))
            .flat_map(|(index, page)| {
                page.iter_mut()
                    .map(move |(slot, value)| (Self::id_of(index, slot), value))
            })
    }

    /// Split an id into its page index and slot within that page.
    #[inline]
    fn locate(id: entity::Id) -> (usize, usize) {
        (id.index() / N, id.index() % N)
    }

    #[inline]
    fn id_of(page: usize, slot: usize) -> entity::Id {
        entity::Id::new((page * N + slot) as u32)
    }

    #[inline]
    fn page(&self, index: usize) -> Option<&Page<T, N>> {
        self.pages.get(index)?.as_deref()
    }

    fn page_or_alloc(pages: &mut Vec<Option<Box<Page<T, N>>>>, index: usize) -> &mut Page<T, N> {
        if pages.len() <= index {
            pages.resize_with(index + 1, || None);
        }
        pages[index].get_or_insert_with(|| {
            log::trace!("allocating page {index} ({} ids)", N);
            Box::new(Page::new())
        })
    }
}
