use std::any::Any;

use crate::ecs::{
    component::{self, Component, Join},
    entity,
    registry::TypeRegistry,
    storage::{Bounds, PagedStore},
};

/// Type-erased access to a [`PagedStore`] of any component type.
///
/// Only the operations that do not need the concrete type are exposed; everything else goes
/// through a checked downcast.
pub(crate) trait ErasedStore: 'static {
    /// Remove the value for `id`, if any.
    fn erase(&mut self, id: entity::Id);

    /// The number of stored values.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for PagedStore<C> {
    #[inline]
    fn erase(&mut self, id: entity::Id) {
        PagedStore::erase(self, id);
    }

    #[inline]
    fn len(&self) -> usize {
        PagedStore::len(self)
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

/// Storage for every component type, one [`PagedStore`] per type.
///
/// Stores are created lazily on the first write of their type. Reads never create a store: a read
/// of a type that was never written finds nothing.
#[derive(Default)]
pub struct Table {
    /// Component type ids, assigned in order of first write.
    types: TypeRegistry<component::Id>,

    /// Stores indexed by component type id.
    stores: Vec<Option<Box<dyn ErasedStore>>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the component type registry of this table.
    #[inline]
    pub fn types(&self) -> &TypeRegistry<component::Id> {
        &self.types
    }

    /// Get the store for `C`, if one exists.
    pub fn store<C: Component>(&self) -> Option<&PagedStore<C>> {
        let id = self.types.get::<C>()?;
        self.stores
            .get(id.index())?
            .as_deref()?
            .as_any()
            .downcast_ref::<PagedStore<C>>()
    }

    /// Get the store for `C` mutably, if one exists.
    pub fn store_mut<C: Component>(&mut self) -> Option<&mut PagedStore<C>> {
        let id = self.types.get::<C>()?;
        self.stores
            .get_mut(id.index())?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<PagedStore<C>>()
    }

    /// Get the store for `C`, creating it if needed.
    fn store_or_create<C: Component>(&mut self) -> &mut PagedStore<C> {
        let id = self.types.register::<C>();
        if self.stores.len() <= id.index() {
            self.stores.resize_with(id.index() + 1, || None);
        }

        let store = self.stores[id.index()].get_or_insert_with(|| {
            log::debug!("creating store for component {}", self.types.name(id));
            Box::new(PagedStore::<C>::new())
        });

        match store.as_any_mut().downcast_mut::<PagedStore<C>>() {
            Some(store) => store,
            None => unreachable!("component store {id:?} holds a different type"),
        }
    }

    /// Attach `value` to `id` unless it already holds a `C`. Returns the stored value.
    #[inline]
    pub fn add<C: Component>(&mut self, id: entity::Id, value: C) -> &mut C {
        self.store_or_create::<C>().insert_or_get(id, value)
    }

    /// Attach a `C` built by `make` to `id` unless it already holds one. Returns the stored value.
    #[inline]
    pub fn emplace<C: Component>(&mut self, id: entity::Id, make: impl FnOnce() -> C) -> &mut C {
        self.store_or_create::<C>().emplace(id, make)
    }

    /// Attach `value` to `id`, overwriting any existing `C`.
    #[inline]
    pub fn set<C: Component>(&mut self, id: entity::Id, value: C) -> &mut C {
        self.store_or_create::<C>().set(id, value)
    }

    #[inline]
    pub fn get<C: Component>(&self, id: entity::Id) -> Option<&C> {
        self.store::<C>()?.get(id)
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self, id: entity::Id) -> Option<&mut C> {
        self.store_mut::<C>()?.get_mut(id)
    }

    /// Detach and return the `C` held by `id`, if any.
    #[inline]
    pub fn remove<C: Component>(&mut self, id: entity::Id) -> Option<C> {
        self.store_mut::<C>()?.take(id)
    }

    /// Detach every component held by `id`.
    pub fn remove_all(&mut self, id: entity::Id) {
        for store in self.stores.iter_mut().flatten() {
            store.erase(id);
        }
    }

    /// Returns `true` if `id` holds a `C`.
    #[inline]
    pub fn contains<C: Component>(&self, id: entity::Id) -> bool {
        self.store::<C>().is_some_and(|store| store.exists(id))
    }

    /// The number of entities holding a `C`.
    #[inline]
    pub fn len<C: Component>(&self) -> usize {
        self.store::<C>().map_or(0, PagedStore::len)
    }

    /// The smallest and largest id holding a `C`.
    #[inline]
    pub fn bounds<C: Component>(&self) -> Bounds {
        self.store::<C>().map_or(Bounds::EMPTY, PagedStore::index_range)
    }

    /// The number of values stored across every component type.
    pub fn total_len(&self) -> usize {
        self.stores.iter().flatten().map(|store| store.len()).sum()
    }

    /// Call `f` for every entity holding every component in `Q`, in ascending id order.
    #[inline]
    pub fn join<'a, Q: Join>(&'a self, f: impl FnMut(entity::Id, Q::Item<'a>)) {
        Q::join(self, f);
    }

    /// Call `f` with mutable access for every entity holding every component in `Q`, in ascending
    /// id order.
    #[inline]
    pub fn join_mut<'a, Q: Join>(&'a mut self, f: impl FnMut(entity::Id, Q::ItemMut<'a>)) {
        Q::join_mut(self, f);
    }

    /// The store slot index for `C`, if `C` has been written.
    #[inline]
    pub(crate) fn index_of<C: Component>(&self) -> Option<usize> {
        self.types.get::<C>().map(|id| id.index())
    }

    /// Borrow several stores mutably at once.
    ///
    /// Returns `None` if an index is repeated or out of bounds.
    pub(crate) fn stores_disjoint_mut<const K: usize>(
        &mut self,
        indices: [usize; K],
    ) -> Option<[Option<&mut dyn ErasedStore>; K]> {
        let slots = self.stores.get_disjoint_mut(indices).ok()?;
        Some(slots.map(|slot| slot.as_deref_mut()))
    }
}
