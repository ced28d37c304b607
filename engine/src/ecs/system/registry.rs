//! System arena for storing and retrieving ECS systems.
//!
//! The [`Registry`] owns every system added to a scheduler, indexed by its [`Id`], together with
//! the per-system flags the scheduler drives each tick.

use fixedbitset::FixedBitSet;

use crate::ecs::{
    registry::TypeRegistry,
    system::{ErasedSystem, Id, System},
    world::World,
};

/// One registered system and its scheduling state.
struct Slot {
    /// The system itself.
    system: Box<dyn ErasedSystem>,

    /// Disabled systems are skipped and receive no events.
    enabled: bool,

    /// Set once the system has run in the current tick.
    updated: bool,

    /// Registered systems this one waits for.
    dependencies: Vec<Id>,
}

/// A registry for storing and managing ECS systems.
///
/// Holds at most one system per Rust type. Ids come from the registry's own type registry, so a
/// system type can be referenced (for example as a dependency) before a value of it is added.
#[derive(Default)]
pub struct Registry {
    /// System type ids.
    types: TypeRegistry<Id>,

    /// Registered systems, indexed by their [`Id`].
    slots: Vec<Option<Slot>>,
}

impl Registry {
    /// Create a new, empty system registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for system type `S`, assigning one if needed.
    #[inline]
    pub fn id_of<S: System>(&self) -> Id {
        self.types.register::<S>()
    }

    /// Get the type registry of this arena.
    #[inline]
    pub fn types(&self) -> &TypeRegistry<Id> {
        &self.types
    }

    /// Add `system` unless a system of the same type is already registered.
    ///
    /// Returns the id of the system type and whether `system` was stored. A rejected value is
    /// dropped; the existing system keeps its state.
    pub fn insert<S: System>(&mut self, system: S) -> (Id, bool) {
        let id = self.types.register::<S>();
        if self.slots.len() <= id.index() {
            self.slots.resize_with(id.index() + 1, || None);
        }

        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            return (id, false);
        }

        *slot = Some(Slot {
            system: Box::new(system),
            enabled: true,
            updated: false,
            dependencies: Vec::new(),
        });
        (id, true)
    }

    /// Returns `true` if a system is stored under `id`.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.slot(id).is_some()
    }

    /// Get the registered system of type `S`.
    pub fn get<S: System>(&self) -> Option<&S> {
        let id = self.types.get::<S>()?;
        self.slot(id)?.system.as_any().downcast_ref::<S>()
    }

    /// Get the registered system of type `S` mutably.
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let id = self.types.get::<S>()?;
        self.slot_mut(id)?.system.as_any_mut().downcast_mut::<S>()
    }

    /// Returns `true` if `id` is registered and enabled.
    #[inline]
    pub fn is_enabled(&self, id: Id) -> bool {
        self.slot(id).is_some_and(|slot| slot.enabled)
    }

    /// Returns `true` if `id` has run during the current tick.
    #[inline]
    pub fn is_updated(&self, id: Id) -> bool {
        self.slot(id).is_some_and(|slot| slot.updated)
    }

    /// Enable or disable a registered system. Returns `false` if `id` is not registered.
    pub fn set_enabled(&mut self, id: Id, enabled: bool) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// The dependencies of `id` as of the last rebuild.
    pub fn dependencies(&self, id: Id) -> &[Id] {
        self.slot(id)
            .map(|slot| slot.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// The ids of every registered system, ascending.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| Id::new(index as u32))
    }

    /// The number of registered systems.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no system is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The type name of system `id`, for diagnostics.
    #[inline]
    pub fn name(&self, id: Id) -> &'static str {
        self.types.name(id)
    }

    /// Run system `id` and mark it updated.
    pub(crate) fn run(&mut self, id: Id, world: &mut World) {
        if let Some(slot) = self.slot_mut(id) {
            slot.system.run(world);
            slot.updated = true;
        }
    }

    /// Get the erased system `id` if it is registered and enabled.
    pub(crate) fn enabled_mut(&mut self, id: Id) -> Option<&mut dyn ErasedSystem> {
        self.slot_mut(id)
            .filter(|slot| slot.enabled)
            .map(|slot| slot.system.as_mut())
    }

    /// Replace the dependency list of `id`.
    pub(crate) fn set_dependencies(&mut self, id: Id, dependencies: Vec<Id>) {
        if let Some(slot) = self.slot_mut(id) {
            slot.dependencies = dependencies;
        }
    }

    /// Clear the updated flag of every system.
    pub(crate) fn reset_updated(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.updated = false;
        }
    }

    /// Returns `true` if `id` may run now.
    ///
    /// A system is ready when each registered dependency is either enabled and already updated,
    /// or disabled and itself ready. Unregistered dependencies are ignored. A walk that comes back
    /// to a system through disabled dependencies is a cycle and counts as not ready.
    ///
    /// `visiting` is scratch space for the walk. It is cleared first, so one set can be reused
    /// across calls.
    pub(crate) fn is_ready(&self, id: Id, visiting: &mut FixedBitSet) -> bool {
        visiting.clear();
        visiting.grow(self.slots.len());
        self.is_ready_inner(id, visiting)
    }

    fn is_ready_inner(&self, id: Id, visiting: &mut FixedBitSet) -> bool {
        let Some(slot) = self.slot(id) else {
            return true;
        };
        if visiting.put(id.index()) {
            return false;
        }

        let ready = slot
            .dependencies
            .iter()
            .all(|dependency| match self.slot(*dependency) {
                None => true,
                Some(dep) if dep.enabled => dep.updated,
                Some(_) => self.is_ready_inner(*dependency, visiting),
            });

        visiting.set(id.index(), false);
        ready
    }

    #[inline]
    fn slot(&self, id: Id) -> Option<&Slot> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    fn slot_mut(&mut self, id: Id) -> Option<&mut Slot> {
        self.slots.get_mut(id.index())?.as_mut()
    }
}
