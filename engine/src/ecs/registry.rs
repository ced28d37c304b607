//! Sequential type-to-integer ids.
//!
//! Component stores, systems and event buses all live in plain vectors indexed by a small integer
//! derived from the Rust type. [`TypeRegistry`] hands those integers out: the first time a type is
//! seen in a namespace it receives the next free id, and every later lookup returns the same one.
//!
//! Each namespace ([`TypeKind`]) has its own counter, so the first component, the first system and
//! the first event type all receive id `0`. Ids are deterministic for a given registration order
//! within a process, but are not meant to be stable across runs.
//!
//! ```rust,ignore
//! let registry = TypeRegistry::<component::Id>::new();
//!
//! let pos = registry.register::<Position>();
//! let vel = registry.register::<Velocity>();
//!
//! assert_eq!(pos.index(), 0);
//! assert_eq!(vel.index(), 1);
//! assert_eq!(registry.register::<Position>(), pos);
//! ```

use std::{
    any::{TypeId as StdTypeId, type_name},
    fmt,
    sync::{
        RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

/// The namespace a registered type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A component type, stored per entity.
    Component,
    /// A system type, run by the scheduler.
    System,
    /// An event type, queued on a bus.
    Event,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Component => write!(f, "component"),
            TypeKind::System => write!(f, "system"),
            TypeKind::Event => write!(f, "event"),
        }
    }
}

/// An integer id handed out by a [`TypeRegistry`].
///
/// Implemented by the per-namespace id newtypes so that a component id can never be used to index
/// the system arena by accident.
pub trait TypeIndex: Copy + Eq + fmt::Debug + 'static {
    /// The namespace this id lives in.
    const KIND: TypeKind;

    /// Construct an id from its raw value.
    fn from_raw(raw: u32) -> Self;

    /// Get the index of this id for use in indexable storage (e.g. Vec).
    fn index(&self) -> usize;
}

/// Metadata about a registered type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo<I> {
    /// The sequential id.
    id: I,

    /// The Rust type id, for runtime type checks.
    type_id: StdTypeId,

    /// The type name, for diagnostics only.
    name: &'static str,
}

impl<I: TypeIndex> TypeInfo<I> {
    fn new<T: 'static>(id: I) -> Self {
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Get the sequential id.
    #[inline]
    pub fn id(&self) -> I {
        self.id
    }

    /// Get the namespace of the type.
    #[inline]
    pub fn kind(&self) -> TypeKind {
        I::KIND
    }

    /// Get the Rust type id.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A registry assigning sequential ids to types within one namespace.
///
/// Lookups of an already known type are lock-free reads through `DashMap`; only the first
/// registration of a type takes the write lock on the info table. Registration is idempotent.
pub struct TypeRegistry<I> {
    /// Map from Rust type id to sequential id.
    type_map: DashMap<StdTypeId, I>,

    /// Metadata for every registered type, indexed by id.
    infos: RwLock<Vec<Option<TypeInfo<I>>>>,

    /// Next id to hand out.
    next_id: AtomicU32,
}

impl<I: TypeIndex> Default for TypeRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: TypeIndex> TypeRegistry<I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            infos: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the id for `T`, assigning the next free id if `T` has not been seen before.
    pub fn register<T: 'static>(&self) -> I {
        let type_id = StdTypeId::of::<T>();

        // Fast path: already registered.
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        // The entry API keeps two racing registrations from both allocating an id.
        *self
            .type_map
            .entry(type_id)
            .or_insert_with(|| {
                let id = I::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
                let mut infos = self.infos.write().unwrap_or_else(|e| e.into_inner());
                if infos.len() <= id.index() {
                    infos.resize(id.index() + 1, None);
                }
                infos[id.index()] = Some(TypeInfo::new::<T>(id));
                log::trace!("registered {} {} as {:?}", I::KIND, type_name::<T>(), id);
                id
            })
            .value()
    }

    /// Get the id for `T` if it has been registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<I> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    /// Get the metadata for a registered id.
    pub fn info(&self, id: I) -> Option<TypeInfo<I>> {
        let infos = self.infos.read().unwrap_or_else(|e| e.into_inner());
        infos.get(id.index()).copied().flatten()
    }

    /// Get the type name registered for an id, or `"<unregistered>"`.
    pub fn name(&self, id: I) -> &'static str {
        self.info(id).map_or("<unregistered>", |info| info.name())
    }

    /// The number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Returns `true` if no type has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Declare a namespaced id newtype implementing [`TypeIndex`].
macro_rules! type_index {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Construct an id from a raw u32 value.
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the index of this id if it were to live in indexable storage (e.g. Vec).
            #[inline]
            pub const fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl $crate::ecs::registry::TypeIndex for $name {
            const KIND: $crate::ecs::registry::TypeKind = $kind;

            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            fn index(&self) -> usize {
                self.0 as usize
            }
        }
    };
}

pub(crate) use type_index;
