//! Central registry and manager for all event buses.
//!
//! The [`Broker`] owns one [`Bus`] per event type, stored type-erased in a vector indexed by the
//! event type id. Ids are handed out in order of first use, which also fixes the order in which
//! buses are flushed each tick.
//!
//! ```rust,ignore
//! let mut broker = Broker::new();
//!
//! broker.push(Damage { amount: 50 });
//! assert_eq!(broker.pending::<Damage>(), 1);
//!
//! // Start of the next tick: every bus toggles before any is delivered.
//! broker.swap_all();
//! ```

use crate::ecs::{
    event::{
        self, Bus, Event,
        bus::{Callback, Dispatch, ErasedBus},
    },
    registry::TypeRegistry,
    system,
};

/// Initial queue reservation for a new bus.
pub const DEFAULT_CAPACITY: usize = 64;

/// Central registry and manager for all event buses.
pub struct Broker {
    /// Event type ids, assigned in order of first use.
    types: TypeRegistry<event::Id>,

    /// Buses indexed by event type id.
    buses: Vec<Option<Box<dyn ErasedBus>>>,

    /// Queue reservation for buses created from now on.
    capacity: usize,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    /// Creates a new, empty event broker.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new, empty event broker whose buses reserve `capacity` events per queue.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            types: TypeRegistry::new(),
            buses: Vec::new(),
            capacity,
        }
    }

    /// Get the event type registry of this broker.
    #[inline]
    pub fn types(&self) -> &TypeRegistry<event::Id> {
        &self.types
    }

    /// Returns the bus for `E`, if one exists.
    pub fn bus<E: Event>(&self) -> Option<&Bus<E>> {
        let id = self.types.get::<E>()?;
        self.buses
            .get(id.index())?
            .as_deref()?
            .as_any()
            .downcast_ref::<Bus<E>>()
    }

    /// Returns the bus for `E` mutably, if one exists.
    pub fn bus_mut<E: Event>(&mut self) -> Option<&mut Bus<E>> {
        let id = self.types.get::<E>()?;
        self.buses
            .get_mut(id.index())?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<Bus<E>>()
    }

    /// Returns the bus for `E`, creating it if needed.
    pub fn bus_or_create<E: Event>(&mut self) -> &mut Bus<E> {
        let id = self.types.register::<E>();
        if self.buses.len() <= id.index() {
            self.buses.resize_with(id.index() + 1, || None);
        }

        let capacity = self.capacity;
        let bus = self.buses[id.index()].get_or_insert_with(|| {
            log::debug!("creating event bus for {}", self.types.name(id));
            Box::new(Bus::<E>::new(capacity))
        });

        match bus.as_any_mut().downcast_mut::<Bus<E>>() {
            Some(bus) => bus,
            None => unreachable!("event bus {id:?} holds a different type"),
        }
    }

    /// Queue an event for delivery at the start of the next tick.
    #[inline]
    pub fn push<E: Event>(&mut self, event: E) {
        self.bus_or_create::<E>().enqueue(event);
    }

    /// Subscribe `system` to events of type `E`.
    pub(crate) fn subscribe<E: Event>(&mut self, system: system::Id, callback: Callback<E>) {
        if self.bus_or_create::<E>().subscribe(system, callback) {
            log::debug!(
                "system {system:?} subscribed to {}",
                std::any::type_name::<E>()
            );
        }
    }

    /// The number of `E` events waiting for the next flush.
    #[inline]
    pub fn pending<E: Event>(&self) -> usize {
        self.bus::<E>().map_or(0, Bus::pending)
    }

    /// The number of events of every type waiting for the next flush.
    pub fn total_pending(&self) -> usize {
        self.buses.iter().flatten().map(|bus| bus.pending()).sum()
    }

    /// The number of systems subscribed to `E`.
    #[inline]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.bus::<E>().map_or(0, Bus::subscriber_count)
    }

    /// The number of buses.
    pub fn len(&self) -> usize {
        self.buses.iter().flatten().count()
    }

    /// Returns `true` if no bus exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Toggle the active queue of every bus.
    pub(crate) fn swap_all(&mut self) {
        for bus in self.buses.iter_mut().flatten() {
            bus.toggle();
        }
    }

    /// The dispatch function of every bus, in event type id order.
    pub(crate) fn dispatchers(&self) -> Vec<Dispatch> {
        self.buses
            .iter()
            .flatten()
            .map(|bus| bus.dispatcher())
            .collect()
    }
}
