use std::{any::Any, mem};

use crate::ecs::{
    event::Event,
    system::{self, Registry},
    world::World,
};

/// Delivers one event to an erased subscriber.
pub(crate) type Callback<E> = fn(&mut dyn Any, &E, &mut World);

/// Delivers the active queue of one bus. One per event type, so the scheduler can flush buses
/// without knowing their types.
pub(crate) type Dispatch = fn(&mut World, &mut Registry);

/// A subscription of one system to one event type.
struct Subscriber<E> {
    system: system::Id,
    callback: Callback<E>,
}

/// Double-buffered queue for a single event type.
///
/// `Bus<E>` keeps two queues and the index of the active one. Writers append to the other queue;
/// the scheduler toggles the index once per tick and then hands the active queue to every
/// subscriber.
pub struct Bus<E: Event> {
    /// Index of the active (read) queue: 0 or 1.
    active: usize,

    /// The two queues, one active, one collecting.
    queues: [Vec<E>; 2],

    /// Subscribed systems, in subscription order.
    subscribers: Vec<Subscriber<E>>,
}

impl<E: Event> Bus<E> {
    /// Create a bus with room for `capacity` events in each queue before reallocating.
    pub fn new(capacity: usize) -> Self {
        Self {
            active: 0,
            queues: [Vec::with_capacity(capacity), Vec::with_capacity(capacity)],
            subscribers: Vec::new(),
        }
    }

    /// Queue an event for delivery at the next flush.
    #[inline]
    pub fn enqueue(&mut self, event: E) {
        self.queues[self.active ^ 1].push(event);
    }

    /// The number of events waiting for the next flush.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queues[self.active ^ 1].len()
    }

    /// The number of subscribed systems.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if `system` is subscribed.
    pub fn is_subscribed(&self, system: system::Id) -> bool {
        self.subscribers.iter().any(|s| s.system == system)
    }

    /// Subscribe `system`. A second subscription of the same system is ignored.
    pub(crate) fn subscribe(&mut self, system: system::Id, callback: Callback<E>) -> bool {
        if self.is_subscribed(system) {
            return false;
        }
        self.subscribers.push(Subscriber { system, callback });
        true
    }

    /// Make the collecting queue active.
    #[inline]
    pub(crate) fn toggle(&mut self) {
        self.active ^= 1;
    }
}

/// Type-erased access to a [`Bus`] of any event type.
pub(crate) trait ErasedBus: 'static {
    fn toggle(&mut self);

    fn pending(&self) -> usize;

    fn dispatcher(&self) -> Dispatch;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Event> ErasedBus for Bus<E> {
    #[inline]
    fn toggle(&mut self) {
        Bus::toggle(self);
    }

    #[inline]
    fn pending(&self) -> usize {
        Bus::pending(self)
    }

    #[inline]
    fn dispatcher(&self) -> Dispatch {
        dispatch::<E>
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

/// Deliver every event in the active queue of `E`'s bus to each enabled subscriber, then clear
/// the queue.
///
/// The queue and subscriber list are moved out of the bus while handlers run, so a handler may push
/// events of any type, `E` included. Those land in collecting queues and are delivered next tick.
fn dispatch<E: Event>(world: &mut World, systems: &mut Registry) {
    let Some(bus) = world.events_mut().bus_mut::<E>() else {
        return;
    };

    let active = bus.active;
    if bus.queues[active].is_empty() {
        return;
    }

    let mut queue = mem::take(&mut bus.queues[active]);
    let subscribers = mem::take(&mut bus.subscribers);

    log::trace!(
        "delivering {} {} event(s) to {} subscriber(s)",
        queue.len(),
        std::any::type_name::<E>(),
        subscribers.len()
    );

    for event in &queue {
        for subscriber in &subscribers {
            if let Some(system) = systems.enabled_mut(subscriber.system) {
                (subscriber.callback)(system.as_any_mut(), event, world);
            }
        }
    }

    queue.clear();

    if let Some(bus) = world.events_mut().bus_mut::<E>() {
        bus.queues[active] = queue;
        let added = mem::replace(&mut bus.subscribers, subscribers);
        bus.subscribers.extend(added);
    }
}
