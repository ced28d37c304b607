use crate::{
    all_tuples,
    ecs::{
        event::{Broker, Event},
        system::{self, Handler, Registry, System, handle_erased},
    },
};

/// A set of event types a system of type `S` handles.
///
/// Implemented for a single event type `E` where `S: Handler<E>`, and for tuples of such sets, so
/// that `handles::<(Spawned, Despawned)>()` subscribes to both.
pub trait EventSet<S: System> {
    /// Subscribe system `system` to every event type in the set.
    fn subscribe(events: &mut Broker, system: system::Id);
}

impl<S: Handler<E>, E: Event> EventSet<S> for E {
    fn subscribe(events: &mut Broker, system: system::Id) {
        events.subscribe::<E>(system, handle_erased::<S, E>);
    }
}

/// A set of system types, used to declare dependencies.
///
/// Implemented for a single system type and for tuples of system types.
pub trait SystemSet {
    /// Push the id of every system type in the set onto `ids`.
    fn collect_ids(systems: &Registry, ids: &mut Vec<system::Id>);
}

impl<S: System> SystemSet for S {
    fn collect_ids(systems: &Registry, ids: &mut Vec<system::Id>) {
        ids.push(systems.id_of::<S>());
    }
}

macro_rules! tuple_sets {
    ($($name: ident),*) => {
        impl<S: System, $($name: EventSet<S>),*> EventSet<S> for ($($name,)*) {
            fn subscribe(events: &mut Broker, system: system::Id) {
                $(<$name as EventSet<S>>::subscribe(events, system);)*
            }
        }

        impl<$($name: SystemSet),*> SystemSet for ($($name,)*) {
            fn collect_ids(systems: &Registry, ids: &mut Vec<system::Id>) {
                $(<$name as SystemSet>::collect_ids(systems, ids);)*
            }
        }
    }
}

all_tuples!(tuple_sets);
