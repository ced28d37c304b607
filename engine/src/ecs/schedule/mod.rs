//! Dependency-ordered, single-threaded execution of systems.
//!
//! The [`Scheduler`] owns every system and drives one round of work per call to
//! [`Scheduler::tick`]:
//!
//! ```text
//! tick(world)
//!   1. flush events     every bus toggles, then delivers to enabled subscribers
//!   2. rebuild graph    only if a dependency was declared since the last tick
//!   3. run systems      first ready system in id order, until none are left
//!   4. reset flags      `updated` cleared, unless the tick stalled
//! ```
//!
//! # Readiness
//!
//! A system is ready when, for every *registered* dependency `d`:
//! - `d` is enabled and has already run this tick, or
//! - `d` is disabled and is itself ready.
//!
//! Disabled systems are still walked in dependency order, they just never run. This lets
//! dependents of a disabled system wait for whatever the disabled system was waiting for.
//! Dependencies on system types that were never added are ignored.
//!
//! If the remaining systems are all waiting on each other the tick stops early and the report
//! returned by [`Scheduler::tick`] (and [`Scheduler::last_tick`]) records how many were stuck. The
//! `updated` flags of the systems that did run are left set in that case.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sprig::ecs::{Scheduler, World};
//!
//! let mut world = World::new();
//! let mut scheduler = Scheduler::new();
//!
//! scheduler.add_system(&mut world, Input);
//! scheduler
//!     .add_system(&mut world, Movement)
//!     .depends_on::<Input>()
//!     .handles::<(Collision, Teleport)>();
//!
//! loop {
//!     let report = scheduler.tick(&mut world);
//!     if report.is_stalled() {
//!         break;
//!     }
//! }
//! ```

mod dependencies;

use std::marker::PhantomData;

use dependencies::Dependencies;
use fixedbitset::FixedBitSet;

use crate::ecs::{
    system::{self, EventSet, Registry, System, SystemSet},
    world::World,
};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,

    /// Systems whose `update` was called.
    pub ran: usize,

    /// Disabled systems that were passed over.
    pub skipped: usize,

    /// Systems left waiting when the tick stopped early. Zero on a complete tick.
    pub stalled: usize,
}

impl TickReport {
    /// Returns `true` if the tick stopped before every system was visited.
    #[inline]
    pub fn is_stalled(&self) -> bool {
        self.stalled > 0
    }
}

/// Owns the systems of a world and runs them once per tick.
#[derive(Default)]
pub struct Scheduler {
    /// Every added system, indexed by system id.
    systems: Registry,

    /// Declared edges between system types.
    dependencies: Dependencies,

    /// The report of the most recent tick.
    last_tick: TickReport,
}

impl Scheduler {
    /// Create a scheduler with no systems.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system and return a [`Configurator`] for declaring its events and dependencies.
    ///
    /// Only one system per type is kept. Adding a second value of the same type drops it and
    /// configures the existing one instead.
    pub fn add_system<'a, S: System>(
        &'a mut self,
        world: &'a mut World,
        system: S,
    ) -> Configurator<'a, S> {
        let (id, inserted) = self.systems.insert(system);
        if inserted {
            log::debug!("added system {} as {id:?}", self.systems.name(id));
            self.dependencies.mark_dirty();
        } else {
            log::debug!(
                "system {} already added, keeping the existing one",
                self.systems.name(id)
            );
        }

        Configurator {
            scheduler: self,
            world,
            id,
            _marker: PhantomData,
        }
    }

    /// Run one tick: flush events, then run every ready system in dependency order.
    pub fn tick(&mut self, world: &mut World) -> TickReport {
        let mut report = TickReport {
            tick: self.last_tick.tick + 1,
            ..TickReport::default()
        };

        world.events_mut().swap_all();
        for dispatch in world.events().dispatchers() {
            dispatch(world, &mut self.systems);
        }

        if self.dependencies.is_dirty() {
            self.dependencies.rebuild(&mut self.systems);
        }

        let mut pending: Vec<system::Id> = self.systems.ids().collect();
        let mut visiting = FixedBitSet::new();
        while !pending.is_empty() {
            let Some(position) = pending
                .iter()
                .position(|id| self.systems.is_ready(*id, &mut visiting))
            else {
                report.stalled = pending.len();
                log::warn!(
                    "tick {} stalled, no ready system among: {}",
                    report.tick,
                    pending
                        .iter()
                        .map(|id| self.systems.name(*id))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                self.last_tick = report;
                return report;
            };

            let id = pending.remove(position);
            if self.systems.is_enabled(id) {
                self.systems.run(id, world);
                report.ran += 1;
            } else {
                report.skipped += 1;
            }
        }

        self.systems.reset_updated();
        self.last_tick = report;
        report
    }

    /// Enable the system of type `S`. Returns `false` if it was never added.
    pub fn enable<S: System>(&mut self) -> bool {
        let id = self.systems.id_of::<S>();
        self.systems.set_enabled(id, true)
    }

    /// Disable the system of type `S`. Returns `false` if it was never added.
    ///
    /// A disabled system neither runs nor receives events, but still orders its dependents.
    pub fn disable<S: System>(&mut self) -> bool {
        let id = self.systems.id_of::<S>();
        self.systems.set_enabled(id, false)
    }

    /// Returns `true` if the system of type `S` was added and is enabled.
    #[inline]
    pub fn is_enabled<S: System>(&self) -> bool {
        self.systems.is_enabled(self.systems.id_of::<S>())
    }

    #[inline]
    pub fn get<S: System>(&self) -> Option<&S> {
        self.systems.get::<S>()
    }

    #[inline]
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// The system arena, for inspection.
    #[inline]
    pub fn systems(&self) -> &Registry {
        &self.systems
    }

    /// The number of systems added.
    #[inline]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// The report of the most recent tick, or an empty report before the first one.
    #[inline]
    pub fn last_tick(&self) -> TickReport {
        self.last_tick
    }
}

/// Builder returned by [`Scheduler::add_system`] to declare what a system handles and waits for.
pub struct Configurator<'a, S: System> {
    scheduler: &'a mut Scheduler,
    world: &'a mut World,
    id: system::Id,
    _marker: PhantomData<fn() -> S>,
}

impl<S: System> Configurator<'_, S> {
    /// Subscribe the system to every event type in `Es`.
    ///
    /// ```rust,ignore
    /// scheduler.add_system(&mut world, Audio).handles::<(Explosion, Footstep)>();
    /// ```
    pub fn handles<Es: EventSet<S>>(self) -> Self {
        Es::subscribe(self.world.events_mut(), self.id);
        self
    }

    /// Make the system wait for every system type in `Ds` each tick.
    ///
    /// The dependencies do not have to be added yet; until they are, they are ignored.
    pub fn depends_on<Ds: SystemSet>(self) -> Self {
        let mut ids = Vec::new();
        Ds::collect_ids(&self.scheduler.systems, &mut ids);
        self.scheduler.dependencies.add(self.id, &ids);
        self
    }

    /// The id of the configured system.
    #[inline]
    pub fn id(&self) -> system::Id {
        self.id
    }
}
