//! Typed events exchanged between systems.
//!
//! Every event type gets its own [`Bus`], a pair of queues of which exactly one is active at a
//! time. Pushes always land in the inactive queue; the tick flush toggles the queues and delivers
//! the newly active one to the bus's subscribers:
//!
//! ```text
//! tick N    push(e1), push(e2)  ──►  queue[1]: [e1, e2]      (inactive)
//! tick N+1  flush: toggle       ──►  queue[1] is now active
//!                  deliver e1, e2 to every enabled subscriber
//!                  clear queue[1]
//! ```
//!
//! An event is therefore seen exactly one tick after it is pushed, whether it was pushed by a
//! system update, a handler, or the embedding application between ticks. Events of a type that no
//! system subscribes to are dropped at flush.
//!
//! The [`Broker`] owns every bus, creating one lazily on the first push or subscription of its
//! type.

mod broker;
mod bus;

pub use broker::{Broker, DEFAULT_CAPACITY};
pub use bus::Bus;

use crate::ecs::registry::{TypeKind, type_index};

type_index!(
    /// An event type identifier, assigned sequentially on first use of the type.
    Id,
    TypeKind::Event
);

/// Marker trait for event types.
///
/// Events are moved into a queue when pushed and handed to subscribers by reference, so the only
/// requirement is that they own their data.
pub trait Event: 'static {}
