pub mod component;
pub mod entity;
mod error;
pub mod event;
pub mod registry;
pub mod schedule;
pub mod storage;
pub mod system;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::{Error, Result};
pub use event::Event;
pub use schedule::Scheduler;
pub use system::{Handler, System};
pub use world::World;

pub use sprig_macros::{Component, Event};
